use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn digest_cmd() -> Command {
    let mut cmd = Command::cargo_bin("feed-digest").unwrap();
    for var in [
        "SLACK_BOT_TOKEN",
        "GEMINI_API_KEY",
        "INDEX_BACKEND",
        "INDEX_PATH",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

/// Command with credentials set and the index kept inside `dir`
fn configured_cmd(dir: &TempDir) -> Command {
    let mut cmd = digest_cmd();
    cmd.env("SLACK_BOT_TOKEN", "xoxb-test")
        .env("GEMINI_API_KEY", "test-key")
        .env("INDEX_PATH", dir.path().join("processed_articles.json"));
    cmd
}

#[test]
fn test_help_lists_commands() {
    digest_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("summarize"))
        .stdout(predicate::str::contains("feeds"))
        .stdout(predicate::str::contains("index"));
}

#[test]
fn test_run_help_shows_feed_argument() {
    digest_cmd()
        .arg("run")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("<FEEDS>..."));
}

#[test]
fn test_feeds_lists_builtin_sources_without_credentials() {
    digest_cmd()
        .arg("feeds")
        .assert()
        .success()
        .stdout(predicate::str::contains("hatena"))
        .stdout(predicate::str::contains("lobsters"))
        .stdout(predicate::str::contains("reddit"))
        .stdout(predicate::str::contains("https://lobste.rs/rss"));
}

#[test]
fn test_feeds_shows_url_override() {
    digest_cmd()
        .arg("feeds")
        .env("REDDIT_FEED_URL", "https://www.reddit.com/r/rust/.rss")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://www.reddit.com/r/rust/.rss"));
}

#[test]
fn test_run_without_token_fails() {
    let dir = TempDir::new().unwrap();

    digest_cmd()
        .current_dir(dir.path())
        .arg("run")
        .arg("hatena")
        .env("GEMINI_API_KEY", "test-key")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing environment variable: SLACK_BOT_TOKEN"));
}

#[test]
fn test_run_unknown_feed_fails() {
    let dir = TempDir::new().unwrap();

    configured_cmd(&dir)
        .current_dir(dir.path())
        .arg("run")
        .arg("slashdot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown feed: slashdot"));
}

#[test]
fn test_invalid_backend_fails() {
    let dir = TempDir::new().unwrap();

    configured_cmd(&dir)
        .current_dir(dir.path())
        .arg("index")
        .env("INDEX_BACKEND", "gcs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown index backend: gcs"));
}

#[test]
fn test_index_empty() {
    let dir = TempDir::new().unwrap();

    configured_cmd(&dir)
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("No processed articles."));
}

#[test]
fn test_index_lists_recorded_articles() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("processed_articles.json"),
        r#"{
  "https://example.com/mold": {
    "title": "Faster linking with mold",
    "url": "https://example.com/mold",
    "source": "lobsters",
    "pub_date": "2024-01-15T17:00:00Z",
    "processed_date": "2024-01-16T08:30:00Z"
  }
}"#,
    )
    .unwrap();

    configured_cmd(&dir)
        .current_dir(dir.path())
        .arg("index")
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-01-16 08:30 [lobsters] Faster linking with mold"))
        .stdout(predicate::str::contains("https://example.com/mold"));
}

#[test]
fn test_index_sqlite_backend_starts_empty() {
    let dir = TempDir::new().unwrap();

    configured_cmd(&dir)
        .current_dir(dir.path())
        .arg("index")
        .env("INDEX_BACKEND", "sqlite")
        .env("INDEX_PATH", dir.path().join("state").join("digest.db"))
        .assert()
        .success()
        .stdout(predicate::str::contains("No processed articles."));
}
