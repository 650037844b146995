use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "feed-digest")]
#[command(about = "Summarizes new Hatena, Reddit and Lobsters articles and posts them to Slack")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one or more feeds and notify new articles
    Run {
        /// Feed names (see `feeds`)
        #[arg(required = true)]
        feeds: Vec<String>,
    },

    /// Summarize a single URL and post it
    Summarize {
        /// Page to summarize
        url: String,

        /// Channel to post to (defaults to SLACK_CHANNEL)
        #[arg(short, long)]
        channel: Option<String>,
    },

    /// List the available feeds
    Feeds,

    /// Show articles recorded in the processed index
    Index {
        /// Show only the most recently processed entries
        #[arg(short, long)]
        limit: Option<usize>,
    },
}
