use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Feed errors
    #[error("Unknown feed: {0}")]
    UnknownFeed(String),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Feed parsing failed: {0}")]
    Parse(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    // External API errors
    #[error("Summarization failed: {0}")]
    Summarize(String),

    #[error("Notification failed: {0}")]
    Notify(String),

    // Index errors
    #[error("Index I/O failed: {0}")]
    IndexIo(String),

    // Network errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Errors wrapped with the operation they happened in; the cause is part
    // of the message, so it is not exposed again through `source()`
    #[error("{context}: {cause}")]
    Context {
        context: String,
        cause: Box<DigestError>,
    },
}

impl DigestError {
    /// Innermost error beneath any number of `Context` layers
    pub fn root_cause(&self) -> &DigestError {
        match self {
            DigestError::Context { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}

impl From<chat::ChatError> for DigestError {
    fn from(err: chat::ChatError) -> Self {
        DigestError::Notify(err.to_string())
    }
}

pub type DigestResult<T> = Result<T, DigestError>;

pub trait ResultExt<T> {
    fn context<C: Into<String>>(self, context: C) -> DigestResult<T>;

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> DigestResult<T>;
}

impl<T> ResultExt<T> for DigestResult<T> {
    fn context<C: Into<String>>(self, context: C) -> DigestResult<T> {
        self.map_err(|e| DigestError::Context {
            context: context.into(),
            cause: Box::new(e),
        })
    }

    fn with_context<C: Into<String>, F: FnOnce() -> C>(self, f: F) -> DigestResult<T> {
        self.map_err(|e| DigestError::Context {
            context: f().into(),
            cause: Box::new(e),
        })
    }
}
