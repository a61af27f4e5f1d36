/// Shared error type used across all ReplyDesk crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP: {0}")]
    Http(String),

    #[error("timeout: {0}")]
    Timeout(String),

    #[error("download of {url} failed with HTTP {status}")]
    Download { url: String, status: u16 },

    #[error("provider {provider}: {message}")]
    Provider { provider: String, message: String },

    #[error("run {run_id} finished without a reply (status: {status}){}", fmt_reason(.message))]
    RunFailed {
        run_id: String,
        status: String,
        message: Option<String>,
    },

    #[error("run {run_id} did not complete within {waited_secs}s")]
    RunTimedOut { run_id: String, waited_secs: u64 },

    #[error("no assistant message in thread {thread_id}")]
    NoResponse { thread_id: String },

    #[error("cancelled: {0}")]
    Cancelled(String),

    #[error("auth: {0}")]
    Auth(String),
}

fn fmt_reason(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl Error {
    /// Stable snake_case tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Json(_) => "json",
            Error::Http(_) => "http",
            Error::Timeout(_) => "timeout",
            Error::Download { .. } => "download",
            Error::Provider { .. } => "platform",
            Error::RunFailed { .. } => "run_failed",
            Error::RunTimedOut { .. } => "run_timed_out",
            Error::NoResponse { .. } => "no_response",
            Error::Cancelled(_) => "cancelled",
            Error::Auth(_) => "auth",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// The single failure callers of the reply pipeline observe.
///
/// `Display` is deliberately generic so it can be returned to HTTP
/// clients as-is; the structured cause stays available through
/// [`std::error::Error::source`] and [`GenerationError::kind`].
#[derive(thiserror::Error, Debug)]
#[error("{}", GenerationError::MESSAGE)]
pub struct GenerationError {
    #[source]
    cause: Error,
}

impl GenerationError {
    pub const MESSAGE: &'static str = "Failed to generate reply";

    pub fn new(cause: Error) -> Self {
        Self { cause }
    }

    pub fn kind(&self) -> &'static str {
        self.cause.kind()
    }

    pub fn cause(&self) -> &Error {
        &self.cause
    }
}

impl From<Error> for GenerationError {
    fn from(cause: Error) -> Self {
        Self::new(cause)
    }
}
