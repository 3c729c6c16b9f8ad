use std::time::Duration;

use thiserror::Error;

/// Main error type for wsbench operations
#[derive(Debug, Error)]
pub enum BenchError {
    /// A page element could not be located or read
    #[error("element not found: {0}")]
    ElementNotFound(String),

    /// A resource is still starting up
    #[error("not ready: {0}")]
    NotReady(String),

    /// A bounded wait expired before the condition was met
    #[error("timed out after {}s waiting for {what}", .waited.as_secs())]
    Timeout { what: String, waited: Duration },

    /// A wait was cancelled through its token
    #[error("cancelled while waiting for {0}")]
    Cancelled(String),

    /// Chrome launch or DevTools protocol failure
    #[error("browser error: {0}")]
    Browser(String),

    /// Speed probe failure (connection, transfer, missing latency)
    #[error("network probe failed: {0}")]
    NetworkProbe(String),

    /// Image encode or decode failure
    #[error("codec error: {0}")]
    Codec(String),

    /// A sub-test panicked
    #[error("sub-test panicked: {0}")]
    Panicked(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<image::ImageError> for BenchError {
    fn from(e: image::ImageError) -> Self {
        BenchError::Codec(e.to_string())
    }
}

impl BenchError {
    /// Short machine-readable kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            BenchError::ElementNotFound(_) => "element_not_found",
            BenchError::NotReady(_) => "not_ready",
            BenchError::Timeout { .. } => "timeout",
            BenchError::Cancelled(_) => "cancelled",
            BenchError::Browser(_) => "browser",
            BenchError::NetworkProbe(_) => "network_probe",
            BenchError::Codec(_) => "codec",
            BenchError::Panicked(_) => "panicked",
            BenchError::Config(_) => "config",
            BenchError::Http(_) => "http",
            BenchError::Io(_) => "io_error",
            BenchError::Json(_) => "internal_error",
        }
    }

    /// Process exit code when this error escapes to `main`
    pub fn exit_code(&self) -> i32 {
        match self {
            BenchError::Config(_) => 2,
            _ => 1,
        }
    }

    /// Whether a poll loop should retry after this error
    pub fn is_not_ready(&self) -> bool {
        matches!(self, BenchError::ElementNotFound(_) | BenchError::NotReady(_))
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
