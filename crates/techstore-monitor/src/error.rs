//! Monitor error types.

use thiserror::Error;

/// Errors from bridge commands.
///
/// Status checks never return these; they report the degraded state instead.
#[derive(Error, Debug)]
pub enum MonitorError {
    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("{service} returned {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    /// The response body was not what the endpoint documents.
    #[error("Unexpected response from {0}")]
    Decode(String),
}

/// Result alias for monitor operations.
pub type MonitorResult<T> = Result<T, MonitorError>;
