//! API error types for the Mojira client.

use thiserror::Error;

/// Errors that can occur when talking to the search endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The tracker refused the request.
    #[error("Permission denied: the tracker refused this request")]
    Forbidden,

    /// Endpoint or resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the tracker.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// Server-side error (or an unexpected status).
    #[error("Tracker server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The response body could not be understood.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 | 403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }
}
