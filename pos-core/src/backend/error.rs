//! Backend error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Remote backend error
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by the backend
    #[error("Rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// Backend not reachable
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        let message = err.to_string();
        match err {
            BackendError::Http(e) if e.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, message)
            }
            BackendError::Http(_) | BackendError::Unavailable(_) => {
                AppError::with_message(ErrorCode::NetworkError, message)
            }
            BackendError::NotFound(resource) => {
                AppError::with_message(ErrorCode::NotFound, message).with_detail("resource", resource)
            }
            BackendError::Rejected { status, .. } => {
                AppError::with_message(ErrorCode::BackendRejected, message).with_detail("status", status)
            }
            BackendError::InvalidResponse(_) | BackendError::Serialization(_) => {
                AppError::with_message(ErrorCode::InternalError, message)
            }
        }
    }
}
