//! API Error Types
//!
//! The `Display` text of each variant is what a dashboard shows, so a
//! failed fetch can be rendered straight from `error.to_string()`.

use thiserror::Error;

/// Errors returned by the backend REST client
#[derive(Error, Debug)]
pub enum ApiError {
    /// 404: the backend has nothing for this endpoint yet
    #[error("No data available yet")]
    NotFound,

    /// Any other non-success status
    #[error("API error: {status}")]
    Status {
        status: u16,
        /// Server-provided `message` field, or `HTTP <status>` when absent
        message: String,
    },

    /// The request never produced a response
    #[error("Failed to fetch data")]
    Network(#[source] reqwest::Error),

    #[error("Failed to fetch data")]
    Timeout,

    /// The body was not the JSON shape the caller asked for
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// 404s are an expected empty state, not a failure worth alarming on
    pub fn is_empty_state(&self) -> bool {
        matches!(self, ApiError::NotFound)
    }

    /// HTTP status of the response, if one arrived
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(e)
        }
    }
}

/// Result type for client operations
pub type ApiResult<T> = Result<T, ApiError>;
