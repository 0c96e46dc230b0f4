//! Error types and response conversion
//!
//! Client mistakes (bad cursors, bad paging arguments, unsortable fields) are
//! reported before any query runs and map to 4xx responses. Store failures
//! pass through unchanged as [`Error::Repository`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for pagers and connections
///
/// Large error variants are boxed to reduce stack size
#[derive(Debug, Error)]
pub enum Error {
    /// Cursor could not be decoded, has the wrong shape, or no longer matches
    /// the query's ordering
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    /// Paging arguments are contradictory, negative or too large
    #[error("Invalid paging: {0}")]
    InvalidPaging(String),

    /// Ordering names a field the entity does not allow sorting on
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// The backing store failed a query or count
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Total count was requested on a connection built without it
    #[error("Total count is not enabled for this connection")]
    TotalCountDisabled,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Stable machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidCursor(_) => "INVALID_CURSOR",
            Error::InvalidPaging(_) => "INVALID_PAGING",
            Error::InvalidSort(_) => "INVALID_SORT",
            Error::Repository(e) if e.is_retriable() => "REPOSITORY_UNAVAILABLE",
            Error::Repository(_) => "REPOSITORY_ERROR",
            Error::TotalCountDisabled => "TOTAL_COUNT_DISABLED",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-equivalent status code
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidCursor(_) | Error::InvalidPaging(_) | Error::InvalidSort(_) => 400,
            Error::Repository(e) if e.is_retriable() => 503,
            Error::TotalCountDisabled => 501,
            Error::Repository(_) | Error::Config(_) | Error::Internal(_) => 500,
        }
    }

    /// Whether the caller sent something this crate refuses to page
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,

    /// Optional error code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// HTTP status code
    pub status: u16,
}

impl ErrorResponse {
    /// Create error response with a code
    pub fn with_code(status: u16, code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
            status,
        }
    }
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        let message = match err {
            // Internal details stay in the logs
            Error::Config(_) | Error::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        ErrorResponse::with_code(err.status(), err.code(), message)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)
    }
}

#[cfg(feature = "http")]
impl axum::response::IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        if self.is_client_error() {
            tracing::debug!(code = self.code(), "rejecting paging request: {}", self);
        } else {
            tracing::error!(code = self.code(), "paging request failed: {}", self);
        }

        let body = ErrorResponse::from(&self);
        let status =
            StatusCode::from_u16(body.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(feature = "graphql")]
impl async_graphql::ErrorExtensions for Error {
    fn extend(&self) -> async_graphql::Error {
        let code = self.code().to_string();
        let mut error = async_graphql::Error::new(ErrorResponse::from(self).error);
        error
            .extensions
            .get_or_insert_with(Default::default)
            .set("code", code);
        error
    }
}

// Manual From implementations for boxed errors
impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
