//! Errors raised by backing stores
//!
//! Adapters report failures of the two calls a pager makes, the windowed
//! query and the count, as a [`RepositoryError`]. Pagers never retry them; the
//! error reaches the caller unchanged inside [`crate::Error::Repository`].
//!
//! # Example
//!
//! ```rust
//! use query_pager::repository::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
//!
//! let error = RepositoryError::timeout(RepositoryOperation::Query, "statement timeout")
//!     .with_entity("Todo");
//! assert!(error.is_retriable());
//! assert_eq!(error.kind, RepositoryErrorKind::Timeout);
//! ```

use std::fmt;

/// Operation being performed when the repository error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryOperation {
    /// Fetching a window of rows
    Query,
    /// Counting rows matching a filter
    Count,
}

impl fmt::Display for RepositoryOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query"),
            Self::Count => write!(f, "count"),
        }
    }
}

/// Category of repository error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepositoryErrorKind {
    /// The store could not evaluate the filter or ordering it was given
    UnsupportedQuery,
    /// Failed to connect to the store
    ConnectionFailed,
    /// Operation timed out
    Timeout,
    /// Underlying database error
    DatabaseError,
    /// Serialization or deserialization error
    SerializationError,
    /// Other unclassified error
    Other,
}

impl fmt::Display for RepositoryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedQuery => write!(f, "unsupported_query"),
            Self::ConnectionFailed => write!(f, "connection_failed"),
            Self::Timeout => write!(f, "timeout"),
            Self::DatabaseError => write!(f, "database_error"),
            Self::SerializationError => write!(f, "serialization_error"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Structured repository error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryError {
    /// The operation being performed when the error occurred
    pub operation: RepositoryOperation,
    /// The category of error
    pub kind: RepositoryErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity being paged (e.g., "Todo")
    pub entity_type: Option<String>,
}

impl RepositoryError {
    /// Create a new repository error
    pub fn new(
        operation: RepositoryOperation,
        kind: RepositoryErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
        }
    }

    /// The store cannot evaluate part of the query
    pub fn unsupported_query(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::UnsupportedQuery, message)
    }

    /// Create a connection failed error
    pub fn connection_failed(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::ConnectionFailed, message)
    }

    /// Create a timeout error
    pub fn timeout(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::Timeout, message)
    }

    /// Create a database error
    pub fn database_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::DatabaseError, message)
    }

    /// Create a serialization error
    pub fn serialization_error(operation: RepositoryOperation, message: impl Into<String>) -> Self {
        Self::new(operation, RepositoryErrorKind::SerializationError, message)
    }

    /// Add entity context to an existing error
    #[must_use]
    pub fn with_entity(mut self, entity_type: impl Into<String>) -> Self {
        self.entity_type = Some(entity_type.into());
        self
    }

    /// Check if this error is retriable (transient errors that may succeed on retry)
    ///
    /// Pagers do not retry; this is a hint for the caller.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self.kind,
            RepositoryErrorKind::ConnectionFailed | RepositoryErrorKind::Timeout
        )
    }
}

impl fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Repository {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let Some(entity_type) = &self.entity_type {
            write!(f, " [{entity_type}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for RepositoryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_operation_display() {
        assert_eq!(format!("{}", RepositoryOperation::Query), "query");
        assert_eq!(format!("{}", RepositoryOperation::Count), "count");
    }

    #[test]
    fn test_repository_error_kind_display() {
        assert_eq!(
            format!("{}", RepositoryErrorKind::UnsupportedQuery),
            "unsupported_query"
        );
        assert_eq!(
            format!("{}", RepositoryErrorKind::ConnectionFailed),
            "connection_failed"
        );
        assert_eq!(format!("{}", RepositoryErrorKind::Timeout), "timeout");
        assert_eq!(
            format!("{}", RepositoryErrorKind::DatabaseError),
            "database_error"
        );
        assert_eq!(
            format!("{}", RepositoryErrorKind::SerializationError),
            "serialization_error"
        );
        assert_eq!(format!("{}", RepositoryErrorKind::Other), "other");
    }

    #[test]
    fn test_is_retriable_transient_errors() {
        assert!(RepositoryError::connection_failed(RepositoryOperation::Query, "refused")
            .is_retriable());
        assert!(RepositoryError::timeout(RepositoryOperation::Count, "timeout").is_retriable());
    }

    #[test]
    fn test_is_retriable_permanent_errors() {
        assert!(
            !RepositoryError::database_error(RepositoryOperation::Query, "syntax").is_retriable()
        );
        assert!(
            !RepositoryError::unsupported_query(RepositoryOperation::Query, "LIKE on int")
                .is_retriable()
        );
        assert!(
            !RepositoryError::serialization_error(RepositoryOperation::Query, "json")
                .is_retriable()
        );
    }

    #[test]
    fn test_display_without_entity() {
        let error = RepositoryError::database_error(RepositoryOperation::Count, "Query failed");
        let display = format!("{}", error);
        assert_eq!(
            display,
            "Repository database_error error during count: Query failed"
        );
    }

    #[test]
    fn test_display_with_entity() {
        let error =
            RepositoryError::timeout(RepositoryOperation::Query, "slow").with_entity("Todo");
        assert!(format!("{}", error).ends_with("[Todo]"));
    }

    #[test]
    fn test_error_is_error_trait() {
        let error: Box<dyn std::error::Error> = Box::new(RepositoryError::new(
            RepositoryOperation::Query,
            RepositoryErrorKind::Other,
            "boom",
        ));
        assert!(error.to_string().contains("other"));
    }
}
