//! Contracts between pagers and backing stores
//!
//! Pagers only ever need two calls from a store: fetch the rows of a windowed
//! [`Query`] and count the rows matching a [`Filter`]. Stores can hand those in
//! as closures, or implement [`QueryService`] and let
//! [`CursorConnection::create_from_service`](crate::connection::CursorConnection::create_from_service)
//! build the closures.
//!
//! # Example
//!
//! ```rust,ignore
//! use query_pager::repository::{Filter, Query, QueryService, RepositoryResult};
//!
//! struct TodoStore {
//!     pool: PgPool,
//! }
//!
//! impl QueryService<Todo> for TodoStore {
//!     async fn query(&self, query: Query) -> RepositoryResult<Vec<Todo>> {
//!         // Translate filter, sorting and paging into SQL
//!         todo!()
//!     }
//!
//!     async fn count(&self, filter: Filter) -> RepositoryResult<u64> {
//!         todo!()
//!     }
//! }
//! ```

use std::future::Future;

use super::error::RepositoryError;
use super::query::{Filter, FilterValue, Query};

/// Result type for repository operations
pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;

/// Read access to a row's fields by name
///
/// The keyset pager reads sort field values through this trait to build
/// cursors; the in-memory store uses it to evaluate filters and ordering.
///
/// Return `None` for a field the row does not have and
/// `Some(FilterValue::Null)` for a field that is present but null.
///
/// # Example
///
/// ```rust
/// use query_pager::repository::{FilterValue, Record};
///
/// struct Todo {
///     id: i64,
///     title: String,
/// }
///
/// impl Record for Todo {
///     fn field(&self, name: &str) -> Option<FilterValue> {
///         match name {
///             "id" => Some(self.id.into()),
///             "title" => Some(self.title.as_str().into()),
///             _ => None,
///         }
///     }
/// }
///
/// let todo = Todo { id: 1, title: "write docs".to_string() };
/// assert_eq!(todo.field("id"), Some(FilterValue::Integer(1)));
/// assert_eq!(todo.field("missing"), None);
/// ```
pub trait Record {
    /// Value of the named field
    fn field(&self, name: &str) -> Option<FilterValue>;
}

impl<T: Record + ?Sized> Record for &T {
    fn field(&self, name: &str) -> Option<FilterValue> {
        (**self).field(name)
    }
}

/// A store that can run windowed queries and counts for one entity type
///
/// Implementations must honour `query.paging` (limit and offset), the filter
/// (including synthesized keyset predicates) and the ordering exactly.
pub trait QueryService<T>: Send + Sync {
    /// Fetch the rows selected by `query`
    ///
    /// Returns at most `query.paging.limit` rows, fewer at the end of the
    /// result set.
    fn query(&self, query: Query) -> impl Future<Output = RepositoryResult<Vec<T>>> + Send;

    /// Count the rows matching `filter`, ignoring paging
    fn count(&self, filter: Filter) -> impl Future<Output = RepositoryResult<u64>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryOperation;

    struct Row {
        id: i64,
    }

    impl Record for Row {
        fn field(&self, name: &str) -> Option<FilterValue> {
            (name == "id").then(|| self.id.into())
        }
    }

    struct MockService;

    impl QueryService<Row> for MockService {
        async fn query(&self, _query: Query) -> RepositoryResult<Vec<Row>> {
            Ok(vec![Row { id: 1 }])
        }

        async fn count(&self, _filter: Filter) -> RepositoryResult<u64> {
            Err(RepositoryError::timeout(RepositoryOperation::Count, "slow"))
        }
    }

    #[test]
    fn test_record_through_reference() {
        let row = Row { id: 5 };
        let by_ref = &row;
        assert_eq!(by_ref.field("id"), Some(FilterValue::Integer(5)));
    }

    #[tokio::test]
    async fn test_mock_service_query() {
        let rows = MockService.query(Query::new()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 1);
    }

    #[tokio::test]
    async fn test_mock_service_count_error() {
        let err = MockService.count(Filter::all()).await.unwrap_err();
        assert!(err.is_retriable());
    }
}
