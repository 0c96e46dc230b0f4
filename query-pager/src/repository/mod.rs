//! Query model and backing-store contracts
//!
//! This module holds everything a pager shares with the store it pages over:
//!
//! - **Query model**: [`Query`], [`Filter`], [`FilterCondition`], [`SortField`], [`Paging`]
//! - **Store contract**: [`QueryService`] and the [`Record`] field accessor
//! - **Store errors**: [`RepositoryError`], passed through pagers unchanged
//! - **Reference store**: [`MemoryQueryService`], an in-memory implementation
//!
//! # Example
//!
//! ```rust
//! use query_pager::repository::{FilterCondition, OrderDirection, Paging, Query, SortField};
//!
//! let query: Query = Query::new()
//!     .with_filter(FilterCondition::eq("completed", false))
//!     .with_sorting(vec![SortField::new("priority", OrderDirection::Descending)])
//!     .with_paging(Paging::limit(10));
//!
//! assert!(!query.filter_or_all().is_empty());
//! ```

mod error;
mod memory;
mod query;
mod traits;

// Re-export all public types
pub use error::{RepositoryError, RepositoryErrorKind, RepositoryOperation};
pub use memory::MemoryQueryService;
pub use query::{
    invert_sort, Filter, FilterCondition, FilterOperator, FilterValue, NullsOrder,
    OrderDirection, Paging, Query, SortField,
};
pub use traits::{QueryService, Record, RepositoryResult};
