//! # query-pager
//!
//! Pagination engine for query-derived connections. Turns Relay cursor
//! arguments (`first`/`after`, `last`/`before`) or plain limit/offset paging
//! into windowed queries against a backing store and assembles the page.
//!
//! ## Features
//!
//! - **Keyset paging**: seeks past the sort key of the last row, stable under inserts
//! - **Limit/offset paging**: absolute row offsets for entities without a keyset
//! - **Lookahead**: one extra row decides `hasNextPage`/`hasPreviousPage`
//! - **Lazy total count**: the count query runs only when `totalCount` is read
//! - **Array connections**: cursor pages over rows already in memory
//! - **GraphQL objects**: `define_connection!` with the `graphql` feature
//!
//! ## Example
//!
//! ```rust,no_run
//! use query_pager::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct Todo {
//!     id: i64,
//!     title: String,
//! }
//!
//! impl Record for Todo {
//!     fn field(&self, name: &str) -> Option<FilterValue> {
//!         match name {
//!             "id" => Some(self.id.into()),
//!             "title" => Some(self.title.as_str().into()),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<()> {
//!     // Load configuration
//!     let config = Config::load()?;
//!
//!     // Initialize tracing
//!     init_tracing(&config)?;
//!
//!     let entity = EntityMeta::new("Todo")
//!         .with_fields(["id", "title"])
//!         .with_keyset(["id"]);
//!     let pager = Pager::for_entity(&entity, &config.pager);
//!     let store = Arc::new(MemoryQueryService::new(Vec::<Todo>::new()));
//!
//!     let query = Query::new()
//!         .with_sorting(vec![SortField::asc("title")])
//!         .with_paging(CursorPaging::first(10));
//!     let page: CursorConnection<Todo> =
//!         CursorConnection::create_from_service(&pager, store, &query).await?;
//!
//!     println!("{} of {}", page.edges.len(), page.total_count().await?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod connection;
pub mod cursor;
pub mod entity;
pub mod error;
pub mod observability;
pub mod pager;
pub mod repository;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, LoggingConfig, PagerConfig};
    pub use crate::connection::{
        CursorConnection, Edge, OffsetConnection, OffsetPageInfo, PageInfo, TotalCount,
    };
    pub use crate::cursor::{CursorPaging, KeysetCursorPayload};
    pub use crate::entity::EntityMeta;
    pub use crate::error::{Error, ErrorResponse, Result};
    pub use crate::observability::init_tracing;
    pub use crate::pager::{
        CursorPager, KeysetPagerStrategy, LimitOffsetPagerStrategy, OffsetPager, Pager,
        PagerStrategy,
    };
    pub use crate::repository::{
        Filter, FilterCondition, FilterValue, MemoryQueryService, OrderDirection, Paging, Query,
        QueryService, Record, RepositoryError, SortField,
    };

    #[cfg(feature = "graphql")]
    pub use crate::define_connection;
}
