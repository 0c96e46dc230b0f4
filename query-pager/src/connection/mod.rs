//! Connection types returned to callers
//!
//! - [`CursorConnection`]: Relay-style edges with [`PageInfo`] cursors
//! - [`OffsetConnection`]: flat nodes with [`OffsetPageInfo`]
//! - [`TotalCount`]: the matching row count, computed on first access
//!
//! With the `graphql` feature, `define_connection!` generates
//! `async-graphql` objects for a concrete node type.

mod array;
mod cursor;
#[cfg(feature = "graphql")]
mod graphql;
mod offset;
mod total_count;

pub use cursor::{CursorConnection, Edge, PageInfo};
pub use offset::{OffsetConnection, OffsetPageInfo};
pub use total_count::TotalCount;
