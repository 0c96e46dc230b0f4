//! Relay-style cursor connections

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::cursor::CursorPaging;
use crate::error::Result;
use crate::pager::{CursorPagerResult, Pager};
use crate::repository::{Filter, Paging, Query, QueryService, Record, RepositoryResult};

use super::TotalCount;

/// Information about pagination in a connection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// When paginating forwards, are there more items?
    pub has_next_page: bool,
    /// When paginating backwards, are there more items?
    pub has_previous_page: bool,
    /// Cursor of the first item in this page
    pub start_cursor: Option<String>,
    /// Cursor of the last item in this page
    pub end_cursor: Option<String>,
}

impl PageInfo {
    /// No neighbouring pages and no cursors
    pub const fn empty() -> Self {
        Self {
            has_next_page: false,
            has_previous_page: false,
            start_cursor: None,
            end_cursor: None,
        }
    }
}

/// An edge in a connection, containing a node and cursor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge<T> {
    /// The item at the end of the edge
    pub node: T,
    /// A cursor for pagination
    pub cursor: String,
}

impl<T> Edge<T> {
    /// Pair a node with its cursor
    pub fn new(node: T, cursor: impl Into<String>) -> Self {
        Self {
            node,
            cursor: cursor.into(),
        }
    }
}

/// A page of edges with page info and a lazy total count
///
/// # Example
///
/// ```rust
/// use query_pager::config::PagerConfig;
/// use query_pager::connection::CursorConnection;
/// use query_pager::cursor::CursorPaging;
/// use query_pager::entity::EntityMeta;
/// use query_pager::pager::Pager;
/// use query_pager::repository::{FilterValue, MemoryQueryService, Query, Record, SortField};
/// use std::sync::Arc;
///
/// #[derive(Clone)]
/// struct Todo {
///     id: i64,
/// }
///
/// impl Record for Todo {
///     fn field(&self, name: &str) -> Option<FilterValue> {
///         (name == "id").then(|| self.id.into())
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let store = Arc::new(MemoryQueryService::new((1..=3).map(|id| Todo { id }).collect()));
/// let entity = EntityMeta::new("Todo").with_keyset(["id"]);
/// let pager = Pager::for_entity(&entity, &PagerConfig::default());
///
/// let query = Query::new()
///     .with_sorting(vec![SortField::asc("id")])
///     .with_paging(CursorPaging::first(2));
/// let connection: CursorConnection<Todo> =
///     CursorConnection::create_from_service(&pager, store, &query)
///         .await
///         .unwrap();
///
/// assert_eq!(connection.edges.len(), 2);
/// assert!(connection.page_info.has_next_page);
/// assert_eq!(connection.total_count().await.unwrap(), 3);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct CursorConnection<T> {
    /// Pagination information
    pub page_info: PageInfo,
    /// The edges in this connection
    pub edges: Vec<Edge<T>>,
    /// Rows matching the filter
    pub total_count: TotalCount,
}

impl<T> CursorConnection<T> {
    /// The canonical empty connection
    ///
    /// Allocates nothing; the total count is 0.
    pub const fn empty() -> Self {
        Self {
            page_info: PageInfo::empty(),
            edges: Vec::new(),
            total_count: TotalCount::resolved(0),
        }
    }

    /// Run `pager` and wrap its result
    pub async fn create_from_pager<Q, QFut, C, CFut>(
        pager: &Pager,
        query_many: Q,
        query: &Query<CursorPaging>,
        count: C,
    ) -> Result<Self>
    where
        T: Record,
        Q: FnOnce(Query<Paging>) -> QFut,
        QFut: Future<Output = RepositoryResult<Vec<T>>>,
        C: Fn(Filter) -> CFut + Send + Sync + 'static,
        CFut: Future<Output = RepositoryResult<u64>> + Send + 'static,
    {
        pager
            .page(query_many, query, count)
            .await
            .map(Self::from)
    }

    /// Run `pager` against a [`QueryService`]
    pub async fn create_from_service<S>(
        pager: &Pager,
        service: Arc<S>,
        query: &Query<CursorPaging>,
    ) -> Result<Self>
    where
        T: Record + Send + 'static,
        S: QueryService<T> + 'static,
    {
        let counter = Arc::clone(&service);
        Self::create_from_pager(
            pager,
            |windowed| async move { service.query(windowed).await },
            query,
            move |filter| {
                let counter = Arc::clone(&counter);
                async move { counter.count(filter).await }
            },
        )
        .await
    }

    /// Resolve the total count
    pub async fn total_count(&self) -> Result<u64> {
        self.total_count.get().await
    }

    /// Nodes in display order
    pub fn nodes(&self) -> impl Iterator<Item = &T> {
        self.edges.iter().map(|edge| &edge.node)
    }

    /// Whether the page has no edges
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Transform every node, keeping cursors and page info
    pub fn map<U, F>(self, mut f: F) -> CursorConnection<U>
    where
        F: FnMut(T) -> U,
    {
        CursorConnection {
            page_info: self.page_info,
            edges: self
                .edges
                .into_iter()
                .map(|edge| Edge::new(f(edge.node), edge.cursor))
                .collect(),
            total_count: self.total_count,
        }
    }
}

impl<T> Default for CursorConnection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<CursorPagerResult<T>> for CursorConnection<T> {
    fn from(result: CursorPagerResult<T>) -> Self {
        Self {
            page_info: result.page_info,
            edges: result.edges,
            total_count: result.total_count,
        }
    }
}
