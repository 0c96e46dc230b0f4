//! One page fetch over a cursor strategy

use std::future::Future;

use crate::config::PagerConfig;
use crate::connection::{Edge, PageInfo, TotalCount};
use crate::cursor::CursorPaging;
use crate::entity::EntityMeta;
use crate::error::Result;
use crate::repository::{Filter, Paging, Query, Record, RepositoryResult};

use super::{PagerStrategy, PagingOptions};

/// Edges, page info and lazy total count for one page
#[derive(Debug, Clone)]
pub struct CursorPagerResult<T> {
    /// Rows of the page with their cursors, in display order
    pub edges: Vec<Edge<T>>,
    /// Boundary information
    pub page_info: PageInfo,
    /// Rows matching the filter, counted on first access
    pub total_count: TotalCount,
}

impl<T> CursorPagerResult<T> {
    /// No edges, no neighbouring pages, total count 0
    pub fn empty() -> Self {
        Self {
            edges: Vec::new(),
            page_info: PageInfo::empty(),
            total_count: TotalCount::resolved(0),
        }
    }
}

/// Runs paged queries with a [`PagerStrategy`]
///
/// # Example
///
/// ```rust
/// use query_pager::cursor::CursorPaging;
/// use query_pager::pager::{CursorPager, LimitOffsetPagerStrategy};
/// use query_pager::repository::{MemoryQueryService, Query, SortField};
/// # use query_pager::repository::{FilterValue, Record};
/// # #[derive(Clone)]
/// # struct Row(i64);
/// # impl Record for Row {
/// #     fn field(&self, name: &str) -> Option<FilterValue> {
/// #         (name == "id").then(|| self.0.into())
/// #     }
/// # }
///
/// # tokio_test_block(async {
/// let store = MemoryQueryService::new((1..=5).map(Row).collect());
/// let pager = CursorPager::new(LimitOffsetPagerStrategy);
/// let query = Query::new()
///     .with_sorting(vec![SortField::asc("id")])
///     .with_paging(CursorPaging::first(2));
///
/// let page = pager
///     .page(
///         |q| async move { store.run(&q) },
///         &query,
///         |_| async { Ok(5) },
///     )
///     .await
///     .unwrap();
///
/// assert_eq!(page.edges.len(), 2);
/// assert!(page.page_info.has_next_page);
/// assert_eq!(page.total_count.get().await.unwrap(), 5);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CursorPager<S> {
    strategy: S,
    config: PagerConfig,
    entity: Option<EntityMeta>,
}

impl<S: PagerStrategy> CursorPager<S> {
    /// Create a pager with default configuration
    pub fn new(strategy: S) -> Self {
        Self {
            strategy,
            config: PagerConfig::default(),
            entity: None,
        }
    }

    /// Replace the pager configuration
    #[must_use]
    pub fn with_config(mut self, config: PagerConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate orderings against `entity`
    #[must_use]
    pub fn with_entity(mut self, entity: EntityMeta) -> Self {
        self.entity = Some(entity);
        self
    }

    /// The paging strategy
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The pager configuration
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// Fetch one page
    ///
    /// `query_many` receives the windowed query (filter with any cursor
    /// predicate, effective ordering, `limit + 1` window) and is called at most
    /// once. `count` is only called if the returned total count is awaited.
    ///
    /// Paging and cursor errors are returned before `query_many` runs. Store
    /// errors are returned unchanged.
    pub async fn page<T, Q, QFut, C, CFut>(
        &self,
        query_many: Q,
        query: &Query<CursorPaging>,
        count: C,
    ) -> Result<CursorPagerResult<T>>
    where
        T: Record,
        Q: FnOnce(Query<Paging>) -> QFut,
        QFut: Future<Output = RepositoryResult<Vec<T>>>,
        C: Fn(Filter) -> CFut + Send + Sync + 'static,
        CFut: Future<Output = RepositoryResult<u64>> + Send + 'static,
    {
        let paging = query.paging.clone().unwrap_or_default();
        paging.validate(self.config.max_results_size)?;
        if let Some(entity) = &self.entity {
            entity.validate_sorting(&query.sorting)?;
        }

        let opts = self.strategy.from_cursor_args(&paging)?;
        if !opts.is_valid() {
            tracing::debug!(?opts, "no page requested, returning empty result");
            return Ok(CursorPagerResult::empty());
        }

        let windowed = self.strategy.create_query(query, &opts, true)?;
        tracing::debug!(
            entity = self.entity_name(),
            filter = %windowed.filter_or_all(),
            paging = ?windowed.paging,
            "running windowed query"
        );

        let nodes = query_many(windowed).await?;
        let limit = usize::try_from(opts.limit()).unwrap_or(usize::MAX);
        let has_extra_node = nodes.len() > limit;
        let nodes = self.strategy.check_for_extra_node(nodes, &opts);
        let is_empty_cursor = self.strategy.is_empty_cursor(&opts);

        if !has_extra_node && nodes.is_empty() && opts.is_forward() && is_empty_cursor {
            tracing::debug!(entity = self.entity_name(), "empty first page");
            return Ok(CursorPagerResult::empty());
        }

        let cursors = self.strategy.to_cursors(&nodes, &opts, query)?;
        let edges: Vec<Edge<T>> = nodes
            .into_iter()
            .zip(cursors)
            .map(|(node, cursor)| Edge::new(node, cursor))
            .collect();

        let page_info = PageInfo {
            has_next_page: if opts.is_forward() {
                has_extra_node
            } else {
                opts.has_before()
            },
            has_previous_page: if opts.is_backward() {
                has_extra_node
            } else {
                !is_empty_cursor
            },
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };

        tracing::debug!(
            entity = self.entity_name(),
            edges = edges.len(),
            has_next_page = page_info.has_next_page,
            has_previous_page = page_info.has_previous_page,
            "assembled page"
        );

        Ok(CursorPagerResult {
            edges,
            page_info,
            total_count: self.total_count(query.filter_or_all(), count),
        })
    }

    fn total_count<C, CFut>(&self, filter: Filter, count: C) -> TotalCount
    where
        C: Fn(Filter) -> CFut + Send + Sync + 'static,
        CFut: Future<Output = RepositoryResult<u64>> + Send + 'static,
    {
        if !self.config.enable_total_count {
            return TotalCount::disabled();
        }
        TotalCount::lazy(move || count(filter.clone()))
    }

    fn entity_name(&self) -> &str {
        self.entity.as_ref().map_or("", |entity| entity.name.as_str())
    }
}
