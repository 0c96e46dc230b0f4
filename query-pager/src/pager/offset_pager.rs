//! Flat limit/offset pages without cursors

use std::future::Future;

use crate::config::PagerConfig;
use crate::connection::{OffsetPageInfo, TotalCount};
use crate::entity::EntityMeta;
use crate::error::{Error, Result};
use crate::repository::{Filter, Paging, Query, RepositoryResult};

/// Nodes, page info and lazy total count for one offset page
#[derive(Debug, Clone)]
pub struct OffsetPagerResult<T> {
    /// Rows of the page
    pub nodes: Vec<T>,
    /// Boundary information
    pub page_info: OffsetPageInfo,
    /// Rows matching the filter, counted on first access
    pub total_count: TotalCount,
}

impl<T> OffsetPagerResult<T> {
    /// No nodes, no neighbouring pages, total count 0
    pub fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            page_info: OffsetPageInfo::default(),
            total_count: TotalCount::resolved(0),
        }
    }
}

/// Pages with a plain `limit` / `offset` window
///
/// Fetches one row past the window to learn whether another page exists.
/// Always pages forward.
#[derive(Debug, Clone, Default)]
pub struct OffsetPager {
    config: PagerConfig,
    entity: Option<EntityMeta>,
}

impl OffsetPager {
    /// Create a pager with default configuration
    pub fn new() -> Self {
        Self::default()
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

    /// Fetch one page
    pub async fn page<T, Q, QFut, C, CFut>(
        &self,
        query_many: Q,
        query: &Query<Paging>,
        count: C,
    ) -> Result<OffsetPagerResult<T>>
    where
        Q: FnOnce(Query<Paging>) -> QFut,
        QFut: Future<Output = RepositoryResult<Vec<T>>>,
        C: Fn(Filter) -> CFut + Send + Sync + 'static,
        CFut: Future<Output = RepositoryResult<u64>> + Send + 'static,
    {
        let Paging { limit, offset } = query.paging.unwrap_or_default();
        let limit = limit.unwrap_or(0);
        let offset = offset.unwrap_or(0);

        if let Some(max) = self.config.max_results_size {
            if limit > max {
                return Err(Error::InvalidPaging(format!(
                    "limit must be at most {max}, got {limit}"
                )));
            }
        }
        if let Some(entity) = &self.entity {
            entity.validate_sorting(&query.sorting)?;
        }

        if limit == 0 && offset == 0 {
            tracing::debug!("no page requested, returning empty result");
            return Ok(OffsetPagerResult::empty());
        }

        let window = limit.checked_add(1).ok_or_else(|| {
            Error::InvalidPaging(format!("limit {limit} leaves no room for a lookahead row"))
        })?;
        let windowed = query.with_window(Some(Paging::new(window, offset)));
        tracing::debug!(
            filter = %windowed.filter_or_all(),
            paging = ?windowed.paging,
            "running offset query"
        );

        let mut nodes = query_many(windowed).await?;
        let has_extra_node = nodes.len() > usize::try_from(limit).unwrap_or(usize::MAX);
        if has_extra_node {
            nodes.pop();
        }

        if !has_extra_node && nodes.is_empty() && offset == 0 {
            return Ok(OffsetPagerResult::empty());
        }

        let total_count = if self.config.enable_total_count {
            let filter = query.filter_or_all();
            TotalCount::lazy(move || count(filter.clone()))
        } else {
            TotalCount::disabled()
        };

        Ok(OffsetPagerResult {
            nodes,
            page_info: OffsetPageInfo {
                has_next_page: has_extra_node,
                has_previous_page: offset > 0,
            },
            total_count,
        })
    }
}
