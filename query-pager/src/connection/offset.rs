//! Flat offset connections

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pager::{OffsetPager, OffsetPagerResult};
use crate::repository::{Filter, Paging, Query, RepositoryResult};

use super::TotalCount;

/// Page boundaries of an offset page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::SimpleObject))]
#[serde(rename_all = "camelCase")]
pub struct OffsetPageInfo {
    /// Another page follows this one
    pub has_next_page: bool,
    /// The page does not start at offset 0
    pub has_previous_page: bool,
}

/// A page of nodes addressed by limit and offset
#[derive(Debug, Clone)]
pub struct OffsetConnection<T> {
    /// Rows of the page
    pub nodes: Vec<T>,
    /// Pagination information
    pub page_info: OffsetPageInfo,
    /// Rows matching the filter
    pub total_count: TotalCount,
}

impl<T> OffsetConnection<T> {
    /// The canonical empty connection
    pub const fn empty() -> Self {
        Self {
            nodes: Vec::new(),
            page_info: OffsetPageInfo {
                has_next_page: false,
                has_previous_page: false,
            },
            total_count: TotalCount::resolved(0),
        }
    }

    /// Run `pager` and wrap its result
    pub async fn create_from_pager<Q, QFut, C, CFut>(
        pager: &OffsetPager,
        query_many: Q,
        query: &Query<Paging>,
        count: C,
    ) -> Result<Self>
    where
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

    /// Resolve the total count
    pub async fn total_count(&self) -> Result<u64> {
        self.total_count.get().await
    }
}

impl<T> Default for OffsetConnection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<OffsetPagerResult<T>> for OffsetConnection<T> {
    fn from(result: OffsetPagerResult<T>) -> Self {
        Self {
            nodes: result.nodes,
            page_info: result.page_info,
            total_count: result.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_from_pager() {
        let rows: Vec<i64> = (0..20).collect();
        let query = Query::new().with_paging(Paging::page(2, 5));

        let connection = OffsetConnection::create_from_pager(
            &OffsetPager::new(),
            |q: Query<Paging>| {
                let Paging { limit, offset } = q.paging.unwrap_or_default();
                let page: Vec<i64> = rows
                    .iter()
                    .copied()
                    .skip(offset.unwrap_or(0) as usize)
                    .take(limit.unwrap_or(0) as usize)
                    .collect();
                async move { Ok(page) }
            },
            &query,
            |_| async { Ok(20) },
        )
        .await
        .unwrap();

        assert_eq!(connection.nodes, vec![5, 6, 7, 8, 9]);
        assert!(connection.page_info.has_next_page);
        assert!(connection.page_info.has_previous_page);
        assert_eq!(connection.total_count().await.unwrap(), 20);
    }

    #[test]
    fn test_empty() {
        let connection: OffsetConnection<()> = OffsetConnection::default();
        assert!(connection.nodes.is_empty());
        assert_eq!(connection.page_info, OffsetPageInfo::default());
        assert_eq!(connection.total_count.peek(), Some(0));
    }
}
