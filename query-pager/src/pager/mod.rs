//! Pagers and paging strategies
//!
//! A [`CursorPager`] runs one page fetch with a [`PagerStrategy`]:
//!
//! - [`KeysetPagerStrategy`] seeks past the sort key of the anchor row
//! - [`LimitOffsetPagerStrategy`] pages by absolute row offset
//!
//! [`Pager::for_entity`] picks between them from an entity's metadata, and
//! [`OffsetPager`] serves flat limit/offset pages without cursors.

mod cursor_pager;
mod keyset;
mod limit_offset;
mod offset_pager;

use std::fmt;
use std::future::Future;

use crate::config::PagerConfig;
use crate::cursor::CursorPaging;
use crate::entity::EntityMeta;
use crate::error::Result;
use crate::repository::{Filter, Paging, Query, Record, RepositoryResult};

pub use cursor_pager::{CursorPager, CursorPagerResult};
pub use keyset::{KeysetPagerStrategy, KeysetPagingOpts};
pub use limit_offset::{LimitOffsetPagerStrategy, OffsetPagingOpts};
pub use offset_pager::{OffsetPager, OffsetPagerResult};

/// Normalized paging options shared by every strategy
pub trait PagingOptions: fmt::Debug + Send + Sync {
    /// Rows requested, without lookahead
    fn limit(&self) -> u64;

    /// Paging forward (`first` / `after`, or nothing)
    fn is_forward(&self) -> bool;

    /// Paging backward (`last` / `before`)
    fn is_backward(&self) -> bool;

    /// A `before` cursor was supplied
    fn has_before(&self) -> bool;

    /// Whether a page was requested at all
    ///
    /// A zero limit without an anchor is "no page requested", answered with
    /// the canonical empty result and no query.
    fn is_valid(&self) -> bool;
}

/// One way of turning cursor arguments into windowed queries and back
pub trait PagerStrategy: Send + Sync {
    /// Options derived from the cursor arguments
    type Opts: PagingOptions;

    /// Classify the request and decode its cursor
    ///
    /// Fails with [`crate::Error::InvalidCursor`] for an undecodable cursor.
    fn from_cursor_args(&self, paging: &CursorPaging) -> Result<Self::Opts>;

    /// Build the backing query for a page
    ///
    /// With `include_extra_node` the window is one row larger so the caller
    /// can tell whether another page exists.
    fn create_query(
        &self,
        query: &Query<CursorPaging>,
        opts: &Self::Opts,
        include_extra_node: bool,
    ) -> Result<Query<Paging>>;

    /// Drop the lookahead row, if fetched, and restore display order
    fn check_for_extra_node<T>(&self, nodes: Vec<T>, opts: &Self::Opts) -> Vec<T>;

    /// Cursor for the row at `index` within the page
    fn to_cursor<T: Record>(
        &self,
        node: &T,
        index: usize,
        opts: &Self::Opts,
        query: &Query<CursorPaging>,
    ) -> Result<String>;

    /// Cursors for every row of a page, in order
    fn to_cursors<T: Record>(
        &self,
        nodes: &[T],
        opts: &Self::Opts,
        query: &Query<CursorPaging>,
    ) -> Result<Vec<String>> {
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| self.to_cursor(node, index, opts, query))
            .collect()
    }

    /// Whether the request carried no anchor
    fn is_empty_cursor(&self, opts: &Self::Opts) -> bool;
}

/// A cursor pager with its strategy chosen at runtime
///
/// # Example
///
/// ```rust
/// use query_pager::config::PagerConfig;
/// use query_pager::entity::EntityMeta;
/// use query_pager::pager::Pager;
///
/// let keyed = EntityMeta::new("Todo").with_keyset(["id"]);
/// assert!(Pager::for_entity(&keyed, &PagerConfig::default()).is_keyset());
///
/// let unkeyed = EntityMeta::new("AuditLine");
/// assert!(!Pager::for_entity(&unkeyed, &PagerConfig::default()).is_keyset());
/// ```
#[derive(Debug, Clone)]
pub enum Pager {
    /// Keyset cursors
    Keyset(CursorPager<KeysetPagerStrategy>),
    /// `arrayconnection:<offset>` cursors
    LimitOffset(CursorPager<LimitOffsetPagerStrategy>),
}

impl Pager {
    /// Keyset pager when the entity declares keyset fields and keyset paging
    /// is enabled, otherwise the limit/offset pager
    pub fn for_entity(entity: &EntityMeta, config: &PagerConfig) -> Self {
        let pager = if config.keyset && entity.has_keyset() {
            let strategy = KeysetPagerStrategy::new(entity.keyset_fields.iter().cloned());
            Self::Keyset(
                CursorPager::new(strategy)
                    .with_config(config.clone())
                    .with_entity(entity.clone()),
            )
        } else {
            Self::LimitOffset(
                CursorPager::new(LimitOffsetPagerStrategy)
                    .with_config(config.clone())
                    .with_entity(entity.clone()),
            )
        };
        tracing::debug!(
            entity = %entity.name,
            strategy = pager.strategy_name(),
            "selected cursor pager"
        );
        pager
    }

    /// Whether this pager uses keyset cursors
    pub fn is_keyset(&self) -> bool {
        matches!(self, Self::Keyset(_))
    }

    /// `"keyset"` or `"limit_offset"`
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Keyset(_) => "keyset",
            Self::LimitOffset(_) => "limit_offset",
        }
    }

    /// Fetch one page; see [`CursorPager::page`]
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
        match self {
            Self::Keyset(pager) => pager.page(query_many, query, count).await,
            Self::LimitOffset(pager) => pager.page(query_many, query, count).await,
        }
    }
}

impl From<CursorPager<KeysetPagerStrategy>> for Pager {
    fn from(pager: CursorPager<KeysetPagerStrategy>) -> Self {
        Self::Keyset(pager)
    }
}

impl From<CursorPager<LimitOffsetPagerStrategy>> for Pager {
    fn from(pager: CursorPager<LimitOffsetPagerStrategy>) -> Self {
        Self::LimitOffset(pager)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_entity_prefers_keyset() {
        let entity = EntityMeta::new("Todo").with_keyset(["id"]);
        let pager = Pager::for_entity(&entity, &PagerConfig::default());
        match pager {
            Pager::Keyset(inner) => assert_eq!(inner.strategy().keyset_fields(), ["id"]),
            Pager::LimitOffset(_) => panic!("expected keyset pager"),
        }
    }

    #[test]
    fn test_for_entity_falls_back_without_keyset() {
        let entity = EntityMeta::new("Todo");
        let pager = Pager::for_entity(&entity, &PagerConfig::default());
        assert_eq!(pager.strategy_name(), "limit_offset");
    }

    #[test]
    fn test_for_entity_respects_disabled_keyset() {
        let entity = EntityMeta::new("Todo").with_keyset(["id"]);
        let pager = Pager::for_entity(&entity, &PagerConfig::default().without_keyset());
        assert!(!pager.is_keyset());
    }

    #[test]
    fn test_from_cursor_pager() {
        let pager: Pager = CursorPager::new(LimitOffsetPagerStrategy).into();
        assert!(!pager.is_keyset());
    }
}
