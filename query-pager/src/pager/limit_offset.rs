//! Offset-based cursor strategy

use crate::cursor::{decode_offset_cursor, encode_offset_cursor, page_size, CursorPaging};
use crate::error::Result;
use crate::repository::{Paging, Query, Record};

use super::{PagerStrategy, PagingOptions};

/// Paging options derived from offset cursors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OffsetPagingOpts {
    /// Absolute offset of the first row of the page
    pub offset: u64,
    /// Rows requested
    pub limit: u64,
    /// Paging forward
    pub is_forward: bool,
    /// Paging backward
    pub is_backward: bool,
    /// A `before` cursor was supplied
    pub has_before: bool,
}

impl PagingOptions for OffsetPagingOpts {
    fn limit(&self) -> u64 {
        self.limit
    }

    fn is_forward(&self) -> bool {
        self.is_forward
    }

    fn is_backward(&self) -> bool {
        self.is_backward
    }

    fn has_before(&self) -> bool {
        self.has_before
    }

    fn is_valid(&self) -> bool {
        self.offset > 0 || self.limit > 0
    }
}

/// Pages with `arrayconnection:<offset>` cursors
///
/// Simple and works for any ordering, but positions drift when rows are
/// inserted or deleted between requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct LimitOffsetPagerStrategy;

impl LimitOffsetPagerStrategy {
    /// Create the strategy
    pub fn new() -> Self {
        Self
    }
}

impl PagerStrategy for LimitOffsetPagerStrategy {
    type Opts = OffsetPagingOpts;

    fn from_cursor_args(&self, paging: &CursorPaging) -> Result<OffsetPagingOpts> {
        let is_backward = paging.is_backward();

        if is_backward {
            let (offset, limit) = match &paging.before {
                Some(cursor) => {
                    let before = decode_offset_cursor(cursor)?;
                    let last = page_size(paging.last);
                    (before.saturating_sub(last), last.min(before))
                }
                None => (0, 0),
            };
            return Ok(OffsetPagingOpts {
                offset,
                limit,
                is_forward: false,
                is_backward: true,
                has_before: paging.before.is_some(),
            });
        }

        let offset = match &paging.after {
            Some(cursor) => decode_offset_cursor(cursor)?.saturating_add(1),
            None => 0,
        };
        Ok(OffsetPagingOpts {
            offset,
            limit: page_size(paging.first),
            is_forward: true,
            is_backward: false,
            has_before: false,
        })
    }

    fn create_query(
        &self,
        query: &Query<CursorPaging>,
        opts: &OffsetPagingOpts,
        include_extra_node: bool,
    ) -> Result<Query<Paging>> {
        let mut paging = Paging::new(opts.limit, opts.offset);
        if include_extra_node {
            paging.limit = Some(opts.limit + 1);
            if opts.is_backward {
                // Look one row further back unless already at the start
                if opts.offset == 0 {
                    paging.limit = Some(opts.limit);
                } else {
                    paging.offset = Some(opts.offset - 1);
                }
            }
        }
        Ok(query.with_window(Some(paging)))
    }

    fn check_for_extra_node<T>(&self, mut nodes: Vec<T>, opts: &OffsetPagingOpts) -> Vec<T> {
        let limit = usize::try_from(opts.limit).unwrap_or(usize::MAX);
        if nodes.len() > limit {
            if opts.is_backward {
                nodes.remove(0);
            } else {
                nodes.pop();
            }
        }
        nodes
    }

    fn to_cursor<T: Record>(
        &self,
        _node: &T,
        index: usize,
        opts: &OffsetPagingOpts,
        _query: &Query<CursorPaging>,
    ) -> Result<String> {
        Ok(encode_offset_cursor(opts.offset + index as u64))
    }

    fn is_empty_cursor(&self, opts: &OffsetPagingOpts) -> bool {
        opts.offset == 0
    }
}
