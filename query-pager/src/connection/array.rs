//! Connections over already materialized rows

use crate::cursor::{encode_offset_cursor, CursorPaging};
use crate::error::Result;
use crate::pager::{LimitOffsetPagerStrategy, PagerStrategy, PagingOptions};

use super::{CursorConnection, Edge, PageInfo, TotalCount};

impl<T> CursorConnection<T> {
    /// Slice a fully fetched list with offset cursors
    ///
    /// Page info follows the cursor pager's rules, computed from the slice
    /// bounds instead of a lookahead row. `last` without `before` counts from
    /// the end of `items`. The total count is `items.len()`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_pager::connection::CursorConnection;
    /// use query_pager::cursor::CursorPaging;
    ///
    /// let letters = vec!["a", "b", "c", "d", "e"];
    /// let page = CursorConnection::create_from_array(letters, &CursorPaging::last(2)).unwrap();
    ///
    /// assert_eq!(page.nodes().copied().collect::<Vec<_>>(), vec!["d", "e"]);
    /// assert!(page.page_info.has_previous_page);
    /// assert!(!page.page_info.has_next_page);
    /// ```
    pub fn create_from_array(items: Vec<T>, paging: &CursorPaging) -> Result<Self> {
        paging.validate(None)?;

        let len = items.len() as u64;
        let total_count = TotalCount::resolved(len);

        let mut anchored = paging.clone();
        if anchored.is_backward() && anchored.before.is_none() {
            anchored.before = Some(encode_offset_cursor(len));
        }

        let strategy = LimitOffsetPagerStrategy;
        let opts = strategy.from_cursor_args(&anchored)?;
        if !opts.is_valid() {
            return Ok(Self {
                total_count,
                ..Self::empty()
            });
        }

        let start = opts.offset.min(len);
        let end = opts.offset.saturating_add(opts.limit).min(len);

        let edges: Vec<Edge<T>> = items
            .into_iter()
            .skip(start as usize)
            .take((end - start) as usize)
            .enumerate()
            .map(|(index, node)| Edge::new(node, encode_offset_cursor(start + index as u64)))
            .collect();

        let page_info = PageInfo {
            has_next_page: if opts.is_forward() {
                end < len
            } else {
                paging.before.is_some()
            },
            has_previous_page: start > 0,
            start_cursor: edges.first().map(|edge| edge.cursor.clone()),
            end_cursor: edges.last().map(|edge| edge.cursor.clone()),
        };

        Ok(Self {
            page_info,
            edges,
            total_count,
        })
    }
}
