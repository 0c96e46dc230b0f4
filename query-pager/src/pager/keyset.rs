//! Keyset (seek) cursor strategy
//!
//! A keyset cursor stores the sort key of its anchor row. The next page is
//! selected with a lexicographic "strictly after the anchor" predicate rather
//! than an offset, so pages stay stable while rows are inserted or deleted.
//!
//! For an effective ordering `[s1, s2, s3]` and anchor values `[v1, v2, v3]`
//! the predicate is
//!
//! ```text
//! (s1 > v1) OR (s1 = v1 AND s2 > v2) OR (s1 = v1 AND s2 = v2 AND s3 > v3)
//! ```
//!
//! where each `>` becomes `<` for a descending field. Backward pages flip every
//! direction, fetch in reverse, and reverse the rows back into display order.
//!
//! Nulls follow the field's effective placement (see
//! [`SortField::effective_nulls`]). Where nulls sort after the anchor the seek
//! becomes `s > v OR s IS NULL`; a null anchor compares with `IS NULL` and
//! seeks with `IS NOT NULL`, or matches nothing past it when nulls sort last.
//! Keyset fields identify a row and are taken to be non-null.

use crate::cursor::{
    decode_cursor, encode_cursor, page_size, CursorPaging, KeysetCursorPayload, KeysetField,
};
use crate::error::{Error, Result};
use crate::repository::{
    invert_sort, Filter, FilterCondition, FilterValue, NullsOrder, OrderDirection, Paging,
    Query, Record, SortField,
};

use super::{PagerStrategy, PagingOptions};

/// Paging options derived from keyset cursors
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeysetPagingOpts {
    /// Decoded anchor, if a cursor was supplied
    pub payload: Option<KeysetCursorPayload>,
    /// Rows requested
    pub limit: u64,
    /// The entity's keyset as ascending sort fields
    pub default_sort: Vec<SortField>,
    /// Paging forward
    pub is_forward: bool,
    /// Paging backward
    pub is_backward: bool,
    /// A `before` cursor was supplied
    pub has_before: bool,
}

impl PagingOptions for KeysetPagingOpts {
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
        self.limit > 0 || self.payload.is_some()
    }
}

/// Pages by seeking past the sort key of the anchor row
///
/// # Example
///
/// ```rust
/// use query_pager::cursor::CursorPaging;
/// use query_pager::pager::{KeysetPagerStrategy, PagerStrategy};
/// use query_pager::repository::{Paging, Query, SortField};
///
/// let strategy = KeysetPagerStrategy::new(["id"]);
/// let query = Query::new()
///     .with_sorting(vec![SortField::desc("created")])
///     .with_paging(CursorPaging::first(10));
///
/// let opts = strategy.from_cursor_args(&CursorPaging::first(10)).unwrap();
/// let windowed = strategy.create_query(&query, &opts, true).unwrap();
///
/// assert_eq!(windowed.paging, Some(Paging::limit(11)));
/// assert_eq!(windowed.sorting, vec![SortField::desc("created"), SortField::asc("id")]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetPagerStrategy {
    keyset_fields: Vec<String>,
}

impl KeysetPagerStrategy {
    /// Create a strategy over the given unique keyset
    pub fn new<I, S>(keyset_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keyset_fields: keyset_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The keyset fields, most significant first
    pub fn keyset_fields(&self) -> &[String] {
        &self.keyset_fields
    }

    fn default_sort(&self) -> Vec<SortField> {
        self.keyset_fields.iter().map(SortField::asc).collect()
    }

    fn decode_payload(cursor: &str) -> Result<KeysetCursorPayload> {
        decode_cursor(cursor)
    }
}

/// Caller ordering followed by keyset tiebreakers, each field once
pub(crate) fn effective_sort(
    sorting: &[SortField],
    default_sort: &[SortField],
) -> Vec<SortField> {
    let mut sort: Vec<SortField> = Vec::with_capacity(sorting.len() + default_sort.len());
    for field in sorting.iter().chain(default_sort) {
        if !sort.iter().any(|s| s.field == field.field) {
            sort.push(field.clone());
        }
    }
    sort
}

/// Lexicographic "after the anchor" predicate for `sort`
///
/// `sort` must already be inverted for backward paging.
fn keyset_predicate(
    sort: &[SortField],
    payload: &KeysetCursorPayload,
    keyset_fields: &[String],
) -> Result<Filter> {
    let matches_sort = payload.fields.len() == sort.len()
        && payload
            .field_names()
            .zip(sort)
            .all(|(name, s)| name == s.field);
    if !matches_sort {
        let cursor_fields: Vec<&str> = payload.field_names().collect();
        let sort_fields: Vec<&str> = sort.iter().map(|s| s.field.as_str()).collect();
        tracing::warn!(
            ?cursor_fields,
            ?sort_fields,
            "rejecting keyset cursor minted for a different ordering"
        );
        return Err(Error::InvalidCursor(format!(
            "cursor fields [{}] do not match sort fields [{}]",
            cursor_fields.join(", "),
            sort_fields.join(", ")
        )));
    }

    let mut branches: Vec<Filter> = Vec::with_capacity(sort.len());
    for (i, (sort_field, anchor)) in sort.iter().zip(&payload.fields).enumerate() {
        let nullable = !keyset_fields.contains(&sort_field.field);
        let Some(seek) = seek_past(sort_field, &anchor.value, nullable) else {
            continue;
        };
        if i == 0 {
            match seek {
                Filter::Or(arms) => branches.extend(arms),
                seek => branches.push(seek),
            }
            continue;
        }

        let mut conjuncts: Vec<Filter> = payload.fields[..i].iter().map(same_as).collect();
        conjuncts.push(seek);
        branches.push(Filter::and(conjuncts));
    }

    // An empty OR matches nothing: no row sorts after the anchor
    Ok(if branches.len() == 1 {
        branches.remove(0)
    } else {
        Filter::or(branches)
    })
}

/// Rows sorting strictly after `anchor` on one field, `None` if none can
fn seek_past(sort: &SortField, anchor: &FilterValue, nullable: bool) -> Option<Filter> {
    let field = sort.field.as_str();
    let nulls_last = sort.effective_nulls() == NullsOrder::NullsLast;

    if anchor.is_null() {
        return (!nulls_last).then(|| FilterCondition::is_not_null(field).into());
    }

    let seek: Filter = match sort.direction {
        OrderDirection::Ascending => FilterCondition::gt(field, anchor.clone()),
        OrderDirection::Descending => FilterCondition::lt(field, anchor.clone()),
    }
    .into();
    Some(if nullable && nulls_last {
        Filter::or(vec![seek, FilterCondition::is_null(field).into()])
    } else {
        seek
    })
}

/// Rows equal to the anchor on one field
fn same_as(anchor: &KeysetField) -> Filter {
    let field = anchor.field.as_str();
    if anchor.value.is_null() {
        FilterCondition::is_null(field).into()
    } else {
        FilterCondition::eq(field, anchor.value.clone()).into()
    }
}

/// Cursor payload for `node` under the (non-inverted) effective sort
fn node_cursor<T: Record>(node: &T, sort: &[SortField]) -> Result<String> {
    let fields = sort
        .iter()
        .map(|sort| {
            node.field(&sort.field)
                .map(|value| KeysetField {
                    field: sort.field.clone(),
                    value,
                })
                .ok_or_else(|| {
                    Error::Internal(format!(
                        "row has no value for keyset field '{}'",
                        sort.field
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    encode_cursor(&KeysetCursorPayload::new(fields))
}

impl PagerStrategy for KeysetPagerStrategy {
    type Opts = KeysetPagingOpts;

    fn from_cursor_args(&self, paging: &CursorPaging) -> Result<KeysetPagingOpts> {
        let is_backward = paging.is_backward();
        let (cursor, limit) = if is_backward {
            (paging.before.as_deref(), page_size(paging.last))
        } else {
            (paging.after.as_deref(), page_size(paging.first))
        };

        Ok(KeysetPagingOpts {
            payload: cursor.map(Self::decode_payload).transpose()?,
            limit,
            default_sort: self.default_sort(),
            is_forward: !is_backward,
            is_backward,
            has_before: paging.before.is_some(),
        })
    }

    fn create_query(
        &self,
        query: &Query<CursorPaging>,
        opts: &KeysetPagingOpts,
        include_extra_node: bool,
    ) -> Result<Query<Paging>> {
        let mut sorting = effective_sort(&query.sorting, &opts.default_sort);
        if opts.is_backward {
            sorting = invert_sort(&sorting);
        }

        let filter = match &opts.payload {
            Some(payload) => Some(Filter::merge(
                query.filter.clone(),
                keyset_predicate(&sorting, payload, &self.keyset_fields)?,
            )),
            None => query.filter.clone(),
        };

        let limit = opts.limit + u64::from(include_extra_node);
        Ok(Query {
            filter,
            sorting,
            paging: Some(Paging::limit(limit)),
        })
    }

    fn check_for_extra_node<T>(&self, mut nodes: Vec<T>, opts: &KeysetPagingOpts) -> Vec<T> {
        let limit = usize::try_from(opts.limit).unwrap_or(usize::MAX);
        if nodes.len() > limit {
            nodes.pop();
        }
        if opts.is_backward {
            nodes.reverse();
        }
        nodes
    }

    fn to_cursor<T: Record>(
        &self,
        node: &T,
        _index: usize,
        opts: &KeysetPagingOpts,
        query: &Query<CursorPaging>,
    ) -> Result<String> {
        node_cursor(node, &effective_sort(&query.sorting, &opts.default_sort))
    }

    fn to_cursors<T: Record>(
        &self,
        nodes: &[T],
        opts: &KeysetPagingOpts,
        query: &Query<CursorPaging>,
    ) -> Result<Vec<String>> {
        let sort = effective_sort(&query.sorting, &opts.default_sort);
        nodes.iter().map(|node| node_cursor(node, &sort)).collect()
    }

    fn is_empty_cursor(&self, opts: &KeysetPagingOpts) -> bool {
        opts.payload
            .as_ref()
            .map_or(true, |payload| payload.fields.is_empty())
    }
}
