//! Query, filtering and ordering types shared by pagers and adapters
//!
//! A [`Query`] is what a caller hands to a pager and what a pager hands to the
//! backing store. The paging parameter is generic: pagers accept a
//! `Query<CursorPaging>` and emit a windowed `Query<Paging>`.
//!
//! # Example
//!
//! ```rust
//! use query_pager::repository::{
//!     Filter, FilterCondition, OrderDirection, Paging, Query, SortField,
//! };
//!
//! let query: Query = Query::new()
//!     .with_filter(Filter::and(vec![
//!         FilterCondition::eq("status", "active").into(),
//!         FilterCondition::gte("age", 18_i64).into(),
//!     ]))
//!     .with_sorting(vec![SortField::new("created_at", OrderDirection::Descending)])
//!     .with_paging(Paging::new(20, 0));
//!
//! assert_eq!(query.sorting.len(), 1);
//! ```

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction for ordering results
///
/// # Example
///
/// ```rust
/// use query_pager::repository::OrderDirection;
///
/// assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
/// assert_eq!(OrderDirection::Ascending.invert(), OrderDirection::Descending);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    #[serde(alias = "asc", alias = "ASC")]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    #[serde(alias = "desc", alias = "DESC")]
    Descending,
}

impl OrderDirection {
    /// The opposite direction
    #[must_use]
    pub const fn invert(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// Placement of null values in an ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NullsOrder {
    /// Nulls sort before every other value
    NullsFirst,
    /// Nulls sort after every other value
    NullsLast,
}

impl NullsOrder {
    /// The opposite placement
    #[must_use]
    pub const fn invert(self) -> Self {
        match self {
            Self::NullsFirst => Self::NullsLast,
            Self::NullsLast => Self::NullsFirst,
        }
    }
}

impl fmt::Display for NullsOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullsFirst => write!(f, "NULLS FIRST"),
            Self::NullsLast => write!(f, "NULLS LAST"),
        }
    }
}

/// One entry of a query's ordering
///
/// # Example
///
/// ```rust
/// use query_pager::repository::{NullsOrder, OrderDirection, SortField};
///
/// let sort = SortField::desc("created_at").with_nulls(NullsOrder::NullsLast);
/// let inverted = sort.invert();
///
/// assert_eq!(inverted.direction, OrderDirection::Ascending);
/// assert_eq!(inverted.nulls, Some(NullsOrder::NullsFirst));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortField {
    /// Field to order by
    pub field: String,
    /// Order direction
    #[serde(default)]
    pub direction: OrderDirection,
    /// Explicit null placement; the store's default applies when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullsOrder>,
}

impl SortField {
    /// Create a sort field without an explicit null placement
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
            nulls: None,
        }
    }

    /// Ascending sort on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Ascending)
    }

    /// Descending sort on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, OrderDirection::Descending)
    }

    /// Set the null placement
    #[must_use]
    pub fn with_nulls(mut self, nulls: NullsOrder) -> Self {
        self.nulls = Some(nulls);
        self
    }

    /// The null placement in effect
    ///
    /// Without an explicit placement, nulls sort as the largest value: last
    /// when ascending, first when descending.
    pub fn effective_nulls(&self) -> NullsOrder {
        self.nulls.unwrap_or(match self.direction {
            OrderDirection::Ascending => NullsOrder::NullsLast,
            OrderDirection::Descending => NullsOrder::NullsFirst,
        })
    }

    /// Flip the direction, and the null placement when one is set
    #[must_use]
    pub fn invert(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction.invert(),
            nulls: self.nulls.map(NullsOrder::invert),
        }
    }
}

/// Flip every entry of an ordering
pub fn invert_sort(sorting: &[SortField]) -> Vec<SortField> {
    sorting.iter().map(SortField::invert).collect()
}

/// Comparison operators for filter conditions
///
/// # Example
///
/// ```rust
/// use query_pager::repository::FilterOperator;
///
/// assert_eq!(format!("{}", FilterOperator::Equal), "=");
/// assert_eq!(format!("{}", FilterOperator::Like), "LIKE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    /// Equal to (=)
    Equal,
    /// Not equal to (!=)
    NotEqual,
    /// Greater than (>)
    GreaterThan,
    /// Greater than or equal to (>=)
    GreaterThanOrEqual,
    /// Less than (<)
    LessThan,
    /// Less than or equal to (<=)
    LessThanOrEqual,
    /// Pattern matching (LIKE)
    Like,
    /// Value is in a list (IN)
    In,
    /// Value is null (IS NULL)
    IsNull,
    /// Value is not null (IS NOT NULL)
    IsNotNull,
}

impl fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equal => write!(f, "="),
            Self::NotEqual => write!(f, "!="),
            Self::GreaterThan => write!(f, ">"),
            Self::GreaterThanOrEqual => write!(f, ">="),
            Self::LessThan => write!(f, "<"),
            Self::LessThanOrEqual => write!(f, "<="),
            Self::Like => write!(f, "LIKE"),
            Self::In => write!(f, "IN"),
            Self::IsNull => write!(f, "IS NULL"),
            Self::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// A field value used in filters and keyset cursors
///
/// Serializes as a bare JSON value, so a keyset cursor carries `1`, `"abc"`
/// or `null` rather than a tagged object.
///
/// # Example
///
/// ```rust
/// use query_pager::repository::FilterValue;
///
/// let int_val: FilterValue = 42_i64.into();
/// assert_eq!(serde_json::to_string(&int_val).unwrap(), "42");
///
/// let parsed: FilterValue = serde_json::from_str("\"active\"").unwrap();
/// assert_eq!(parsed, FilterValue::String("active".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// List of string values (for IN operator)
    StringList(Vec<String>),
    /// List of integer values (for IN operator)
    IntegerList(Vec<i64>),
    /// Null value (for IS NULL / IS NOT NULL)
    Null,
}

impl FilterValue {
    /// Whether this is [`FilterValue::Null`]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Compare two scalar values of compatible types
    ///
    /// Integers and floats compare numerically. Nulls, lists and values of
    /// different kinds are not comparable.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            (Self::Integer(a), Self::Integer(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Integer(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            #[allow(clippy::cast_precision_loss)]
            (Self::Float(a), Self::Integer(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Boolean(a), Self::Boolean(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "'{s}'"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::StringList(list) => write!(f, "({})", list.join(", ")),
            Self::IntegerList(list) => {
                let parts: Vec<String> = list.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join(", "))
            }
            Self::Null => write!(f, "NULL"),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(list: Vec<String>) -> Self {
        Self::StringList(list)
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(list: Vec<i64>) -> Self {
        Self::IntegerList(list)
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A single field comparison
///
/// # Example
///
/// ```rust
/// use query_pager::repository::{FilterCondition, FilterOperator};
///
/// let filter = FilterCondition::gte("age", 18_i64);
/// assert_eq!(filter.operator, FilterOperator::GreaterThanOrEqual);
/// assert_eq!(filter.to_string(), "age >= 18");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// The field name to filter on
    pub field: String,
    /// The comparison operator
    pub operator: FilterOperator,
    /// The value to compare against
    pub value: FilterValue,
}

impl FilterCondition {
    /// Create a new filter condition
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Create an equality filter (field = value)
    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::Equal, value.into())
    }

    /// Create a not-equal filter (field != value)
    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::NotEqual, value.into())
    }

    /// Create a greater-than filter (field > value)
    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThan, value.into())
    }

    /// Create a greater-than-or-equal filter (field >= value)
    pub fn gte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::GreaterThanOrEqual, value.into())
    }

    /// Create a less-than filter (field < value)
    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThan, value.into())
    }

    /// Create a less-than-or-equal filter (field <= value)
    pub fn lte(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, FilterOperator::LessThanOrEqual, value.into())
    }

    /// Create a LIKE pattern filter (`%` and `_` wildcards)
    pub fn like(field: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::Like, FilterValue::String(pattern.into()))
    }

    /// Create an IN list filter for strings
    pub fn in_strings(field: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::StringList(values))
    }

    /// Create an IN list filter for integers
    pub fn in_integers(field: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(field, FilterOperator::In, FilterValue::IntegerList(values))
    }

    /// Create an IS NULL filter
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNull, FilterValue::Null)
    }

    /// Create an IS NOT NULL filter
    pub fn is_not_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOperator::IsNotNull, FilterValue::Null)
    }
}

impl fmt::Display for FilterCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            FilterOperator::IsNull | FilterOperator::IsNotNull => {
                write!(f, "{} {}", self.field, self.operator)
            }
            _ => write!(f, "{} {} {}", self.field, self.operator, self.value),
        }
    }
}

/// Boolean predicate tree over entity fields
///
/// An empty `And` matches everything, an empty `Or` matches nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Every child must match
    And(Vec<Filter>),
    /// At least one child must match
    Or(Vec<Filter>),
    /// A single field comparison
    Condition(FilterCondition),
}

impl Filter {
    /// Conjunction of `filters`
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And(filters)
    }

    /// Disjunction of `filters`
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::Or(filters)
    }

    /// A filter that matches every row
    pub fn all() -> Self {
        Self::And(Vec::new())
    }

    /// Whether the filter constrains nothing
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::And(children) => children.iter().all(Filter::is_empty),
            Self::Or(_) | Self::Condition(_) => false,
        }
    }

    /// AND two filters together, dropping sides that constrain nothing
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_pager::repository::{Filter, FilterCondition};
    ///
    /// let active: Filter = FilterCondition::eq("status", "active").into();
    /// assert_eq!(Filter::merge(Some(active.clone()), Filter::all()), active);
    /// ```
    #[must_use]
    pub fn merge(base: Option<Filter>, other: Filter) -> Filter {
        match base {
            None => other,
            Some(base) if base.is_empty() => other,
            Some(base) if other.is_empty() => base,
            Some(Filter::And(mut children)) => {
                children.push(other);
                Filter::And(children)
            }
            Some(base) => Filter::And(vec![base, other]),
        }
    }

    /// Every field name referenced anywhere in the tree
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_fields(out);
                }
            }
            Self::Condition(condition) => {
                if !out.contains(&condition.field.as_str()) {
                    out.push(condition.field.as_str());
                }
            }
        }
    }
}

impl From<FilterCondition> for Filter {
    fn from(condition: FilterCondition) -> Self {
        Self::Condition(condition)
    }
}

impl Default for Filter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (children, joiner) = match self {
            Self::Condition(condition) => return write!(f, "{condition}"),
            Self::And(children) => (children, " AND "),
            Self::Or(children) => (children, " OR "),
        };
        if children.is_empty() {
            return match self {
                Self::Or(_) => write!(f, "FALSE"),
                _ => write!(f, "TRUE"),
            };
        }
        write!(f, "(")?;
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                write!(f, "{joiner}")?;
            }
            write!(f, "{child}")?;
        }
        write!(f, ")")
    }
}

/// Limit/offset window for a backing query
///
/// Also the input of the offset pager.
///
/// # Example
///
/// ```rust
/// use query_pager::repository::Paging;
///
/// let paging = Paging::page(3, 20);
/// assert_eq!(paging.offset, Some(40));
/// assert_eq!(paging.limit, Some(20));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::InputObject))]
pub struct Paging {
    /// Maximum number of rows to return
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    /// Number of rows to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl Paging {
    /// Create a limit/offset window
    #[must_use]
    pub const fn new(limit: u64, offset: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Window with a limit and no offset
    #[must_use]
    pub const fn limit(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            offset: None,
        }
    }

    /// Window for a 1-indexed page number
    #[must_use]
    pub const fn page(page_number: u64, page_size: u64) -> Self {
        Self::new(page_size, page_number.saturating_sub(1) * page_size)
    }
}

/// Filter, ordering and paging for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query<P = Paging> {
    /// Row predicate; `None` matches everything
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    /// Ordering, most significant first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sorting: Vec<SortField>,
    /// Paging request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<P>,
}

impl<P> Default for Query<P> {
    fn default() -> Self {
        Self {
            filter: None,
            sorting: Vec::new(),
            paging: None,
        }
    }
}

impl<P> Query<P> {
    /// An unfiltered, unsorted, unpaged query
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Set the ordering
    #[must_use]
    pub fn with_sorting(mut self, sorting: Vec<SortField>) -> Self {
        self.sorting = sorting;
        self
    }

    /// Set the paging request
    #[must_use]
    pub fn with_paging(mut self, paging: P) -> Self {
        self.paging = Some(paging);
        self
    }

    /// Same filter and ordering with a different kind of paging
    pub fn with_window<Q>(&self, paging: Option<Q>) -> Query<Q> {
        Query {
            filter: self.filter.clone(),
            sorting: self.sorting.clone(),
            paging,
        }
    }

    /// The filter, or a match-all filter when none is set
    pub fn filter_or_all(&self) -> Filter {
        self.filter.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_direction_display() {
        assert_eq!(format!("{}", OrderDirection::Ascending), "asc");
        assert_eq!(format!("{}", OrderDirection::Descending), "desc");
    }

    #[test]
    fn test_order_direction_default() {
        assert_eq!(OrderDirection::default(), OrderDirection::Ascending);
    }

    #[test]
    fn test_sort_field_invert_without_nulls() {
        let inverted = SortField::asc("id").invert();
        assert_eq!(inverted.direction, OrderDirection::Descending);
        assert_eq!(inverted.nulls, None);
    }

    #[test]
    fn test_effective_nulls_defaults_and_inversion() {
        let asc = SortField::asc("rank");
        assert_eq!(asc.effective_nulls(), NullsOrder::NullsLast);
        assert_eq!(asc.invert().effective_nulls(), NullsOrder::NullsFirst);

        let explicit = SortField::desc("rank").with_nulls(NullsOrder::NullsLast);
        assert_eq!(explicit.effective_nulls(), NullsOrder::NullsLast);
        assert_eq!(explicit.invert().effective_nulls(), NullsOrder::NullsFirst);
    }

    #[test]
    fn test_invert_sort_flips_every_entry() {
        let sorting = vec![
            SortField::asc("name").with_nulls(NullsOrder::NullsFirst),
            SortField::desc("id"),
        ];
        let inverted = invert_sort(&sorting);
        assert_eq!(inverted[0].direction, OrderDirection::Descending);
        assert_eq!(inverted[0].nulls, Some(NullsOrder::NullsLast));
        assert_eq!(inverted[1].direction, OrderDirection::Ascending);
    }

    #[test]
    fn test_filter_operator_display() {
        assert_eq!(format!("{}", FilterOperator::Equal), "=");
        assert_eq!(format!("{}", FilterOperator::NotEqual), "!=");
        assert_eq!(format!("{}", FilterOperator::GreaterThan), ">");
        assert_eq!(format!("{}", FilterOperator::GreaterThanOrEqual), ">=");
        assert_eq!(format!("{}", FilterOperator::LessThan), "<");
        assert_eq!(format!("{}", FilterOperator::LessThanOrEqual), "<=");
        assert_eq!(format!("{}", FilterOperator::Like), "LIKE");
        assert_eq!(format!("{}", FilterOperator::In), "IN");
        assert_eq!(format!("{}", FilterOperator::IsNull), "IS NULL");
        assert_eq!(format!("{}", FilterOperator::IsNotNull), "IS NOT NULL");
    }

    #[test]
    fn test_filter_value_json_is_untagged() {
        let values = vec![
            FilterValue::Integer(7),
            FilterValue::String("x".to_string()),
            FilterValue::Float(1.5),
            FilterValue::Boolean(true),
            FilterValue::Null,
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, r#"[7,"x",1.5,true,null]"#);

        let parsed: Vec<FilterValue> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, values);
    }

    #[test]
    fn test_filter_value_compare_mixed_numbers() {
        let a = FilterValue::Integer(2);
        let b = FilterValue::Float(2.5);
        assert_eq!(a.compare(&b), Some(Ordering::Less));
        assert_eq!(b.compare(&a), Some(Ordering::Greater));
    }

    #[test]
    fn test_filter_value_compare_incompatible() {
        assert_eq!(FilterValue::Null.compare(&FilterValue::Null), None);
        assert_eq!(
            FilterValue::String("1".to_string()).compare(&FilterValue::Integer(1)),
            None
        );
    }

    #[test]
    fn test_filter_value_from_option() {
        let none: FilterValue = Option::<i64>::None.into();
        let some: FilterValue = Some(3_i64).into();
        assert_eq!(none, FilterValue::Null);
        assert_eq!(some, FilterValue::Integer(3));
    }

    #[test]
    fn test_filter_condition_constructors() {
        assert_eq!(FilterCondition::ne("a", 1_i64).operator, FilterOperator::NotEqual);
        assert_eq!(FilterCondition::gt("a", 1_i64).operator, FilterOperator::GreaterThan);
        assert_eq!(FilterCondition::lt("a", 1_i64).operator, FilterOperator::LessThan);
        assert_eq!(
            FilterCondition::lte("a", 1_i64).operator,
            FilterOperator::LessThanOrEqual
        );
        assert_eq!(
            FilterCondition::in_integers("a", vec![1, 2]).value,
            FilterValue::IntegerList(vec![1, 2])
        );
        assert_eq!(FilterCondition::is_null("a").value, FilterValue::Null);
    }

    #[test]
    fn test_filter_display() {
        let filter = Filter::or(vec![
            FilterCondition::gt("id", 3_i64).into(),
            Filter::and(vec![
                FilterCondition::eq("id", 3_i64).into(),
                FilterCondition::is_null("deleted_at").into(),
            ]),
        ]);
        assert_eq!(filter.to_string(), "(id > 3 OR (id = 3 AND deleted_at IS NULL))");
    }

    #[test]
    fn test_filter_merge_drops_empty_sides() {
        let condition: Filter = FilterCondition::eq("a", 1_i64).into();
        assert_eq!(Filter::merge(None, condition.clone()), condition);
        assert_eq!(
            Filter::merge(Some(Filter::all()), condition.clone()),
            condition
        );
        assert_eq!(
            Filter::merge(Some(condition.clone()), Filter::all()),
            condition
        );
    }

    #[test]
    fn test_filter_merge_appends_to_and() {
        let base = Filter::and(vec![FilterCondition::eq("a", 1_i64).into()]);
        let merged = Filter::merge(Some(base), FilterCondition::eq("b", 2_i64).into());
        match merged {
            Filter::And(children) => assert_eq!(children.len(), 2),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_or_is_not_empty_filter() {
        assert!(Filter::all().is_empty());
        assert!(!Filter::or(vec![]).is_empty());
    }

    #[test]
    fn test_filter_fields_deduplicated() {
        let filter = Filter::and(vec![
            FilterCondition::gt("id", 1_i64).into(),
            Filter::or(vec![
                FilterCondition::eq("id", 2_i64).into(),
                FilterCondition::eq("name", "x").into(),
            ]),
        ]);
        assert_eq!(filter.fields(), vec!["id", "name"]);
    }

    #[test]
    fn test_paging_page_zero_handling() {
        let page0 = Paging::page(0, 20);
        assert_eq!(page0.offset, Some(0));
    }

    #[test]
    fn test_query_with_window_keeps_filter_and_sort() {
        let query: Query<u8> = Query::new()
            .with_filter(FilterCondition::eq("a", 1_i64))
            .with_sorting(vec![SortField::asc("a")])
            .with_paging(9);
        let windowed = query.with_window(Some(Paging::limit(3)));
        assert_eq!(windowed.filter, query.filter);
        assert_eq!(windowed.sorting, query.sorting);
        assert_eq!(windowed.paging, Some(Paging::limit(3)));
    }
}
