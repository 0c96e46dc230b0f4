//! In-memory [`QueryService`] over a vector of rows
//!
//! Evaluates filters, ordering and limit/offset windows the way a SQL store
//! would, which makes it a reference implementation of the adapter contract
//! and a convenient backing store for tests and fixtures.
//!
//! Null handling follows SQL: comparisons against `NULL` never match, and
//! without an explicit placement nulls sort last ascending and first
//! descending.

use std::cmp::Ordering;

use super::error::{RepositoryError, RepositoryOperation};
use super::query::{
    Filter, FilterCondition, FilterOperator, FilterValue, NullsOrder, OrderDirection, Paging,
    Query, SortField,
};
use super::traits::{QueryService, Record, RepositoryResult};

/// Rows held in memory and queried with [`Query`] semantics
///
/// # Example
///
/// ```rust
/// use query_pager::repository::{
///     FilterCondition, FilterValue, MemoryQueryService, Paging, Query, Record, SortField,
/// };
///
/// #[derive(Clone)]
/// struct Item(i64);
///
/// impl Record for Item {
///     fn field(&self, name: &str) -> Option<FilterValue> {
///         (name == "id").then(|| self.0.into())
///     }
/// }
///
/// let store = MemoryQueryService::new((1..=10).map(Item).collect());
/// let query = Query::new()
///     .with_filter(FilterCondition::gt("id", 4_i64))
///     .with_sorting(vec![SortField::desc("id")])
///     .with_paging(Paging::limit(2));
///
/// let ids: Vec<i64> = store.run(&query).unwrap().iter().map(|i| i.0).collect();
/// assert_eq!(ids, vec![10, 9]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryQueryService<T> {
    rows: Vec<T>,
    entity: Option<String>,
}

impl<T> MemoryQueryService<T>
where
    T: Record + Clone,
{
    /// Create a store over `rows`
    pub fn new(rows: Vec<T>) -> Self {
        Self { rows, entity: None }
    }

    /// Name the entity in error messages
    #[must_use]
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// All rows in insertion order
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Evaluate `query` synchronously
    pub fn run(&self, query: &Query) -> RepositoryResult<Vec<T>> {
        let mut keyed = Vec::new();
        for row in &self.rows {
            if let Some(filter) = &query.filter {
                if !self.matches(row, filter, RepositoryOperation::Query)? {
                    continue;
                }
            }
            let keys = query
                .sorting
                .iter()
                .map(|sort| self.value_of(row, &sort.field, RepositoryOperation::Query))
                .collect::<RepositoryResult<Vec<_>>>()?;
            keyed.push((keys, row));
        }

        keyed.sort_by(|(a, _), (b, _)| {
            query
                .sorting
                .iter()
                .zip(a.iter().zip(b.iter()))
                .map(|(sort, (left, right))| compare_sorted(left, right, sort))
                .find(|ordering| *ordering != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });

        let Paging { limit, offset } = query.paging.unwrap_or_default();
        let skip = usize::try_from(offset.unwrap_or(0)).unwrap_or(usize::MAX);
        let take = limit.map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(keyed
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|(_, row)| row.clone())
            .collect())
    }

    /// Count rows matching `filter`
    pub fn count_matching(&self, filter: &Filter) -> RepositoryResult<u64> {
        let mut count = 0_u64;
        for row in &self.rows {
            if self.matches(row, filter, RepositoryOperation::Count)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn matches(
        &self,
        row: &T,
        filter: &Filter,
        operation: RepositoryOperation,
    ) -> RepositoryResult<bool> {
        match filter {
            Filter::And(children) => {
                for child in children {
                    if !self.matches(row, child, operation)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Or(children) => {
                for child in children {
                    if self.matches(row, child, operation)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Filter::Condition(condition) => self.evaluate(row, condition, operation),
        }
    }

    fn evaluate(
        &self,
        row: &T,
        condition: &FilterCondition,
        operation: RepositoryOperation,
    ) -> RepositoryResult<bool> {
        let actual = self.value_of(row, &condition.field, operation)?;
        let expected = &condition.value;

        match condition.operator {
            FilterOperator::IsNull => return Ok(actual.is_null()),
            FilterOperator::IsNotNull => return Ok(!actual.is_null()),
            _ if actual.is_null() || expected.is_null() => return Ok(false),
            _ => {}
        }

        match condition.operator {
            FilterOperator::Like => match (&actual, expected) {
                (FilterValue::String(value), FilterValue::String(pattern)) => {
                    Ok(like(value, pattern))
                }
                _ => Err(self.unsupported(operation, condition)),
            },
            FilterOperator::In => match (&actual, expected) {
                (FilterValue::String(value), FilterValue::StringList(list)) => {
                    Ok(list.contains(value))
                }
                (FilterValue::Integer(value), FilterValue::IntegerList(list)) => {
                    Ok(list.contains(value))
                }
                _ => Err(self.unsupported(operation, condition)),
            },
            op => {
                let ordering = actual
                    .compare(expected)
                    .ok_or_else(|| self.unsupported(operation, condition))?;
                Ok(match op {
                    FilterOperator::Equal => ordering == Ordering::Equal,
                    FilterOperator::NotEqual => ordering != Ordering::Equal,
                    FilterOperator::GreaterThan => ordering == Ordering::Greater,
                    FilterOperator::GreaterThanOrEqual => ordering != Ordering::Less,
                    FilterOperator::LessThan => ordering == Ordering::Less,
                    FilterOperator::LessThanOrEqual => ordering != Ordering::Greater,
                    _ => false,
                })
            }
        }
    }

    fn value_of(
        &self,
        row: &T,
        field: &str,
        operation: RepositoryOperation,
    ) -> RepositoryResult<FilterValue> {
        row.field(field).ok_or_else(|| {
            self.tag(RepositoryError::unsupported_query(
                operation,
                format!("unknown field `{field}`"),
            ))
        })
    }

    fn unsupported(
        &self,
        operation: RepositoryOperation,
        condition: &FilterCondition,
    ) -> RepositoryError {
        self.tag(RepositoryError::unsupported_query(
            operation,
            format!("cannot evaluate `{condition}`"),
        ))
    }

    fn tag(&self, error: RepositoryError) -> RepositoryError {
        match &self.entity {
            Some(entity) => error.with_entity(entity.clone()),
            None => error,
        }
    }
}

impl<T> QueryService<T> for MemoryQueryService<T>
where
    T: Record + Clone + Send + Sync,
{
    async fn query(&self, query: Query) -> RepositoryResult<Vec<T>> {
        self.run(&query)
    }

    async fn count(&self, filter: Filter) -> RepositoryResult<u64> {
        self.count_matching(&filter)
    }
}

fn compare_sorted(left: &FilterValue, right: &FilterValue, sort: &SortField) -> Ordering {
    let null_side = match sort.effective_nulls() {
        NullsOrder::NullsFirst => Ordering::Less,
        NullsOrder::NullsLast => Ordering::Greater,
    };
    match (left.is_null(), right.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => null_side,
        (false, true) => null_side.reverse(),
        (false, false) => {
            let ordering = left.compare(right).unwrap_or(Ordering::Equal);
            match sort.direction {
                OrderDirection::Ascending => ordering,
                OrderDirection::Descending => ordering.reverse(),
            }
        }
    }
}

/// SQL `LIKE` with `%` (any run) and `_` (one character)
fn like(value: &str, pattern: &str) -> bool {
    let value: Vec<char> = value.chars().collect();
    let pattern: Vec<char> = pattern.chars().collect();

    // matched[j]: pattern[..j] matches the value prefix consumed so far
    let mut matched = vec![false; pattern.len() + 1];
    matched[0] = true;
    for j in 1..=pattern.len() {
        matched[j] = matched[j - 1] && pattern[j - 1] == '%';
    }

    for c in value {
        let mut next = vec![false; pattern.len() + 1];
        for j in 1..=pattern.len() {
            next[j] = match pattern[j - 1] {
                '%' => next[j - 1] || matched[j],
                '_' => matched[j - 1],
                p => matched[j - 1] && p == c,
            };
        }
        matched = next;
    }
    matched[pattern.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryErrorKind;

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: i64,
        name: &'static str,
        age: Option<i64>,
    }

    impl Record for Person {
        fn field(&self, name: &str) -> Option<FilterValue> {
            match name {
                "id" => Some(self.id.into()),
                "name" => Some(self.name.into()),
                "age" => Some(self.age.into()),
                _ => None,
            }
        }
    }

    fn people() -> MemoryQueryService<Person> {
        MemoryQueryService::new(vec![
            Person { id: 1, name: "alice", age: Some(30) },
            Person { id: 2, name: "bob", age: None },
            Person { id: 3, name: "carol", age: Some(25) },
            Person { id: 4, name: "dave", age: Some(30) },
        ])
    }

    fn ids(rows: &[Person]) -> Vec<i64> {
        rows.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_like_wildcards() {
        assert!(like("alice", "a%"));
        assert!(like("alice", "%ic%"));
        assert!(like("alice", "_lice"));
        assert!(!like("alice", "_ice"));
        assert!(like("", "%"));
        assert!(!like("bob", "b_"));
    }

    #[test]
    fn test_filter_comparisons_skip_nulls() {
        let store = people();
        let query = Query::new().with_filter(FilterCondition::gte("age", 25_i64));
        assert_eq!(ids(&store.run(&query).unwrap()), vec![1, 3, 4]);

        let query = Query::new().with_filter(FilterCondition::ne("age", 30_i64));
        assert_eq!(ids(&store.run(&query).unwrap()), vec![3]);
    }

    #[test]
    fn test_null_checks() {
        let store = people();
        let query = Query::new().with_filter(FilterCondition::is_null("age"));
        assert_eq!(ids(&store.run(&query).unwrap()), vec![2]);

        let query = Query::new().with_filter(FilterCondition::is_not_null("age"));
        assert_eq!(ids(&store.run(&query).unwrap()), vec![1, 3, 4]);
    }

    #[test]
    fn test_or_and_in() {
        let store = people();
        let query = Query::new().with_filter(Filter::or(vec![
            FilterCondition::in_strings("name", vec!["bob".to_string(), "dave".to_string()])
                .into(),
            FilterCondition::in_integers("id", vec![1]).into(),
        ]));
        assert_eq!(ids(&store.run(&query).unwrap()), vec![1, 2, 4]);
    }

    #[test]
    fn test_sort_default_null_placement() {
        let store = people();
        let asc = Query::new().with_sorting(vec![SortField::asc("age"), SortField::asc("id")]);
        assert_eq!(ids(&store.run(&asc).unwrap()), vec![3, 1, 4, 2]);

        let desc = Query::new().with_sorting(vec![SortField::desc("age"), SortField::asc("id")]);
        assert_eq!(ids(&store.run(&desc).unwrap()), vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_sort_explicit_null_placement() {
        let store = people();
        let query = Query::new().with_sorting(vec![
            SortField::asc("age").with_nulls(NullsOrder::NullsFirst),
            SortField::desc("id"),
        ]);
        assert_eq!(ids(&store.run(&query).unwrap()), vec![2, 3, 4, 1]);
    }

    #[test]
    fn test_offset_and_limit_window() {
        let store = people();
        let query = Query::new()
            .with_sorting(vec![SortField::asc("id")])
            .with_paging(Paging::new(2, 1));
        assert_eq!(ids(&store.run(&query).unwrap()), vec![2, 3]);

        let past_end = Query::new().with_paging(Paging::new(5, 10));
        assert!(store.run(&past_end).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_field_is_unsupported() {
        let store = people().with_entity("Person");
        let query = Query::new().with_filter(FilterCondition::eq("email", "x"));
        let err = store.run(&query).unwrap_err();
        assert_eq!(err.kind, RepositoryErrorKind::UnsupportedQuery);
        assert_eq!(err.entity_type.as_deref(), Some("Person"));
    }

    #[test]
    fn test_mismatched_types_are_unsupported() {
        let store = people();
        let query = Query::new().with_filter(FilterCondition::gt("name", 3_i64));
        assert!(store.run(&query).is_err());
    }

    #[tokio::test]
    async fn test_query_service_count() {
        let store = people();
        let count = store
            .count(FilterCondition::eq("age", 30_i64).into())
            .await
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.count(Filter::all()).await.unwrap(), 4);
    }
}
