//! Static description of a pageable entity
//!
//! An [`EntityMeta`] tells the pager which fields exist, which of them callers
//! may sort on, and which fields form the entity's unique keyset ordering.

use crate::error::{Error, Result};
use crate::repository::SortField;

/// Field metadata for one entity type
///
/// # Example
///
/// ```rust
/// use query_pager::entity::EntityMeta;
/// use query_pager::repository::SortField;
///
/// let todo = EntityMeta::new("TodoItem")
///     .with_fields(["id", "title", "completed", "created"])
///     .with_sortable_fields(["id", "title", "created"])
///     .with_keyset(["id"]);
///
/// assert!(todo.has_keyset());
/// assert!(todo.validate_sorting(&[SortField::desc("created")]).is_ok());
/// assert!(todo.validate_sorting(&[SortField::asc("completed")]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityMeta {
    /// Entity name used in logs and errors
    pub name: String,
    /// Every field of the entity; empty means unknown
    pub fields: Vec<String>,
    /// Fields callers may sort on; empty means every known field
    pub sortable_fields: Vec<String>,
    /// Fields that together uniquely order rows, most significant first
    pub keyset_fields: Vec<String>,
}

impl EntityMeta {
    /// Describe an entity with no declared fields
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare the entity's fields
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Restrict which fields may be sorted on
    #[must_use]
    pub fn with_sortable_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sortable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Declare the keyset used for cursor paging
    #[must_use]
    pub fn with_keyset<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keyset_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the entity declares keyset fields
    pub fn has_keyset(&self) -> bool {
        !self.keyset_fields.is_empty()
    }

    /// Whether callers may order by `field`
    pub fn is_sortable(&self, field: &str) -> bool {
        let allowed = if self.sortable_fields.is_empty() {
            &self.fields
        } else {
            &self.sortable_fields
        };
        allowed.is_empty() || allowed.iter().any(|f| f == field)
    }

    /// Reject orderings on fields that are not sortable
    pub fn validate_sorting(&self, sorting: &[SortField]) -> Result<()> {
        match sorting.iter().find(|sort| !self.is_sortable(&sort.field)) {
            Some(sort) => Err(Error::InvalidSort(format!(
                "{} cannot be sorted by '{}'",
                self.name, sort.field
            ))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_fields_allow_any_sort() {
        let meta = EntityMeta::new("Anything");
        assert!(meta.is_sortable("whatever"));
        assert!(!meta.has_keyset());
    }

    #[test]
    fn test_fields_without_sortable_list() {
        let meta = EntityMeta::new("User").with_fields(["id", "email"]);
        assert!(meta.is_sortable("email"));
        assert!(!meta.is_sortable("password_hash"));
    }

    #[test]
    fn test_validate_sorting_names_offending_field() {
        let meta = EntityMeta::new("User")
            .with_fields(["id", "email", "password_hash"])
            .with_sortable_fields(["id", "email"]);

        let err = meta
            .validate_sorting(&[SortField::asc("email"), SortField::desc("password_hash")])
            .unwrap_err();
        match err {
            Error::InvalidSort(msg) => {
                assert!(msg.contains("password_hash"));
                assert!(msg.contains("User"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_keyset_declaration() {
        let meta = EntityMeta::new("Order").with_keyset(["tenant_id", "id"]);
        assert!(meta.has_keyset());
        assert_eq!(meta.keyset_fields, vec!["tenant_id", "id"]);
    }
}
