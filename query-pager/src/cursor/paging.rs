//! Relay-style cursor paging arguments

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A forward (`first` / `after`) or backward (`last` / `before`) page request
///
/// Counts are signed so that negative input from a client reaches
/// [`CursorPaging::validate`] and is rejected rather than wrapped.
///
/// # Example
///
/// ```rust
/// use query_pager::cursor::CursorPaging;
///
/// let forward = CursorPaging::first(10).with_after("YXJyYXljb25uZWN0aW9uOjk=");
/// assert!(forward.is_forward());
///
/// let backward = CursorPaging::last(5);
/// assert!(backward.is_backward());
///
/// assert!(CursorPaging::first(-1).validate(None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::InputObject))]
pub struct CursorPaging {
    /// Number of rows after the `after` cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<i32>,
    /// Cursor to page forward from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    /// Number of rows before the `before` cursor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<i32>,
    /// Cursor to page backward from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
}

impl CursorPaging {
    /// Request the first `n` rows
    #[must_use]
    pub fn first(n: i32) -> Self {
        Self {
            first: Some(n),
            ..Self::default()
        }
    }

    /// Request the last `n` rows
    #[must_use]
    pub fn last(n: i32) -> Self {
        Self {
            last: Some(n),
            ..Self::default()
        }
    }

    /// Start after `cursor`
    #[must_use]
    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// End before `cursor`
    #[must_use]
    pub fn with_before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }

    /// Whether `last` or `before` is set
    pub fn is_backward(&self) -> bool {
        self.last.is_some() || self.before.is_some()
    }

    /// Whether this is not a backward request
    pub fn is_forward(&self) -> bool {
        !self.is_backward()
    }

    /// The requested page size, if any
    pub fn requested_size(&self) -> Option<i32> {
        if self.is_backward() {
            self.last
        } else {
            self.first
        }
    }

    /// Reject contradictory, negative and oversized requests
    ///
    /// `max_results_size` of `None` means unbounded.
    pub fn validate(&self, max_results_size: Option<u64>) -> Result<()> {
        let forward = self.first.is_some() || self.after.is_some();
        if forward && self.is_backward() {
            return Err(Error::InvalidPaging(
                "cannot combine first/after with last/before".to_string(),
            ));
        }

        for (name, value) in [("first", self.first), ("last", self.last)] {
            let Some(value) = value else { continue };
            let size = u64::try_from(value)
                .map_err(|_| Error::InvalidPaging(format!("{name} must not be negative")))?;
            if let Some(max) = max_results_size {
                if size > max {
                    return Err(Error::InvalidPaging(format!(
                        "{name} must be at most {max}, got {size}"
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Non-negative page size from a validated request
pub(crate) fn page_size(value: Option<i32>) -> u64 {
    value.and_then(|v| u64::try_from(v).ok()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_forward() {
        let paging = CursorPaging::default();
        assert!(paging.is_forward());
        assert!(!paging.is_backward());
        assert_eq!(paging.requested_size(), None);
    }

    #[test]
    fn test_before_alone_is_backward() {
        let paging = CursorPaging::default().with_before("abc");
        assert!(paging.is_backward());
    }

    #[test]
    fn test_validate_accepts_plain_requests() {
        assert!(CursorPaging::first(10).validate(Some(100)).is_ok());
        assert!(CursorPaging::last(10).with_before("x").validate(Some(100)).is_ok());
        assert!(CursorPaging::first(0).validate(Some(100)).is_ok());
        assert!(CursorPaging::default().validate(None).is_ok());
    }

    #[test]
    fn test_validate_rejects_mixed_directions() {
        let paging = CursorPaging::first(2).with_before("x");
        assert!(matches!(
            paging.validate(None),
            Err(Error::InvalidPaging(_))
        ));

        let paging = CursorPaging {
            first: Some(1),
            last: Some(1),
            ..CursorPaging::default()
        };
        assert!(paging.validate(None).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_counts() {
        assert!(matches!(
            CursorPaging::first(-3).validate(None),
            Err(Error::InvalidPaging(msg)) if msg.contains("first")
        ));
        assert!(matches!(
            CursorPaging::last(-1).validate(None),
            Err(Error::InvalidPaging(msg)) if msg.contains("last")
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_pages() {
        assert!(CursorPaging::first(101).validate(Some(100)).is_err());
        assert!(CursorPaging::first(100).validate(Some(100)).is_ok());
        assert!(CursorPaging::first(101).validate(None).is_ok());
    }

    #[test]
    fn test_page_size() {
        assert_eq!(page_size(Some(5)), 5);
        assert_eq!(page_size(None), 0);
    }

    #[test]
    fn test_deserialize_graphql_style_args() {
        let paging: CursorPaging =
            serde_json::from_str(r#"{"last": 3, "before": "YWJj"}"#).unwrap();
        assert_eq!(paging, CursorPaging::last(3).with_before("YWJj"));
    }
}
