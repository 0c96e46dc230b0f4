//! Opaque cursor encoding
//!
//! Cursors are base64 (standard alphabet, padded) over either a JSON payload
//! or the legacy `arrayconnection:<offset>` tag used by offset cursors.
//! Everything that fails to decode is an [`Error::InvalidCursor`].

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::repository::FilterValue;

const OFFSET_CURSOR_PREFIX: &str = "arrayconnection:";

/// Discriminator stored in a keyset payload's `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorKind {
    /// Keyset cursor
    Keyset,
}

/// One sort field and the anchor row's value for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysetField {
    /// Field name
    pub field: String,
    /// Value of the field on the anchor row
    pub value: FilterValue,
}

impl KeysetField {
    /// Create a field/value pair
    pub fn new(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Decoded contents of a keyset cursor
///
/// Fields appear in the order of the effective sort the cursor was minted
/// under.
///
/// # Example
///
/// ```rust
/// use query_pager::cursor::{decode_cursor, encode_cursor, KeysetCursorPayload, KeysetField};
///
/// let payload = KeysetCursorPayload::new(vec![
///     KeysetField::new("created", "2024-01-01"),
///     KeysetField::new("id", 7_i64),
/// ]);
///
/// let cursor = encode_cursor(&payload).unwrap();
/// let decoded: KeysetCursorPayload = decode_cursor(&cursor).unwrap();
/// assert_eq!(decoded, payload);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeysetCursorPayload {
    /// Always [`CursorKind::Keyset`]
    #[serde(rename = "type")]
    pub kind: CursorKind,
    /// Anchor values, most significant sort field first
    pub fields: Vec<KeysetField>,
}

impl KeysetCursorPayload {
    /// Create a keyset payload
    pub fn new(fields: Vec<KeysetField>) -> Self {
        Self {
            kind: CursorKind::Keyset,
            fields,
        }
    }

    /// Field names in payload order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }
}

/// Serialize `payload` to JSON and base64-encode it
pub fn encode_cursor<P: Serialize>(payload: &P) -> Result<String> {
    let json = serde_json::to_vec(payload)
        .map_err(|e| Error::Internal(format!("Failed to serialize cursor: {e}")))?;
    Ok(STANDARD.encode(json))
}

/// Base64-decode `cursor` and parse the JSON payload inside
pub fn decode_cursor<P: DeserializeOwned>(cursor: &str) -> Result<P> {
    let bytes = decode_bytes(cursor)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        tracing::warn!(cursor, "rejecting cursor with unreadable payload: {}", e);
        Error::InvalidCursor(format!("malformed cursor payload: {e}"))
    })
}

/// Encode an absolute row offset as an opaque cursor
///
/// # Example
///
/// ```rust
/// use query_pager::cursor::{decode_offset_cursor, encode_offset_cursor};
///
/// assert_eq!(encode_offset_cursor(0), "YXJyYXljb25uZWN0aW9uOjA=");
/// assert_eq!(decode_offset_cursor("YXJyYXljb25uZWN0aW9uOjA=").unwrap(), 0);
/// ```
pub fn encode_offset_cursor(offset: u64) -> String {
    STANDARD.encode(format!("{OFFSET_CURSOR_PREFIX}{offset}"))
}

/// Decode an offset cursor back to its absolute row offset
pub fn decode_offset_cursor(cursor: &str) -> Result<u64> {
    let bytes = decode_bytes(cursor)?;
    let text = String::from_utf8(bytes)
        .map_err(|_| Error::InvalidCursor("cursor is not valid UTF-8".to_string()))?;

    let Some(raw) = text.strip_prefix(OFFSET_CURSOR_PREFIX) else {
        tracing::warn!(cursor, "rejecting cursor without offset prefix");
        return Err(Error::InvalidCursor(
            "cursor is not an offset cursor".to_string(),
        ));
    };

    raw.parse::<u64>().map_err(|_| {
        tracing::warn!(cursor, "rejecting cursor with non-numeric offset");
        Error::InvalidCursor(format!("invalid cursor offset '{raw}'"))
    })
}

fn decode_bytes(cursor: &str) -> Result<Vec<u8>> {
    tracing::trace!(cursor, "decoding cursor");
    STANDARD.decode(cursor).map_err(|e| {
        tracing::warn!(cursor, "rejecting cursor that is not base64: {}", e);
        Error::InvalidCursor(format!("cursor is not valid base64: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_cursor_round_trip() {
        for offset in [0, 1, 14, 1_000_000] {
            let cursor = encode_offset_cursor(offset);
            assert_eq!(decode_offset_cursor(&cursor).unwrap(), offset);
        }
    }

    #[test]
    fn test_offset_cursor_legacy_format() {
        let raw = STANDARD.decode(encode_offset_cursor(9)).unwrap();
        assert_eq!(raw, b"arrayconnection:9");
    }

    #[test]
    fn test_offset_cursor_rejects_garbage() {
        assert!(matches!(
            decode_offset_cursor("%%%"),
            Err(Error::InvalidCursor(_))
        ));
        let other_prefix = STANDARD.encode("cursor:3");
        assert!(matches!(
            decode_offset_cursor(&other_prefix),
            Err(Error::InvalidCursor(_))
        ));
        let not_numeric = STANDARD.encode("arrayconnection:three");
        assert!(matches!(
            decode_offset_cursor(&not_numeric),
            Err(Error::InvalidCursor(_))
        ));
        let negative = STANDARD.encode("arrayconnection:-1");
        assert!(matches!(
            decode_offset_cursor(&negative),
            Err(Error::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_keyset_payload_json_shape() {
        let payload = KeysetCursorPayload::new(vec![KeysetField::new("id", 3_i64)]);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "keyset", "fields": [{"field": "id", "value": 3}]})
        );
    }

    #[test]
    fn test_keyset_payload_round_trip_mixed_values() {
        let payload = KeysetCursorPayload::new(vec![
            KeysetField::new("name", "Ada"),
            KeysetField::new("score", 2.5_f64),
            KeysetField::new("active", true),
            KeysetField::new("deleted_at", FilterValue::Null),
            KeysetField::new("id", 42_i64),
        ]);
        let cursor = encode_cursor(&payload).unwrap();
        let decoded: KeysetCursorPayload = decode_cursor(&cursor).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(
            decoded.field_names().collect::<Vec<_>>(),
            vec!["name", "score", "active", "deleted_at", "id"]
        );
    }

    #[test]
    fn test_keyset_payload_wrong_type_rejected() {
        let cursor = STANDARD.encode(r#"{"type":"offset","fields":[]}"#);
        let err = decode_cursor::<KeysetCursorPayload>(&cursor).unwrap_err();
        assert!(matches!(err, Error::InvalidCursor(_)));
    }

    #[test]
    fn test_keyset_payload_missing_type_rejected() {
        let cursor = STANDARD.encode(r#"{"fields":[{"field":"id","value":1}]}"#);
        assert!(decode_cursor::<KeysetCursorPayload>(&cursor).is_err());
    }

    #[test]
    fn test_decode_cursor_malformed_json() {
        let cursor = STANDARD.encode("{not json");
        assert!(matches!(
            decode_cursor::<KeysetCursorPayload>(&cursor),
            Err(Error::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_decode_cursor_not_base64() {
        assert!(matches!(
            decode_cursor::<KeysetCursorPayload>("not a cursor!"),
            Err(Error::InvalidCursor(_))
        ));
    }

    #[test]
    fn test_offset_cursor_is_not_a_keyset_cursor() {
        let cursor = encode_offset_cursor(4);
        assert!(decode_cursor::<KeysetCursorPayload>(&cursor).is_err());
    }
}
