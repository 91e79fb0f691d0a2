//! Sort keys
//!
//! The `sort` parameter is a JSON array of `{"field": ..., "direction": ...}`
//! objects applied in order. Direction defaults to ascending; any other value
//! is passed through unchanged unless strict parsing is on.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::raw;

const PARAMETER: &str = "sort";

/// Sort direction
///
/// Only the exact strings `asc` and `desc` map to the named variants. Any other
/// string, including `"DESC"`, is kept verbatim in [`Other`].
///
/// [`Other`]: SortDirection::Other
///
/// # Example
///
/// ```rust
/// use paro::SortDirection;
///
/// assert_eq!(SortDirection::from("desc".to_string()), SortDirection::Desc);
/// assert_eq!(SortDirection::from("DESC".to_string()).to_string(), "DESC");
/// assert_eq!(SortDirection::default().to_string(), "asc");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SortDirection {
    /// Sort in ascending order (A-Z, 0-9, oldest first)
    #[default]
    Asc,
    /// Sort in descending order (Z-A, 9-0, newest first)
    Desc,
    /// Unrecognized direction, passed through unchanged
    Other(String),
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
            Self::Other(direction) => write!(f, "{direction}"),
        }
    }
}

impl From<String> for SortDirection {
    fn from(direction: String) -> Self {
        match direction.as_str() {
            "asc" => Self::Asc,
            "desc" => Self::Desc,
            _ => Self::Other(direction),
        }
    }
}

impl From<SortDirection> for String {
    fn from(direction: SortDirection) -> Self {
        direction.to_string()
    }
}

impl SortDirection {
    /// Convert to SQL ORDER BY clause fragment, `None` for unrecognized directions
    #[must_use]
    pub fn as_sql(&self) -> Option<&'static str> {
        match self {
            Self::Asc => Some("ASC"),
            Self::Desc => Some("DESC"),
            Self::Other(_) => None,
        }
    }

    /// Check whether this is `asc` or `desc`
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Fold case-insensitive `asc`/`desc` into the named variants
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn normalized(&self) -> Option<Self> {
        match self {
            Self::Other(direction) if direction.eq_ignore_ascii_case("asc") => Some(Self::Asc),
            Self::Other(direction) if direction.eq_ignore_ascii_case("desc") => Some(Self::Desc),
            Self::Other(_) => None,
            known => Some(known.clone()),
        }
    }
}

/// One sort key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    /// Field to sort by
    #[serde(default, alias = "key", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Sort direction
    #[serde(default, deserialize_with = "raw::null_as_default")]
    pub direction: SortDirection,

    /// Keys of the raw entry this crate does not interpret
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl SortKey {
    /// Sort ascending by `field`
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            direction: SortDirection::Asc,
            extra: Map::new(),
        }
    }

    /// Sort descending by `field`
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            direction: SortDirection::Desc,
            ..Self::asc(field)
        }
    }
}

/// Parse raw sort entries, defaulting direction to ascending
///
/// Field and direction are passed through as given. With `strict` set,
/// directions are folded case-insensitively to `asc`/`desc` and anything else
/// is rejected.
///
/// # Errors
///
/// - [`ParseError::MalformedParameter`] when an entry has the wrong JSON type
/// - [`ParseError::InvalidValue`] for an unrecognized direction in strict mode
pub fn parse_sort(raw_sort: &[Value], strict: bool) -> Result<Vec<SortKey>, ParseError> {
    raw_sort
        .iter()
        .map(|value| parse_key(value, strict))
        .collect()
}

fn parse_key(value: &Value, strict: bool) -> Result<SortKey, ParseError> {
    let mut key: SortKey = raw::decode(value, PARAMETER)?;

    if strict {
        key.direction = key
            .direction
            .normalized()
            .ok_or_else(|| ParseError::invalid_value(PARAMETER, key.direction.to_string()))?;
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entries(value: Value) -> Vec<Value> {
        value.as_array().cloned().unwrap()
    }

    #[test]
    fn test_sort_direction_display() {
        assert_eq!(format!("{}", SortDirection::Asc), "asc");
        assert_eq!(format!("{}", SortDirection::Desc), "desc");
        assert_eq!(format!("{}", SortDirection::Other("random".into())), "random");
    }

    #[test]
    fn test_sort_direction_as_sql() {
        assert_eq!(SortDirection::Asc.as_sql(), Some("ASC"));
        assert_eq!(SortDirection::Desc.as_sql(), Some("DESC"));
        assert_eq!(SortDirection::Other("up".into()).as_sql(), None);
    }

    #[test]
    fn test_direction_defaults_to_asc() {
        let parsed = parse_sort(&entries(json!([{ "field": "name" }])), false).unwrap();
        assert_eq!(parsed, vec![SortKey::asc("name")]);
    }

    #[test]
    fn test_direction_passes_through() {
        let parsed = parse_sort(
            &entries(json!([{ "field": "name", "direction": "desc" }])),
            false,
        )
        .unwrap();
        assert_eq!(parsed, vec![SortKey::desc("name")]);
    }

    #[test]
    fn test_order_is_preserved() {
        let raw = entries(json!([
            { "field": "created_at", "direction": "desc" },
            { "key": "title" }
        ]));
        let parsed = parse_sort(&raw, false).unwrap();
        assert_eq!(parsed, vec![SortKey::desc("created_at"), SortKey::asc("title")]);
    }

    #[test]
    fn test_unknown_direction_kept_when_permissive() {
        let raw = entries(json!([{ "field": "name", "direction": "sideways" }]));
        let parsed = parse_sort(&raw, false).unwrap();
        assert_eq!(parsed[0].direction, SortDirection::Other("sideways".into()));
        assert!(!parsed[0].direction.is_recognized());
    }

    #[test]
    fn test_unknown_direction_rejected_when_strict() {
        let raw = entries(json!([{ "field": "name", "direction": "sideways" }]));
        let err = parse_sort(&raw, true).unwrap_err();
        assert_eq!(err, ParseError::invalid_value("sort", "sideways"));

        let raw = entries(json!([
            { "field": "name", "direction": "DESC" },
            { "field": "id", "direction": "Asc" }
        ]));
        assert_eq!(
            parse_sort(&raw, true).unwrap(),
            vec![SortKey::desc("name"), SortKey::asc("id")]
        );
    }

    #[test]
    fn test_direction_case_is_kept_when_permissive() {
        let raw = entries(json!([
            { "field": "name", "direction": "DESC" },
            { "field": "id", "direction": "Asc" }
        ]));
        let parsed = parse_sort(&raw, false).unwrap();
        assert_eq!(parsed[0].direction, SortDirection::Other("DESC".into()));
        assert_eq!(parsed[1].direction, SortDirection::Other("Asc".into()));

        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(
            value,
            json!([
                { "field": "name", "direction": "DESC" },
                { "field": "id", "direction": "Asc" }
            ])
        );
    }

    #[test]
    fn test_entry_without_field_passes_through() {
        let parsed = parse_sort(&entries(json!([{ "direction": "desc" }, {}])), false).unwrap();
        assert_eq!(parsed[0].field, None);
        assert_eq!(parsed[0].direction, SortDirection::Desc);
        assert_eq!(parsed[1].field, None);
        assert_eq!(parsed[1].direction, SortDirection::Asc);
    }

    #[test]
    fn test_null_direction_defaults_to_asc() {
        let parsed =
            parse_sort(&entries(json!([{ "field": "name", "direction": null }])), false).unwrap();
        assert_eq!(parsed, vec![SortKey::asc("name")]);
    }

    #[test]
    fn test_entry_must_be_object() {
        let err = parse_sort(&entries(json!(["name"])), false).unwrap_err();
        assert!(matches!(err, ParseError::MalformedParameter { .. }));
    }

    #[test]
    fn test_extra_keys_are_carried() {
        let raw = entries(json!([{ "field": "name", "nulls": "last" }]));
        let parsed = parse_sort(&raw, false).unwrap();
        assert_eq!(parsed[0].extra["nulls"], json!("last"));
    }

    #[test]
    fn test_sort_direction_serde() {
        let desc: SortDirection = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(desc, SortDirection::Desc);
        assert_eq!(serde_json::to_string(&SortDirection::Asc).unwrap(), "\"asc\"");
        assert_eq!(
            serde_json::to_string(&SortDirection::Other("up".into())).unwrap(),
            "\"up\""
        );
    }
}
