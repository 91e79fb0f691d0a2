//! Filter groups
//!
//! The `filters` parameter is a JSON array of groups. Each group holds an
//! ordered list of conditions combined with AND, or with OR when the group's
//! `or` flag is set. Groups themselves are always AND-combined.
//!
//! ```json
//! [
//!   { "filters": [{ "field": "status", "operator": "eq", "value": "published" }] },
//!   { "or": true, "filters": [
//!       { "field": "views", "operator": "gt", "value": 100 },
//!       { "field": "pinned", "operator": "eq", "value": true, "not": true }
//!   ] }
//! ]
//! ```
//!
//! Conditions are not interpreted here. Field, operator and value are carried
//! as given, including when absent, for the downstream query builder.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ParseError;
use crate::raw;

const PARAMETER: &str = "filters";

/// A single `field operator value` condition
///
/// # Example
///
/// ```rust
/// use paro::FilterCondition;
/// use serde_json::json;
///
/// let condition = FilterCondition::new("status", "eq", json!("draft")).negated();
/// assert!(condition.not);
/// assert_eq!(condition.field.as_deref(), Some("status"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// Field the condition applies to
    #[serde(default, alias = "key", skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Operator name, e.g. `eq`, `gt`, `in`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,

    /// Operand, `null` when the entry carried none
    #[serde(default)]
    pub value: Value,

    /// Negates the condition
    #[serde(default, deserialize_with = "raw::null_as_default")]
    pub not: bool,

    /// Keys of the raw entry this crate does not interpret
    #[serde(flatten, default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

impl FilterCondition {
    /// Create a non-negated condition
    pub fn new(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        Self {
            field: Some(field.into()),
            operator: Some(operator.into()),
            value,
            not: false,
            extra: Map::new(),
        }
    }

    /// Negate the condition
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.not = true;
        self
    }
}

/// Conditions combined by AND, or by OR when `or` is set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FilterGroup {
    /// Conditions in evaluation order
    #[serde(rename = "filters")]
    pub conditions: Vec<FilterCondition>,

    /// Combine conditions with OR instead of AND
    #[serde(default, deserialize_with = "raw::null_as_default")]
    pub or: bool,
}

impl FilterGroup {
    /// Create an AND group
    pub fn new(conditions: Vec<FilterCondition>) -> Self {
        Self {
            conditions,
            or: false,
        }
    }

    /// Set whether conditions are OR-combined
    #[must_use]
    pub fn with_or(mut self, or: bool) -> Self {
        self.or = or;
        self
    }
}

/// Parse raw filter groups, preserving group and condition order
///
/// # Errors
///
/// - [`ParseError::MissingKey`] when a group has no `filters` key
/// - [`ParseError::MalformedParameter`] when an entry has the wrong JSON type
pub fn parse_filters(raw_groups: &[Value]) -> Result<Vec<FilterGroup>, ParseError> {
    raw_groups.iter().map(parse_group).collect()
}

fn parse_group(value: &Value) -> Result<FilterGroup, ParseError> {
    if !raw::has_key(value, "filters") {
        return Err(ParseError::missing_key("filters"));
    }
    raw::decode(value, PARAMETER)
}
