//! Decoding of untyped JSON entries
//!
//! Entries are decoded through their serde derives; decode failures become
//! [`ParseError::MalformedParameter`] naming the offending parameter.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ParseError;

/// Decode `value` into `T`, reporting failures against `parameter`.
pub(crate) fn decode<T: DeserializeOwned>(
    value: &Value,
    parameter: &str,
) -> Result<T, ParseError> {
    T::deserialize(value).map_err(|e| ParseError::malformed(parameter, e.to_string()))
}

/// Check that `value` is an object holding a non-null `key`.
///
/// Non-objects are left for [`decode`] to reject.
pub(crate) fn has_key(value: &Value, key: &str) -> bool {
    match value {
        Value::Object(entry) => entry.get(key).is_some_and(|v| !v.is_null()),
        _ => true,
    }
}

/// Deserialize `null` the same as an absent key.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Drop repeats, keeping first-seen order.
pub(crate) fn dedup(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Flag {
        #[serde(default, deserialize_with = "null_as_default")]
        on: bool,
    }

    #[test]
    fn test_null_counts_as_absent() {
        let flag: Flag = decode(&json!({ "on": null }), "filters").unwrap();
        assert!(!flag.on);
        let flag: Flag = decode(&json!({}), "filters").unwrap();
        assert!(!flag.on);
        let flag: Flag = decode(&json!({ "on": true }), "filters").unwrap();
        assert!(flag.on);
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let err = decode::<Flag>(&json!({ "on": "yes" }), "filters").unwrap_err();
        assert!(matches!(err, ParseError::MalformedParameter { ref parameter, .. } if parameter == "filters"));
    }

    #[test]
    fn test_has_key() {
        assert!(has_key(&json!({ "filters": [] }), "filters"));
        assert!(!has_key(&json!({ "filters": null }), "filters"));
        assert!(!has_key(&json!({ "or": true }), "filters"));
        assert!(has_key(&json!("not an object"), "filters"));
    }

    #[test]
    fn test_dedup_keeps_order() {
        let items = vec!["title".to_string(), "id".to_string(), "title".to_string()];
        assert_eq!(dedup(items), vec!["title".to_string(), "id".to_string()]);
    }
}
