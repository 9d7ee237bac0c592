//! Required-field checks for JSON objects.

use serde_json::{Map, Value};
use thiserror::Error;

/// One or more required fields were absent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required fields: {}", .0.join(", "))]
pub struct MissingFields(pub Vec<String>);

/// Require every key in `keys` to be present in `object`.
///
/// Only key presence is checked: a key holding `null` counts as present.
pub fn require_fields(object: &Map<String, Value>, keys: &[&str]) -> Result<(), MissingFields> {
    let missing: Vec<String> = keys
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| key.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(MissingFields(missing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_require_fields_present() {
        let body = object(json!({"from": "15551234567", "text": "hello"}));
        assert!(require_fields(&body, &["from", "text"]).is_ok());
    }

    #[test]
    fn test_require_fields_null_counts_as_present() {
        let body = object(json!({"from": "15551234567", "text": null}));
        assert!(require_fields(&body, &["from", "text"]).is_ok());
    }

    #[test]
    fn test_require_fields_names_missing_in_order() {
        let body = object(json!({"status": "delivered"}));
        let err = require_fields(&body, &["from", "text"]).unwrap_err();

        assert_eq!(err, MissingFields(vec!["from".into(), "text".into()]));
        assert_eq!(err.to_string(), "Missing required fields: from, text");
    }
}
