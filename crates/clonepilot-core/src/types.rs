use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::EngineError;

/// A validated, flat field map produced by classification
///
/// Classifier replies arrive as one JSON object whose values are strings,
/// booleans, or lists of strings. States read individual fields through the
/// tolerant accessors below: an absent field reads as empty or `false`, so a
/// state never has to guard against a missing key.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Payload {
    fields: serde_json::Map<String, Value>,
}

impl Payload {
    /// Create an empty payload
    #[inline]
    pub fn new() -> Self {
        Self {
            fields: serde_json::Map::new(),
        }
    }

    /// Build a payload from a JSON value, rejecting anything but an object
    pub fn from_value(value: Value) -> Result<Self, EngineError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(EngineError::MalformedPayload(format!(
                "expected an object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Set a field, replacing any previous value
    pub fn set(&mut self, field: &str, value: Value) {
        self.fields.insert(field.to_string(), value);
    }

    /// Builder-style variant of [`Payload::set`]
    #[must_use]
    pub fn with(mut self, field: &str, value: Value) -> Self {
        self.set(field, value);
        self
    }

    /// Read a field as a string slice
    #[inline]
    pub fn text(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    /// Read a field as a trimmed string, empty when absent or non-textual
    pub fn text_or_empty(&self, field: &str) -> String {
        self.text(field).map(|s| s.trim().to_string()).unwrap_or_default()
    }

    /// Read a field as a boolean
    ///
    /// Accepts JSON `true` as well as the strings "true" and "yes" in any
    /// casing; everything else (including an absent field) reads as `false`.
    pub fn flag(&self, field: &str) -> bool {
        match self.fields.get(field) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => {
                let s = s.trim().to_lowercase();
                s == "true" || s == "yes"
            }
            _ => false,
        }
    }

    /// Read a field as a list of strings, empty when absent
    pub fn items(&self, field: &str) -> Vec<String> {
        match self.fields.get(field) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(|s| s.to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Check whether a field is present
    #[inline]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Check whether the payload carries no fields
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Borrow the underlying field map
    #[inline]
    pub fn as_map(&self) -> &serde_json::Map<String, Value> {
        &self.fields
    }
}

impl From<serde_json::Map<String, Value>> for Payload {
    fn from(fields: serde_json::Map<String, Value>) -> Self {
        Self { fields }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_accepts_object() {
        let payload = Payload::from_value(json!({"Status": "proceed"})).unwrap();
        assert_eq!(payload.text("Status"), Some("proceed"));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let err = Payload::from_value(json!(["a", "b"])).unwrap_err();
        match err {
            EngineError::MalformedPayload(msg) => assert!(msg.contains("an array")),
            _ => panic!("Expected MalformedPayload variant"),
        }
    }

    #[test]
    fn test_absent_field_reads_as_empty() {
        let payload = Payload::new();
        assert_eq!(payload.text("Target gene"), None);
        assert_eq!(payload.text_or_empty("Target gene"), "");
        assert!(!payload.flag("Has exact sequence"));
        assert!(payload.items("Suggested variants").is_empty());
    }

    #[test]
    fn test_flag_accepts_yes_and_true() {
        let payload = Payload::new()
            .with("a", json!("yes"))
            .with("b", json!("Yes"))
            .with("c", json!("TRUE"))
            .with("d", json!(true))
            .with("e", json!("no"))
            .with("f", json!("maybe"));

        assert!(payload.flag("a"));
        assert!(payload.flag("b"));
        assert!(payload.flag("c"));
        assert!(payload.flag("d"));
        assert!(!payload.flag("e"));
        assert!(!payload.flag("f"));
    }

    #[test]
    fn test_text_or_empty_trims() {
        let payload = Payload::new().with("BackboneName", json!("  pcDNA3.1(+)  "));
        assert_eq!(payload.text_or_empty("BackboneName"), "pcDNA3.1(+)");
    }

    #[test]
    fn test_items_filters_non_strings() {
        let payload = Payload::new().with("Suggested variants", json!(["GFP", 42, "eGFP"]));
        assert_eq!(payload.items("Suggested variants"), vec!["GFP", "eGFP"]);
    }

    #[test]
    fn test_set_replaces_value() {
        let mut payload = Payload::new();
        payload.set("Status", json!("modify"));
        payload.set("Status", json!("proceed"));
        assert_eq!(payload.text("Status"), Some("proceed"));
    }

    #[test]
    fn test_serialization_is_transparent() {
        let payload = Payload::new().with("Choice", json!("CURATED"));
        let serialized = serde_json::to_string(&payload).unwrap();
        assert_eq!(serialized, r#"{"Choice":"CURATED"}"#);

        let deserialized: Payload = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, payload);
    }
}
