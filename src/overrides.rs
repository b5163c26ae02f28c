//! Override documents for section visibility and ordering
//!
//! Each document is a flat key → value map persisted wholesale under a fixed
//! identifier, independent of the other. Absence of a key means "use the
//! catalog default". Decoding is lenient by design: a fetched document may
//! come from a newer deployment with keys or value shapes we do not know, and
//! must never crash an older client. Bad entries are dropped with a warning.

use std::collections::HashMap;

use serde_json::{Map, Number, Value};
use tracing::warn;

/// Section key → visibility override
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibilityOverrides {
    entries: HashMap<String, bool>,
}

impl VisibilityOverrides {
    /// Decode from a fetched document value, dropping malformed entries.
    /// Anything that is not a JSON object degrades to an empty mapping.
    pub fn from_value(value: &Value) -> Self {
        let mut entries = HashMap::new();
        match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    match entry.as_bool() {
                        Some(visible) => {
                            entries.insert(key.clone(), visible);
                        }
                        None => {
                            warn!(key = %key, value = %entry, "Ignoring non-boolean visibility entry");
                        }
                    }
                }
            }
            Value::Null => {}
            other => {
                warn!(value = %other, "Visibility document is not an object, treating as empty");
            }
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<bool> {
        self.entries.get(key).copied()
    }

    /// Merge a single override into a copy of this document.
    /// Replace-on-write contract: the caller persists the returned document
    /// wholesale, so foreign keys already present are carried along untouched.
    pub fn with(&self, key: &str, visible: bool) -> Self {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), visible);
        Self { entries }
    }

    /// Encode as the JSON document submitted to the config store
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (key, visible) in &self.entries {
            map.insert(key.clone(), Value::Bool(*visible));
        }
        Value::Object(map)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Section key → order override
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderOverrides {
    entries: HashMap<String, f64>,
}

impl OrderOverrides {
    /// Decode from a fetched document value, dropping malformed entries
    pub fn from_value(value: &Value) -> Self {
        let mut entries = HashMap::new();
        match value {
            Value::Object(map) => {
                for (key, entry) in map {
                    match entry.as_f64() {
                        Some(order) if order.is_finite() => {
                            entries.insert(key.clone(), order);
                        }
                        _ => {
                            warn!(key = %key, value = %entry, "Ignoring non-numeric order entry");
                        }
                    }
                }
            }
            Value::Null => {}
            other => {
                warn!(value = %other, "Order document is not an object, treating as empty");
            }
        }
        Self { entries }
    }

    /// Build a complete document from an ordered key sequence, assigning
    /// dense zero-based integer positions
    pub fn from_dense_sequence<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        let entries = keys
            .into_iter()
            .enumerate()
            .map(|(index, key)| (key.to_string(), index as f64))
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.get(key).copied()
    }

    pub fn set(&mut self, key: &str, order: f64) {
        self.entries.insert(key.to_string(), order);
    }

    /// Encode as the JSON document submitted to the config store.
    /// Whole positions are written as integers so a densely reindexed
    /// document reads `{"about": 0}` rather than `{"about": 0.0}`.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        for (key, order) in &self.entries {
            let number = if order.fract() == 0.0 {
                Number::from(*order as i64)
            } else {
                match Number::from_f64(*order) {
                    Some(number) => number,
                    None => continue, // entries are checked finite on the way in
                }
            };
            map.insert(key.clone(), Value::Number(number));
        }
        Value::Object(map)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_visibility_decode_drops_bad_entries() {
        let doc = json!({"about": false, "faq": "yes", "services": 1});
        let overrides = VisibilityOverrides::from_value(&doc);
        assert_eq!(overrides.get("about"), Some(false));
        assert_eq!(overrides.get("faq"), None);
        assert_eq!(overrides.get("services"), None);
    }

    #[test]
    fn test_visibility_decode_non_object() {
        let overrides = VisibilityOverrides::from_value(&json!([1, 2, 3]));
        assert!(overrides.is_empty());
        let overrides = VisibilityOverrides::from_value(&Value::Null);
        assert!(overrides.is_empty());
    }

    #[test]
    fn test_visibility_merge_preserves_foreign_keys() {
        // A newer deployment may have written keys we do not know about;
        // a local merge-then-write must not lose them.
        let doc = json!({"hero": true, "some-future-section": false});
        let overrides = VisibilityOverrides::from_value(&doc);
        let merged = overrides.with("hero", false);
        let value = merged.to_value();
        assert_eq!(value["hero"], json!(false));
        assert_eq!(value["some-future-section"], json!(false));
    }

    #[test]
    fn test_order_decode_accepts_fractions() {
        let doc = json!({"photo-carousel": 3.5, "faq": -1, "bad": "first"});
        let overrides = OrderOverrides::from_value(&doc);
        assert_eq!(overrides.get("photo-carousel"), Some(3.5));
        assert_eq!(overrides.get("faq"), Some(-1.0));
        assert_eq!(overrides.get("bad"), None);
    }

    #[test]
    fn test_order_dense_sequence() {
        let overrides = OrderOverrides::from_dense_sequence(["b", "c", "a"]);
        assert_eq!(overrides.get("b"), Some(0.0));
        assert_eq!(overrides.get("c"), Some(1.0));
        assert_eq!(overrides.get("a"), Some(2.0));
    }

    #[test]
    fn test_order_encodes_whole_positions_as_integers() {
        let overrides = OrderOverrides::from_dense_sequence(["a", "b"]);
        let value = overrides.to_value();
        assert_eq!(value.to_string().contains("0.0"), false);
        assert_eq!(value["a"], json!(0));
        assert_eq!(value["b"], json!(1));
    }

    #[test]
    fn test_order_roundtrip() {
        let mut overrides = OrderOverrides::default();
        overrides.set("faq", -1.0);
        overrides.set("photo-carousel", 3.5);
        let decoded = OrderOverrides::from_value(&overrides.to_value());
        assert_eq!(decoded, overrides);
    }
}
