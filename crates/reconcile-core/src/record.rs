//! Attribute records
//!
//! A record maps attribute names to values for one side (desired or current)
//! of one object. A name missing from the record is absent. Records are built
//! once and then only read; transformations return new records.

use crate::value::{AttributeValue, ScalarValue, SetValue, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

static ABSENT_SCALAR: ScalarValue = Value::Absent;
static ABSENT_SET: SetValue = Value::Absent;

/// Named attribute values of one object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeRecord {
    values: BTreeMap<String, AttributeValue>,
}

impl AttributeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a record with `name` set to `value`
    pub fn with(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.values.insert(name.into(), value);
        self
    }

    /// Return a record without `name`
    pub fn without(mut self, name: &str) -> Self {
        self.values.remove(name);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttributeValue> {
        self.values.get(name)
    }

    /// Scalar value of `name`; missing or set-shaped values read as absent
    pub fn scalar(&self, name: &str) -> &ScalarValue {
        self.values
            .get(name)
            .and_then(AttributeValue::as_scalar)
            .unwrap_or(&ABSENT_SCALAR)
    }

    /// Set value of `name`; missing or scalar-shaped values read as absent
    pub fn set(&self, name: &str) -> &SetValue {
        self.values
            .get(name)
            .and_then(AttributeValue::as_set)
            .unwrap_or(&ABSENT_SET)
    }

    /// True when `name` is missing or explicitly absent
    pub fn is_absent(&self, name: &str) -> bool {
        self.values.get(name).map_or(true, AttributeValue::is_absent)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AttributeValue)> for AttributeRecord {
    fn from_iter<I: IntoIterator<Item = (K, AttributeValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reads_as_absent() {
        let record = AttributeRecord::new();
        assert!(record.scalar("description").is_absent());
        assert!(record.set("any_included").is_absent());
        assert!(record.is_absent("description"));
    }

    #[test]
    fn test_shape_mismatch_reads_as_absent() {
        let record = AttributeRecord::new()
            .with("description", AttributeValue::set(["x"]))
            .with("any_included", AttributeValue::scalar("y"));
        assert!(record.scalar("description").is_absent());
        assert!(record.set("any_included").is_absent());
    }

    #[test]
    fn test_with_replaces_and_without_removes() {
        let record = AttributeRecord::new()
            .with("description", AttributeValue::scalar("a"))
            .with("description", AttributeValue::scalar("b"));
        assert_eq!(record.scalar("description"), &ScalarValue::scalar("b"));
        assert_eq!(record.len(), 1);

        let record = record.without("description");
        assert!(record.is_empty());
    }

    #[test]
    fn test_explicit_absent_entry_is_absent() {
        let record =
            AttributeRecord::new().with("description", AttributeValue::Scalar(Value::Absent));
        assert!(record.contains("description"));
        assert!(record.is_absent("description"));
    }
}
