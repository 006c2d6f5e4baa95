//! Projected records produced by the shaper

use crate::core::field::FieldValue;
use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

/// An insertion-ordered map from field name to value
///
/// Each record owns its fields; two records produced by the same shaping call
/// share nothing. Serializes as a plain JSON object, keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProjectedRecord(IndexMap<String, FieldValue>);

impl ProjectedRecord {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Insert a field, keeping the first value if the name is already present
    ///
    /// Returns `false` when the field was already set.
    pub(crate) fn insert_once(&mut self, name: &str, value: FieldValue) -> bool {
        match self.0.entry(name.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(value);
                true
            }
        }
    }

    /// Get a field by its canonical name
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Field names in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, FieldValue> {
        self.0
    }
}

impl IntoIterator for ProjectedRecord {
    type Item = (String, FieldValue);
    type IntoIter = indexmap::map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_once_keeps_first_value() {
        let mut record = ProjectedRecord::new();
        assert!(record.insert_once("Id", FieldValue::from(1_i64)));
        assert!(!record.insert_once("Id", FieldValue::from(2_i64)));
        assert_eq!(record.get("Id"), Some(&FieldValue::Integer(1)));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let mut record = ProjectedRecord::with_capacity(2);
        record.insert_once("Name", FieldValue::from("Berry Griffin Beard"));
        record.insert_once("Age", FieldValue::from(39_i64));
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Name":"Berry Griffin Beard","Age":39}"#);
    }

    #[test]
    fn test_keys_follow_insertion_order() {
        let mut record = ProjectedRecord::new();
        record.insert_once("b", FieldValue::Null);
        record.insert_once("a", FieldValue::Null);
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert!(record.contains("a"));
        assert!(!record.is_empty());
    }
}
