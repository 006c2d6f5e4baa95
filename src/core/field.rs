//! Field values carried by projected records

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One value of a projected field
///
/// This is the value side of a [`ProjectedRecord`](crate::core::ProjectedRecord):
/// every accessor of a shapeable resource produces one of these, so the
/// serialized output stays uniform whatever the source field type was.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    DateTime(DateTime<Utc>),
    Object(IndexMap<String, FieldValue>),
    Null,
}

impl FieldValue {
    /// Borrowed text, for `String` values only
    pub fn as_str(&self) -> Option<&str> {
        if let FieldValue::String(s) = self { Some(s) } else { None }
    }

    pub fn as_integer(&self) -> Option<i64> {
        if let FieldValue::Integer(i) = self { Some(*i) } else { None }
    }

    /// Nested fields of an `Object` value
    pub fn as_object(&self) -> Option<&IndexMap<String, FieldValue>> {
        if let FieldValue::Object(map) = self { Some(map) } else { None }
    }

    pub fn is_null(&self) -> bool {
        *self == FieldValue::Null
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<Uuid> for FieldValue {
    fn from(value: Uuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::DateTime(value)
    }
}

impl From<IndexMap<String, FieldValue>> for FieldValue {
    fn from(value: IndexMap<String, FieldValue>) -> Self {
        FieldValue::Object(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}
