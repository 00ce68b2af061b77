//! FILENAME: inventory-model/src/record.rs
//! Records and record identifiers.
//!
//! A record is one inventory/billing line being browsed. Records are created
//! by the page's fetch layer, never mutated by the engine, and replaced
//! wholesale on refetch.

use std::collections::HashMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use crate::value::FieldValue;

/// Stable identifier for a record, unique within one fetched collection.
/// The API uses numeric ids for inventory rows and string ids for derived
/// summary rows, so both shapes are first-class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId::Text(s)
    }
}

/// One flat row: a stable id plus an opaque field-name → scalar mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    fields: HashMap<String, FieldValue>,
}

const EMPTY: FieldValue = FieldValue::Empty;

impl Record {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Record {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Builder-style field assignment, used heavily by fixtures and by the
    /// fetch layer when flattening API rows.
    pub fn with_field(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.to_string(), value.into());
        self
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.fields.insert(name.to_string(), value.into());
    }

    /// Field lookup that never fails: absent fields read as `Empty`, which
    /// downstream stages already treat as missing.
    pub fn field(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&EMPTY)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(|k| k.as_str())
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_field_reads_as_empty() {
        let record = Record::new(1).with_field("plaza", "Guadalajara");
        assert_eq!(record.field("plaza"), &FieldValue::Text("Guadalajara".to_string()));
        assert_eq!(record.field("no_such_field"), &FieldValue::Empty);
    }

    #[test]
    fn test_record_id_shapes() {
        let numeric = Record::new(42);
        let textual = Record::new("prop-42-a");
        assert_eq!(numeric.id, RecordId::Int(42));
        assert_eq!(textual.id, RecordId::Text("prop-42-a".to_string()));
        assert_eq!(format!("{}", numeric.id), "42");
    }

    #[test]
    fn test_record_id_untagged_serde() {
        let id: RecordId = serde_json::from_str("42").unwrap();
        assert_eq!(id, RecordId::Int(42));
        let id: RecordId = serde_json::from_str("\"prop-42\"").unwrap();
        assert_eq!(id, RecordId::Text("prop-42".to_string()));
    }
}
