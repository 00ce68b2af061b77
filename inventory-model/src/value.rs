//! FILENAME: inventory-model/src/value.rs
//! Scalar field values.
//!
//! Records are opaque maps from field name to one of these scalars. The REST
//! layer deserializes JSON rows directly into them, so the enum is untagged:
//! a JSON number becomes `Number`, a string becomes `Text`, `null` becomes
//! `Empty`.

use serde::{Deserialize, Serialize};

/// One scalar value inside a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Empty,
}

impl FieldValue {
    /// Whether this value counts as missing for filter and sort purposes.
    /// Empty strings are missing: the API serializes absent optional fields
    /// as `""` about as often as it serializes them as `null`.
    pub fn is_missing(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(_) => false,
        }
    }

    /// Coerces the value to a number for numeric comparison.
    ///
    /// Non-numeric text coerces to NaN, and every comparison against NaN is
    /// `false`. That silently fails numeric filters on text garbage instead
    /// of raising; the behavior is a documented policy, not an accident.
    pub fn coerce_number(&self) -> f64 {
        match self {
            FieldValue::Number(n) => *n,
            FieldValue::Text(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
            FieldValue::Empty => f64::NAN,
        }
    }

    /// Display string for this value. Formatting and grouping identity are
    /// the same function: two values group together iff they format equal.
    pub fn display_string(&self) -> String {
        match self {
            FieldValue::Number(n) => format!("{}", n),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Empty => String::new(),
        }
    }

    /// Borrowed text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Number(n as f64)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => FieldValue::Empty,
        }
    }
}
