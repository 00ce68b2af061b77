//! FILENAME: inventory-model/src/schema.rs
//! Declared field types per page.
//!
//! Each console page (reserved inventory, APS assignments, proposal summary)
//! declares the types of the fields it exposes for filtering, sorting and
//! grouping. The engine consults this schema instead of sniffing values, so
//! the three pages diverge only in configuration.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldType {
    /// Free text; string operators apply.
    Text,
    /// Numeric; comparison operators apply and sorting is numeric.
    Number,
    /// Calendar date; groups by catorcena (fixed 14-day fiscal sub-period).
    Date,
}

/// Field-name → declared-type map for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    types: HashMap<String, FieldType>,
}

impl Schema {
    pub fn new() -> Self {
        Schema::default()
    }

    pub fn with_field(mut self, name: &str, field_type: FieldType) -> Self {
        self.types.insert(name.to_string(), field_type);
        self
    }

    pub fn declare(&mut self, name: &str, field_type: FieldType) {
        self.types.insert(name.to_string(), field_type);
    }

    /// Declared type of a field, or `None` if the page never declared it.
    pub fn field_type(&self, name: &str) -> Option<FieldType> {
        self.types.get(name).copied()
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.field_type(name) == Some(FieldType::Number)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_lookup() {
        let schema = Schema::new()
            .with_field("plaza", FieldType::Text)
            .with_field("caras_totales", FieldType::Number)
            .with_field("fecha_inicio", FieldType::Date);

        assert_eq!(schema.field_type("plaza"), Some(FieldType::Text));
        assert!(schema.is_numeric("caras_totales"));
        assert!(!schema.is_numeric("plaza"));
        assert_eq!(schema.field_type("desconocido"), None);
    }
}
