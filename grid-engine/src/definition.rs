//! FILENAME: grid-engine/src/definition.rs
//! Grid Definition - The serializable configuration.
//!
//! This module contains the types that DESCRIBE one grid view. These
//! structures are designed to be:
//! - Serializable (page state persists across navigation)
//! - Immutable snapshots of user intent
//!
//! `GridConfig` is the per-page parametrization; `GridDefinition` is the
//! per-render input the user edits through the filter bar, sort headers and
//! grouping toggles.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use inventory_model::{FieldType, Schema};

// ============================================================================
// FILTER CONDITIONS
// ============================================================================

/// Typed filter operator. The filter bar sends the operator as a symbol
/// string; `parse` maps it onto this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterOperator {
    Eq,
    Ne,
    Contains,
    NotContains,
    Gt,
    Lt,
    Ge,
    Le,
}

impl FilterOperator {
    /// Parses the filter bar's symbol form. Unknown symbols yield `None`;
    /// the caller drops the condition so it filters nothing (a no-op filter,
    /// never an error).
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "=" => Some(FilterOperator::Eq),
            "!=" => Some(FilterOperator::Ne),
            "contains" => Some(FilterOperator::Contains),
            "not_contains" => Some(FilterOperator::NotContains),
            ">" => Some(FilterOperator::Gt),
            "<" => Some(FilterOperator::Lt),
            ">=" => Some(FilterOperator::Ge),
            "<=" => Some(FilterOperator::Le),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "=",
            FilterOperator::Ne => "!=",
            FilterOperator::Contains => "contains",
            FilterOperator::NotContains => "not_contains",
            FilterOperator::Gt => ">",
            FilterOperator::Lt => "<",
            FilterOperator::Ge => ">=",
            FilterOperator::Le => "<=",
        }
    }

    /// Comparison operators that coerce both sides numerically.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            FilterOperator::Gt | FilterOperator::Lt | FilterOperator::Ge | FilterOperator::Le
        )
    }

    /// Substring operators, legal only on text fields.
    pub fn is_text(&self) -> bool {
        matches!(self, FilterOperator::Contains | FilterOperator::NotContains)
    }

    /// Negative operators are the only ones a missing value satisfies.
    pub fn is_negative(&self) -> bool {
        matches!(self, FilterOperator::Ne | FilterOperator::NotContains)
    }

    /// Whether this operator is legal on a field of the given declared type.
    /// `=`/`!=` apply to everything; numeric comparisons need a numeric
    /// field; substring operators need text.
    pub fn legal_for(&self, field_type: FieldType) -> bool {
        if self.is_numeric() {
            field_type == FieldType::Number
        } else if self.is_text() {
            field_type == FieldType::Text
        } else {
            true
        }
    }
}

/// One filter bar row. `value` is always the raw string the user typed;
/// coercion happens at evaluation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub id: u32,
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterCondition {
    pub fn new(id: u32, field: &str, operator: FilterOperator, value: &str) -> Self {
        FilterCondition {
            id,
            field: field.to_string(),
            operator,
            value: value.to_string(),
        }
    }

    /// Builds a condition from the filter bar's raw symbol form. An unknown
    /// operator symbol is logged and dropped, which makes the row a no-op
    /// filter rather than a pipeline failure.
    pub fn from_raw(id: u32, field: &str, operator_symbol: &str, value: &str) -> Option<Self> {
        match FilterOperator::parse(operator_symbol) {
            Some(operator) => Some(FilterCondition::new(id, field, operator, value)),
            None => {
                log::warn!(
                    "dropping filter condition {} on '{}': unknown operator '{}'",
                    id,
                    field,
                    operator_symbol
                );
                None
            }
        }
    }
}

// ============================================================================
// SORT
// ============================================================================

/// Sort direction. Direction only affects ordering among defined values;
/// missing values sort last either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Single-field sort specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: &str, direction: SortDirection) -> Self {
        SortSpec {
            field: field.to_string(),
            direction,
        }
    }

    pub fn ascending(field: &str) -> Self {
        SortSpec::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: &str) -> Self {
        SortSpec::new(field, SortDirection::Descending)
    }
}

// ============================================================================
// GRID DEFINITION
// ============================================================================

/// The complete per-render input: what the user currently filters, sorts
/// and groups by. Dimensions are ordered outermost-first; the UI never
/// offers more than three.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridDefinition {
    pub filters: Vec<FilterCondition>,
    pub sort: Option<SortSpec>,
    pub dimensions: SmallVec<[String; 3]>,
}

impl GridDefinition {
    pub fn new() -> Self {
        GridDefinition::default()
    }

    pub fn with_filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_dimension(mut self, field: &str) -> Self {
        self.dimensions.push(field.to_string());
        self
    }

    /// Ids of conditions whose operator is illegal for the field's declared
    /// type (numeric comparison on text, substring on number). The pipeline
    /// still evaluates them (they just never match) but the filter bar
    /// uses this to flag the offending rows.
    pub fn illegal_conditions(&self, schema: &Schema) -> Vec<u32> {
        self.filters
            .iter()
            .filter(|c| match schema.field_type(&c.field) {
                Some(field_type) => !c.operator.legal_for(field_type),
                None => false,
            })
            .map(|c| c.id)
            .collect()
    }
}

// ============================================================================
// GRID CONFIG
// ============================================================================

/// Per-page parametrization of the engine. The three console pages differ
/// only in this configuration: which fields exist with which types, how
/// deep the grouping UI can render, and which numeric fields roll up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    pub schema: Schema,
    pub max_group_depth: usize,
    pub aggregate_fields: Vec<String>,
}

impl GridConfig {
    pub fn new(schema: Schema, max_group_depth: usize) -> Self {
        GridConfig {
            schema,
            max_group_depth,
            aggregate_fields: Vec::new(),
        }
    }

    pub fn with_aggregate(mut self, field: &str) -> Self {
        self.aggregate_fields.push(field.to_string());
        self
    }
}
