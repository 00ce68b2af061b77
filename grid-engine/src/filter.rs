//! FILENAME: grid-engine/src/filter.rs
//! Predicate evaluator and filter pipeline.
//!
//! Conditions are ANDed: a record survives only if every condition matches.
//! There is no OR support and no condition grouping; the filter bar respects
//! that. The pipeline is a stable filter: relative input order is
//! preserved, never re-sorted here.
//!
//! Degradation policy (favors a blank cell over a crash):
//! - a missing value satisfies only the negative operators (`!=`,
//!   `not_contains`); a positive match against nothing is `false`;
//! - numeric operators coerce both sides, and a non-numeric operand yields
//!   NaN comparisons that are always `false`.

use inventory_model::Record;
use crate::definition::{FilterCondition, FilterOperator};

/// Evaluates one condition against one record. Pure; never fails.
/// Operator legality per field type is a filter-bar concern; evaluation
/// degrades uniformly on mismatches instead of consulting the schema.
pub fn condition_matches(record: &Record, condition: &FilterCondition) -> bool {
    let value = record.field(&condition.field);

    if value.is_missing() {
        return condition.operator.is_negative();
    }

    match condition.operator {
        FilterOperator::Eq | FilterOperator::Ne => {
            let equal = value
                .display_string()
                .to_lowercase()
                .eq(&condition.value.to_lowercase());
            if condition.operator == FilterOperator::Eq {
                equal
            } else {
                !equal
            }
        }
        FilterOperator::Contains | FilterOperator::NotContains => {
            let contains = value
                .display_string()
                .to_lowercase()
                .contains(&condition.value.to_lowercase());
            if condition.operator == FilterOperator::Contains {
                contains
            } else {
                !contains
            }
        }
        FilterOperator::Gt | FilterOperator::Lt | FilterOperator::Ge | FilterOperator::Le => {
            let lhs = value.coerce_number();
            let rhs = condition.value.trim().parse::<f64>().unwrap_or(f64::NAN);
            // NaN on either side fails every comparison below.
            match condition.operator {
                FilterOperator::Gt => lhs > rhs,
                FilterOperator::Lt => lhs < rhs,
                FilterOperator::Ge => lhs >= rhs,
                FilterOperator::Le => lhs <= rhs,
                _ => unreachable!(),
            }
        }
    }
}

/// Applies every condition to the collection, preserving relative order.
/// An empty condition list is the identity.
pub fn apply_filters(records: &[Record], conditions: &[FilterCondition]) -> Vec<Record> {
    records
        .iter()
        .filter(|record| {
            conditions
                .iter()
                .all(|condition| condition_matches(record, condition))
        })
        .cloned()
        .collect()
}
