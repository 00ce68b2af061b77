//! FILENAME: grid-engine/src/sort.rs
//! Comparator factory and stable sort stage.
//!
//! One field, one direction. Missing values sort last no matter the
//! direction: a reviewer scanning the grid wants the blanks at the bottom
//! whether the column is ascending or descending. The sort must be stable
//! because the grouping engine relies on sort-then-group producing
//! deterministic, human-reviewable group interiors.

use std::cmp::Ordering;
use inventory_model::{Record, Schema};
use crate::definition::{SortDirection, SortSpec};

/// Total-order comparison of two records on one field.
///
/// Declared-numeric fields compare by coerced number (NaN ties break to
/// `Equal`, matching the stable input order); everything else compares as
/// case-folded text, which stands in for locale collation.
pub fn compare_by_field(
    a: &Record,
    b: &Record,
    field: &str,
    direction: SortDirection,
    schema: &Schema,
) -> Ordering {
    let va = a.field(field);
    let vb = b.field(field);

    // Nulls-last is absolute; direction never moves blanks off the bottom.
    match (va.is_missing(), vb.is_missing()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let ordering = if schema.is_numeric(field) {
        va.coerce_number()
            .partial_cmp(&vb.coerce_number())
            .unwrap_or(Ordering::Equal)
    } else {
        va.display_string()
            .to_lowercase()
            .cmp(&vb.display_string().to_lowercase())
    };

    match direction {
        SortDirection::Ascending => ordering,
        SortDirection::Descending => ordering.reverse(),
    }
}

/// Stable-sorts the rows in place. Ties preserve the filtered input order.
pub fn sort_records(rows: &mut [Record], spec: &SortSpec, schema: &Schema) {
    rows.sort_by(|a, b| compare_by_field(a, b, &spec.field, spec.direction, schema));
}
