//! FILENAME: export/src/csv.rs
//! CSV serialization of filtered+sorted rows.
//!
//! Output targets Excel: a UTF-8 BOM prefix so accented text survives a
//! double-click open, comma delimiters, and RFC-4180 quoting. Grouping is
//! UI-only and not reflected in the flat export; `to_grouped_csv` is the
//! one page variant that walks the tree to emit grouped sections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use inventory_model::Record;
use grid_engine::{GridView, GroupNode};

/// Byte-order mark prefixing every CSV blob, for Excel compatibility.
pub const UTF8_BOM: &str = "\u{feff}";

/// One exported column: which record field to read and the header label
/// shown in the first row. Pages declare their column lists in config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub field: String,
    pub header: String,
}

impl Column {
    pub fn new(field: &str, header: &str) -> Self {
        Column {
            field: field.to_string(),
            header: header.to_string(),
        }
    }
}

/// Quotes a field when it contains a delimiter, quote or line break.
/// Embedded quotes are doubled per RFC 4180.
fn escape_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') || raw.contains('\r') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn record_line(record: &Record, columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| escape_field(&record.field(&column.field).display_string()))
        .collect::<Vec<_>>()
        .join(",")
}

fn header_line(columns: &[Column]) -> String {
    columns
        .iter()
        .map(|column| escape_field(&column.header))
        .collect::<Vec<_>>()
        .join(",")
}

/// Serializes rows to CSV text in input order. Zero rows still produce the
/// BOM and header line, so an empty export opens as a well-formed file.
pub fn to_csv(rows: &[Record], columns: &[Column]) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str(&header_line(columns));
    out.push('\n');
    for record in rows {
        out.push_str(&record_line(record, columns));
        out.push('\n');
    }
    out
}

/// Grouped-section variant: each group contributes a section line (indented
/// key plus row count, with configured aggregate sums under their columns)
/// followed by its descendant rows. Used by the proposal caras summary
/// export; the flat `to_csv` covers every other page.
pub fn to_grouped_csv(view: &GridView, columns: &[Column]) -> String {
    let mut out = String::from(UTF8_BOM);
    out.push_str(&header_line(columns));
    out.push('\n');
    for node in &view.tree {
        push_group_section(&mut out, view, node, columns);
    }
    out
}

fn push_group_section(out: &mut String, view: &GridView, node: &GroupNode, columns: &[Column]) {
    // The implicit root of an ungrouped view has an empty key; skip its
    // section line and emit rows directly.
    if !node.key.is_empty() {
        let indent = "  ".repeat(node.depth);
        let label = format!("{}{} ({} registros)", indent, node.key, node.aggregates.count);
        out.push_str(&escape_field(&label));
        // Aggregate sums land under their own columns; every other cell
        // stays blank so the section line is exactly as wide as the header.
        for column in columns.iter().skip(1) {
            out.push(',');
            if let Some(sum) = node.aggregates.sums.get(&column.field) {
                out.push_str(&format!("{}", sum));
            }
        }
        out.push('\n');
    }

    if node.is_leaf() {
        for record in view.leaf_records(node) {
            out.push_str(&record_line(record, columns));
            out.push('\n');
        }
    } else {
        for child in node.child_groups() {
            push_group_section(out, view, child, columns);
        }
    }
}

/// Download filename convention: `<dataset>_<context>_<ISO-date>.csv`.
pub fn csv_filename(dataset: &str, context: &str, date: NaiveDate) -> String {
    format!("{}_{}_{}.csv", dataset, context, date.format("%Y-%m-%d"))
}
