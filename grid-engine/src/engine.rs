//! FILENAME: grid-engine/src/engine.rs
//! Grid Engine - The calculation core that turns records into a view.
//!
//! This module takes a `GridConfig` (per-page parametrization) plus a
//! `GridDefinition` (current filters, sort, dimensions) and produces a
//! `GridView` over the caller's flat record array.
//!
//! Algorithm:
//! 1. Apply the filter pipeline (stable, ANDed conditions)
//! 2. Stable-sort the survivors on the single sort field
//! 3. Partition into the group tree, computing rollups bottom-up
//!
//! The whole computation is synchronous and re-runs in full on every input
//! change. There is no cancellation: a caller discards a stale view by
//! recomputing with new inputs.

use serde::{Deserialize, Serialize};
use inventory_model::{Record, RecordId};
use crate::definition::{GridConfig, GridDefinition};
use crate::filter::apply_filters;
use crate::group::{build_group_tree, GroupNode};
use crate::selection::{SelectionSet, TriState};
use crate::sort::sort_records;

// ============================================================================
// GEO PASSTHROUGH
// ============================================================================

/// Coordinate subset handed to map overlays. Extraction is a passthrough,
/// not engine logic: rows without usable coordinates are silently skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub id: RecordId,
    pub lat: f64,
    pub lng: f64,
}

// ============================================================================
// GRID VIEW
// ============================================================================

/// Derived view state: the filtered+sorted rows plus the group tree over
/// them. Pure derived data; rebuilt in full whenever records, filters,
/// sort or dimensions change, never cached across those changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridView {
    pub rows: Vec<Record>,
    pub tree: Vec<GroupNode>,
}

impl GridView {
    /// Record ids of every descendant row of a node.
    pub fn node_record_ids(&self, node: &GroupNode) -> Vec<RecordId> {
        node.record_ids(&self.rows)
    }

    /// Tri-state selection summary for one node.
    pub fn selection_state(&self, node: &GroupNode, selection: &SelectionSet) -> TriState {
        selection.query(&self.node_record_ids(node))
    }

    /// Toggles a whole node: select-all unless already fully selected,
    /// else deselect-all, atomically over every descendant leaf.
    pub fn toggle_node(&self, node: &GroupNode, selection: &mut SelectionSet) {
        selection.toggle_group(&self.node_record_ids(node));
    }

    /// Rows held directly by a leaf node, in view order.
    pub fn leaf_records<'a>(&'a self, node: &GroupNode) -> Vec<&'a Record> {
        node.leaf_rows()
            .iter()
            .filter_map(|&i| self.rows.get(i))
            .collect()
    }

    /// All ids in the current view, for select-all and selection pruning.
    pub fn all_record_ids(&self) -> Vec<RecordId> {
        self.rows.iter().map(|r| r.id.clone()).collect()
    }

    /// Extracts the geo-coordinate subset for map overlays.
    pub fn geo_points(&self, lat_field: &str, lng_field: &str) -> Vec<GeoPoint> {
        self.rows
            .iter()
            .filter_map(|row| {
                let lat = row.field(lat_field).coerce_number();
                let lng = row.field(lng_field).coerce_number();
                if lat.is_finite() && lng.is_finite() {
                    Some(GeoPoint {
                        id: row.id.clone(),
                        lat,
                        lng,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Runs the full filter → sort → group pipeline over the caller's records.
pub fn compute_grid(
    records: &[Record],
    definition: &GridDefinition,
    config: &GridConfig,
) -> GridView {
    let mut rows = apply_filters(records, &definition.filters);

    if let Some(sort) = &definition.sort {
        sort_records(&mut rows, sort, &config.schema);
    }

    let dimensions = effective_dimensions(definition, config);
    let tree = build_group_tree(&rows, dimensions, config);

    GridView { rows, tree }
}

/// Clamps the dimension list to the page's configured maximum depth. The
/// engine itself has no hard limit; the clamp keeps an over-deep list from
/// producing a tree the page cannot render.
fn effective_dimensions<'a>(definition: &'a GridDefinition, config: &GridConfig) -> &'a [String] {
    let dimensions = definition.dimensions.as_slice();
    if dimensions.len() > config.max_group_depth {
        log::warn!(
            "dimension list of {} exceeds configured max depth {}; clamping",
            dimensions.len(),
            config.max_group_depth
        );
        &dimensions[..config.max_group_depth]
    } else {
        dimensions
    }
}
