//! FILENAME: grid-engine/src/group.rs
//! Group-key resolver and recursive grouping engine.
//!
//! Takes the filtered+sorted rows and an ordered dimension list (outermost
//! first) and partitions them into a tree of `GroupNode`s with aggregate
//! rollups. Group display order follows first appearance in the sorted
//! sequence, which means the sort stage indirectly controls group order.
//! Grouping is a partition by key equality, not by contiguity: equal keys
//! at non-adjacent positions still merge into one bucket.
//!
//! The tree is pure derived data. It is rebuilt in full on every relevant
//! change and never mutated in place.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use chrono::{Datelike, NaiveDate};
use inventory_model::{FieldType, Record, RecordId, Schema};
use crate::definition::GridConfig;

/// Literal bucket for values that cannot be resolved to a real group key.
pub const UNASSIGNED_KEY: &str = "Sin asignar";

// ============================================================================
// AGGREGATES
// ============================================================================

/// Rollup statistics for one node: leaf count plus the sum of every
/// configured aggregate field. Sums are exact sums over descendant leaves,
/// recomputed on every build, never patched incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aggregates {
    pub count: usize,
    pub sums: FxHashMap<String, f64>,
}

impl Aggregates {
    fn from_rows(rows: &[Record], indices: &[usize], aggregate_fields: &[String]) -> Self {
        let mut aggregates = Aggregates {
            count: indices.len(),
            sums: FxHashMap::default(),
        };
        for field in aggregate_fields {
            let mut total = 0.0;
            for &i in indices {
                let n = rows[i].field(field).coerce_number();
                // Missing and non-numeric values contribute nothing.
                if n.is_finite() {
                    total += n;
                }
            }
            aggregates.sums.insert(field.clone(), total);
        }
        aggregates
    }

    fn merged(children: &[GroupNode], aggregate_fields: &[String]) -> Self {
        let mut aggregates = Aggregates::default();
        for field in aggregate_fields {
            aggregates.sums.insert(field.clone(), 0.0);
        }
        for child in children {
            aggregates.count += child.aggregates.count;
            for (field, value) in &child.aggregates.sums {
                *aggregates.sums.entry(field.clone()).or_insert(0.0) += value;
            }
        }
        aggregates
    }

    /// Sum for one aggregate field; 0 when the field was not configured.
    pub fn sum(&self, field: &str) -> f64 {
        self.sums.get(field).copied().unwrap_or(0.0)
    }
}

// ============================================================================
// GROUP TREE
// ============================================================================

/// Child payload of a node. The tagged variant replaces loose "maybe array,
/// maybe nested" unions: a node is a leaf iff the dimension list was
/// exhausted at its depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroupChildren {
    /// Leaf: indices into the view's filtered+sorted row vector.
    Rows(Vec<usize>),
    /// Branch: one child per distinct key, in first-seen order.
    Groups(Vec<GroupNode>),
}

/// One level of the aggregation tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupNode {
    /// Resolver output; also the node's display label.
    pub key: String,
    pub depth: usize,
    pub aggregates: Aggregates,
    pub children: GroupChildren,
}

impl GroupNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.children, GroupChildren::Rows(_))
    }

    /// Direct child groups; empty slice at a leaf.
    pub fn child_groups(&self) -> &[GroupNode] {
        match &self.children {
            GroupChildren::Groups(groups) => groups,
            GroupChildren::Rows(_) => &[],
        }
    }

    /// Row indices held directly by this leaf; empty slice at a branch.
    pub fn leaf_rows(&self) -> &[usize] {
        match &self.children {
            GroupChildren::Rows(rows) => rows,
            GroupChildren::Groups(_) => &[],
        }
    }

    /// All descendant row indices, depth-first, leaf order preserved.
    pub fn row_indices(&self) -> Vec<usize> {
        let mut indices = Vec::with_capacity(self.aggregates.count);
        self.collect_row_indices(&mut indices);
        indices
    }

    fn collect_row_indices(&self, out: &mut Vec<usize>) {
        match &self.children {
            GroupChildren::Rows(rows) => out.extend_from_slice(rows),
            GroupChildren::Groups(groups) => {
                for child in groups {
                    child.collect_row_indices(out);
                }
            }
        }
    }

    /// Record ids of all descendant rows, used for selection queries.
    pub fn record_ids(&self, rows: &[Record]) -> Vec<RecordId> {
        self.row_indices()
            .into_iter()
            .filter_map(|i| rows.get(i).map(|r| r.id.clone()))
            .collect()
    }
}

// ============================================================================
// GROUP KEY RESOLUTION
// ============================================================================

/// Maps a record to the display-string key for one grouping dimension.
///
/// Formatting and grouping identity are the same function: two records land
/// in the same bucket iff they format identically. Undeclared dimensions
/// and missing values collapse to the literal `"Sin asignar"` bucket
/// instead of failing the build.
pub fn resolve_group_key(record: &Record, field: &str, schema: &Schema) -> String {
    let field_type = match schema.field_type(field) {
        Some(t) => t,
        None => return UNASSIGNED_KEY.to_string(),
    };

    let value = record.field(field);
    if value.is_missing() {
        return UNASSIGNED_KEY.to_string();
    }

    match field_type {
        FieldType::Date => catorcena_label(&value.display_string())
            .unwrap_or_else(|| UNASSIGNED_KEY.to_string()),
        FieldType::Text | FieldType::Number => value.display_string(),
    }
}

/// Collapses a raw date into its catorcena: the fixed 14-day fiscal
/// sub-period, numbered from day-of-year. Accepts ISO dates (with or
/// without a time suffix) and the legacy `dd/mm/yyyy` form.
pub fn catorcena_label(raw: &str) -> Option<String> {
    let date_part = raw.split('T').next().unwrap_or(raw).trim();
    let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(date_part, "%d/%m/%Y"))
        .ok()?;
    let catorcena = (date.ordinal0() / 14) + 1;
    Some(format!("Catorcena {:02}", catorcena))
}

// ============================================================================
// TREE BUILDING
// ============================================================================

/// Partitions the filtered+sorted rows into a group tree.
///
/// An empty dimension list produces a single implicit root leaf holding
/// every row, so callers render the flat case without special handling.
/// Aggregates are computed bottom-up as the exact rollup of leaf values.
pub fn build_group_tree(
    rows: &[Record],
    dimensions: &[String],
    config: &GridConfig,
) -> Vec<GroupNode> {
    if dimensions.is_empty() {
        let indices: Vec<usize> = (0..rows.len()).collect();
        let aggregates = Aggregates::from_rows(rows, &indices, &config.aggregate_fields);
        return vec![GroupNode {
            key: String::new(),
            depth: 0,
            aggregates,
            children: GroupChildren::Rows(indices),
        }];
    }

    let all: Vec<usize> = (0..rows.len()).collect();
    build_level(rows, all, dimensions, 0, config)
}

/// Builds one level of the tree from the given row indices.
fn build_level(
    rows: &[Record],
    indices: Vec<usize>,
    dimensions: &[String],
    depth: usize,
    config: &GridConfig,
) -> Vec<GroupNode> {
    let dimension = &dimensions[0];
    let rest = &dimensions[1..];

    // Bucket by key, preserving first-seen order rather than sorting keys.
    let mut order: Vec<String> = Vec::new();
    let mut buckets: FxHashMap<String, Vec<usize>> = FxHashMap::default();
    for i in indices {
        let key = resolve_group_key(&rows[i], dimension, &config.schema);
        buckets
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key.clone());
                Vec::new()
            })
            .push(i);
    }

    let mut nodes = Vec::with_capacity(order.len());
    for key in order {
        if let Some(bucket) = buckets.remove(&key) {
            let node = if rest.is_empty() {
                let aggregates = Aggregates::from_rows(rows, &bucket, &config.aggregate_fields);
                GroupNode {
                    key,
                    depth,
                    aggregates,
                    children: GroupChildren::Rows(bucket),
                }
            } else {
                let children = build_level(rows, bucket, rest, depth + 1, config);
                let aggregates = Aggregates::merged(&children, &config.aggregate_fields);
                GroupNode {
                    key,
                    depth,
                    aggregates,
                    children: GroupChildren::Groups(children),
                }
            };
            nodes.push(node);
        }
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::GridConfig;
    use inventory_model::FieldValue;

    fn caras_schema() -> Schema {
        Schema::new()
            .with_field("plaza", FieldType::Text)
            .with_field("tipo_de_cara", FieldType::Text)
            .with_field("estado", FieldType::Text)
            .with_field("caras_totales", FieldType::Number)
            .with_field("fecha_inicio", FieldType::Date)
    }

    fn caras_config() -> GridConfig {
        GridConfig::new(caras_schema(), 3).with_aggregate("caras_totales")
    }

    fn caras_record(id: i64, plaza: &str, tipo: &str, caras: f64) -> Record {
        Record::new(id)
            .with_field("plaza", plaza)
            .with_field("tipo_de_cara", tipo)
            .with_field("caras_totales", caras)
    }

    fn dims(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_level_partition_shape() {
        // Scenario: 4 records over 2 plazas x 2 tipos.
        let rows = vec![
            caras_record(1, "Guadalajara", "Espectacular", 10.0),
            caras_record(2, "Guadalajara", "Muro", 4.0),
            caras_record(3, "Monterrey", "Espectacular", 6.0),
            caras_record(4, "Monterrey", "Muro", 2.0),
        ];
        let tree = build_group_tree(&rows, &dims(&["plaza", "tipo_de_cara"]), &caras_config());

        assert_eq!(tree.len(), 2);
        for node in &tree {
            assert!(!node.is_leaf());
            assert_eq!(node.child_groups().len(), 2);
            for leaf in node.child_groups() {
                assert!(leaf.is_leaf());
                assert_eq!(leaf.leaf_rows().len(), 1);
                assert_eq!(leaf.depth, 1);
            }
        }
    }

    #[test]
    fn test_partition_completeness() {
        let rows: Vec<Record> = (0..12)
            .map(|i| {
                caras_record(
                    i as i64,
                    ["Guadalajara", "Monterrey", "CDMX"][i % 3],
                    ["Espectacular", "Muro"][i % 2],
                    i as f64,
                )
                .with_field("estado", ["Jalisco", "Nuevo Leon"][(i / 3) % 2])
            })
            .collect();

        let all_dims = dims(&["plaza", "tipo_de_cara", "estado"]);
        for depth in 1..=3 {
            let fields: Vec<String> = all_dims[..depth].to_vec();
            let tree = build_group_tree(&rows, &fields, &caras_config());

            let mut seen: Vec<usize> = tree.iter().flat_map(|n| n.row_indices()).collect();
            seen.sort_unstable();
            let expected: Vec<usize> = (0..rows.len()).collect();
            assert_eq!(seen, expected, "depth {}", depth);
        }
    }

    #[test]
    fn test_three_level_tree_leaves_at_depth_two() {
        // 8 records over 2 plazas x 2 tipos x 2 estados.
        let rows: Vec<Record> = (0..8)
            .map(|i| {
                caras_record(
                    i as i64,
                    ["Guadalajara", "Monterrey"][i % 2],
                    ["Espectacular", "Muro"][(i / 2) % 2],
                    1.0,
                )
                .with_field("estado", ["Jalisco", "Nuevo Leon"][(i / 4) % 2])
            })
            .collect();

        let tree = build_group_tree(
            &rows,
            &dims(&["plaza", "tipo_de_cara", "estado"]),
            &caras_config(),
        );

        assert_eq!(tree.len(), 2);
        for plaza in &tree {
            assert_eq!(plaza.depth, 0);
            assert_eq!(plaza.child_groups().len(), 2);
            assert_eq!(plaza.aggregates.count, 4);
            for tipo in plaza.child_groups() {
                assert_eq!(tipo.depth, 1);
                assert!(!tipo.is_leaf());
                for leaf in tipo.child_groups() {
                    assert_eq!(leaf.depth, 2);
                    assert!(leaf.is_leaf());
                    assert_eq!(leaf.leaf_rows().len(), 1);
                }
            }
        }
    }

    #[test]
    fn test_aggregates_roll_up_exactly() {
        let rows = vec![
            caras_record(1, "Guadalajara", "Espectacular", 10.0),
            caras_record(2, "Guadalajara", "Muro", 4.0),
            caras_record(3, "Monterrey", "Espectacular", 6.0),
        ];
        let tree = build_group_tree(&rows, &dims(&["plaza", "tipo_de_cara"]), &caras_config());

        let gdl = &tree[0];
        assert_eq!(gdl.key, "Guadalajara");
        assert_eq!(gdl.aggregates.count, 2);
        assert_eq!(gdl.aggregates.sum("caras_totales"), 14.0);

        let child_total: f64 = gdl
            .child_groups()
            .iter()
            .map(|c| c.aggregates.sum("caras_totales"))
            .sum();
        assert_eq!(gdl.aggregates.sum("caras_totales"), child_total);

        let child_count: usize = gdl.child_groups().iter().map(|c| c.aggregates.count).sum();
        assert_eq!(gdl.aggregates.count, child_count);
    }

    #[test]
    fn test_non_adjacent_equal_keys_merge() {
        let rows = vec![
            caras_record(1, "Guadalajara", "Muro", 1.0),
            caras_record(2, "Monterrey", "Muro", 1.0),
            caras_record(3, "Guadalajara", "Muro", 1.0),
        ];
        let tree = build_group_tree(&rows, &dims(&["plaza"]), &caras_config());

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].key, "Guadalajara");
        assert_eq!(tree[0].leaf_rows(), &[0, 2]);
        assert_eq!(tree[1].key, "Monterrey");
    }

    #[test]
    fn test_group_order_follows_first_appearance() {
        let rows = vec![
            caras_record(1, "Zapopan", "Muro", 1.0),
            caras_record(2, "Aguascalientes", "Muro", 1.0),
        ];
        let tree = build_group_tree(&rows, &dims(&["plaza"]), &caras_config());

        // Not alphabetical: Zapopan appeared first.
        assert_eq!(tree[0].key, "Zapopan");
        assert_eq!(tree[1].key, "Aguascalientes");
    }

    #[test]
    fn test_empty_dimensions_yield_implicit_root_leaf() {
        let rows = vec![
            caras_record(1, "Guadalajara", "Muro", 3.0),
            caras_record(2, "Monterrey", "Muro", 4.0),
        ];
        let tree = build_group_tree(&rows, &[], &caras_config());

        assert_eq!(tree.len(), 1);
        assert!(tree[0].is_leaf());
        assert_eq!(tree[0].leaf_rows(), &[0, 1]);
        assert_eq!(tree[0].aggregates.count, 2);
        assert_eq!(tree[0].aggregates.sum("caras_totales"), 7.0);
    }

    #[test]
    fn test_missing_and_undeclared_dimensions_bucket_as_unassigned() {
        let rows = vec![
            caras_record(1, "Guadalajara", "Muro", 1.0),
            Record::new(2).with_field("tipo_de_cara", "Muro"),
        ];

        let tree = build_group_tree(&rows, &dims(&["plaza"]), &caras_config());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].key, UNASSIGNED_KEY);

        // A dimension the schema never declared collapses everything.
        let tree = build_group_tree(&rows, &dims(&["zona"]), &caras_config());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].key, UNASSIGNED_KEY);
        assert_eq!(tree[0].aggregates.count, 2);
    }

    #[test]
    fn test_catorcena_resolution() {
        // Jan 1-14 is catorcena 1, Jan 15-28 is catorcena 2.
        assert_eq!(catorcena_label("2024-01-01").as_deref(), Some("Catorcena 01"));
        assert_eq!(catorcena_label("2024-01-14").as_deref(), Some("Catorcena 01"));
        assert_eq!(catorcena_label("2024-01-15").as_deref(), Some("Catorcena 02"));
        assert_eq!(catorcena_label("15/01/2024").as_deref(), Some("Catorcena 02"));
        assert_eq!(catorcena_label("2024-06-01T00:00:00").as_deref(), Some("Catorcena 11"));
        assert_eq!(catorcena_label("pronto"), None);
    }

    #[test]
    fn test_date_dimension_groups_by_catorcena() {
        let rows = vec![
            Record::new(1).with_field("fecha_inicio", "2024-01-03"),
            Record::new(2).with_field("fecha_inicio", "2024-01-10"),
            Record::new(3).with_field("fecha_inicio", "2024-01-20"),
            Record::new(4).with_field("fecha_inicio", FieldValue::Empty),
        ];
        let tree = build_group_tree(&rows, &dims(&["fecha_inicio"]), &caras_config());

        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].key, "Catorcena 01");
        assert_eq!(tree[0].leaf_rows().len(), 2);
        assert_eq!(tree[1].key, "Catorcena 02");
        assert_eq!(tree[2].key, UNASSIGNED_KEY);
    }
}
