//! FILENAME: grid-engine/src/lib.rs
//! Hierarchical aggregation, filtering, sorting and selection engine.
//!
//! This crate is the one reusable computation behind the console's three
//! grouped-inventory screens (reserved inventory, APS assignments, proposal
//! caras summary). Each page supplies a `GridConfig` (field types, max
//! grouping depth, aggregate fields) and a `GridDefinition` (current
//! filters, sort, dimensions); the engine turns the page's flat record
//! array into a filtered, sorted, grouped view with rollups and tri-state
//! selection queries.
//!
//! Layers:
//! - `definition`: serializable configuration (what a grid view IS)
//! - `filter`: predicate evaluator and AND filter pipeline
//! - `sort`: comparator factory and stable sort stage
//! - `group`: group-key resolver and recursive grouping with rollups
//! - `selection`: tri-state selection set over record ids
//! - `engine`: orchestration (HOW we calculate) and geo passthrough
//!
//! Every computation is synchronous and rebuilt in full on input change;
//! collections are bounded to what a human reviews on screen.

pub mod definition;
pub mod filter;
pub mod sort;
pub mod group;
pub mod selection;
pub mod engine;

pub use definition::{
    FilterCondition, FilterOperator, GridConfig, GridDefinition, SortDirection, SortSpec,
};
pub use filter::{apply_filters, condition_matches};
pub use sort::{compare_by_field, sort_records};
pub use group::{
    build_group_tree, resolve_group_key, Aggregates, GroupChildren, GroupNode, UNASSIGNED_KEY,
};
pub use selection::{SelectionSet, TriState};
pub use engine::{compute_grid, GeoPoint, GridView};
