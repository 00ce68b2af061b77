//! FILENAME: inventory-model/src/lib.rs
//! Shared data model for the inventory grid engine.
//!
//! This crate provides the types every page of the operations console hands
//! to the engine: scalar field values, flat records with stable identifiers,
//! and the per-page field-type schema. It owns no behavior beyond value
//! coercion and display formatting.
//!
//! Layers:
//! - `value`: scalar field values and coercion rules
//! - `record`: records and record identifiers
//! - `schema`: declared field types per page

pub mod value;
pub mod record;
pub mod schema;

pub use value::FieldValue;
pub use record::{Record, RecordId};
pub use schema::{FieldType, Schema};
