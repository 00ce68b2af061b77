//! FILENAME: export/src/lib.rs
//! Inventory Export Module
//!
//! Serializes filtered/sorted grid rows for download: flat and grouped CSV
//! for spreadsheets, KML placemarks for map tools.

mod error;
pub mod csv;
pub mod kml;

pub use error::ExportError;
pub use csv::{csv_filename, to_csv, to_grouped_csv, Column, UTF8_BOM};
pub use kml::to_kml;
