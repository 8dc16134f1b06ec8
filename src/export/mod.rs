pub mod csv;
pub mod json;
pub mod table;

pub use crate::error::ExportError;
pub use csv::export_table;
pub use json::{export_json, export_text};
pub use table::{AggregatedRow, MaterialTable, HEADER};
