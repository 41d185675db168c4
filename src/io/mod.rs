// Structure-Boundary I/O Module
//
// Codecs at the dataset boundary: the JSON spelling of components and
// structures, and positional CSV ingestion.

pub mod csv;
pub mod json;

pub use csv::{read_csv, read_csv_with, CsvOptions};
pub use json::{component_from_json, structure_from_json, structure_to_json};
