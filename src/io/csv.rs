// CSV Dataset Ingestion
//
// Reads delimited text positionally against a known data structure:
// fields coerce to the declared component type and empty fields become
// null. The whole file materializes into an in-memory dataset.

use std::io::Read;

use log::debug;

use crate::engine::error::{EngineError, EngineResult};
use crate::model::component::Component;
use crate::model::dataset::InMemoryDataset;
use crate::model::structure::DataStructure;
use crate::model::types::ScalarType;
use crate::model::value::ScalarValue;

/// Options for CSV ingestion.
#[derive(Debug, Clone, Copy)]
pub struct CsvOptions {
    /// Skip one leading header row. The header is not matched against
    /// component names; parsing stays positional.
    pub has_headers: bool,
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            has_headers: true,
            delimiter: b',',
        }
    }
}

/// Read a CSV stream against a structure with default options.
pub fn read_csv<R: Read>(structure: DataStructure, reader: R) -> EngineResult<InMemoryDataset> {
    read_csv_with(structure, reader, CsvOptions::default())
}

/// Read a CSV stream against a structure.
pub fn read_csv_with<R: Read>(
    structure: DataStructure,
    reader: R,
    options: CsvOptions,
) -> EngineResult<InMemoryDataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(options.has_headers)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            EngineError::invalid_argument(format!("CSV parse error at row {}: {}", index + 1, e))
        })?;
        if record.len() != structure.len() {
            return Err(EngineError::invalid_argument(format!(
                "CSV row {} has {} fields, structure has {} components",
                index + 1,
                record.len(),
                structure.len()
            )));
        }
        let values = structure
            .components()
            .iter()
            .zip(record.iter())
            .map(|(component, field)| coerce(component, field, index + 1))
            .collect::<EngineResult<Vec<_>>>()?;
        rows.push(values);
    }

    debug!("read {} CSV rows against {}", rows.len(), structure);
    InMemoryDataset::new(structure, rows)
}

/// Coerce one field to the component's declared type. Empty fields are
/// null regardless of type.
fn coerce(component: &Component, field: &str, row: usize) -> EngineResult<ScalarValue> {
    if field.is_empty() {
        return Ok(ScalarValue::Null);
    }
    let mismatch = || {
        EngineError::invalid_argument(format!(
            "CSV row {}: cannot read {:?} as {} for component {}",
            row,
            field,
            component.data_type(),
            component.name()
        ))
    };
    match component.data_type() {
        ScalarType::String => Ok(ScalarValue::String(field.to_string())),
        ScalarType::Integer => field
            .parse::<i64>()
            .map(ScalarValue::Integer)
            .map_err(|_| mismatch()),
        ScalarType::Number => field
            .parse::<f64>()
            .map(ScalarValue::Number)
            .map_err(|_| mismatch()),
        ScalarType::Boolean => {
            if field.eq_ignore_ascii_case("true") {
                Ok(ScalarValue::Boolean(true))
            } else if field.eq_ignore_ascii_case("false") {
                Ok(ScalarValue::Boolean(false))
            } else {
                Err(mismatch())
            }
        }
        // DataStructure::new rejects null-typed components
        ScalarType::Null => unreachable!("null-typed component in a structure"),
    }
}
