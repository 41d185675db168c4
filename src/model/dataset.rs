// Dataset Abstraction
//
// This module defines the lazy, restartable dataset trait and its
// materialized in-memory implementation.

use std::sync::Arc;

use super::data_point::DataPoint;
use super::structure::DataStructure;
use super::value::ScalarValue;
use crate::engine::error::EngineResult;

/// A stream of data points produced by one scan of a dataset.
///
/// Items are results so that per-row failures (a failing calc expression,
/// say) abort the enclosing consumer instead of silently dropping rows.
pub type RowStream<'a> = Box<dyn Iterator<Item = EngineResult<DataPoint>> + 'a>;

/// A schema-carrying, lazily evaluated dataset.
///
/// `scan` instantiates a fresh row stream every call: iterating a dataset
/// twice yields the same row multiset, and concurrent scans over the same
/// dataset are independent. Implementations must not mutate shared state
/// from inside a scan.
pub trait Dataset: Send + Sync {
    /// The structure every scanned data point conforms to.
    fn structure(&self) -> &Arc<DataStructure>;

    /// Start a new pass over the rows.
    fn scan(&self) -> RowStream<'_>;
}

/// A fully materialized dataset.
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    structure: Arc<DataStructure>,
    points: Vec<DataPoint>,
}

impl InMemoryDataset {
    /// Build a dataset from raw rows, validating each against the structure.
    pub fn new(structure: DataStructure, rows: Vec<Vec<ScalarValue>>) -> EngineResult<Self> {
        let structure = Arc::new(structure);
        let mut points = Vec::with_capacity(rows.len());
        for row in rows {
            points.push(DataPoint::new(Arc::clone(&structure), row)?);
        }
        Ok(InMemoryDataset { structure, points })
    }

    /// Build a dataset from already validated data points.
    pub fn from_points(structure: Arc<DataStructure>, points: Vec<DataPoint>) -> Self {
        InMemoryDataset { structure, points }
    }

    /// Collect any dataset into memory, surfacing the first row error.
    pub fn from_dataset(dataset: &dyn Dataset) -> EngineResult<Self> {
        let points = dataset.scan().collect::<EngineResult<Vec<_>>>()?;
        Ok(InMemoryDataset {
            structure: Arc::clone(dataset.structure()),
            points,
        })
    }

    pub fn points(&self) -> &[DataPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl Dataset for InMemoryDataset {
    fn structure(&self) -> &Arc<DataStructure> {
        &self.structure
    }

    fn scan(&self) -> RowStream<'_> {
        Box::new(self.points.iter().cloned().map(Ok))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::Component;
    use crate::model::types::ScalarType;

    fn dataset() -> InMemoryDataset {
        let structure = DataStructure::new(vec![
            Component::identifier("id", ScalarType::Integer),
            Component::measure("value", ScalarType::Number),
        ])
        .unwrap();
        InMemoryDataset::new(
            structure,
            vec![
                vec![ScalarValue::Integer(1), ScalarValue::Number(1.5)],
                vec![ScalarValue::Integer(2), ScalarValue::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_scan_is_restartable() {
        let dataset = dataset();
        let first: Vec<_> = dataset.scan().collect::<EngineResult<_>>().unwrap();
        let second: Vec<_> = dataset.scan().collect::<EngineResult<_>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_from_dataset_round_trip() {
        let dataset = dataset();
        let collected = InMemoryDataset::from_dataset(&dataset).unwrap();
        assert_eq!(collected.len(), dataset.len());
        assert_eq!(collected.structure(), dataset.structure());
    }
}
