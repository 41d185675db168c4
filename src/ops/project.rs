// Projection Operator
//
// Restricts a dataset to a subset of its components, named either by the
// components to keep or by the components to drop. Identifiers always
// survive a projection.

use std::collections::HashSet;
use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::model::data_point::DataPoint;
use crate::model::dataset::{Dataset, RowStream};
use crate::model::structure::DataStructure;

/// A column-subset view over a dataset.
pub struct ProjectedDataset {
    input: Arc<dyn Dataset>,
    structure: Arc<DataStructure>,
    /// Input positions of the kept components, in output order.
    positions: Vec<usize>,
}

impl ProjectedDataset {
    /// Keep exactly the named components. Every identifier of the input
    /// must appear in the list.
    pub fn keep(input: Arc<dyn Dataset>, names: &[&str]) -> EngineResult<Self> {
        let kept = name_set(&input, names)?;
        for identifier in input.structure().identifiers() {
            if !kept.contains(identifier.name()) {
                return Err(EngineError::invalid_argument(format!(
                    "cannot drop identifier {}",
                    identifier.name()
                )));
            }
        }
        ProjectedDataset::build(input, kept)
    }

    /// Drop the named components, keeping the rest. Identifiers may not
    /// be named.
    pub fn drop(input: Arc<dyn Dataset>, names: &[&str]) -> EngineResult<Self> {
        let dropped = name_set(&input, names)?;
        for name in &dropped {
            if input.structure().component(name).map(|c| c.is_identifier()) == Some(true) {
                return Err(EngineError::invalid_argument(format!(
                    "cannot drop identifier {}",
                    name
                )));
            }
        }
        let kept: HashSet<String> = input
            .structure()
            .components()
            .iter()
            .map(|c| c.name().to_string())
            .filter(|name| !dropped.contains(name))
            .collect();
        ProjectedDataset::build(input, kept)
    }

    fn build(input: Arc<dyn Dataset>, kept: HashSet<String>) -> EngineResult<Self> {
        // Preserve the input's component order.
        let mut components = Vec::with_capacity(kept.len());
        let mut positions = Vec::with_capacity(kept.len());
        for (position, component) in input.structure().components().iter().enumerate() {
            if kept.contains(component.name()) {
                components.push(component.clone());
                positions.push(position);
            }
        }
        let structure = Arc::new(DataStructure::new(components)?);
        Ok(ProjectedDataset {
            input,
            structure,
            positions,
        })
    }
}

/// Resolve a name list against the input structure, rejecting unknown
/// names and duplicates.
fn name_set(input: &Arc<dyn Dataset>, names: &[&str]) -> EngineResult<HashSet<String>> {
    let mut set = HashSet::with_capacity(names.len());
    for name in names {
        if !input.structure().contains(name) {
            return Err(EngineError::invalid_argument(format!(
                "unknown component: {}",
                name
            )));
        }
        if !set.insert(name.to_string()) {
            return Err(EngineError::invalid_argument(format!(
                "component named twice: {}",
                name
            )));
        }
    }
    Ok(set)
}

impl Dataset for ProjectedDataset {
    fn structure(&self) -> &Arc<DataStructure> {
        &self.structure
    }

    fn scan(&self) -> RowStream<'_> {
        Box::new(self.input.scan().map(move |point| {
            let point = point?;
            let values = self
                .positions
                .iter()
                .map(|&position| point.at(position).clone())
                .collect();
            DataPoint::new(Arc::clone(&self.structure), values)
        }))
    }
}
