// Rename Operator
//
// Renames components through a partial old-to-new mapping. Row data is
// untouched; only the structure changes.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::model::data_point::DataPoint;
use crate::model::dataset::{Dataset, RowStream};
use crate::model::structure::DataStructure;

/// A dataset with some components renamed.
pub struct RenamedDataset {
    input: Arc<dyn Dataset>,
    structure: Arc<DataStructure>,
}

impl RenamedDataset {
    /// Rename components per the `(old, new)` mapping.
    ///
    /// Every old name must exist, no old name may be mapped twice, and no
    /// new name may collide with another component surviving the rename.
    pub fn new(input: Arc<dyn Dataset>, mapping: &[(&str, &str)]) -> EngineResult<Self> {
        let mut renames: HashMap<&str, &str> = HashMap::with_capacity(mapping.len());
        for (old, new) in mapping {
            if !input.structure().contains(old) {
                return Err(EngineError::invalid_argument(format!(
                    "unknown component: {}",
                    old
                )));
            }
            if renames.insert(old, new).is_some() {
                return Err(EngineError::invalid_argument(format!(
                    "component renamed twice: {}",
                    old
                )));
            }
        }

        let mut seen = HashSet::new();
        let mut components = Vec::with_capacity(input.structure().len());
        for component in input.structure().components() {
            let name = renames
                .get(component.name())
                .copied()
                .unwrap_or_else(|| component.name());
            if !seen.insert(name.to_string()) {
                return Err(EngineError::invalid_argument(format!(
                    "rename collides on component name: {}",
                    name
                )));
            }
            components.push(component.renamed(name));
        }

        let structure = Arc::new(DataStructure::new(components)?);
        Ok(RenamedDataset { input, structure })
    }
}

impl Dataset for RenamedDataset {
    fn structure(&self) -> &Arc<DataStructure> {
        &self.structure
    }

    fn scan(&self) -> RowStream<'_> {
        Box::new(self.input.scan().map(move |point| {
            let point = point?;
            DataPoint::new(Arc::clone(&self.structure), point.into_values())
        }))
    }
}
