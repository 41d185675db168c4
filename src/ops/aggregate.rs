// Aggregate Operator
//
// Groups a dataset by a subset of its identifiers and reduces each group
// through aggregation reducers. Groups are kept in first-seen order so
// repeated scans replay identical output.

use std::sync::Arc;

use linked_hash_map::LinkedHashMap;

use crate::agg::{Accumulator, Aggregation};
use crate::engine::error::{EngineError, EngineResult};
use crate::model::component::Component;
use crate::model::data_point::DataPoint;
use crate::model::dataset::{Dataset, RowStream};
use crate::model::structure::DataStructure;
use crate::model::value::ScalarValue;

/// A grouped aggregation over a dataset.
pub struct AggregatedDataset {
    input: Arc<dyn Dataset>,
    structure: Arc<DataStructure>,
    group_by: Vec<String>,
    measures: Vec<(String, Aggregation)>,
}

impl AggregatedDataset {
    /// Group by the named identifiers and compute the named measures.
    ///
    /// The grouping names must be identifiers of the input; measure names
    /// may not collide with them or with each other.
    pub fn new(
        input: Arc<dyn Dataset>,
        group_by: &[&str],
        measures: Vec<(String, Aggregation)>,
    ) -> EngineResult<Self> {
        let mut components = Vec::with_capacity(group_by.len() + measures.len());
        let mut names = Vec::with_capacity(group_by.len());
        for name in group_by {
            let component = input.structure().component(name).ok_or_else(|| {
                EngineError::invalid_argument(format!("unknown component: {}", name))
            })?;
            if !component.is_identifier() {
                return Err(EngineError::invalid_argument(format!(
                    "cannot group by {}: not an identifier",
                    name
                )));
            }
            if names.contains(&component.name().to_string()) {
                return Err(EngineError::invalid_argument(format!(
                    "grouped by {} twice",
                    name
                )));
            }
            names.push(component.name().to_string());
            components.push(component.clone());
        }
        for (name, aggregation) in &measures {
            components.push(Component::measure(name.clone(), aggregation.result_type()));
        }
        // DataStructure::new rejects measure names colliding with the
        // grouping identifiers or with each other.
        let structure = Arc::new(DataStructure::new(components)?);

        Ok(AggregatedDataset {
            input,
            structure,
            group_by: names,
            measures,
        })
    }

    fn compute(&self) -> EngineResult<Vec<DataPoint>> {
        let mut groups: LinkedHashMap<Vec<ScalarValue>, Vec<Accumulator>> = LinkedHashMap::new();
        for point in self.input.scan() {
            let point = point?;
            let key = point.key(&self.group_by);
            let accumulators = groups.entry(key).or_insert_with(|| {
                self.measures
                    .iter()
                    .map(|(_, aggregation)| aggregation.new_accumulator())
                    .collect()
            });
            for ((_, aggregation), accumulator) in self.measures.iter().zip(accumulators) {
                aggregation.accumulate(accumulator, &point)?;
            }
        }

        let mut rows = Vec::with_capacity(groups.len());
        for (key, accumulators) in groups {
            let mut values = key;
            for ((_, aggregation), accumulator) in self.measures.iter().zip(accumulators) {
                values.push(aggregation.finish(accumulator));
            }
            rows.push(DataPoint::new(Arc::clone(&self.structure), values)?);
        }
        Ok(rows)
    }
}

impl Dataset for AggregatedDataset {
    fn structure(&self) -> &Arc<DataStructure> {
        &self.structure
    }

    fn scan(&self) -> RowStream<'_> {
        match self.compute() {
            Ok(rows) => Box::new(rows.into_iter().map(Ok)),
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }
}
