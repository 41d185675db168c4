// Filter Operator
//
// Keeps the rows for which a boolean predicate resolves to true. A null
// predicate discards the row, the same way a SQL WHERE clause does.

use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::expr::{Context, Expression};
use crate::model::dataset::{Dataset, RowStream};
use crate::model::structure::DataStructure;
use crate::model::types::ScalarType;

/// A predicate-filtered view over a dataset.
pub struct FilteredDataset {
    input: Arc<dyn Dataset>,
    predicate: Expression,
}

impl FilteredDataset {
    /// Filter by a boolean row-wise expression.
    pub fn new(input: Arc<dyn Dataset>, predicate: Expression) -> EngineResult<Self> {
        let ty = predicate.result_type();
        if ty != ScalarType::Boolean && ty != ScalarType::Null {
            return Err(EngineError::unsupported_type(format!(
                "expected boolean filter predicate, got {}",
                ty
            )));
        }
        Ok(FilteredDataset { input, predicate })
    }
}

impl Dataset for FilteredDataset {
    fn structure(&self) -> &Arc<DataStructure> {
        self.input.structure()
    }

    fn scan(&self) -> RowStream<'_> {
        Box::new(self.input.scan().filter_map(move |point| {
            let point = match point {
                Ok(point) => point,
                Err(e) => return Some(Err(e)),
            };
            match self.predicate.resolve(&Context::with_point(&point)) {
                // null predicates discard the row
                Ok(value) => match value.as_boolean() {
                    Some(true) => Some(Ok(point)),
                    _ => None,
                },
                Err(e) => Some(Err(e)),
            }
        }))
    }
}
