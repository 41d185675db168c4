// Set Operators
//
// Union, intersection and difference over datasets with the same
// structure. Operand rows align to the first operand's component order;
// row equality is the full value tuple with null equal to null.

use std::collections::HashSet;
use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::model::data_point::DataPoint;
use crate::model::dataset::{Dataset, RowStream};
use crate::model::structure::DataStructure;
use crate::model::value::ScalarValue;

/// The supported set operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOperation {
    /// Concatenates the rows of every operand.
    Union,
    /// Keeps the rows of the first operand present in all the others.
    Intersect,
    /// Keeps the rows of the first operand present in none of the others.
    Difference,
}

/// A set operation over two or more structurally equal datasets.
pub struct SetDataset {
    operation: SetOperation,
    operands: Vec<Arc<dyn Dataset>>,
    structure: Arc<DataStructure>,
    /// For each operand, the positions realigning its rows to the first
    /// operand's component order.
    alignments: Vec<Vec<usize>>,
}

impl SetDataset {
    pub fn union(operands: Vec<Arc<dyn Dataset>>) -> EngineResult<Self> {
        SetDataset::new(SetOperation::Union, operands)
    }

    pub fn intersect(operands: Vec<Arc<dyn Dataset>>) -> EngineResult<Self> {
        SetDataset::new(SetOperation::Intersect, operands)
    }

    pub fn difference(operands: Vec<Arc<dyn Dataset>>) -> EngineResult<Self> {
        SetDataset::new(SetOperation::Difference, operands)
    }

    /// Build a set operation, checking that every operand carries the
    /// same structure (as a multiset of components).
    pub fn new(operation: SetOperation, operands: Vec<Arc<dyn Dataset>>) -> EngineResult<Self> {
        if operands.len() < 2 {
            return Err(EngineError::invalid_argument(
                "set operators need at least two operands",
            ));
        }
        let structure = Arc::clone(operands[0].structure());
        let mut alignments = Vec::with_capacity(operands.len());
        for operand in &operands {
            if operand.structure().as_ref() != structure.as_ref() {
                return Err(EngineError::structure_mismatch(format!(
                    "operand structure {} does not match {}",
                    operand.structure(),
                    structure
                )));
            }
            // Structures are equal as multisets, so every name resolves.
            let alignment = structure
                .components()
                .iter()
                .filter_map(|component| operand.structure().position(component.name()))
                .collect();
            alignments.push(alignment);
        }
        Ok(SetDataset {
            operation,
            operands,
            structure,
            alignments,
        })
    }

    /// Rows of one operand, realigned to the first operand's order.
    fn aligned(&self, index: usize) -> EngineResult<Vec<DataPoint>> {
        let alignment = &self.alignments[index];
        self.operands[index]
            .scan()
            .map(|point| {
                let point = point?;
                let values = alignment
                    .iter()
                    .map(|&position| point.at(position).clone())
                    .collect();
                DataPoint::new(Arc::clone(&self.structure), values)
            })
            .collect()
    }

    fn compute(&self) -> EngineResult<Vec<DataPoint>> {
        match self.operation {
            SetOperation::Union => {
                let mut rows = Vec::new();
                for index in 0..self.operands.len() {
                    rows.extend(self.aligned(index)?);
                }
                Ok(rows)
            }
            SetOperation::Intersect | SetOperation::Difference => {
                let mut others: Vec<HashSet<Vec<ScalarValue>>> = Vec::new();
                for index in 1..self.operands.len() {
                    others.push(
                        self.aligned(index)?
                            .into_iter()
                            .map(DataPoint::into_values)
                            .collect(),
                    );
                }
                let keep_if_present = self.operation == SetOperation::Intersect;
                Ok(self
                    .aligned(0)?
                    .into_iter()
                    .filter(|point| {
                        let present = |set: &HashSet<Vec<ScalarValue>>| set.contains(point.values());
                        if keep_if_present {
                            others.iter().all(present)
                        } else {
                            !others.iter().any(present)
                        }
                    })
                    .collect())
            }
        }
    }
}

impl Dataset for SetDataset {
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
