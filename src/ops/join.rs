// Join Operator
//
// Hash join of two datasets on their shared identifiers. The right side
// is built into a hash table keyed by the shared identifier values, the
// left side probes it. Join keys compare with null equal to null.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::model::data_point::DataPoint;
use crate::model::dataset::{Dataset, InMemoryDataset, RowStream};
use crate::model::structure::DataStructure;
use crate::model::value::ScalarValue;

/// The supported join flavors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
    FullOuter,
}

/// A join of two datasets on their shared identifiers.
pub struct JoinedDataset {
    kind: JoinKind,
    left: Arc<dyn Dataset>,
    right: Arc<dyn Dataset>,
    structure: Arc<DataStructure>,
    /// Names of the shared identifiers, in left structure order.
    shared: Vec<String>,
}

impl JoinedDataset {
    pub fn inner(left: Arc<dyn Dataset>, right: Arc<dyn Dataset>) -> EngineResult<Self> {
        JoinedDataset::new(JoinKind::Inner, left, right)
    }

    pub fn left_outer(left: Arc<dyn Dataset>, right: Arc<dyn Dataset>) -> EngineResult<Self> {
        JoinedDataset::new(JoinKind::LeftOuter, left, right)
    }

    pub fn full_outer(left: Arc<dyn Dataset>, right: Arc<dyn Dataset>) -> EngineResult<Self> {
        JoinedDataset::new(JoinKind::FullOuter, left, right)
    }

    /// Build a join, validating the identifier overlap and deriving the
    /// merged structure.
    pub fn new(
        kind: JoinKind,
        left: Arc<dyn Dataset>,
        right: Arc<dyn Dataset>,
    ) -> EngineResult<Self> {
        if !left.structure().has_identifiers() || !right.structure().has_identifiers() {
            return Err(EngineError::invalid_argument(
                "both join inputs need at least one identifier",
            ));
        }

        let mut shared = Vec::new();
        for identifier in left.structure().identifiers() {
            if let Some(other) = right.structure().component(identifier.name()) {
                if !other.is_identifier() {
                    return Err(EngineError::invalid_argument(format!(
                        "component {} is an identifier on one side only",
                        identifier.name()
                    )));
                }
                if other.data_type() != identifier.data_type() {
                    return Err(EngineError::invalid_argument(format!(
                        "shared identifier {} has type {} on the left and {} on the right",
                        identifier.name(),
                        identifier.data_type(),
                        other.data_type()
                    )));
                }
                shared.push(identifier.name().to_string());
            }
        }
        if shared.is_empty() {
            return Err(EngineError::invalid_argument(
                "join inputs share no identifiers",
            ));
        }

        // Any other name present on both sides would collide in the
        // merged structure; callers disambiguate with a rename first.
        for component in right.structure().components() {
            if !shared.iter().any(|name| name == component.name())
                && left.structure().contains(component.name())
            {
                return Err(EngineError::invalid_argument(format!(
                    "component {} exists on both join sides; rename one of them",
                    component.name()
                )));
            }
        }

        // Merged order: left identifiers, unshared right identifiers,
        // left non-identifiers, right non-identifiers.
        let mut components = Vec::new();
        components.extend(left.structure().identifiers().cloned());
        components.extend(
            right
                .structure()
                .identifiers()
                .filter(|c| !shared.iter().any(|name| name == c.name()))
                .cloned(),
        );
        components.extend(
            left.structure()
                .components()
                .iter()
                .filter(|c| !c.is_identifier())
                .cloned(),
        );
        components.extend(
            right
                .structure()
                .components()
                .iter()
                .filter(|c| !c.is_identifier())
                .cloned(),
        );
        let structure = Arc::new(DataStructure::new(components)?);

        Ok(JoinedDataset {
            kind,
            left,
            right,
            structure,
            shared,
        })
    }

    /// Merge a pair of matched points (or one unmatched side) into an
    /// output row, filling the missing side with nulls.
    fn merge(&self, left: Option<&DataPoint>, right: Option<&DataPoint>) -> EngineResult<DataPoint> {
        let values = self
            .structure
            .components()
            .iter()
            .map(|component| {
                left.and_then(|point| point.get(component.name()))
                    .or_else(|| right.and_then(|point| point.get(component.name())))
                    .cloned()
                    .unwrap_or(ScalarValue::Null)
            })
            .collect();
        DataPoint::new(Arc::clone(&self.structure), values)
    }

    fn compute(&self) -> EngineResult<Vec<DataPoint>> {
        let build = InMemoryDataset::from_dataset(self.right.as_ref())?;
        let mut table: HashMap<Vec<ScalarValue>, Vec<usize>> = HashMap::new();
        for (index, point) in build.points().iter().enumerate() {
            table.entry(point.key(&self.shared)).or_default().push(index);
        }

        let mut matched = vec![false; build.len()];
        let mut rows = Vec::new();
        for point in self.left.scan() {
            let point = point?;
            match table.get(&point.key(&self.shared)) {
                Some(indexes) => {
                    for &index in indexes {
                        matched[index] = true;
                        rows.push(self.merge(Some(&point), Some(&build.points()[index]))?);
                    }
                }
                None => {
                    if self.kind != JoinKind::Inner {
                        rows.push(self.merge(Some(&point), None)?);
                    }
                }
            }
        }

        if self.kind == JoinKind::FullOuter {
            for (index, point) in build.points().iter().enumerate() {
                if !matched[index] {
                    rows.push(self.merge(None, Some(point))?);
                }
            }
        }

        Ok(rows)
    }
}

impl Dataset for JoinedDataset {
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
