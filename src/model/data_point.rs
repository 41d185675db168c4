// Data Point Rows
//
// This module defines the immutable positional row of a dataset.

use std::fmt;
use std::sync::Arc;

use super::structure::DataStructure;
use super::value::ScalarValue;
use crate::engine::error::{EngineError, EngineResult};

/// One row of a dataset.
///
/// Arity and positional types are validated against the structure at
/// construction; after that the point is immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct DataPoint {
    structure: Arc<DataStructure>,
    values: Vec<ScalarValue>,
}

impl DataPoint {
    /// Build a data point, checking arity and per-slot type compatibility.
    pub fn new(structure: Arc<DataStructure>, values: Vec<ScalarValue>) -> EngineResult<Self> {
        if values.len() != structure.len() {
            return Err(EngineError::invalid_argument(format!(
                "data point arity {} does not match structure arity {}",
                values.len(),
                structure.len()
            )));
        }
        for (component, value) in structure.components().iter().zip(&values) {
            if !value.fits(component.data_type()) {
                return Err(EngineError::unsupported_type(format!(
                    "value {} does not fit component {} of type {}",
                    value,
                    component.name(),
                    component.data_type()
                )));
            }
        }
        Ok(DataPoint { structure, values })
    }

    pub fn structure(&self) -> &Arc<DataStructure> {
        &self.structure
    }

    /// Value at a position. Panics on out-of-range positions, which would
    /// indicate a broken structure invariant.
    pub fn at(&self, position: usize) -> &ScalarValue {
        &self.values[position]
    }

    /// Value of a named component, if the structure has one.
    pub fn get(&self, name: &str) -> Option<&ScalarValue> {
        self.structure.position(name).map(|position| &self.values[position])
    }

    pub fn values(&self) -> &[ScalarValue] {
        &self.values
    }

    /// Consume the point and return its values.
    pub fn into_values(self) -> Vec<ScalarValue> {
        self.values
    }

    /// Extract the values of the named components, in the order given.
    ///
    /// Used for join and group keys. The names must exist in the structure.
    pub(crate) fn key(&self, names: &[String]) -> Vec<ScalarValue> {
        names
            .iter()
            .filter_map(|name| self.get(name).cloned())
            .collect()
    }
}

impl fmt::Display for DataPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::component::Component;
    use crate::model::types::ScalarType;

    fn structure() -> Arc<DataStructure> {
        Arc::new(
            DataStructure::new(vec![
                Component::identifier("id", ScalarType::String),
                Component::measure("value", ScalarType::Integer),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_access_by_name_and_position() {
        let point = DataPoint::new(
            structure(),
            vec![ScalarValue::from("a"), ScalarValue::Integer(3)],
        )
        .unwrap();
        assert_eq!(point.get("value"), Some(&ScalarValue::Integer(3)));
        assert_eq!(point.at(0), &ScalarValue::from("a"));
        assert_eq!(point.get("missing"), None);
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let result = DataPoint::new(structure(), vec![ScalarValue::from("a")]);
        assert!(matches!(result, Err(EngineError::InvalidArgument { .. })));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let result = DataPoint::new(
            structure(),
            vec![ScalarValue::Integer(1), ScalarValue::Integer(3)],
        );
        assert!(matches!(result, Err(EngineError::UnsupportedType { .. })));
    }

    #[test]
    fn test_null_fits_any_slot() {
        let point = DataPoint::new(structure(), vec![ScalarValue::Null, ScalarValue::Null]);
        assert!(point.is_ok());
    }
}
