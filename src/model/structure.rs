// Data Structure Schemas
//
// This module defines the ordered component sequence that types a dataset.

use std::collections::HashMap;
use std::fmt;

use super::component::Component;
use super::types::{Role, ScalarType};
use crate::engine::error::{EngineError, EngineResult};

/// The schema of a dataset: an ordered sequence of uniquely named
/// components with a name lookup index.
///
/// Two structures are equal when they carry the same multiset of
/// (name, type, role) triples, regardless of component order.
#[derive(Debug, Clone)]
pub struct DataStructure {
    components: Vec<Component>,
    index: HashMap<String, usize>,
}

impl DataStructure {
    /// Build a structure from components.
    ///
    /// Rejects duplicate component names and components declared with the
    /// null type.
    pub fn new(components: Vec<Component>) -> EngineResult<Self> {
        let mut index = HashMap::with_capacity(components.len());
        for (position, component) in components.iter().enumerate() {
            if component.data_type() == ScalarType::Null {
                return Err(EngineError::unsupported_type(format!(
                    "component {} cannot be declared with type null",
                    component.name()
                )));
            }
            if index.insert(component.name().to_string(), position).is_some() {
                return Err(EngineError::invalid_argument(format!(
                    "duplicate component name: {}",
                    component.name()
                )));
            }
        }
        Ok(DataStructure { components, index })
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Look up a component by name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.index.get(name).map(|&position| &self.components[position])
    }

    /// Positional index of a named component.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Components with the identifier role, in structure order.
    pub fn identifiers(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.role() == Role::Identifier)
    }

    /// Components with the measure role, in structure order.
    pub fn measures(&self) -> impl Iterator<Item = &Component> {
        self.components.iter().filter(|c| c.role() == Role::Measure)
    }

    /// Names of the identifier components, in structure order.
    pub fn identifier_names(&self) -> Vec<&str> {
        self.identifiers().map(|c| c.name()).collect()
    }

    pub fn has_identifiers(&self) -> bool {
        self.identifiers().next().is_some()
    }
}

impl PartialEq for DataStructure {
    fn eq(&self, other: &Self) -> bool {
        if self.components.len() != other.components.len() {
            return false;
        }
        // Multiset comparison: names are unique, so sorting by name is a
        // total order over the triples.
        let mut left: Vec<&Component> = self.components.iter().collect();
        let mut right: Vec<&Component> = other.components.iter().collect();
        left.sort_by(|a, b| a.name().cmp(b.name()));
        right.sort_by(|a, b| a.name().cmp(b.name()));
        left == right
    }
}

impl Eq for DataStructure {}

impl fmt::Display for DataStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", component)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> DataStructure {
        DataStructure::new(vec![
            Component::identifier("id", ScalarType::String),
            Component::measure("value", ScalarType::Integer),
            Component::attribute("unit", ScalarType::String),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup() {
        let structure = abc();
        assert_eq!(structure.position("value"), Some(1));
        assert_eq!(structure.component("unit").unwrap().role(), Role::Attribute);
        assert!(structure.component("missing").is_none());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = DataStructure::new(vec![
            Component::identifier("id", ScalarType::String),
            Component::measure("id", ScalarType::Integer),
        ]);
        assert!(matches!(result, Err(EngineError::InvalidArgument { .. })));
    }

    #[test]
    fn test_null_component_type_rejected() {
        let result = DataStructure::new(vec![Component::measure("m", ScalarType::Null)]);
        assert!(matches!(result, Err(EngineError::UnsupportedType { .. })));
    }

    #[test]
    fn test_multiset_equality_ignores_order() {
        let a = abc();
        let b = DataStructure::new(vec![
            Component::attribute("unit", ScalarType::String),
            Component::identifier("id", ScalarType::String),
            Component::measure("value", ScalarType::Integer),
        ])
        .unwrap();
        assert_eq!(a, b);

        let c = DataStructure::new(vec![
            Component::identifier("id", ScalarType::String),
            Component::measure("value", ScalarType::Number),
            Component::attribute("unit", ScalarType::String),
        ])
        .unwrap();
        assert_ne!(a, c);
    }
}
