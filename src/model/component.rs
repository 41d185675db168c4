// Component Descriptors
//
// This module defines the named, typed, role-bearing column descriptor.

use std::fmt;

use super::types::{Role, ScalarType};

/// A column descriptor: name, scalar type and role.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Component {
    name: String,
    data_type: ScalarType,
    role: Role,
}

impl Component {
    pub fn new(name: impl Into<String>, data_type: ScalarType, role: Role) -> Self {
        Component {
            name: name.into(),
            data_type,
            role,
        }
    }

    /// Shorthand for an identifier component.
    pub fn identifier(name: impl Into<String>, data_type: ScalarType) -> Self {
        Component::new(name, data_type, Role::Identifier)
    }

    /// Shorthand for a measure component.
    pub fn measure(name: impl Into<String>, data_type: ScalarType) -> Self {
        Component::new(name, data_type, Role::Measure)
    }

    /// Shorthand for an attribute component.
    pub fn attribute(name: impl Into<String>, data_type: ScalarType) -> Self {
        Component::new(name, data_type, Role::Attribute)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> ScalarType {
        self.data_type
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn is_identifier(&self) -> bool {
        self.role == Role::Identifier
    }

    /// Copy of this component under a different name.
    pub(crate) fn renamed(&self, name: impl Into<String>) -> Component {
        Component::new(name, self.data_type, self.role)
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.name, self.data_type, self.role)
    }
}
