// Scalar Type Tags
//
// This module defines the closed scalar type set and the component roles.

use std::fmt;

/// Scalar types supported by the engine.
///
/// `Null` is the type of an untyped null literal; it unifies with every
/// other type and is not a legal component type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Integer,
    Number,
    String,
    Boolean,
    Null,
}

impl ScalarType {
    /// Check whether this type can hold numeric values.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ScalarType::Integer | ScalarType::Number)
    }

    /// Compute the common widened type of two scalar types.
    ///
    /// `Null` unifies with anything, Integer widens to Number, and every
    /// type unifies with itself. Returns `None` for incompatible pairs.
    pub fn unify(self, other: ScalarType) -> Option<ScalarType> {
        match (self, other) {
            (ScalarType::Null, t) | (t, ScalarType::Null) => Some(t),
            (a, b) if a == b => Some(a),
            (ScalarType::Integer, ScalarType::Number) | (ScalarType::Number, ScalarType::Integer) => {
                Some(ScalarType::Number)
            }
            _ => None,
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Integer => write!(f, "integer"),
            ScalarType::Number => write!(f, "number"),
            ScalarType::String => write!(f, "string"),
            ScalarType::Boolean => write!(f, "boolean"),
            ScalarType::Null => write!(f, "null"),
        }
    }
}

/// Role of a component inside a data structure.
///
/// Identifiers jointly key a data point; measures carry the observed
/// values; attributes carry metadata about them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Role {
    Identifier,
    Measure,
    Attribute,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Identifier => write!(f, "identifier"),
            Role::Measure => write!(f, "measure"),
            Role::Attribute => write!(f, "attribute"),
        }
    }
}
