// Scalar Value Representation
//
// This module defines the tagged union of runtime scalar values.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::types::ScalarType;

/// A runtime scalar value.
///
/// Null is a first-class value, not an absence: every typed slot admits it
/// and operators propagate it according to three-valued logic.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Integer(i64),
    Number(f64),
    String(String),
    Boolean(bool),
}

impl Eq for ScalarValue {}

impl Hash for ScalarValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Type discriminant first so values of different types never collide
        match self {
            ScalarValue::Null => {
                0.hash(state);
            }
            ScalarValue::Integer(i) => {
                1.hash(state);
                i.hash(state);
            }
            ScalarValue::Number(n) => {
                2.hash(state);
                n.to_bits().hash(state);
            }
            ScalarValue::String(s) => {
                3.hash(state);
                s.hash(state);
            }
            ScalarValue::Boolean(b) => {
                4.hash(state);
                b.hash(state);
            }
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => write!(f, "null"),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Number(n) => write!(f, "{}", n),
            ScalarValue::String(s) => write!(f, "\"{}\"", s),
            ScalarValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl ScalarValue {
    /// The type tag of this value. Null reports `ScalarType::Null`.
    pub fn type_of(&self) -> ScalarType {
        match self {
            ScalarValue::Null => ScalarType::Null,
            ScalarValue::Integer(_) => ScalarType::Integer,
            ScalarValue::Number(_) => ScalarType::Number,
            ScalarValue::String(_) => ScalarType::String,
            ScalarValue::Boolean(_) => ScalarType::Boolean,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Check whether this value can occupy a slot of the given type.
    ///
    /// Null fits everywhere; Integer fits a Number slot through widening.
    pub fn fits(&self, ty: ScalarType) -> bool {
        match self {
            ScalarValue::Null => true,
            ScalarValue::Integer(_) => matches!(ty, ScalarType::Integer | ScalarType::Number),
            ScalarValue::Number(_) => ty == ScalarType::Number,
            ScalarValue::String(_) => ty == ScalarType::String,
            ScalarValue::Boolean(_) => ty == ScalarType::Boolean,
        }
    }

    /// View a numeric value as a double. None for non-numeric or null.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ScalarValue::Integer(i) => Some(*i as f64),
            ScalarValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ScalarValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Widen an Integer to a Number when the target type requires it.
    ///
    /// Used where a resolved value must match a declared widened type, e.g.
    /// the branches of a conditional. Null passes through unchanged.
    pub fn widen_to(self, ty: ScalarType) -> ScalarValue {
        match (self, ty) {
            (ScalarValue::Integer(i), ScalarType::Number) => ScalarValue::Number(i as f64),
            (v, _) => v,
        }
    }

    /// Compare two values of compatible types, ordering null before
    /// everything else. Mixed Integer/Number pairs compare numerically.
    ///
    /// Used by the min/max reducers, where null must win a minimum and
    /// lose a maximum.
    pub fn cmp_nulls_first(&self, other: &ScalarValue) -> Ordering {
        match (self, other) {
            (ScalarValue::Null, ScalarValue::Null) => Ordering::Equal,
            (ScalarValue::Null, _) => Ordering::Less,
            (_, ScalarValue::Null) => Ordering::Greater,
            (ScalarValue::Integer(a), ScalarValue::Integer(b)) => a.cmp(b),
            (ScalarValue::Boolean(a), ScalarValue::Boolean(b)) => a.cmp(b),
            (ScalarValue::String(a), ScalarValue::String(b)) => a.cmp(b),
            (a, b) => match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            },
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(v: i64) -> Self {
        ScalarValue::Integer(v)
    }
}

impl From<f64> for ScalarValue {
    fn from(v: f64) -> Self {
        ScalarValue::Number(v)
    }
}

impl From<&str> for ScalarValue {
    fn from(v: &str) -> Self {
        ScalarValue::String(v.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(v: String) -> Self {
        ScalarValue::String(v)
    }
}

impl From<bool> for ScalarValue {
    fn from(v: bool) -> Self {
        ScalarValue::Boolean(v)
    }
}
