// Binding Environment
//
// This module defines the flat name-to-value binding store a script
// execution runs against.

use std::fmt;
use std::sync::Arc;

use linked_hash_map::LinkedHashMap;

use super::error::{EngineError, EngineResult};
use crate::model::dataset::Dataset;
use crate::model::value::ScalarValue;

/// A value bound in the environment: a scalar or a dataset.
#[derive(Clone)]
pub enum BoundValue {
    Scalar(ScalarValue),
    Dataset(Arc<dyn Dataset>),
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Scalar(value) => write!(f, "Scalar({})", value),
            BoundValue::Dataset(dataset) => write!(f, "Dataset({})", dataset.structure()),
        }
    }
}

/// The binding store: a single flat scope mapping identifier names to
/// scalars or datasets.
///
/// Insertion order is preserved for diagnostic listing only; it carries no
/// semantics. Rebinding a name keeps its original position.
#[derive(Default)]
pub struct Environment {
    bindings: LinkedHashMap<String, BoundValue>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: LinkedHashMap::new(),
        }
    }

    /// Bind a name, overwriting any prior binding.
    pub fn bind(&mut self, name: impl Into<String>, value: BoundValue) {
        self.bindings.insert(name.into(), value);
    }

    /// Bind a scalar value.
    pub fn bind_scalar(&mut self, name: impl Into<String>, value: impl Into<ScalarValue>) {
        self.bind(name, BoundValue::Scalar(value.into()));
    }

    /// Bind a dataset.
    pub fn bind_dataset(&mut self, name: impl Into<String>, dataset: Arc<dyn Dataset>) {
        self.bind(name, BoundValue::Dataset(dataset));
    }

    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Look up a binding, failing with `UndefinedReference` when absent.
    pub fn lookup(&self, name: &str) -> EngineResult<&BoundValue> {
        self.bindings
            .get(name)
            .ok_or_else(|| EngineError::undefined_reference(format!("undefined reference: {}", name)))
    }

    /// Look up a scalar binding.
    pub fn scalar(&self, name: &str) -> EngineResult<&ScalarValue> {
        match self.lookup(name)? {
            BoundValue::Scalar(value) => Ok(value),
            BoundValue::Dataset(_) => Err(EngineError::invalid_argument(format!(
                "{} is bound to a dataset, not a scalar",
                name
            ))),
        }
    }

    /// Look up a dataset binding.
    pub fn dataset(&self, name: &str) -> EngineResult<Arc<dyn Dataset>> {
        match self.lookup(name)? {
            BoundValue::Dataset(dataset) => Ok(Arc::clone(dataset)),
            BoundValue::Scalar(_) => Err(EngineError::invalid_argument(format!(
                "{} is bound to a scalar, not a dataset",
                name
            ))),
        }
    }

    /// Bound names in insertion order, for diagnostics.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_and_lookup() {
        let mut env = Environment::new();
        env.bind_scalar("x", 3i64);
        assert_eq!(env.scalar("x").unwrap(), &ScalarValue::Integer(3));
        assert!(matches!(
            env.lookup("y"),
            Err(EngineError::UndefinedReference { .. })
        ));
    }

    #[test]
    fn test_rebinding_overwrites() {
        let mut env = Environment::new();
        env.bind_scalar("x", 1i64);
        env.bind_scalar("x", 2i64);
        assert_eq!(env.scalar("x").unwrap(), &ScalarValue::Integer(2));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn test_names_in_insertion_order() {
        let mut env = Environment::new();
        env.bind_scalar("b", 1i64);
        env.bind_scalar("a", 2i64);
        let names: Vec<_> = env.names().collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
