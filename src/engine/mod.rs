// Execution Engine Module
//
// Statement execution over a flat binding environment: resolve the
// right-hand side, bind the result under the target name.

pub mod environment;
pub mod error;

use std::sync::Arc;

use log::debug;

pub use environment::{BoundValue, Environment};
pub use error::{EngineError, EngineResult, Span};

use crate::expr::{Context, Expression};
use crate::model::dataset::Dataset;

/// An assignment: a target name and the expression or dataset bound to it.
#[derive(Clone)]
pub struct Statement {
    target: String,
    value: StatementValue,
}

/// The right-hand side of a statement.
#[derive(Clone)]
pub enum StatementValue {
    Scalar(Expression),
    Dataset(Arc<dyn Dataset>),
}

impl Statement {
    /// Assign the result of a scalar expression.
    pub fn scalar(target: impl Into<String>, expression: Expression) -> Statement {
        Statement {
            target: target.into(),
            value: StatementValue::Scalar(expression),
        }
    }

    /// Assign a dataset.
    pub fn dataset(target: impl Into<String>, dataset: Arc<dyn Dataset>) -> Statement {
        Statement {
            target: target.into(),
            value: StatementValue::Dataset(dataset),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn value(&self) -> &StatementValue {
        &self.value
    }
}

/// Drives statements against an environment.
///
/// One engine owns one environment for the duration of a script
/// execution; statements run synchronously in submission order.
#[derive(Default)]
pub struct Engine {
    environment: Environment,
}

impl Engine {
    pub fn new() -> Self {
        Engine {
            environment: Environment::new(),
        }
    }

    /// Start from a pre-populated environment (input bindings).
    pub fn with_environment(environment: Environment) -> Self {
        Engine { environment }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut Environment {
        &mut self.environment
    }

    /// Execute one statement and return the bound result.
    ///
    /// Scalar expressions resolve against the current environment;
    /// datasets bind as-is (their rows stay lazy). On error the
    /// environment is left untouched.
    pub fn execute(&mut self, statement: &Statement) -> EngineResult<BoundValue> {
        let result = match &statement.value {
            StatementValue::Scalar(expression) => {
                let value = expression.resolve(&Context::with_environment(&self.environment))?;
                BoundValue::Scalar(value)
            }
            StatementValue::Dataset(dataset) => BoundValue::Dataset(Arc::clone(dataset)),
        };
        debug!("binding {} := {:?}", statement.target, result);
        self.environment.bind(&statement.target, result.clone());
        Ok(result)
    }

    /// Execute statements in order, stopping at the first error. Prior
    /// bindings survive a failed statement.
    pub fn execute_all(&mut self, statements: &[Statement]) -> EngineResult<()> {
        for statement in statements {
            self.execute(statement)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::ScalarType;
    use crate::model::value::ScalarValue;

    #[test]
    fn test_execute_binds_scalar() {
        let mut engine = Engine::new();
        let statement = Statement::scalar("x", Expression::constant(5i64));
        engine.execute(&statement).unwrap();
        assert_eq!(
            engine.environment().scalar("x").unwrap(),
            &ScalarValue::Integer(5)
        );
    }

    #[test]
    fn test_statement_can_read_prior_bindings() {
        let mut engine = Engine::new();
        engine.execute(&Statement::scalar("x", Expression::constant(2i64))).unwrap();
        let doubled = Expression::multiply(
            Expression::binding("x", ScalarType::Integer),
            Expression::constant(2i64),
        )
        .unwrap();
        engine.execute(&Statement::scalar("y", doubled)).unwrap();
        assert_eq!(
            engine.environment().scalar("y").unwrap(),
            &ScalarValue::Integer(4)
        );
    }

    #[test]
    fn test_failed_statement_leaves_environment_intact() {
        let mut engine = Engine::new();
        engine.execute(&Statement::scalar("x", Expression::constant(1i64))).unwrap();
        let missing = Statement::scalar("y", Expression::binding("gone", ScalarType::Integer));
        assert!(engine.execute(&missing).is_err());
        assert!(engine.environment().contains("x"));
        assert!(!engine.environment().contains("y"));
    }
}
