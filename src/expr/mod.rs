// Resolvable Expression Tree
//
// This module defines the typed scalar expression tree. Every node carries
// a declared result type and resolves to a value of that type (or null)
// against a context. Operand types are validated when a node is built, so
// resolution never has to re-check them.

pub mod arithmetic;
pub mod boolean;
pub mod comparison;
pub mod conditional;
pub mod numeric;
pub mod string;

use std::fmt;

pub use arithmetic::ArithmeticOp;
pub use boolean::BooleanOp;
pub use comparison::ComparisonOp;
pub use numeric::{NumericBinaryFunc, NumericUnaryFunc};
pub use string::StringFunc;

use crate::engine::environment::Environment;
use crate::engine::error::{EngineError, EngineResult};
use crate::model::data_point::DataPoint;
use crate::model::structure::DataStructure;
use crate::model::types::ScalarType;
use crate::model::value::ScalarValue;

/// The resolution context of an expression.
///
/// Top-level scalar expressions resolve against an environment (for
/// binding lookups); row-wise expressions inside dataset operators resolve
/// against a data point. Constants need neither.
#[derive(Clone, Copy, Default)]
pub struct Context<'a> {
    environment: Option<&'a Environment>,
    point: Option<&'a DataPoint>,
}

impl<'a> Context<'a> {
    /// A context with no bindings and no data point.
    pub fn empty() -> Self {
        Context::default()
    }

    /// A context resolving binding references against an environment.
    pub fn with_environment(environment: &'a Environment) -> Self {
        Context {
            environment: Some(environment),
            point: None,
        }
    }

    /// A context resolving column references against a data point.
    pub fn with_point(point: &'a DataPoint) -> Self {
        Context {
            environment: None,
            point: Some(point),
        }
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment
    }

    pub fn point(&self) -> Option<&DataPoint> {
        self.point
    }
}

/// A typed, resolvable scalar expression.
///
/// Nodes own their sub-expressions; the tree is built bottom-up by the
/// constructor functions, which reject operand type mismatches with
/// `UnsupportedType` before anything resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// A literal value carrying its own type tag.
    Constant { value: ScalarValue },
    /// A scalar binding looked up in the environment by name.
    Binding { name: String, ty: ScalarType },
    /// A component of the current data point.
    Column { name: String, ty: ScalarType },
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expression>,
        right: Box<Expression>,
        ty: ScalarType,
    },
    Negate {
        expr: Box<Expression>,
    },
    Comparison {
        op: ComparisonOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Boolean {
        op: BooleanOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Not {
        expr: Box<Expression>,
    },
    If {
        condition: Box<Expression>,
        then_expr: Box<Expression>,
        else_expr: Box<Expression>,
        ty: ScalarType,
    },
    IsNull {
        expr: Box<Expression>,
    },
    StringUnary {
        func: StringFunc,
        expr: Box<Expression>,
    },
    Length {
        expr: Box<Expression>,
    },
    Substr {
        expr: Box<Expression>,
        start: Option<Box<Expression>>,
        end: Option<Box<Expression>>,
    },
    NumericUnary {
        func: NumericUnaryFunc,
        expr: Box<Expression>,
    },
    Round {
        expr: Box<Expression>,
        digits: Option<Box<Expression>>,
    },
    Trunc {
        expr: Box<Expression>,
        digits: Option<Box<Expression>>,
    },
    NumericBinary {
        func: NumericBinaryFunc,
        left: Box<Expression>,
        right: Box<Expression>,
        ty: ScalarType,
    },
}

impl Expression {
    /// A constant expression. The declared type is the value's own tag;
    /// a null constant is typed `Null` and unifies with anything.
    pub fn constant(value: impl Into<ScalarValue>) -> Expression {
        Expression::Constant {
            value: value.into(),
        }
    }

    /// A reference to a scalar binding in the environment.
    ///
    /// The declared type is supplied by the caller, which knows what it
    /// bound; resolution re-checks the bound value against it.
    pub fn binding(name: impl Into<String>, ty: ScalarType) -> Expression {
        Expression::Binding {
            name: name.into(),
            ty,
        }
    }

    /// A reference to a component of the data point under evaluation,
    /// typed by lookup in the given structure.
    pub fn column(structure: &DataStructure, name: &str) -> EngineResult<Expression> {
        let component = structure.component(name).ok_or_else(|| {
            EngineError::undefined_reference(format!("undefined component: {}", name))
        })?;
        Ok(Expression::Column {
            name: name.to_string(),
            ty: component.data_type(),
        })
    }

    /// `isnull(x)`: true when the operand resolves to null. Accepts any
    /// operand type and never yields null itself.
    pub fn is_null(expr: Expression) -> Expression {
        Expression::IsNull {
            expr: Box::new(expr),
        }
    }

    /// The declared result type of this expression.
    pub fn result_type(&self) -> ScalarType {
        match self {
            Expression::Constant { value } => value.type_of(),
            Expression::Binding { ty, .. } | Expression::Column { ty, .. } => *ty,
            Expression::Arithmetic { ty, .. } => *ty,
            Expression::Negate { expr } => expr.result_type(),
            Expression::Comparison { .. }
            | Expression::Boolean { .. }
            | Expression::Not { .. }
            | Expression::IsNull { .. } => ScalarType::Boolean,
            Expression::If { ty, .. } => *ty,
            Expression::StringUnary { .. } | Expression::Substr { .. } => ScalarType::String,
            Expression::Length { .. } => ScalarType::Integer,
            Expression::NumericUnary { func, expr } => func.result_type(expr.result_type()),
            Expression::Round { .. } | Expression::Trunc { .. } => ScalarType::Number,
            Expression::NumericBinary { ty, .. } => *ty,
        }
    }

    /// Resolve the expression against a context.
    ///
    /// The returned value has the declared result type, widened where the
    /// declaration requires it, or is null.
    pub fn resolve(&self, ctx: &Context) -> EngineResult<ScalarValue> {
        match self {
            Expression::Constant { value } => Ok(value.clone()),
            Expression::Binding { name, ty } => {
                let environment = ctx.environment().ok_or_else(|| {
                    EngineError::undefined_reference(format!(
                        "undefined reference: {} (no environment in context)",
                        name
                    ))
                })?;
                let value = environment.scalar(name)?.clone();
                if !value.fits(*ty) {
                    return Err(EngineError::unsupported_type(format!(
                        "binding {} resolved to {} where {} was declared",
                        name,
                        value.type_of(),
                        ty
                    )));
                }
                Ok(value.widen_to(*ty))
            }
            Expression::Column { name, ty } => {
                let point = ctx.point().ok_or_else(|| {
                    EngineError::invalid_argument(format!(
                        "column reference {} outside a data-point context",
                        name
                    ))
                })?;
                let value = point.get(name).cloned().ok_or_else(|| {
                    EngineError::undefined_reference(format!("undefined component: {}", name))
                })?;
                Ok(value.widen_to(*ty))
            }
            Expression::Arithmetic { op, left, right, ty } => {
                let l = left.resolve(ctx)?;
                let r = right.resolve(ctx)?;
                arithmetic::eval(*op, l, r, *ty)
            }
            Expression::Negate { expr } => arithmetic::eval_negate(expr.resolve(ctx)?),
            Expression::Comparison { op, left, right } => {
                let l = left.resolve(ctx)?;
                let r = right.resolve(ctx)?;
                Ok(comparison::eval(*op, l, r))
            }
            Expression::Boolean { op, left, right } => {
                // Kleene semantics: both sides always evaluate, no
                // short-circuit.
                let l = left.resolve(ctx)?;
                let r = right.resolve(ctx)?;
                Ok(boolean::eval(*op, l, r))
            }
            Expression::Not { expr } => Ok(boolean::eval_not(expr.resolve(ctx)?)),
            Expression::If {
                condition,
                then_expr,
                else_expr,
                ty,
            } => conditional::eval(ctx, condition, then_expr, else_expr, *ty),
            Expression::IsNull { expr } => {
                Ok(ScalarValue::Boolean(expr.resolve(ctx)?.is_null()))
            }
            Expression::StringUnary { func, expr } => string::eval_unary(*func, expr.resolve(ctx)?),
            Expression::Length { expr } => string::eval_length(expr.resolve(ctx)?),
            Expression::Substr { expr, start, end } => {
                let value = expr.resolve(ctx)?;
                let start = match start {
                    Some(e) => Some(e.resolve(ctx)?),
                    None => None,
                };
                let end = match end {
                    Some(e) => Some(e.resolve(ctx)?),
                    None => None,
                };
                string::eval_substr(value, start, end)
            }
            Expression::NumericUnary { func, expr } => numeric::eval_unary(*func, expr.resolve(ctx)?),
            Expression::Round { expr, digits } => {
                let value = expr.resolve(ctx)?;
                let digits = match digits {
                    Some(e) => Some(e.resolve(ctx)?),
                    None => None,
                };
                numeric::eval_round(value, digits, false)
            }
            Expression::Trunc { expr, digits } => {
                let value = expr.resolve(ctx)?;
                let digits = match digits {
                    Some(e) => Some(e.resolve(ctx)?),
                    None => None,
                };
                numeric::eval_round(value, digits, true)
            }
            Expression::NumericBinary { func, left, right, ty } => {
                let l = left.resolve(ctx)?;
                let r = right.resolve(ctx)?;
                numeric::eval_binary(*func, l, r, *ty)
            }
        }
    }
}

// Operand type checks shared by the constructor functions. All accept the
// Null type, which stands for an untyped null literal.

pub(crate) fn require_numeric(expr: &Expression, operation: &str) -> EngineResult<()> {
    let ty = expr.result_type();
    if ty.is_numeric() || ty == ScalarType::Null {
        Ok(())
    } else {
        Err(EngineError::unsupported_type(format!(
            "expected numeric operand for {}, got {}",
            operation, ty
        )))
    }
}

pub(crate) fn require_integer(expr: &Expression, operation: &str) -> EngineResult<()> {
    let ty = expr.result_type();
    if ty == ScalarType::Integer || ty == ScalarType::Null {
        Ok(())
    } else {
        Err(EngineError::unsupported_type(format!(
            "expected integer operand for {}, got {}",
            operation, ty
        )))
    }
}

pub(crate) fn require_string(expr: &Expression, operation: &str) -> EngineResult<()> {
    let ty = expr.result_type();
    if ty == ScalarType::String || ty == ScalarType::Null {
        Ok(())
    } else {
        Err(EngineError::unsupported_type(format!(
            "expected string operand for {}, got {}",
            operation, ty
        )))
    }
}

pub(crate) fn require_boolean(expr: &Expression, operation: &str) -> EngineResult<()> {
    let ty = expr.result_type();
    if ty == ScalarType::Boolean || ty == ScalarType::Null {
        Ok(())
    } else {
        Err(EngineError::unsupported_type(format!(
            "expected boolean operand for {}, got {}",
            operation, ty
        )))
    }
}

impl fmt::Display for Expression {
    /// Renders the expression in VTL literal form. Error messages about a
    /// malformed call embed this rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant { value } => write!(f, "{}", value),
            Expression::Binding { name, .. } | Expression::Column { name, .. } => {
                write!(f, "{}", name)
            }
            Expression::Arithmetic { op, left, right, .. } => {
                write!(f, "{} {} {}", left, op, right)
            }
            Expression::Negate { expr } => write!(f, "-{}", expr),
            Expression::Comparison { op, left, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            Expression::Boolean { op, left, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            Expression::Not { expr } => write!(f, "not {}", expr),
            Expression::If {
                condition,
                then_expr,
                else_expr,
                ..
            } => write!(f, "if {} then {} else {}", condition, then_expr, else_expr),
            Expression::IsNull { expr } => write!(f, "isnull({})", expr),
            Expression::StringUnary { func, expr } => write!(f, "{}({})", func, expr),
            Expression::Length { expr } => write!(f, "length({})", expr),
            Expression::Substr { expr, start, end } => {
                write!(f, "substr({}", expr)?;
                if let Some(start) = start {
                    write!(f, ",{}", start)?;
                }
                if let Some(end) = end {
                    write!(f, ",{}", end)?;
                }
                write!(f, ")")
            }
            Expression::NumericUnary { func, expr } => write!(f, "{}({})", func, expr),
            Expression::Round { expr, digits } => match digits {
                Some(digits) => write!(f, "round({},{})", expr, digits),
                None => write!(f, "round({})", expr),
            },
            Expression::Trunc { expr, digits } => match digits {
                Some(digits) => write!(f, "trunc({},{})", expr, digits),
                None => write!(f, "trunc({})", expr),
            },
            Expression::NumericBinary { func, left, right, .. } => {
                write!(f, "{}({},{})", func, left, right)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_type_and_resolution() {
        let expr = Expression::constant(42i64);
        assert_eq!(expr.result_type(), ScalarType::Integer);
        assert_eq!(
            expr.resolve(&Context::empty()).unwrap(),
            ScalarValue::Integer(42)
        );
    }

    #[test]
    fn test_binding_resolution() {
        let mut env = Environment::new();
        env.bind_scalar("x", 2.5f64);
        let expr = Expression::binding("x", ScalarType::Number);
        let value = expr.resolve(&Context::with_environment(&env)).unwrap();
        assert_eq!(value, ScalarValue::Number(2.5));
    }

    #[test]
    fn test_binding_without_environment_fails() {
        let expr = Expression::binding("x", ScalarType::Number);
        assert!(matches!(
            expr.resolve(&Context::empty()),
            Err(EngineError::UndefinedReference { .. })
        ));
    }

    #[test]
    fn test_display_literal_form() {
        let expr = Expression::constant("abc");
        assert_eq!(expr.to_string(), "\"abc\"");
        let sum = Expression::add(Expression::constant(1i64), Expression::constant(2i64)).unwrap();
        assert_eq!(sum.to_string(), "1 + 2");
    }
}
