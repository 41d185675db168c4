// Comparison Operators
//
// Null-propagating comparisons: total order on numerics, code-point order
// on strings, equality on booleans.

use std::cmp::Ordering;
use std::fmt;

use super::Expression;
use crate::engine::error::{EngineError, EngineResult};
use crate::model::types::ScalarType;
use crate::model::value::ScalarValue;

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl ComparisonOp {
    fn is_ordering(&self) -> bool {
        !matches!(self, ComparisonOp::Equal | ComparisonOp::NotEqual)
    }

    fn test(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Equal => ordering == Ordering::Equal,
            ComparisonOp::NotEqual => ordering != Ordering::Equal,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessOrEqual => ordering != Ordering::Greater,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonOp::Equal => write!(f, "="),
            ComparisonOp::NotEqual => write!(f, "<>"),
            ComparisonOp::LessThan => write!(f, "<"),
            ComparisonOp::LessOrEqual => write!(f, "<="),
            ComparisonOp::GreaterThan => write!(f, ">"),
            ComparisonOp::GreaterOrEqual => write!(f, ">="),
        }
    }
}

impl Expression {
    pub fn equal(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::comparison(ComparisonOp::Equal, left, right)
    }

    pub fn not_equal(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::comparison(ComparisonOp::NotEqual, left, right)
    }

    pub fn less_than(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::comparison(ComparisonOp::LessThan, left, right)
    }

    pub fn less_or_equal(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::comparison(ComparisonOp::LessOrEqual, left, right)
    }

    pub fn greater_than(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::comparison(ComparisonOp::GreaterThan, left, right)
    }

    pub fn greater_or_equal(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::comparison(ComparisonOp::GreaterOrEqual, left, right)
    }

    fn comparison(op: ComparisonOp, left: Expression, right: Expression) -> EngineResult<Expression> {
        let common = left
            .result_type()
            .unify(right.result_type())
            .ok_or_else(|| {
                EngineError::unsupported_type(format!(
                    "cannot compare {} with {}",
                    left.result_type(),
                    right.result_type()
                ))
            })?;
        // Booleans admit equality only; order comparisons need numerics
        // or strings.
        if op.is_ordering() && common == ScalarType::Boolean {
            return Err(EngineError::unsupported_type(format!(
                "operator {} is not defined on boolean operands",
                op
            )));
        }
        Ok(Expression::Comparison {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }
}

pub(super) fn eval(op: ComparisonOp, left: ScalarValue, right: ScalarValue) -> ScalarValue {
    if left.is_null() || right.is_null() {
        return ScalarValue::Null;
    }
    let ordering = match (&left, &right) {
        (ScalarValue::Integer(l), ScalarValue::Integer(r)) => Some(l.cmp(r)),
        (ScalarValue::String(l), ScalarValue::String(r)) => Some(l.cmp(r)),
        (ScalarValue::Boolean(l), ScalarValue::Boolean(r)) => Some(l.cmp(r)),
        _ => match (left.as_number(), right.as_number()) {
            (Some(l), Some(r)) => l.partial_cmp(&r),
            _ => None,
        },
    };
    match ordering {
        Some(ordering) => ScalarValue::Boolean(op.test(ordering)),
        // NaN comparisons have no defined order
        None => ScalarValue::Null,
    }
}
