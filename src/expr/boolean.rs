// Boolean Operators
//
// Three-valued (Kleene) logic with null as unknown: true and null = null,
// false and null = false, true or null = true, not null = null. Both
// operands are always evaluated; there is no short-circuit.

use std::fmt;

use super::{require_boolean, Expression};
use crate::engine::error::EngineResult;
use crate::model::value::ScalarValue;

/// Binary boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    And,
    Or,
    Xor,
}

impl fmt::Display for BooleanOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BooleanOp::And => write!(f, "and"),
            BooleanOp::Or => write!(f, "or"),
            BooleanOp::Xor => write!(f, "xor"),
        }
    }
}

impl Expression {
    pub fn and(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::boolean(BooleanOp::And, left, right)
    }

    pub fn or(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::boolean(BooleanOp::Or, left, right)
    }

    pub fn xor(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::boolean(BooleanOp::Xor, left, right)
    }

    fn boolean(op: BooleanOp, left: Expression, right: Expression) -> EngineResult<Expression> {
        require_boolean(&left, &op.to_string())?;
        require_boolean(&right, &op.to_string())?;
        Ok(Expression::Boolean {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn not(expr: Expression) -> EngineResult<Expression> {
        require_boolean(&expr, "not")?;
        Ok(Expression::Not {
            expr: Box::new(expr),
        })
    }
}

pub(super) fn eval(op: BooleanOp, left: ScalarValue, right: ScalarValue) -> ScalarValue {
    let l = left.as_boolean();
    let r = right.as_boolean();
    let result = match op {
        BooleanOp::And => match (l, r) {
            (Some(false), _) | (_, Some(false)) => Some(false),
            (Some(true), Some(true)) => Some(true),
            _ => None,
        },
        BooleanOp::Or => match (l, r) {
            (Some(true), _) | (_, Some(true)) => Some(true),
            (Some(false), Some(false)) => Some(false),
            _ => None,
        },
        BooleanOp::Xor => match (l, r) {
            (Some(l), Some(r)) => Some(l != r),
            _ => None,
        },
    };
    match result {
        Some(b) => ScalarValue::Boolean(b),
        None => ScalarValue::Null,
    }
}

pub(super) fn eval_not(value: ScalarValue) -> ScalarValue {
    match value.as_boolean() {
        Some(b) => ScalarValue::Boolean(!b),
        None => ScalarValue::Null,
    }
}
