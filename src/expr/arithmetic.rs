// Arithmetic Operators
//
// Widening arithmetic over Integer and Number operands. Integer arithmetic
// is checked; overflow fails rather than wrapping. Division always yields
// Number and a zero divisor yields null.

use std::fmt;

use super::{require_numeric, Expression};
use crate::engine::error::{EngineError, EngineResult};
use crate::model::types::ScalarType;
use crate::model::value::ScalarValue;

/// Binary arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl fmt::Display for ArithmeticOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArithmeticOp::Add => write!(f, "+"),
            ArithmeticOp::Subtract => write!(f, "-"),
            ArithmeticOp::Multiply => write!(f, "*"),
            ArithmeticOp::Divide => write!(f, "/"),
        }
    }
}

impl Expression {
    pub fn add(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::arithmetic(ArithmeticOp::Add, left, right)
    }

    pub fn subtract(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::arithmetic(ArithmeticOp::Subtract, left, right)
    }

    pub fn multiply(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::arithmetic(ArithmeticOp::Multiply, left, right)
    }

    /// Division always produces Number, regardless of operand types.
    pub fn divide(left: Expression, right: Expression) -> EngineResult<Expression> {
        Expression::arithmetic(ArithmeticOp::Divide, left, right)
    }

    fn arithmetic(op: ArithmeticOp, left: Expression, right: Expression) -> EngineResult<Expression> {
        require_numeric(&left, &op.to_string())?;
        require_numeric(&right, &op.to_string())?;
        let ty = if op == ArithmeticOp::Divide {
            ScalarType::Number
        } else {
            // Both operands are numeric or null, so unification succeeds.
            left.result_type()
                .unify(right.result_type())
                .unwrap_or(ScalarType::Number)
        };
        Ok(Expression::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        })
    }

    /// Unary minus.
    pub fn negate(expr: Expression) -> EngineResult<Expression> {
        require_numeric(&expr, "unary -")?;
        Ok(Expression::Negate {
            expr: Box::new(expr),
        })
    }

    /// Unary plus: the numeric identity.
    pub fn plus(expr: Expression) -> EngineResult<Expression> {
        require_numeric(&expr, "unary +")?;
        Ok(expr)
    }
}

pub(super) fn eval(
    op: ArithmeticOp,
    left: ScalarValue,
    right: ScalarValue,
    ty: ScalarType,
) -> EngineResult<ScalarValue> {
    if left.is_null() || right.is_null() {
        return Ok(ScalarValue::Null);
    }
    match op {
        ArithmeticOp::Divide => {
            // as_number is total over non-null numeric values
            let l = left.as_number().unwrap_or_default();
            let r = right.as_number().unwrap_or_default();
            if r == 0.0 {
                Ok(ScalarValue::Null)
            } else {
                Ok(ScalarValue::Number(l / r))
            }
        }
        _ => match (ty, &left, &right) {
            (ScalarType::Integer, ScalarValue::Integer(l), ScalarValue::Integer(r)) => {
                let result = match op {
                    ArithmeticOp::Add => l.checked_add(*r),
                    ArithmeticOp::Subtract => l.checked_sub(*r),
                    ArithmeticOp::Multiply => l.checked_mul(*r),
                    ArithmeticOp::Divide => unreachable!(),
                };
                result.map(ScalarValue::Integer).ok_or_else(|| {
                    EngineError::invalid_argument(format!(
                        "integer overflow in {} {} {}",
                        left, op, right
                    ))
                })
            }
            _ => {
                let l = left.as_number().unwrap_or_default();
                let r = right.as_number().unwrap_or_default();
                let result = match op {
                    ArithmeticOp::Add => l + r,
                    ArithmeticOp::Subtract => l - r,
                    ArithmeticOp::Multiply => l * r,
                    ArithmeticOp::Divide => unreachable!(),
                };
                Ok(ScalarValue::Number(result))
            }
        },
    }
}

pub(super) fn eval_negate(value: ScalarValue) -> EngineResult<ScalarValue> {
    match value {
        ScalarValue::Null => Ok(ScalarValue::Null),
        ScalarValue::Integer(i) => i
            .checked_neg()
            .map(ScalarValue::Integer)
            .ok_or_else(|| EngineError::invalid_argument(format!("integer overflow in -{}", i))),
        ScalarValue::Number(n) => Ok(ScalarValue::Number(-n)),
        other => Err(EngineError::unsupported_type(format!(
            "expected numeric operand for unary -, got {}",
            other.type_of()
        ))),
    }
}
