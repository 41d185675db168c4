// Numeric Functions
//
// Absolute value, rounding, roots, logarithms, powers and modulo.
// Domain violations (negative square roots, zero modulus, degenerate log
// bases) yield null rather than failing.

use std::fmt;

use super::{require_integer, require_numeric, Expression};
use crate::engine::error::{EngineError, EngineResult};
use crate::model::types::ScalarType;
use crate::model::value::ScalarValue;

/// Unary numeric functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericUnaryFunc {
    Abs,
    Ceil,
    Floor,
    Sqrt,
    Ln,
    Exp,
}

impl NumericUnaryFunc {
    /// Result type for an operand of the given type.
    pub(super) fn result_type(&self, operand: ScalarType) -> ScalarType {
        match self {
            NumericUnaryFunc::Abs => operand,
            NumericUnaryFunc::Ceil | NumericUnaryFunc::Floor => ScalarType::Integer,
            NumericUnaryFunc::Sqrt | NumericUnaryFunc::Ln | NumericUnaryFunc::Exp => {
                ScalarType::Number
            }
        }
    }
}

impl fmt::Display for NumericUnaryFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericUnaryFunc::Abs => write!(f, "abs"),
            NumericUnaryFunc::Ceil => write!(f, "ceil"),
            NumericUnaryFunc::Floor => write!(f, "floor"),
            NumericUnaryFunc::Sqrt => write!(f, "sqrt"),
            NumericUnaryFunc::Ln => write!(f, "ln"),
            NumericUnaryFunc::Exp => write!(f, "exp"),
        }
    }
}

/// Binary numeric functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericBinaryFunc {
    Log,
    Power,
    Mod,
}

impl fmt::Display for NumericBinaryFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericBinaryFunc::Log => write!(f, "log"),
            NumericBinaryFunc::Power => write!(f, "power"),
            NumericBinaryFunc::Mod => write!(f, "mod"),
        }
    }
}

impl Expression {
    /// `abs(x)`: result type follows the operand.
    pub fn abs(expr: Expression) -> EngineResult<Expression> {
        Expression::numeric_unary(NumericUnaryFunc::Abs, expr)
    }

    /// `ceil(x)`: smallest integer not less than x, as Integer. Inputs
    /// outside the Integer range fail rather than saturate.
    pub fn ceil(expr: Expression) -> EngineResult<Expression> {
        Expression::numeric_unary(NumericUnaryFunc::Ceil, expr)
    }

    /// `floor(x)`: largest integer not greater than x, as Integer. Inputs
    /// outside the Integer range fail rather than saturate.
    pub fn floor(expr: Expression) -> EngineResult<Expression> {
        Expression::numeric_unary(NumericUnaryFunc::Floor, expr)
    }

    /// `sqrt(x)`: null for negative x.
    pub fn sqrt(expr: Expression) -> EngineResult<Expression> {
        Expression::numeric_unary(NumericUnaryFunc::Sqrt, expr)
    }

    /// `ln(x)`: natural logarithm, null for non-positive x.
    pub fn ln(expr: Expression) -> EngineResult<Expression> {
        Expression::numeric_unary(NumericUnaryFunc::Ln, expr)
    }

    /// `exp(x)`.
    pub fn exp(expr: Expression) -> EngineResult<Expression> {
        Expression::numeric_unary(NumericUnaryFunc::Exp, expr)
    }

    fn numeric_unary(func: NumericUnaryFunc, expr: Expression) -> EngineResult<Expression> {
        require_numeric(&expr, &func.to_string())?;
        Ok(Expression::NumericUnary {
            func,
            expr: Box::new(expr),
        })
    }

    /// `round(x, n)`: round half away from zero to n decimal places
    /// (default 0). Always Number.
    pub fn round(expr: Expression, digits: Option<Expression>) -> EngineResult<Expression> {
        require_numeric(&expr, "round")?;
        if let Some(digits) = &digits {
            require_integer(digits, "round")?;
        }
        Ok(Expression::Round {
            expr: Box::new(expr),
            digits: digits.map(Box::new),
        })
    }

    /// `trunc(x, n)`: truncate toward zero at n decimal places
    /// (default 0). Always Number.
    pub fn trunc(expr: Expression, digits: Option<Expression>) -> EngineResult<Expression> {
        require_numeric(&expr, "trunc")?;
        if let Some(digits) = &digits {
            require_integer(digits, "trunc")?;
        }
        Ok(Expression::Trunc {
            expr: Box::new(expr),
            digits: digits.map(Box::new),
        })
    }

    /// `log(x, base)`: null for non-positive x, non-positive base or
    /// base 1.
    pub fn log(expr: Expression, base: Expression) -> EngineResult<Expression> {
        Expression::numeric_binary(NumericBinaryFunc::Log, expr, base)
    }

    /// `power(x, y)`: null when the result is not a finite real number
    /// (a negative base with a fractional exponent, or overflow).
    pub fn power(expr: Expression, exponent: Expression) -> EngineResult<Expression> {
        Expression::numeric_binary(NumericBinaryFunc::Power, expr, exponent)
    }

    /// `mod(x, y)`: truncated remainder; `mod(x, 0)` is null. Keeps
    /// Integer when both operands are Integer.
    pub fn modulo(expr: Expression, modulus: Expression) -> EngineResult<Expression> {
        Expression::numeric_binary(NumericBinaryFunc::Mod, expr, modulus)
    }

    fn numeric_binary(
        func: NumericBinaryFunc,
        left: Expression,
        right: Expression,
    ) -> EngineResult<Expression> {
        require_numeric(&left, &func.to_string())?;
        require_numeric(&right, &func.to_string())?;
        let ty = match func {
            NumericBinaryFunc::Log | NumericBinaryFunc::Power => ScalarType::Number,
            // Both operands are numeric or null, so unification succeeds.
            NumericBinaryFunc::Mod => left
                .result_type()
                .unify(right.result_type())
                .unwrap_or(ScalarType::Number),
        };
        Ok(Expression::NumericBinary {
            func,
            left: Box::new(left),
            right: Box::new(right),
            ty,
        })
    }
}

pub(super) fn eval_unary(func: NumericUnaryFunc, value: ScalarValue) -> EngineResult<ScalarValue> {
    if value.is_null() {
        return Ok(ScalarValue::Null);
    }
    match func {
        NumericUnaryFunc::Abs => match value {
            ScalarValue::Integer(i) => i.checked_abs().map(ScalarValue::Integer).ok_or_else(|| {
                EngineError::invalid_argument(format!("integer overflow in abs({})", i))
            }),
            ScalarValue::Number(n) => Ok(ScalarValue::Number(n.abs())),
            other => Err(unsupported(func, &other)),
        },
        NumericUnaryFunc::Ceil => match value {
            ScalarValue::Integer(i) => Ok(ScalarValue::Integer(i)),
            ScalarValue::Number(n) => to_integer(n.ceil(), func),
            other => Err(unsupported(func, &other)),
        },
        NumericUnaryFunc::Floor => match value {
            ScalarValue::Integer(i) => Ok(ScalarValue::Integer(i)),
            ScalarValue::Number(n) => to_integer(n.floor(), func),
            other => Err(unsupported(func, &other)),
        },
        NumericUnaryFunc::Sqrt => {
            let n = value.as_number().ok_or_else(|| unsupported(func, &value))?;
            if n < 0.0 {
                Ok(ScalarValue::Null)
            } else {
                Ok(ScalarValue::Number(n.sqrt()))
            }
        }
        NumericUnaryFunc::Ln => {
            let n = value.as_number().ok_or_else(|| unsupported(func, &value))?;
            if n <= 0.0 {
                Ok(ScalarValue::Null)
            } else {
                Ok(ScalarValue::Number(n.ln()))
            }
        }
        NumericUnaryFunc::Exp => {
            let n = value.as_number().ok_or_else(|| unsupported(func, &value))?;
            Ok(ScalarValue::Number(n.exp()))
        }
    }
}

/// Shared implementation of round and trunc; `truncate` selects the
/// toward-zero behavior.
pub(super) fn eval_round(
    value: ScalarValue,
    digits: Option<ScalarValue>,
    truncate: bool,
) -> EngineResult<ScalarValue> {
    if value.is_null() {
        return Ok(ScalarValue::Null);
    }
    let digits = match digits {
        None => 0,
        Some(ScalarValue::Null) => return Ok(ScalarValue::Null),
        Some(v) => v.as_integer().unwrap_or_default(),
    };
    let n = value.as_number().ok_or_else(|| {
        EngineError::unsupported_type(format!(
            "expected numeric operand for {}, got {}",
            if truncate { "trunc" } else { "round" },
            value.type_of()
        ))
    })?;
    let factor = 10f64.powi(digits as i32);
    let scaled = n * factor;
    let result = if truncate { scaled.trunc() } else { scaled.round() };
    Ok(ScalarValue::Number(result / factor))
}

pub(super) fn eval_binary(
    func: NumericBinaryFunc,
    left: ScalarValue,
    right: ScalarValue,
    ty: ScalarType,
) -> EngineResult<ScalarValue> {
    if left.is_null() || right.is_null() {
        return Ok(ScalarValue::Null);
    }
    match func {
        NumericBinaryFunc::Log => {
            let x = left.as_number().unwrap_or_default();
            let base = right.as_number().unwrap_or_default();
            if x <= 0.0 || base <= 0.0 || base == 1.0 {
                Ok(ScalarValue::Null)
            } else {
                Ok(ScalarValue::Number(x.ln() / base.ln()))
            }
        }
        NumericBinaryFunc::Power => {
            let x = left.as_number().unwrap_or_default();
            let y = right.as_number().unwrap_or_default();
            let result = x.powf(y);
            // a negative base with a fractional exponent has no real
            // result; overflow to infinity is equally unrepresentable
            if result.is_finite() {
                Ok(ScalarValue::Number(result))
            } else {
                Ok(ScalarValue::Null)
            }
        }
        NumericBinaryFunc::Mod => match (ty, &left, &right) {
            (ScalarType::Integer, ScalarValue::Integer(l), ScalarValue::Integer(r)) => {
                if *r == 0 {
                    Ok(ScalarValue::Null)
                } else {
                    l.checked_rem(*r).map(ScalarValue::Integer).ok_or_else(|| {
                        EngineError::invalid_argument(format!(
                            "integer overflow in mod({},{})",
                            l, r
                        ))
                    })
                }
            }
            _ => {
                let x = left.as_number().unwrap_or_default();
                let y = right.as_number().unwrap_or_default();
                if y == 0.0 {
                    Ok(ScalarValue::Null)
                } else {
                    Ok(ScalarValue::Number(x % y))
                }
            }
        },
    }
}

/// Convert an already rounded double to Integer, failing when it falls
/// outside the i64 range instead of saturating.
fn to_integer(n: f64, func: NumericUnaryFunc) -> EngineResult<ScalarValue> {
    // i64::MAX as f64 rounds up to 2^63, which is itself out of range
    if !n.is_finite() || n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return Err(EngineError::invalid_argument(format!(
            "integer overflow in {}({})",
            func, n
        )));
    }
    Ok(ScalarValue::Integer(n as i64))
}

fn unsupported(func: NumericUnaryFunc, value: &ScalarValue) -> EngineError {
    EngineError::unsupported_type(format!(
        "expected numeric operand for {}, got {}",
        func,
        value.type_of()
    ))
}
