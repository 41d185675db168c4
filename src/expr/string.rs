// String Functions
//
// Trimming, case mapping, length and substring extraction. Lengths and
// indexes count Unicode code points, not bytes.

use std::fmt;

use super::{require_integer, require_string, Expression};
use crate::engine::error::{EngineError, EngineResult};
use crate::model::value::ScalarValue;

/// Unary string-to-string functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFunc {
    Trim,
    Ltrim,
    Rtrim,
    Upper,
    Lower,
}

impl fmt::Display for StringFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringFunc::Trim => write!(f, "trim"),
            StringFunc::Ltrim => write!(f, "ltrim"),
            StringFunc::Rtrim => write!(f, "rtrim"),
            StringFunc::Upper => write!(f, "upper"),
            StringFunc::Lower => write!(f, "lower"),
        }
    }
}

fn is_trimmable(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

impl Expression {
    pub fn trim(expr: Expression) -> EngineResult<Expression> {
        Expression::string_unary(StringFunc::Trim, expr)
    }

    pub fn ltrim(expr: Expression) -> EngineResult<Expression> {
        Expression::string_unary(StringFunc::Ltrim, expr)
    }

    pub fn rtrim(expr: Expression) -> EngineResult<Expression> {
        Expression::string_unary(StringFunc::Rtrim, expr)
    }

    pub fn upper(expr: Expression) -> EngineResult<Expression> {
        Expression::string_unary(StringFunc::Upper, expr)
    }

    pub fn lower(expr: Expression) -> EngineResult<Expression> {
        Expression::string_unary(StringFunc::Lower, expr)
    }

    fn string_unary(func: StringFunc, expr: Expression) -> EngineResult<Expression> {
        require_string(&expr, &func.to_string())?;
        Ok(Expression::StringUnary {
            func,
            expr: Box::new(expr),
        })
    }

    /// `length(s)`: the number of code points, as Integer.
    pub fn length(expr: Expression) -> EngineResult<Expression> {
        require_string(&expr, "length")?;
        Ok(Expression::Length {
            expr: Box::new(expr),
        })
    }

    /// `substr(s)`, `substr(s, start)` or `substr(s, start, end)`.
    ///
    /// `start` is a 0-based inclusive index, `end` is exclusive; both count
    /// code points and clamp to the string bounds. Supplying more than two
    /// positional arguments after the string fails with
    /// `UnsupportedOperation`, quoting the call in literal form.
    pub fn substr(expr: Expression, args: Vec<Expression>) -> EngineResult<Expression> {
        if args.len() > 2 {
            let rendered: Vec<String> = args.iter().map(|a| a.to_string()).collect();
            return Err(EngineError::unsupported_operation(format!(
                "too many args ({}) for: substr({},{})",
                args.len(),
                expr,
                rendered.join(",")
            )));
        }
        require_string(&expr, "substr")?;
        for arg in &args {
            require_integer(arg, "substr")?;
        }
        let mut args = args.into_iter();
        Ok(Expression::Substr {
            expr: Box::new(expr),
            start: args.next().map(Box::new),
            end: args.next().map(Box::new),
        })
    }
}

pub(super) fn eval_unary(func: StringFunc, value: ScalarValue) -> EngineResult<ScalarValue> {
    let s = match value {
        ScalarValue::Null => return Ok(ScalarValue::Null),
        ScalarValue::String(s) => s,
        other => {
            return Err(EngineError::unsupported_type(format!(
                "expected string operand for {}, got {}",
                func,
                other.type_of()
            )))
        }
    };
    let result = match func {
        StringFunc::Trim => s.trim_matches(is_trimmable).to_string(),
        StringFunc::Ltrim => s.trim_start_matches(is_trimmable).to_string(),
        StringFunc::Rtrim => s.trim_end_matches(is_trimmable).to_string(),
        StringFunc::Upper => s.to_uppercase(),
        StringFunc::Lower => s.to_lowercase(),
    };
    Ok(ScalarValue::String(result))
}

pub(super) fn eval_length(value: ScalarValue) -> EngineResult<ScalarValue> {
    match value {
        ScalarValue::Null => Ok(ScalarValue::Null),
        ScalarValue::String(s) => Ok(ScalarValue::Integer(s.chars().count() as i64)),
        other => Err(EngineError::unsupported_type(format!(
            "expected string operand for length, got {}",
            other.type_of()
        ))),
    }
}

pub(super) fn eval_substr(
    value: ScalarValue,
    start: Option<ScalarValue>,
    end: Option<ScalarValue>,
) -> EngineResult<ScalarValue> {
    let s = match value {
        ScalarValue::Null => return Ok(ScalarValue::Null),
        ScalarValue::String(s) => s,
        other => {
            return Err(EngineError::unsupported_type(format!(
                "expected string operand for substr, got {}",
                other.type_of()
            )))
        }
    };
    let len = s.chars().count() as i64;
    let clamp = |index: i64| index.clamp(0, len) as usize;

    let start = match start {
        None => 0,
        Some(ScalarValue::Null) => return Ok(ScalarValue::Null),
        Some(v) => clamp(v.as_integer().unwrap_or_default()),
    };
    let end = match end {
        None => len as usize,
        Some(ScalarValue::Null) => return Ok(ScalarValue::Null),
        Some(v) => clamp(v.as_integer().unwrap_or_default()).max(start),
    };
    let result: String = s.chars().skip(start).take(end - start).collect();
    Ok(ScalarValue::String(result))
}
