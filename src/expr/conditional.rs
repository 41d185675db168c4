// Conditional Expression
//
// if-then-else over a boolean condition. The branches must share a common
// widened type; a null condition yields null.

use super::{require_boolean, Context, Expression};
use crate::engine::error::{EngineError, EngineResult};
use crate::model::types::ScalarType;
use crate::model::value::ScalarValue;

impl Expression {
    /// `if cond then a else b`. The condition must be boolean and the two
    /// branches must unify to a common type, which becomes the declared
    /// result type.
    pub fn if_then_else(
        condition: Expression,
        then_expr: Expression,
        else_expr: Expression,
    ) -> EngineResult<Expression> {
        require_boolean(&condition, "if")?;
        let ty = then_expr
            .result_type()
            .unify(else_expr.result_type())
            .ok_or_else(|| {
                EngineError::unsupported_type(format!(
                    "branches of if have incompatible types {} and {}",
                    then_expr.result_type(),
                    else_expr.result_type()
                ))
            })?;
        Ok(Expression::If {
            condition: Box::new(condition),
            then_expr: Box::new(then_expr),
            else_expr: Box::new(else_expr),
            ty,
        })
    }
}

pub(super) fn eval(
    ctx: &Context,
    condition: &Expression,
    then_expr: &Expression,
    else_expr: &Expression,
    ty: ScalarType,
) -> EngineResult<ScalarValue> {
    let branch = match condition.resolve(ctx)?.as_boolean() {
        None => return Ok(ScalarValue::Null),
        Some(true) => then_expr,
        Some(false) => else_expr,
    };
    // Widen so the resolved value matches the unified declared type.
    Ok(branch.resolve(ctx)?.widen_to(ty))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_selection() {
        let expr = Expression::if_then_else(
            Expression::constant(false),
            Expression::constant(1i64),
            Expression::constant(2i64),
        )
        .unwrap();
        assert_eq!(
            expr.resolve(&Context::empty()).unwrap(),
            ScalarValue::Integer(2)
        );
    }

    #[test]
    fn test_branches_widen() {
        let expr = Expression::if_then_else(
            Expression::constant(true),
            Expression::constant(1i64),
            Expression::constant(2.5f64),
        )
        .unwrap();
        assert_eq!(expr.result_type(), ScalarType::Number);
        assert_eq!(
            expr.resolve(&Context::empty()).unwrap(),
            ScalarValue::Number(1.0)
        );
    }

    #[test]
    fn test_null_condition_is_null() {
        let expr = Expression::if_then_else(
            Expression::constant(ScalarValue::Null),
            Expression::constant(1i64),
            Expression::constant(2i64),
        )
        .unwrap();
        assert_eq!(expr.resolve(&Context::empty()).unwrap(), ScalarValue::Null);
    }

    #[test]
    fn test_incompatible_branches_rejected() {
        let result = Expression::if_then_else(
            Expression::constant(true),
            Expression::constant("a"),
            Expression::constant(1i64),
        );
        assert!(matches!(result, Err(EngineError::UnsupportedType { .. })));
    }
}
