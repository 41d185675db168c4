use anyhow::Result;
use vtl_engine::engine::{Engine, EngineError, Statement};
use vtl_engine::expr::Expression;
use vtl_engine::model::ScalarValue;

fn constant(s: &str) -> Expression {
    Expression::constant(s)
}

#[test]
fn test_unary_string_functions() -> Result<()> {
    let mut engine = Engine::new();
    engine.execute(&Statement::scalar(
        "trimValue",
        Expression::trim(constant("  abc  "))?,
    ))?;
    assert_eq!(
        engine.environment().scalar("trimValue")?,
        &ScalarValue::from("abc")
    );

    engine.execute(&Statement::scalar(
        "ltrimValue",
        Expression::ltrim(constant("  abc  "))?,
    ))?;
    assert_eq!(
        engine.environment().scalar("ltrimValue")?,
        &ScalarValue::from("abc  ")
    );

    engine.execute(&Statement::scalar(
        "rtrimValue",
        Expression::rtrim(constant("  abc  "))?,
    ))?;
    assert_eq!(
        engine.environment().scalar("rtrimValue")?,
        &ScalarValue::from("  abc")
    );

    engine.execute(&Statement::scalar(
        "upperValue",
        Expression::upper(constant("Abc"))?,
    ))?;
    assert_eq!(
        engine.environment().scalar("upperValue")?,
        &ScalarValue::from("ABC")
    );

    engine.execute(&Statement::scalar(
        "lowerValue",
        Expression::lower(constant("Abc"))?,
    ))?;
    assert_eq!(
        engine.environment().scalar("lowerValue")?,
        &ScalarValue::from("abc")
    );

    engine.execute(&Statement::scalar(
        "lengthValue",
        Expression::length(constant("abc"))?,
    ))?;
    assert_eq!(
        engine.environment().scalar("lengthValue")?,
        &ScalarValue::Integer(3)
    );
    Ok(())
}

#[test]
fn test_substr_variants() -> Result<()> {
    let mut engine = Engine::new();

    engine.execute(&Statement::scalar(
        "s1",
        Expression::substr(constant("abcde"), vec![])?,
    ))?;
    assert_eq!(engine.environment().scalar("s1")?, &ScalarValue::from("abcde"));

    engine.execute(&Statement::scalar(
        "s1",
        Expression::substr(constant("abcde"), vec![Expression::constant(1i64)])?,
    ))?;
    assert_eq!(engine.environment().scalar("s1")?, &ScalarValue::from("bcde"));

    engine.execute(&Statement::scalar(
        "s1",
        Expression::substr(
            constant("abcde"),
            vec![Expression::constant(1i64), Expression::constant(3i64)],
        )?,
    ))?;
    assert_eq!(engine.environment().scalar("s1")?, &ScalarValue::from("bc"));
    Ok(())
}

#[test]
fn test_substr_too_many_args() {
    let err = Expression::substr(
        constant("abc"),
        vec![
            Expression::constant(1i64),
            Expression::constant(2i64),
            Expression::constant(3i64),
        ],
    )
    .unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedOperation { .. }));
    assert_eq!(err.message(), "too many args (3) for: substr(\"abc\",1,2,3)");

    let err = Expression::substr(
        constant("abc"),
        (1..=6i64).map(Expression::constant).collect(),
    )
    .unwrap_err();
    assert_eq!(
        err.message(),
        "too many args (6) for: substr(\"abc\",1,2,3,4,5,6)"
    );
}

#[test]
fn test_null_propagation() -> Result<()> {
    let null = Expression::constant(ScalarValue::Null);
    assert_eq!(
        Expression::trim(null.clone())?.resolve(&Default::default())?,
        ScalarValue::Null
    );
    assert_eq!(
        Expression::length(null.clone())?.resolve(&Default::default())?,
        ScalarValue::Null
    );
    let substr = Expression::substr(
        constant("abc"),
        vec![Expression::constant(ScalarValue::Null)],
    )?;
    assert_eq!(substr.resolve(&Default::default())?, ScalarValue::Null);
    Ok(())
}

#[test]
fn test_non_string_operand_rejected() {
    assert!(matches!(
        Expression::upper(Expression::constant(1i64)),
        Err(EngineError::UnsupportedType { .. })
    ));
    assert!(matches!(
        Expression::substr(constant("abc"), vec![Expression::constant("x")]),
        Err(EngineError::UnsupportedType { .. })
    ));
}
