mod common;

use std::sync::Arc;

use anyhow::Result;
use common::collect;
use vtl_engine::engine::EngineError;
use vtl_engine::model::{
    Component, DataStructure, Dataset, InMemoryDataset, ScalarType, ScalarValue,
};
use vtl_engine::ops::{JoinedDataset, RenamedDataset};

fn population() -> Arc<dyn Dataset> {
    let structure = DataStructure::new(vec![
        Component::identifier("geo", ScalarType::String),
        Component::measure("population", ScalarType::Integer),
    ])
    .unwrap();
    Arc::new(
        InMemoryDataset::new(
            structure,
            vec![
                vec![ScalarValue::from("AT"), ScalarValue::Integer(100)],
                vec![ScalarValue::from("BE"), ScalarValue::Integer(200)],
                vec![ScalarValue::from("FR"), ScalarValue::Integer(300)],
            ],
        )
        .unwrap(),
    )
}

fn area() -> Arc<dyn Dataset> {
    let structure = DataStructure::new(vec![
        Component::identifier("geo", ScalarType::String),
        Component::measure("area", ScalarType::Number),
    ])
    .unwrap();
    Arc::new(
        InMemoryDataset::new(
            structure,
            vec![
                vec![ScalarValue::from("BE"), ScalarValue::Number(25.5)],
                vec![ScalarValue::from("FR"), ScalarValue::Number(50.0)],
                vec![ScalarValue::from("DE"), ScalarValue::Number(75.0)],
            ],
        )
        .unwrap(),
    )
}

#[test]
fn test_inner_join() -> Result<()> {
    let joined = JoinedDataset::inner(population(), area())?;
    let names: Vec<_> = joined
        .structure()
        .components()
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    assert_eq!(names, vec!["geo", "population", "area"]);

    let rows = collect(&joined);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        vec![
            ScalarValue::from("BE"),
            ScalarValue::Integer(200),
            ScalarValue::Number(25.5),
        ]
    );
    Ok(())
}

#[test]
fn test_left_outer_join_fills_nulls() -> Result<()> {
    let joined = JoinedDataset::left_outer(population(), area())?;
    let rows = collect(&joined);
    assert_eq!(rows.len(), 3);
    // AT has no area row
    assert_eq!(
        rows[0],
        vec![
            ScalarValue::from("AT"),
            ScalarValue::Integer(100),
            ScalarValue::Null,
        ]
    );
    Ok(())
}

#[test]
fn test_full_outer_join_keeps_unmatched_right() -> Result<()> {
    let joined = JoinedDataset::full_outer(population(), area())?;
    let rows = collect(&joined);
    assert_eq!(rows.len(), 4);
    // DE comes from the right side only, with a null population.
    let de = rows
        .iter()
        .find(|row| row[0] == ScalarValue::from("DE"))
        .unwrap();
    assert_eq!(de[1], ScalarValue::Null);
    assert_eq!(de[2], ScalarValue::Number(75.0));
    Ok(())
}

#[test]
fn test_null_join_keys_match_each_other() -> Result<()> {
    let left = Arc::new(
        InMemoryDataset::new(
            DataStructure::new(vec![
                Component::identifier("geo", ScalarType::String),
                Component::measure("population", ScalarType::Integer),
            ])?,
            vec![vec![ScalarValue::Null, ScalarValue::Integer(1)]],
        )?,
    );
    let right = Arc::new(
        InMemoryDataset::new(
            DataStructure::new(vec![
                Component::identifier("geo", ScalarType::String),
                Component::measure("area", ScalarType::Number),
            ])?,
            vec![vec![ScalarValue::Null, ScalarValue::Number(2.0)]],
        )?,
    );
    let joined = JoinedDataset::inner(left, right)?;
    assert_eq!(collect(&joined).len(), 1);
    Ok(())
}

#[test]
fn test_disjoint_identifiers_rejected() {
    let other = Arc::new(
        InMemoryDataset::new(
            DataStructure::new(vec![
                Component::identifier("series", ScalarType::String),
                Component::measure("obs", ScalarType::Number),
            ])
            .unwrap(),
            vec![],
        )
        .unwrap(),
    );
    assert!(matches!(
        JoinedDataset::inner(population(), other),
        Err(EngineError::InvalidArgument { .. })
    ));
}

#[test]
fn test_measure_collision_rejected_until_renamed() -> Result<()> {
    // Both sides carry a measure named "population".
    let result = JoinedDataset::inner(population(), population());
    assert!(matches!(result, Err(EngineError::InvalidArgument { .. })));

    let renamed = Arc::new(RenamedDataset::new(
        population(),
        &[("population", "population_b")],
    )?);
    let joined = JoinedDataset::inner(population(), renamed)?;
    assert_eq!(collect(&joined).len(), 3);
    Ok(())
}

#[test]
fn test_identifier_type_mismatch_rejected() {
    let numeric_geo = Arc::new(
        InMemoryDataset::new(
            DataStructure::new(vec![
                Component::identifier("geo", ScalarType::Integer),
                Component::measure("area", ScalarType::Number),
            ])
            .unwrap(),
            vec![],
        )
        .unwrap(),
    );
    assert!(matches!(
        JoinedDataset::inner(population(), numeric_geo),
        Err(EngineError::InvalidArgument { .. })
    ));
}

#[test]
fn test_join_scan_is_repeatable() -> Result<()> {
    let joined = JoinedDataset::full_outer(population(), area())?;
    assert_eq!(collect(&joined), collect(&joined));
    Ok(())
}
