use std::sync::Arc;

use vtl_engine::model::{Component, DataStructure, Dataset, InMemoryDataset, ScalarType, ScalarValue};

// A small towns dataset: two identifiers, two measures, one attribute.
#[allow(dead_code)]
pub fn towns_structure() -> DataStructure {
    DataStructure::new(vec![
        Component::identifier("geo", ScalarType::String),
        Component::identifier("year", ScalarType::Integer),
        Component::measure("population", ScalarType::Integer),
        Component::measure("area", ScalarType::Number),
        Component::attribute("source", ScalarType::String),
    ])
    .unwrap()
}

#[allow(dead_code)]
pub fn towns_dataset() -> Arc<dyn Dataset> {
    let rows = vec![
        row("AT", 2020, Some(100), Some(10.0), "census"),
        row("AT", 2021, Some(110), Some(10.0), "census"),
        row("BE", 2020, Some(200), Some(25.5), "register"),
        row("BE", 2021, None, Some(25.5), "register"),
        row("FR", 2020, Some(300), None, "census"),
    ];
    Arc::new(InMemoryDataset::new(towns_structure(), rows).unwrap())
}

#[allow(dead_code)]
fn row(
    geo: &str,
    year: i64,
    population: Option<i64>,
    area: Option<f64>,
    source: &str,
) -> Vec<ScalarValue> {
    vec![
        ScalarValue::from(geo),
        ScalarValue::Integer(year),
        population.map(ScalarValue::Integer).unwrap_or(ScalarValue::Null),
        area.map(ScalarValue::Number).unwrap_or(ScalarValue::Null),
        ScalarValue::from(source),
    ]
}

// A single-measure dataset for aggregation tests: identifier "id",
// Integer measure "m".
#[allow(dead_code)]
pub fn measures_dataset(values: &[Option<i64>]) -> Arc<dyn Dataset> {
    let structure = DataStructure::new(vec![
        Component::identifier("id", ScalarType::Integer),
        Component::measure("m", ScalarType::Integer),
    ])
    .unwrap();
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            vec![
                ScalarValue::Integer(i as i64),
                v.map(ScalarValue::Integer).unwrap_or(ScalarValue::Null),
            ]
        })
        .collect();
    Arc::new(InMemoryDataset::new(structure, rows).unwrap())
}

// Collect a dataset's rows, panicking on row errors.
#[allow(dead_code)]
pub fn collect(dataset: &dyn Dataset) -> Vec<Vec<ScalarValue>> {
    dataset
        .scan()
        .map(|point| point.unwrap().into_values())
        .collect()
}
