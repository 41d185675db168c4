use anyhow::Result;
use vtl_engine::engine::EngineError;
use vtl_engine::io::{component_from_json, read_csv, read_csv_with, structure_from_json, structure_to_json, CsvOptions};
use vtl_engine::model::{Role, ScalarType, ScalarValue};

const STRUCTURE_JSON: &str = r#"[
    {"name": "geo", "type": "STRING", "role": "IDENTIFIER"},
    {"name": "year", "type": "INTEGER", "role": "IDENTIFIER"},
    {"name": "obs", "type": "NUMBER", "role": "MEASURE"},
    {"name": "confidential", "type": "BOOLEAN", "role": "ATTRIBUTE"}
]"#;

#[test]
fn test_component_json() -> Result<()> {
    let component =
        component_from_json(r#"{"name": "geo", "type": "STRING", "role": "IDENTIFIER"}"#)?;
    assert_eq!(component.name(), "geo");
    assert_eq!(component.data_type(), ScalarType::String);
    assert_eq!(component.role(), Role::Identifier);
    Ok(())
}

#[test]
fn test_unknown_tokens_rejected() {
    assert!(matches!(
        component_from_json(r#"{"name": "x", "type": "DATE", "role": "MEASURE"}"#),
        Err(EngineError::InvalidArgument { .. })
    ));
    assert!(matches!(
        component_from_json(r#"{"name": "x", "type": "STRING", "role": "KEY"}"#),
        Err(EngineError::InvalidArgument { .. })
    ));
}

#[test]
fn test_structure_json_round_trip() -> Result<()> {
    let structure = structure_from_json(STRUCTURE_JSON)?;
    assert_eq!(structure.len(), 4);
    assert_eq!(structure.identifier_names(), vec!["geo", "year"]);

    let rendered = structure_to_json(&structure)?;
    assert_eq!(structure_from_json(&rendered)?, structure);
    Ok(())
}

#[test]
fn test_csv_against_json_structure() -> Result<()> {
    let structure = structure_from_json(STRUCTURE_JSON)?;
    let csv = "geo,year,obs,confidential\n\
               AT,2020,1.5,false\n\
               BE,2020,,true\n\
               FR,2021,3.25,\n";
    let dataset = read_csv(structure, csv.as_bytes())?;
    assert_eq!(dataset.len(), 3);

    let be = &dataset.points()[1];
    assert_eq!(be.get("obs"), Some(&ScalarValue::Null));
    assert_eq!(be.get("confidential"), Some(&ScalarValue::Boolean(true)));

    let fr = &dataset.points()[2];
    assert_eq!(fr.get("year"), Some(&ScalarValue::Integer(2021)));
    assert_eq!(fr.get("confidential"), Some(&ScalarValue::Null));
    Ok(())
}

#[test]
fn test_csv_without_header() -> Result<()> {
    let structure = structure_from_json(STRUCTURE_JSON)?;
    let csv = "AT,2020,1.5,false\n";
    let options = CsvOptions {
        has_headers: false,
        ..CsvOptions::default()
    };
    let dataset = read_csv_with(structure, csv.as_bytes(), options)?;
    assert_eq!(dataset.len(), 1);
    Ok(())
}

#[test]
fn test_csv_semicolon_delimiter() -> Result<()> {
    let structure = structure_from_json(STRUCTURE_JSON)?;
    let csv = "AT;2020;1.5;false\n";
    let options = CsvOptions {
        has_headers: false,
        delimiter: b';',
    };
    let dataset = read_csv_with(structure, csv.as_bytes(), options)?;
    assert_eq!(
        dataset.points()[0].get("obs"),
        Some(&ScalarValue::Number(1.5))
    );
    Ok(())
}

#[test]
fn test_csv_type_errors_carry_context() -> Result<()> {
    let structure = structure_from_json(STRUCTURE_JSON)?;
    let csv = "AT,twenty-twenty,1.5,false\n";
    let options = CsvOptions {
        has_headers: false,
        ..CsvOptions::default()
    };
    let err = read_csv_with(structure, csv.as_bytes(), options).unwrap_err();
    assert!(err.message().contains("year"));
    assert!(err.message().contains("row 1"));
    Ok(())
}
