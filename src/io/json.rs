// Component JSON Codec
//
// Maps the JSON spelling of components and structures onto the model
// types. The token sets are closed; unknown type or role tokens are
// deserialization errors.

use serde::{Deserialize, Serialize};

use crate::engine::error::{EngineError, EngineResult};
use crate::model::component::Component;
use crate::model::structure::DataStructure;
use crate::model::types::{Role, ScalarType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum TypeToken {
    String,
    Integer,
    Number,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum RoleToken {
    Identifier,
    Measure,
    Attribute,
}

/// The JSON shape of one component:
/// `{"name": ..., "type": "STRING", "role": "IDENTIFIER"}`.
#[derive(Debug, Serialize, Deserialize)]
struct ComponentDef {
    name: String,
    #[serde(rename = "type")]
    data_type: TypeToken,
    role: RoleToken,
}

impl From<TypeToken> for ScalarType {
    fn from(token: TypeToken) -> ScalarType {
        match token {
            TypeToken::String => ScalarType::String,
            TypeToken::Integer => ScalarType::Integer,
            TypeToken::Number => ScalarType::Number,
            TypeToken::Boolean => ScalarType::Boolean,
        }
    }
}

impl From<RoleToken> for Role {
    fn from(token: RoleToken) -> Role {
        match token {
            RoleToken::Identifier => Role::Identifier,
            RoleToken::Measure => Role::Measure,
            RoleToken::Attribute => Role::Attribute,
        }
    }
}

impl From<&ComponentDef> for Component {
    fn from(def: &ComponentDef) -> Component {
        Component::new(&def.name, def.data_type.into(), def.role.into())
    }
}

fn component_def(component: &Component) -> ComponentDef {
    let data_type = match component.data_type() {
        ScalarType::String => TypeToken::String,
        ScalarType::Integer => TypeToken::Integer,
        ScalarType::Number => TypeToken::Number,
        ScalarType::Boolean => TypeToken::Boolean,
        // DataStructure::new rejects null-typed components
        ScalarType::Null => unreachable!("null-typed component in a structure"),
    };
    let role = match component.role() {
        Role::Identifier => RoleToken::Identifier,
        Role::Measure => RoleToken::Measure,
        Role::Attribute => RoleToken::Attribute,
    };
    ComponentDef {
        name: component.name().to_string(),
        data_type,
        role,
    }
}

/// Parse one component from its JSON object form.
pub fn component_from_json(json: &str) -> EngineResult<Component> {
    let def: ComponentDef = serde_json::from_str(json)
        .map_err(|e| EngineError::invalid_argument(format!("invalid component JSON: {}", e)))?;
    Ok(Component::from(&def))
}

/// Parse a data structure from a JSON array of components.
pub fn structure_from_json(json: &str) -> EngineResult<DataStructure> {
    let defs: Vec<ComponentDef> = serde_json::from_str(json)
        .map_err(|e| EngineError::invalid_argument(format!("invalid structure JSON: {}", e)))?;
    DataStructure::new(defs.iter().map(Component::from).collect())
}

/// Render a data structure as a JSON array of components.
pub fn structure_to_json(structure: &DataStructure) -> EngineResult<String> {
    let defs: Vec<ComponentDef> = structure.components().iter().map(component_def).collect();
    serde_json::to_string(&defs)
        .map_err(|e| EngineError::invalid_argument(format!("cannot render structure: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_round_trip() {
        let component = component_from_json(
            r#"{"name": "REF_AREA", "type": "STRING", "role": "IDENTIFIER"}"#,
        )
        .unwrap();
        assert_eq!(component.name(), "REF_AREA");
        assert_eq!(component.data_type(), ScalarType::String);
        assert_eq!(component.role(), Role::Identifier);
    }

    #[test]
    fn test_unknown_type_token_rejected() {
        let result =
            component_from_json(r#"{"name": "X", "type": "DECIMAL", "role": "MEASURE"}"#);
        assert!(matches!(result, Err(EngineError::InvalidArgument { .. })));
    }

    #[test]
    fn test_structure_round_trip() {
        let json = r#"[
            {"name": "id", "type": "STRING", "role": "IDENTIFIER"},
            {"name": "obs", "type": "NUMBER", "role": "MEASURE"}
        ]"#;
        let structure = structure_from_json(json).unwrap();
        assert_eq!(structure.len(), 2);
        let rendered = structure_to_json(&structure).unwrap();
        let reparsed = structure_from_json(&rendered).unwrap();
        assert_eq!(structure, reparsed);
    }
}
