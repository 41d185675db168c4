// Calc Operator
//
// Extends a dataset with computed components. A definition whose name
// collides with an existing component replaces it, provided the roles
// match; otherwise the new component is appended.

use std::collections::HashSet;
use std::sync::Arc;

use crate::engine::error::{EngineError, EngineResult};
use crate::expr::{Context, Expression};
use crate::model::component::Component;
use crate::model::data_point::DataPoint;
use crate::model::dataset::{Dataset, RowStream};
use crate::model::structure::DataStructure;
use crate::model::types::{Role, ScalarType};
use crate::model::value::ScalarValue;

/// One computed component: a name, a row-wise expression and a role.
#[derive(Debug, Clone)]
pub struct CalcDefinition {
    name: String,
    expression: Expression,
    role: Role,
}

impl CalcDefinition {
    pub fn new(name: impl Into<String>, expression: Expression, role: Role) -> Self {
        CalcDefinition {
            name: name.into(),
            expression,
            role,
        }
    }

    /// A calc definition with the default Measure role.
    pub fn measure(name: impl Into<String>, expression: Expression) -> Self {
        CalcDefinition::new(name, expression, Role::Measure)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A dataset extended with computed components.
pub struct CalcDataset {
    input: Arc<dyn Dataset>,
    structure: Arc<DataStructure>,
    /// Output position and expression of each definition.
    slots: Vec<(usize, Expression)>,
}

impl CalcDataset {
    pub fn new(input: Arc<dyn Dataset>, definitions: Vec<CalcDefinition>) -> EngineResult<Self> {
        let mut components: Vec<Component> = input.structure().components().to_vec();
        let mut slots = Vec::with_capacity(definitions.len());
        let mut seen = HashSet::new();

        for definition in definitions {
            let ty = definition.expression.result_type();
            if ty == ScalarType::Null {
                return Err(EngineError::unsupported_type(format!(
                    "calc component {} has no concrete type",
                    definition.name
                )));
            }
            if !seen.insert(definition.name.clone()) {
                return Err(EngineError::invalid_argument(format!(
                    "calc component defined twice: {}",
                    definition.name
                )));
            }
            let position = match input.structure().position(&definition.name) {
                Some(position) => {
                    let existing = &components[position];
                    if existing.role() != definition.role {
                        return Err(EngineError::invalid_argument(format!(
                            "calc component {} replaces a {} but is declared {}",
                            definition.name,
                            existing.role(),
                            definition.role
                        )));
                    }
                    components[position] = Component::new(&definition.name, ty, definition.role);
                    position
                }
                None => {
                    components.push(Component::new(&definition.name, ty, definition.role));
                    components.len() - 1
                }
            };
            slots.push((position, definition.expression));
        }

        let structure = Arc::new(DataStructure::new(components)?);
        Ok(CalcDataset {
            input,
            structure,
            slots,
        })
    }
}

impl Dataset for CalcDataset {
    fn structure(&self) -> &Arc<DataStructure> {
        &self.structure
    }

    fn scan(&self) -> RowStream<'_> {
        Box::new(self.input.scan().map(move |point| {
            let point = point?;
            let mut values = point.values().to_vec();
            values.resize(self.structure.len(), ScalarValue::Null);
            // All expressions evaluate against the input point, not
            // against each other's results.
            for (position, expression) in &self.slots {
                values[*position] = expression.resolve(&Context::with_point(&point))?;
            }
            DataPoint::new(Arc::clone(&self.structure), values)
        }))
    }
}
