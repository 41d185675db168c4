// VTL Execution Engine
//
// An execution core for VTL (the SDMX Validation and Transformation
// Language): typed scalar expressions, relational-style operators over
// schema-carrying datasets, and associative aggregation reducers, driven
// by a statement evaluator over a flat binding environment.
//
// Parsing VTL source is a host concern: a front end builds the typed
// expression tree through the constructor functions here and hands
// statements to the engine.

// Export public modules
pub mod agg;
pub mod engine;
pub mod expr;
pub mod io;
pub mod model;
pub mod ops;

// Re-export key items for convenient access
pub use agg::{Accumulator, Aggregation};
pub use engine::{BoundValue, Engine, EngineError, EngineResult, Environment, Span, Statement, StatementValue};
pub use expr::{Context, Expression};
pub use model::{
    Component, DataPoint, DataStructure, Dataset, InMemoryDataset, Role, RowStream, ScalarType,
    ScalarValue,
};
pub use ops::{
    AggregatedDataset, CalcDataset, CalcDefinition, FilteredDataset, JoinKind, JoinedDataset,
    ProjectedDataset, RenamedDataset, SetDataset, SetOperation,
};
