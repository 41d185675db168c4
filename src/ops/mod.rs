// Dataset Operators Module
//
// Relational-style operators over datasets. Each operator validates its
// arguments and derives its output structure when it is built, then
// implements the Dataset trait with a lazy, restartable row stream.
// Operators never mutate their inputs; rebuilding the stream replays the
// same rows.

pub mod aggregate;
pub mod calc;
pub mod filter;
pub mod join;
pub mod project;
pub mod rename;
pub mod set_ops;

pub use aggregate::AggregatedDataset;
pub use calc::{CalcDataset, CalcDefinition};
pub use filter::FilteredDataset;
pub use join::{JoinKind, JoinedDataset};
pub use project::ProjectedDataset;
pub use rename::RenamedDataset;
pub use set_ops::{SetDataset, SetOperation};
