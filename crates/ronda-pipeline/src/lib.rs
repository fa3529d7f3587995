//! End-to-end orchestration of the ronda decision pipeline.
//!
//! One call wires the stages together: fetch bars and fundamentals from a
//! [`ronda_data::DataProvider`], build the feature table, train and store
//! a model, predict from the latest row, and optionally replay the model
//! historically. Multi-ticker runs fan out over tokio tasks with
//! per-ticker failure isolation.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod export;
pub mod pipeline;

// Re-export key types
pub use pipeline::{Pipeline, RunOutcome};
