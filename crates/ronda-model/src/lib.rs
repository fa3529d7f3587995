//! Model training and prediction for the ronda decision pipeline.
//!
//! The trainer fits a ridge-stabilized linear regression of forward
//! returns on feature columns, with a strictly chronological train/test
//! split and training-partition-only median imputation. The result is a
//! versioned [`artifact::ModelArtifact`] that carries everything the
//! [`predictor::Predictor`] needs to score new observations, including
//! the imputation medians and decision thresholds. A filesystem
//! [`registry::ModelRegistry`] stores artifacts per ticker.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod artifact;
pub mod linear;
pub mod predictor;
pub mod registry;
pub mod trainer;

// Re-export key types
pub use artifact::{ModelArtifact, TrainMetrics, ARTIFACT_VERSION};
pub use predictor::Predictor;
pub use registry::ModelRegistry;
pub use trainer::{ModelTrainer, TrainConfig};
