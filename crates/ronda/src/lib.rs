#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # ronda
//!
//! Stock decision-support pipeline.
//!
//! ronda is an umbrella crate that re-exports all ronda sub-crates for
//! convenience. The pipeline turns a ticker's price history and
//! fundamentals into a discrete trading decision with an auditable
//! historical record.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ronda::pipeline::Pipeline;
//! use ronda::data::CsvProvider;
//! use ronda::model::ModelRegistry;
//! use ronda::{Date, PipelineConfig};
//!
//! # async fn example() -> ronda::Result<()> {
//! let pipeline = Pipeline::new(
//!     CsvProvider::new("data/"),
//!     ModelRegistry::new("models/"),
//!     PipelineConfig::default(),
//! )?;
//!
//! let from = Date::from_ymd_opt(2022, 1, 1).unwrap();
//! let to = Date::from_ymd_opt(2024, 12, 31).unwrap();
//! let outcome = pipeline.run("AAPL", from, to, true).await?;
//! println!("{}: {}", outcome.prediction.ticker, outcome.prediction.label);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Core types, configuration, labels, and the error taxonomy
//! - [`features`] - Technical indicators, fundamental as-of joins, feature tables
//! - [`model`] - Training, versioned artifacts, the registry, and prediction
//! - [`eval`] - Historical backtesting and risk metrics
//! - [`data`] - HTTP and CSV data providers
//! - [`pipeline`] - End-to-end orchestration and CSV exports
//!
//! ## Architecture
//!
//! The stages compose linearly:
//!
//! 1. A **provider** fetches bars and fundamental snapshots
//! 2. The **feature engine** builds a per-date feature table with a
//!    forward-return target, trimming rows that would leak
//! 3. The **trainer** fits a regression on a chronological split and
//!    persists a self-contained artifact
//! 4. The **predictor** scores the latest feature row into a label
//! 5. The **backtest engine** replays the decisions historically

/// Version information for the ronda crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core types, configuration, and the error taxonomy.
pub mod traits {
    pub use ronda_traits::*;
}

/// Feature engineering: indicators, fundamentals, and feature tables.
pub mod features {
    pub use ronda_features::*;
}

/// Model training, artifacts, the registry, and prediction.
pub mod model {
    pub use ronda_model::*;
}

/// Historical backtesting and risk metrics.
pub mod eval {
    pub use ronda_eval::*;
}

/// Market data providers and CSV storage.
pub mod data {
    pub use ronda_data::*;
}

/// End-to-end orchestration.
pub mod pipeline {
    pub use ronda_pipeline::*;
}

// Re-export common types at top level for convenience
pub use ronda_traits::{
    Date, FeatureVector, FundamentalSnapshot, Label, PipelineConfig, Prediction, PriceHistory,
    Result, RondaError, Symbol, Thresholds,
};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use ronda::prelude::*;
/// ```
pub mod prelude {
    pub use crate::data::{CsvProvider, DataProvider, ProviderClient};
    pub use crate::eval::{BacktestConfig, BacktestEngine, BacktestResult};
    pub use crate::features::{FeatureConfig, FeatureEngine, FeatureTable};
    pub use crate::model::{ModelArtifact, ModelRegistry, ModelTrainer, Predictor};
    pub use crate::pipeline::{Pipeline, RunOutcome};
    pub use crate::{
        Date, FeatureVector, Label, PipelineConfig, Prediction, PriceHistory, Result, RondaError,
        Thresholds,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        let parts: Vec<&str> = VERSION.split('.').collect();
        assert!(parts.len() >= 2, "Version should have at least major.minor");
    }

    #[test]
    fn test_error_types() {
        let _result: Result<()> = Ok(());
        let _error: RondaError = RondaError::Config("test".to_string());
    }
}
