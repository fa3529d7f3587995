#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core type definitions for the ronda decision-support pipeline.
//!
//! This crate provides the foundational types shared by every pipeline
//! stage: validated price history, fundamental snapshots, feature vectors,
//! the Buy/Hold/Sell label policy, and the error taxonomy.

/// The version of the ronda-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod label;
pub mod stats;
pub mod types;

pub use config::{Imputation, PipelineConfig, ShortPolicy};
pub use error::{Result, RondaError};
pub use label::{Label, Thresholds};
pub use types::{
    dates_from_column, days_from_date, Date, FeatureVector, FundamentalSnapshot, Prediction,
    PriceHistory, Symbol, CE_TO_UNIX_EPOCH_DAYS,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
