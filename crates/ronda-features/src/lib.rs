//! Feature engineering for the ronda decision pipeline.
//!
//! This crate turns a ticker's price history and fundamental snapshots into
//! a per-date feature table with a forward-return target column:
//! - Technical indicators: trend (SMA/EMA/Bollinger), momentum (including
//!   RSI), and volatility/volume ratios over trailing windows
//! - Fundamental features: valuation ratios, growth rates, and encoded
//!   sector / market-cap categoricals, joined as-of each row's date
//!
//! Missing values stay missing: an indicator without a full trailing window
//! or a fundamental with no snapshot yet is a null cell, never a fabricated
//! number. Rows too early for the longest lookback or too late for the
//! forward horizon are dropped outright.
//!
//! # Example
//!
//! ```ignore
//! use ronda_features::{FeatureConfig, FeatureEngine};
//!
//! let engine = FeatureEngine::new(FeatureConfig::default());
//! let table = engine.compute(&history, &fundamentals, 20)?;
//! let latest = table.latest_row()?;
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod engine;
pub mod fundamentals;
pub mod indicators;
pub mod table;

// Re-export key types
pub use engine::{FeatureConfig, FeatureEngine};
pub use table::{FeatureTable, RESERVED_COLUMNS};
