//! Backtesting and risk metrics for the ronda decision pipeline.
//!
//! Replays a trained model's decisions over historical feature rows and
//! summarizes the outcome: total return, annualized Sharpe ratio, maximum
//! drawdown, and the win rate of decisive calls. Ordering of the input is
//! validated before any replay work happens.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod backtest;
pub mod metrics;

// Re-export key types
pub use backtest::{BacktestConfig, BacktestEngine, BacktestResult, BacktestStep};
