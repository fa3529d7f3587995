//! Pipeline configuration.
//!
//! Every recognized knob is enumerated here and validated eagerly, before
//! any computation runs. The defaults reproduce the windows and thresholds
//! the pipeline documents.

use crate::error::{Result, RondaError};
use crate::label::Thresholds;
use serde::{Deserialize, Serialize};

/// How missing feature values are filled during training and prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Imputation {
    /// Column median, computed on the training partition only.
    #[default]
    Median,
}

/// What a Sell label does in the backtest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShortPolicy {
    /// Sell opens a one-unit short position.
    #[default]
    Short,
    /// Sell goes flat (cash) instead of short.
    Flat,
}

/// Configuration for a full pipeline run.
///
/// Validated as a whole via [`PipelineConfig::validate`]; stages receive a
/// reference and read the fields they need.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Forward-return horizon in trading days.
    pub horizon_days: usize,
    /// Buy/Sell decision thresholds applied to predicted returns.
    pub thresholds: Thresholds,
    /// Chronological fraction of rows assigned to the training partition.
    pub train_fraction: f64,
    /// Minimum usable rows required to train a model at all.
    pub min_rows: usize,
    /// Minimum fraction of non-missing training rows a feature column needs
    /// to be auto-selected.
    pub min_coverage: f64,
    /// Missing-value strategy shared by trainer and predictor.
    pub imputation: Imputation,
    /// Trading periods per year used to annualize the Sharpe ratio. The
    /// effective scaling is `sqrt(periods_per_year / horizon_days)`.
    pub periods_per_year: f64,
    /// Behavior of Sell decisions in the backtest.
    pub short_policy: ShortPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            horizon_days: 20,
            thresholds: Thresholds::default(),
            train_fraction: 0.8,
            min_rows: 60,
            min_coverage: 0.5,
            imputation: Imputation::Median,
            periods_per_year: 252.0,
            short_policy: ShortPolicy::Short,
        }
    }
}

impl PipelineConfig {
    /// Validates the configuration, rejecting it before any computation.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            return Err(RondaError::Config("horizon_days must be positive".into()));
        }
        // Thresholds carry their own invariant; re-check here in case the
        // struct was built from deserialized fields.
        Thresholds::new(self.thresholds.buy, self.thresholds.sell)?;
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(RondaError::Config(format!(
                "train_fraction must be in (0, 1), got {}",
                self.train_fraction
            )));
        }
        if self.min_rows == 0 {
            return Err(RondaError::Config("min_rows must be positive".into()));
        }
        if !(0.0..=1.0).contains(&self.min_coverage) {
            return Err(RondaError::Config(format!(
                "min_coverage must be in [0, 1], got {}",
                self.min_coverage
            )));
        }
        if !(self.periods_per_year > 0.0) {
            return Err(RondaError::Config(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        Ok(())
    }

    /// Annualization factor for per-horizon period returns.
    #[must_use]
    pub fn annualization_factor(&self) -> f64 {
        (self.periods_per_year / self.horizon_days as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.horizon_days, 20);
        assert_eq!(config.min_rows, 60);
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let config = PipelineConfig {
            horizon_days: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RondaError::Config(_))));
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let config = PipelineConfig {
            thresholds: Thresholds {
                buy: -0.01,
                sell: 0.01,
            },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(RondaError::Config(_))));
    }

    #[test]
    fn test_train_fraction_bounds() {
        for bad in [0.0, 1.0, 1.5, -0.2] {
            let config = PipelineConfig {
                train_fraction: bad,
                ..Default::default()
            };
            assert!(config.validate().is_err(), "fraction {bad} should fail");
        }
    }

    #[test]
    fn test_annualization_factor() {
        let config = PipelineConfig {
            horizon_days: 20,
            periods_per_year: 252.0,
            ..Default::default()
        };
        let expected = (252.0f64 / 20.0).sqrt();
        assert!((config.annualization_factor() - expected).abs() < 1e-12);
    }
}
