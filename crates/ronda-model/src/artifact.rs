//! Persisted model artifacts.
//!
//! An artifact is the complete, self-describing output of a training run:
//! coefficients, the exact feature ordering they apply to, the training
//! medians needed to impute missing inputs at prediction time, the decision
//! thresholds, and summary metrics. Artifacts are versioned JSON blobs;
//! loading anything structurally unsound is a [`RondaError::ModelMismatch`].

use ronda_traits::{Date, Result, RondaError, Thresholds};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Current artifact schema version. Bumped on incompatible layout changes.
pub const ARTIFACT_VERSION: u32 = 1;

/// Summary metrics captured at training time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrainMetrics {
    /// R-squared on the training partition.
    pub train_r2: f64,
    /// R-squared on the held-out test partition, if one existed.
    pub test_r2: Option<f64>,
    /// Number of training rows.
    pub n_train: usize,
    /// Number of test rows.
    pub n_test: usize,
    /// First date in the training partition.
    pub train_start: Date,
    /// Last date in the training partition.
    pub train_end: Date,
}

/// A trained, persistable model for one ticker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelArtifact {
    /// Artifact schema version.
    pub version: u32,
    /// Ticker the model was trained for.
    pub ticker: String,
    /// Date the model was trained (last training date, not wall clock).
    pub trained_at: Date,
    /// Forward-return horizon in trading days.
    pub horizon_days: usize,
    /// Decision thresholds applied to the predicted return.
    pub thresholds: Thresholds,
    /// Feature names in coefficient order.
    pub feature_list: Vec<String>,
    /// Per-feature coefficients, aligned with `feature_list`.
    pub coefficients: Vec<f64>,
    /// Intercept term.
    pub intercept: f64,
    /// Training-partition median per feature, used for imputation.
    pub medians: BTreeMap<String, f64>,
    /// Normalized per-feature importance (|coefficient| x feature stdev).
    pub importances: BTreeMap<String, f64>,
    /// Training summary metrics.
    pub metrics: TrainMetrics,
}

impl ModelArtifact {
    /// Structural validation shared by training, loading, and the
    /// predictor constructor.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::ModelMismatch`] describing the first problem
    /// found.
    pub fn validate(&self) -> Result<()> {
        if self.version != ARTIFACT_VERSION {
            return Err(RondaError::ModelMismatch(format!(
                "artifact version {} but this build reads version {ARTIFACT_VERSION}",
                self.version
            )));
        }
        if self.feature_list.is_empty() {
            return Err(RondaError::ModelMismatch(
                "artifact has an empty feature list".to_string(),
            ));
        }
        if self.feature_list.len() != self.coefficients.len() {
            return Err(RondaError::ModelMismatch(format!(
                "{} features but {} coefficients",
                self.feature_list.len(),
                self.coefficients.len()
            )));
        }
        for name in &self.feature_list {
            if !self.medians.contains_key(name) {
                return Err(RondaError::ModelMismatch(format!(
                    "no training median stored for feature '{name}'"
                )));
            }
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(RondaError::ModelMismatch(
                "artifact contains non-finite coefficients".to_string(),
            ));
        }
        Ok(())
    }

    /// Serializes the artifact to pretty JSON at `path`.
    ///
    /// # Errors
    ///
    /// Surfaces I/O and serialization failures as [`RondaError::Other`].
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| RondaError::Other(format!("artifact serialization failed: {e}")))?;
        fs::write(path, json)
            .map_err(|e| RondaError::Other(format!("writing {}: {e}", path.display())))
    }

    /// Loads and validates an artifact from `path`.
    ///
    /// # Errors
    ///
    /// [`RondaError::DataUnavailable`] when the file cannot be read,
    /// [`RondaError::ModelMismatch`] when it parses but fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| RondaError::DataUnavailable(format!("reading {}: {e}", path.display())))?;
        let artifact: Self = serde_json::from_str(&json)
            .map_err(|e| RondaError::ModelMismatch(format!("artifact does not parse: {e}")))?;
        artifact.validate()?;
        Ok(artifact)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn sample_artifact() -> ModelArtifact {
        let features = vec!["momentum_20d".to_string(), "rsi".to_string()];
        let mut medians = BTreeMap::new();
        medians.insert("momentum_20d".to_string(), 0.01);
        medians.insert("rsi".to_string(), 52.0);
        ModelArtifact {
            version: ARTIFACT_VERSION,
            ticker: "TEST".to_string(),
            trained_at: Date::from_ymd_opt(2024, 6, 28).unwrap(),
            horizon_days: 20,
            thresholds: Thresholds::default(),
            feature_list: features,
            coefficients: vec![0.5, -0.001],
            intercept: 0.002,
            medians,
            importances: BTreeMap::new(),
            metrics: TrainMetrics {
                train_r2: 0.12,
                test_r2: Some(0.05),
                n_train: 160,
                n_test: 40,
                train_start: Date::from_ymd_opt(2023, 9, 1).unwrap(),
                train_end: Date::from_ymd_opt(2024, 6, 28).unwrap(),
            },
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let artifact = sample_artifact();
        artifact.save(&path).unwrap();
        let loaded = ModelArtifact::load(&path).unwrap();
        assert_eq!(loaded, artifact);
    }

    #[test]
    fn test_wrong_version_rejected() {
        let mut artifact = sample_artifact();
        artifact.version = ARTIFACT_VERSION + 1;
        assert!(matches!(
            artifact.validate().unwrap_err(),
            RondaError::ModelMismatch(_)
        ));
    }

    #[test]
    fn test_coefficient_count_mismatch_rejected() {
        let mut artifact = sample_artifact();
        artifact.coefficients.pop();
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_missing_median_rejected() {
        let mut artifact = sample_artifact();
        artifact.medians.remove("rsi");
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_empty_feature_list_rejected() {
        let mut artifact = sample_artifact();
        artifact.feature_list.clear();
        artifact.coefficients.clear();
        assert!(artifact.validate().is_err());
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let err = ModelArtifact::load(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, RondaError::DataUnavailable(_)));
    }
}
