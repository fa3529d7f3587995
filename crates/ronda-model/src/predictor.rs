//! Prediction from a trained artifact.

use crate::artifact::ModelArtifact;
use ronda_traits::{FeatureVector, Label, Prediction, Result};
use std::collections::BTreeSet;

/// Applies a trained model to feature vectors.
///
/// Construction validates the artifact once; prediction is then pure and
/// deterministic. Inputs are aligned to the artifact's feature list: extra
/// features are ignored, and missing or null features fall back to the
/// training medians stored in the artifact, with the fallback recorded in
/// the prediction's `features_missing` set.
#[derive(Debug, Clone)]
pub struct Predictor {
    artifact: ModelArtifact,
}

impl Predictor {
    /// Wraps a validated artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ronda_traits::RondaError::ModelMismatch`] for an artifact
    /// that fails structural validation.
    pub fn new(artifact: ModelArtifact) -> Result<Self> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    /// The artifact backing this predictor.
    #[must_use]
    pub const fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Predicts the forward return and decision label for one observation.
    ///
    /// # Errors
    ///
    /// Currently infallible after construction; the `Result` keeps the
    /// call side uniform with the other pipeline stages.
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction> {
        let artifact = &self.artifact;
        let mut features_used = BTreeSet::new();
        let mut features_missing = BTreeSet::new();

        let mut predicted_return = artifact.intercept;
        for (name, coefficient) in artifact.feature_list.iter().zip(&artifact.coefficients) {
            let value = match features.get(name).filter(|v| v.is_finite()) {
                Some(v) => {
                    features_used.insert(name.clone());
                    v
                }
                None => {
                    features_missing.insert(name.clone());
                    artifact.medians[name]
                }
            };
            predicted_return += coefficient * value;
        }

        let label = Label::from_return(predicted_return, &artifact.thresholds);
        Ok(Prediction {
            ticker: features.ticker.clone(),
            date: features.date,
            predicted_return,
            label,
            features_used,
            features_missing,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::tests::sample_artifact;
    use ronda_traits::Date;

    fn observation() -> FeatureVector {
        let mut fv = FeatureVector::new("TEST", Date::from_ymd_opt(2024, 7, 1).unwrap());
        fv.insert("momentum_20d", Some(0.1));
        fv.insert("rsi", Some(60.0));
        fv
    }

    #[test]
    fn test_predict_applies_coefficients() {
        let predictor = Predictor::new(sample_artifact()).unwrap();
        let prediction = predictor.predict(&observation()).unwrap();
        // 0.002 + 0.5 * 0.1 - 0.001 * 60 = -0.008 -> Hold with default thresholds.
        assert!((prediction.predicted_return - (-0.008)).abs() < 1e-12);
        assert_eq!(prediction.label, Label::Hold);
        assert_eq!(prediction.features_used.len(), 2);
        assert!(prediction.features_missing.is_empty());
    }

    #[test]
    fn test_missing_feature_imputed_and_recorded() {
        let predictor = Predictor::new(sample_artifact()).unwrap();
        let mut fv = observation();
        fv.insert("rsi", None);
        let prediction = predictor.predict(&fv).unwrap();
        // rsi falls back to its training median of 52.
        assert!((prediction.predicted_return - (0.002 + 0.05 - 0.052)).abs() < 1e-12);
        assert!(prediction.features_missing.contains("rsi"));
        assert!(!prediction.features_used.contains("rsi"));
    }

    #[test]
    fn test_extra_features_ignored() {
        let predictor = Predictor::new(sample_artifact()).unwrap();
        let mut fv = observation();
        fv.insert("pe_ratio", Some(1000.0));
        let baseline = predictor.predict(&observation()).unwrap();
        let with_extra = predictor.predict(&fv).unwrap();
        assert_eq!(baseline.predicted_return, with_extra.predicted_return);
    }

    #[test]
    fn test_predict_is_idempotent() {
        let predictor = Predictor::new(sample_artifact()).unwrap();
        let fv = observation();
        let a = predictor.predict(&fv).unwrap();
        let b = predictor.predict(&fv).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_corrupt_artifact_rejected_at_construction() {
        let mut artifact = sample_artifact();
        artifact.feature_list.clear();
        artifact.coefficients.clear();
        assert!(Predictor::new(artifact).is_err());
    }
}
