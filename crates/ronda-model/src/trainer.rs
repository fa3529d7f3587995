//! Model training: chronological split, feature selection, imputation,
//! and the least-squares fit.

use crate::artifact::{ModelArtifact, TrainMetrics, ARTIFACT_VERSION};
use crate::linear::{r_squared, LinearModel};
use ndarray::{Array1, Array2};
use ronda_features::FeatureTable;
use ronda_traits::{stats, PipelineConfig, Result, RondaError, Thresholds};
use std::collections::BTreeMap;

/// Training configuration. A subset of [`PipelineConfig`] so the trainer
/// can be driven standalone.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Fraction of rows (by date order) forming the training partition.
    pub train_fraction: f64,
    /// Minimum usable rows below which training refuses to proceed.
    pub min_rows: usize,
    /// Minimum fraction of non-null training values a feature needs to
    /// be selected.
    pub min_coverage: f64,
    /// Horizon the target column was built with, recorded in the artifact.
    pub horizon_days: usize,
    /// Decision thresholds recorded in the artifact.
    pub thresholds: Thresholds,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for TrainConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            train_fraction: config.train_fraction,
            min_rows: config.min_rows,
            min_coverage: config.min_coverage,
            horizon_days: config.horizon_days,
            thresholds: config.thresholds,
        }
    }
}

/// Index of the first test row for `n` rows and a training fraction.
///
/// Rows before the index train, rows at and after it test. Clamped so the
/// training partition is never empty; the test partition may be.
#[must_use]
pub fn split_index(n: usize, train_fraction: f64) -> usize {
    let split = (n as f64 * train_fraction) as usize;
    split.clamp(1, n)
}

/// Fits a forward-return regression from a feature table.
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainConfig,
}

impl ModelTrainer {
    /// Creates a trainer with the given configuration.
    #[must_use]
    pub const fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Trains a model on `table`, using `features` if given or selecting
    /// by coverage otherwise.
    ///
    /// The split is strictly chronological: the first `train_fraction` of
    /// rows train, the remainder test. Imputation medians come from the
    /// training partition only and are persisted in the artifact.
    ///
    /// # Errors
    ///
    /// [`RondaError::InsufficientData`] with fewer than `min_rows` rows or
    /// when no feature clears the coverage bar;
    /// [`RondaError::Config`] when a requested feature does not exist.
    pub fn train(
        &self,
        table: &FeatureTable,
        features: Option<&[&str]>,
    ) -> Result<ModelArtifact> {
        let cfg = &self.config;
        let n = table.len();
        if n < cfg.min_rows {
            return Err(RondaError::InsufficientData(format!(
                "{} rows for {}, need at least {}",
                n,
                table.ticker(),
                cfg.min_rows
            )));
        }

        let dates = table.dates()?;
        let targets = table.targets()?;
        let split = split_index(n, cfg.train_fraction);

        let available = table.feature_names();
        let candidates: Vec<String> = match features {
            Some(requested) => {
                for name in requested {
                    if !available.iter().any(|a| a == name) {
                        return Err(RondaError::Config(format!(
                            "requested feature '{name}' is not in the table"
                        )));
                    }
                }
                requested.iter().map(|s| (*s).to_string()).collect()
            }
            None => available,
        };

        // Select by training-partition coverage and compute medians there.
        let mut selected = Vec::new();
        let mut columns = BTreeMap::new();
        let mut medians = BTreeMap::new();
        for name in candidates {
            let column = table.feature_column(&name)?;
            let train_values: Vec<f64> = column[..split]
                .iter()
                .filter_map(|v| v.filter(|x| x.is_finite()))
                .collect();
            let coverage = train_values.len() as f64 / split as f64;
            if coverage < cfg.min_coverage {
                continue;
            }
            let median = stats::median(&train_values);
            if !median.is_finite() {
                continue;
            }
            medians.insert(name.clone(), median);
            columns.insert(name.clone(), column);
            selected.push(name);
        }
        if selected.is_empty() {
            return Err(RondaError::InsufficientData(format!(
                "no feature reaches {:.0}% coverage for {}",
                cfg.min_coverage * 100.0,
                table.ticker()
            )));
        }

        // Dense design matrix, nulls imputed with the training medians.
        let k = selected.len();
        let mut x = Array2::<f64>::zeros((n, k));
        for (j, name) in selected.iter().enumerate() {
            let column = &columns[name];
            let median = medians[name];
            for i in 0..n {
                x[[i, j]] = column[i].filter(|v| v.is_finite()).unwrap_or(median);
            }
        }
        let y = Array1::from_vec(targets.clone());

        let x_train = x.slice(ndarray::s![..split, ..]).to_owned();
        let y_train = y.slice(ndarray::s![..split]).to_owned();
        let model = LinearModel::fit(&x_train, &y_train)?;

        let train_fit = model.predict(&x_train);
        let train_r2 = r_squared(&targets[..split], &train_fit);
        let test_r2 = if split < n {
            let x_test = x.slice(ndarray::s![split.., ..]).to_owned();
            Some(r_squared(&targets[split..], &model.predict(&x_test)))
        } else {
            None
        };

        let importances = feature_importances(&selected, &model.coefficients, &x_train);

        let artifact = ModelArtifact {
            version: ARTIFACT_VERSION,
            ticker: table.ticker().to_string(),
            trained_at: dates[split - 1],
            horizon_days: cfg.horizon_days,
            thresholds: cfg.thresholds,
            feature_list: selected,
            coefficients: model.coefficients,
            intercept: model.intercept,
            medians,
            importances,
            metrics: TrainMetrics {
                train_r2,
                test_r2,
                n_train: split,
                n_test: n - split,
                train_start: dates[0],
                train_end: dates[split - 1],
            },
        };
        artifact.validate()?;
        Ok(artifact)
    }
}

/// Per-feature |coefficient| x training stdev, normalized to sum to one.
fn feature_importances(
    names: &[String],
    coefficients: &[f64],
    x_train: &Array2<f64>,
) -> BTreeMap<String, f64> {
    let raw: Vec<f64> = names
        .iter()
        .enumerate()
        .map(|(j, _)| {
            let column: Vec<f64> = x_train.column(j).to_vec();
            let std = stats::sample_std(&column);
            if std.is_finite() {
                coefficients[j].abs() * std
            } else {
                0.0
            }
        })
        .collect();
    let total: f64 = raw.iter().sum();
    names
        .iter()
        .zip(raw)
        .map(|(name, value)| {
            let weight = if total > 0.0 { value / total } else { 0.0 };
            (name.clone(), weight)
        })
        .collect()
}
