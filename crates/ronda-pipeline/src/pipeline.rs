//! The end-to-end run: fetch, featurize, train, predict, backtest.

use ronda_data::DataProvider;
use ronda_eval::{BacktestConfig, BacktestEngine, BacktestResult};
use ronda_features::{FeatureConfig, FeatureEngine, FeatureTable};
use ronda_model::{ModelRegistry, ModelTrainer, Predictor, TrainConfig};
use ronda_traits::{Date, PipelineConfig, Prediction, Result, RondaError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Everything a completed run produces for one ticker.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Decision for the most recent feature row.
    pub prediction: Prediction,
    /// Historical replay, when requested.
    pub backtest: Option<BacktestResult>,
    /// Where the trained artifact was stored.
    pub artifact_path: PathBuf,
    /// The feature table the run was built on.
    pub table: FeatureTable,
}

/// Orchestrates the full pipeline for one or many tickers.
///
/// Owns a data provider, a model registry, and one validated
/// configuration; each `run` is independent and owns its own table and
/// artifact, so per-ticker failures never poison each other.
#[derive(Debug, Clone)]
pub struct Pipeline<P> {
    provider: P,
    registry: ModelRegistry,
    config: PipelineConfig,
    engine: FeatureEngine,
}

impl<P: DataProvider> Pipeline<P> {
    /// Creates a pipeline, validating the configuration up front.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Config`] for an invalid configuration.
    pub fn new(provider: P, registry: ModelRegistry, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            provider,
            registry,
            config,
            engine: FeatureEngine::new(FeatureConfig::default()),
        })
    }

    /// The pipeline's configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Runs the full pipeline for one ticker over `[from, to]`.
    ///
    /// Fetches bars and fundamentals, builds the feature table, trains and
    /// stores a model, predicts from the latest feature row, and replays
    /// the decisions historically when `with_backtest` is set. A
    /// fundamentals fetch failure degrades to an empty snapshot set; every
    /// other failure aborts this ticker's run.
    ///
    /// # Errors
    ///
    /// Propagates provider, training, and backtest errors.
    pub async fn run(
        &self,
        ticker: &str,
        from: Date,
        to: Date,
        with_backtest: bool,
    ) -> Result<RunOutcome> {
        let history = self.provider.price_history(ticker, from, to).await?;
        let fundamentals = match self.provider.fundamentals(ticker).await {
            Ok(snapshots) => snapshots,
            Err(RondaError::DataUnavailable(_)) => Vec::new(),
            Err(err) => return Err(err),
        };

        let table = self
            .engine
            .compute(&history, &fundamentals, self.config.horizon_days)?;

        let trainer = ModelTrainer::new(TrainConfig::from(&self.config));
        let artifact = trainer.train(&table, None)?;
        let artifact_path = self.registry.save(&artifact)?;

        let predictor = Predictor::new(artifact)?;
        let prediction = predictor.predict(&table.latest_row()?)?;

        let backtest = if with_backtest {
            let engine = BacktestEngine::new(BacktestConfig::from(&self.config));
            Some(engine.run(&table, &predictor)?)
        } else {
            None
        };

        Ok(RunOutcome {
            prediction,
            backtest,
            artifact_path,
            table,
        })
    }

    /// Runs every ticker concurrently, one tokio task each.
    ///
    /// Returns one `(ticker, Result)` pair per input in input order. A
    /// failing ticker never aborts the others.
    pub async fn run_many(
        self: Arc<Self>,
        tickers: &[String],
        from: Date,
        to: Date,
        with_backtest: bool,
    ) -> Vec<(String, Result<RunOutcome>)>
    where
        P: Send + Sync + 'static,
    {
        let mut set = JoinSet::new();
        for (index, ticker) in tickers.iter().cloned().enumerate() {
            let pipeline = Arc::clone(&self);
            set.spawn(async move {
                let outcome = pipeline.run(&ticker, from, to, with_backtest).await;
                (index, ticker, outcome)
            });
        }

        let mut results: Vec<Option<(String, Result<RunOutcome>)>> =
            (0..tickers.len()).map(|_| None).collect();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, ticker, outcome)) => results[index] = Some((ticker, outcome)),
                // Panicked tasks leave their slot empty; filled in below.
                Err(_) => {}
            }
        }

        results
            .into_iter()
            .zip(tickers)
            .map(|(slot, ticker)| {
                slot.unwrap_or_else(|| {
                    (
                        ticker.clone(),
                        Err(RondaError::Other(format!("task for {ticker} panicked"))),
                    )
                })
            })
            .collect()
    }
}
