//! Train command implementation.

use crate::{data, DataOpts};
use anyhow::Result;
use ronda_data::DataProvider;
use ronda_features::{FeatureConfig, FeatureEngine};
use ronda_model::{ModelRegistry, ModelTrainer, TrainConfig};
use ronda_traits::PipelineConfig;
use std::path::Path;

/// Train a model for one ticker and store the artifact.
pub(crate) async fn run(
    ticker: &str,
    opts: &DataOpts,
    models: &Path,
    horizon: usize,
) -> Result<()> {
    let (start, end) = data::date_range(opts)?;
    let provider = data::provider(opts)?;

    println!("Fetching {ticker} from {start} to {end}...");
    let history = provider.price_history(ticker, start, end).await?;
    let fundamentals = provider.fundamentals(ticker).await.unwrap_or_default();

    let engine = FeatureEngine::new(FeatureConfig::default());
    let table = engine.compute(&history, &fundamentals, horizon)?;
    println!("Feature table: {} rows", table.len());

    let config = TrainConfig {
        horizon_days: horizon,
        ..TrainConfig::from(&PipelineConfig::default())
    };
    let trainer = ModelTrainer::new(config);
    let artifact = trainer.train(&table, None)?;

    println!("\nTraining summary for {ticker}:");
    println!(
        "  partitions:  {} train / {} test",
        artifact.metrics.n_train, artifact.metrics.n_test
    );
    println!(
        "  date range:  {} to {}",
        artifact.metrics.train_start, artifact.metrics.train_end
    );
    println!("  train R2:    {:.4}", artifact.metrics.train_r2);
    if let Some(test_r2) = artifact.metrics.test_r2 {
        println!("  test R2:     {:.4}", test_r2);
    }

    println!("\nTop features by importance:");
    let mut ranked: Vec<(&String, &f64)> = artifact.importances.iter().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(a.1).unwrap_or(std::cmp::Ordering::Equal));
    for (name, weight) in ranked.iter().take(8) {
        println!("  {:<22} {:.3}", name, weight);
    }

    let registry = ModelRegistry::new(models);
    let path = registry.save(&artifact)?;
    println!("\nStored artifact at {}", path.display());
    Ok(())
}
