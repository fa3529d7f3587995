//! Predict command implementation.

use crate::{data, DataOpts};
use anyhow::Result;
use ronda_data::DataProvider;
use ronda_features::{FeatureConfig, FeatureEngine};
use ronda_model::{ModelRegistry, Predictor};
use std::path::Path;

/// Predict from the latest stored model for a ticker.
pub(crate) async fn run(ticker: &str, opts: &DataOpts, models: &Path, format: &str) -> Result<()> {
    let registry = ModelRegistry::new(models);
    let artifact = registry.latest(ticker)?;
    let horizon = artifact.horizon_days;
    let predictor = Predictor::new(artifact)?;

    let (start, end) = data::date_range(opts)?;
    let provider = data::provider(opts)?;
    let history = provider.price_history(ticker, start, end).await?;
    let fundamentals = provider.fundamentals(ticker).await.unwrap_or_default();

    let engine = FeatureEngine::new(FeatureConfig::default());
    let table = engine.compute(&history, &fundamentals, horizon)?;
    let prediction = predictor.predict(&table.latest_row()?)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&prediction)?);
        return Ok(());
    }

    println!("\nPrediction for {}:", prediction.ticker);
    println!("  as of:             {}", prediction.date);
    println!("  horizon:           {} trading days", horizon);
    println!(
        "  predicted return:  {:+.2}%",
        prediction.predicted_return * 100.0
    );
    println!("  decision:          {}", prediction.label);
    if !prediction.features_missing.is_empty() {
        println!(
            "  imputed features:  {}",
            prediction
                .features_missing
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        );
    }
    Ok(())
}
