//! Features command implementation.

use crate::{data, DataOpts};
use anyhow::Result;
use ronda_data::{csv, DataProvider};
use ronda_features::{FeatureConfig, FeatureEngine};
use std::path::PathBuf;

/// Compute a ticker's feature table and write it as CSV.
pub(crate) async fn run(
    ticker: &str,
    opts: &DataOpts,
    horizon: usize,
    output: Option<PathBuf>,
) -> Result<()> {
    let (start, end) = data::date_range(opts)?;
    let provider = data::provider(opts)?;

    println!("Fetching {ticker} from {start} to {end}...");
    let history = provider.price_history(ticker, start, end).await?;
    let fundamentals = provider.fundamentals(ticker).await.unwrap_or_default();
    println!(
        "{} bars, {} fundamental snapshots",
        history.len(),
        fundamentals.len()
    );

    let engine = FeatureEngine::new(FeatureConfig::default());
    let table = engine.compute(&history, &fundamentals, horizon)?;

    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}_features.csv", ticker.to_uppercase())));
    csv::write_feature_table(&table, &path)?;

    println!(
        "Wrote {} rows x {} features to {}",
        table.len(),
        table.feature_names().len(),
        path.display()
    );
    Ok(())
}
