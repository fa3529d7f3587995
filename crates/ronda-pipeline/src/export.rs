//! CSV exports of run outputs.

use polars::prelude::*;
use ronda_eval::BacktestResult;
use ronda_traits::{days_from_date, Prediction, Result, RondaError};
use std::fs::File;
use std::path::Path;

fn write_csv(mut df: DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| RondaError::Other(format!("creating {}: {e}", path.display())))?;
    CsvWriter::new(file).include_header(true).finish(&mut df)?;
    Ok(())
}

/// Writes predictions as one CSV row each.
///
/// # Errors
///
/// Surfaces I/O and serialization failures.
pub fn write_predictions(predictions: &[Prediction], path: &Path) -> Result<()> {
    let df = df! {
        "ticker" => predictions.iter().map(|p| p.ticker.clone()).collect::<Vec<String>>(),
        "date" => predictions.iter().map(|p| days_from_date(p.date)).collect::<Vec<i32>>(),
        "predicted_return" => predictions.iter().map(|p| p.predicted_return).collect::<Vec<f64>>(),
        "label" => predictions.iter().map(|p| p.label.as_str().to_string()).collect::<Vec<String>>(),
        "features_missing" => predictions
            .iter()
            .map(|p| p.features_missing.iter().cloned().collect::<Vec<_>>().join(";"))
            .collect::<Vec<String>>(),
    }?;
    let mut df = df;
    let as_date = df.column("date")?.cast(&DataType::Date)?;
    df.replace("date", as_date.as_materialized_series().clone())?;
    write_csv(df, path)
}

/// Writes a backtest's equity curve and per-step outcomes as CSV.
///
/// # Errors
///
/// Surfaces I/O and serialization failures.
pub fn write_equity_curve(result: &BacktestResult, path: &Path) -> Result<()> {
    let df = df! {
        "date" => result.steps.iter().map(|s| days_from_date(s.date)).collect::<Vec<i32>>(),
        "label" => result.steps.iter().map(|s| s.label.as_str().to_string()).collect::<Vec<String>>(),
        "position" => result.steps.iter().map(|s| s.position).collect::<Vec<f64>>(),
        "realized_return" => result.steps.iter().map(|s| s.realized_return).collect::<Vec<f64>>(),
        "period_return" => result.steps.iter().map(|s| s.period_return).collect::<Vec<f64>>(),
        "equity" => result.steps.iter().map(|s| s.equity).collect::<Vec<f64>>(),
    }?;
    let mut df = df;
    let as_date = df.column("date")?.cast(&DataType::Date)?;
    df.replace("date", as_date.as_materialized_series().clone())?;
    write_csv(df, path)
}
