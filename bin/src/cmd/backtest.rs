//! Backtest command implementation.

use crate::{data, DataOpts};
use anyhow::Result;
use ronda_data::DataProvider;
use ronda_eval::{BacktestConfig, BacktestEngine, BacktestResult};
use ronda_features::{FeatureConfig, FeatureEngine};
use ronda_model::{ModelTrainer, Predictor, TrainConfig};
use ronda_pipeline::export;
use ronda_traits::PipelineConfig;
use std::path::PathBuf;

/// Train a fresh model and replay it over the period.
pub(crate) async fn run(
    ticker: &str,
    opts: &DataOpts,
    horizon: usize,
    output: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let (start, end) = data::date_range(opts)?;
    let provider = data::provider(opts)?;

    println!("Fetching {ticker} from {start} to {end}...");
    let history = provider.price_history(ticker, start, end).await?;
    let fundamentals = provider.fundamentals(ticker).await.unwrap_or_default();

    let engine = FeatureEngine::new(FeatureConfig::default());
    let table = engine.compute(&history, &fundamentals, horizon)?;

    let pipeline_config = PipelineConfig {
        horizon_days: horizon,
        ..PipelineConfig::default()
    };
    let trainer = ModelTrainer::new(TrainConfig::from(&pipeline_config));
    let predictor = Predictor::new(trainer.train(&table, None)?)?;

    let backtester = BacktestEngine::new(BacktestConfig::from(&pipeline_config));
    let result = backtester.run(&table, &predictor)?;

    if let Some(path) = output {
        export::write_equity_curve(&result, &path)?;
        println!("Wrote equity curve to {}", path.display());
    }

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    print_summary(&result);
    Ok(())
}

fn print_summary(result: &BacktestResult) {
    println!("\nBacktest summary for {}:", result.ticker);
    println!("  decisions:     {}", result.steps.len());
    println!("  trades:        {}", result.n_trades);
    println!("  total return:  {:+.2}%", result.total_return * 100.0);
    println!("  sharpe ratio:  {:.2}", result.sharpe_ratio);
    println!("  max drawdown:  {:.2}%", result.max_drawdown * 100.0);
    match result.win_rate {
        Some(rate) => println!("  win rate:      {:.1}%", rate * 100.0),
        None => println!("  win rate:      n/a (no decisive calls)"),
    }
}
