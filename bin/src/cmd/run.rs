//! Run command implementation: the full pipeline per ticker.

use crate::{data, DataOpts};
use anyhow::Result;
use ronda_model::ModelRegistry;
use ronda_pipeline::Pipeline;
use ronda_traits::PipelineConfig;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

/// Run fetch, train, predict, and optionally backtest for each ticker.
pub(crate) async fn run(
    tickers: &[String],
    opts: &DataOpts,
    models: &Path,
    with_backtest: bool,
    format: &str,
) -> Result<()> {
    anyhow::ensure!(!tickers.is_empty(), "no tickers given");
    let (start, end) = data::date_range(opts)?;
    let provider = data::provider(opts)?;

    let pipeline = Arc::new(Pipeline::new(
        provider,
        ModelRegistry::new(models),
        PipelineConfig::default(),
    )?);

    let results = pipeline
        .run_many(tickers, start, end, with_backtest)
        .await;

    if format == "json" {
        let entries: Vec<serde_json::Value> = results
            .iter()
            .map(|(ticker, outcome)| match outcome {
                Ok(outcome) => json!({
                    "ticker": ticker,
                    "prediction": outcome.prediction,
                    "backtest": outcome.backtest.as_ref().map(|b| json!({
                        "total_return": b.total_return,
                        "sharpe_ratio": b.sharpe_ratio,
                        "max_drawdown": b.max_drawdown,
                        "win_rate": b.win_rate,
                        "n_trades": b.n_trades,
                    })),
                }),
                Err(err) => json!({ "ticker": ticker, "error": err.to_string() }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for (ticker, outcome) in &results {
        match outcome {
            Ok(outcome) => {
                let p = &outcome.prediction;
                print!(
                    "{:<8} {}  {:+.2}%  {}",
                    ticker,
                    p.date,
                    p.predicted_return * 100.0,
                    p.label
                );
                if let Some(b) = &outcome.backtest {
                    print!(
                        "  [backtest: ret {:+.1}%, dd {:.1}%, trades {}]",
                        b.total_return * 100.0,
                        b.max_drawdown * 100.0,
                        b.n_trades
                    );
                }
                println!();
            }
            Err(err) => println!("{:<8} failed: {}", ticker, err),
        }
    }

    let failures = results.iter().filter(|(_, r)| r.is_err()).count();
    if failures > 0 {
        println!("\n{failures} of {} tickers failed", results.len());
    }
    Ok(())
}
