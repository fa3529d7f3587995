//! ronda CLI binary.
//!
//! Command-line interface for the ronda stock decision pipeline.

mod cmd;
mod data;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "ronda")]
#[command(about = "Stock decision-support pipeline", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every data-touching subcommand.
#[derive(clap::Args)]
pub(crate) struct DataOpts {
    /// Directory of CSV fixtures; omit to fetch over HTTP
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,

    /// Start date (YYYY-MM-DD)
    #[arg(long, default_value = "2022-01-01")]
    pub(crate) start: String,

    /// End date (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub(crate) end: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute a ticker's feature table and write it as CSV
    Features {
        /// Ticker symbol
        ticker: String,

        #[command(flatten)]
        data: DataOpts,

        /// Forward-return horizon in trading days
        #[arg(short = 'H', long, default_value = "20")]
        horizon: usize,

        /// Output CSV path (defaults to <TICKER>_features.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Train a model and store the artifact in the registry
    Train {
        /// Ticker symbol
        ticker: String,

        #[command(flatten)]
        data: DataOpts,

        /// Model registry directory
        #[arg(long, default_value = "models")]
        models: PathBuf,

        /// Forward-return horizon in trading days
        #[arg(short = 'H', long, default_value = "20")]
        horizon: usize,
    },

    /// Predict from the latest stored model for a ticker
    Predict {
        /// Ticker symbol
        ticker: String,

        #[command(flatten)]
        data: DataOpts,

        /// Model registry directory
        #[arg(long, default_value = "models")]
        models: PathBuf,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Backtest a freshly trained model over the period
    Backtest {
        /// Ticker symbol
        ticker: String,

        #[command(flatten)]
        data: DataOpts,

        /// Forward-return horizon in trading days
        #[arg(short = 'H', long, default_value = "20")]
        horizon: usize,

        /// Write the equity curve as CSV to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Full pipeline for one or more tickers: train, predict, backtest
    Run {
        /// Ticker symbols
        #[arg(value_delimiter = ',')]
        tickers: Vec<String>,

        #[command(flatten)]
        data: DataOpts,

        /// Model registry directory
        #[arg(long, default_value = "models")]
        models: PathBuf,

        /// Skip the backtest
        #[arg(long)]
        no_backtest: bool,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Features {
            ticker,
            data,
            horizon,
            output,
        } => {
            cmd::features::run(&ticker, &data, horizon, output).await?;
        }
        Commands::Train {
            ticker,
            data,
            models,
            horizon,
        } => {
            cmd::train::run(&ticker, &data, &models, horizon).await?;
        }
        Commands::Predict {
            ticker,
            data,
            models,
            format,
        } => {
            cmd::predict::run(&ticker, &data, &models, &format).await?;
        }
        Commands::Backtest {
            ticker,
            data,
            horizon,
            output,
            format,
        } => {
            cmd::backtest::run(&ticker, &data, horizon, output, &format).await?;
        }
        Commands::Run {
            tickers,
            data,
            models,
            no_backtest,
            format,
        } => {
            cmd::run::run(&tickers, &data, &models, !no_backtest, &format).await?;
        }
    }

    Ok(())
}
