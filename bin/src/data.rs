//! Shared helpers: date parsing, provider selection, configuration.

use crate::DataOpts;
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use ronda_data::{CsvProvider, DataProvider, ProviderClient};
use ronda_traits::{Date, FundamentalSnapshot, PriceHistory};

/// Parse a YYYY-MM-DD date argument.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date: {s}"))
}

/// Resolve the start/end range from the shared options.
pub(crate) fn date_range(opts: &DataOpts) -> Result<(NaiveDate, NaiveDate)> {
    let start = parse_date(&opts.start)?;
    let end = match &opts.end {
        Some(s) => parse_date(s)?,
        None => Utc::now().date_naive(),
    };
    anyhow::ensure!(start < end, "start {start} is not before end {end}");
    Ok((start, end))
}

/// Either data source behind one [`DataProvider`] implementation.
pub(crate) enum AnyProvider {
    Csv(CsvProvider),
    Http(ProviderClient),
}

impl DataProvider for AnyProvider {
    async fn price_history(
        &self,
        ticker: &str,
        from: Date,
        to: Date,
    ) -> ronda_traits::Result<PriceHistory> {
        match self {
            Self::Csv(p) => p.price_history(ticker, from, to).await,
            Self::Http(p) => p.price_history(ticker, from, to).await,
        }
    }

    async fn fundamentals(&self, ticker: &str) -> ronda_traits::Result<Vec<FundamentalSnapshot>> {
        match self {
            Self::Csv(p) => p.fundamentals(ticker).await,
            Self::Http(p) => DataProvider::fundamentals(p, ticker).await,
        }
    }
}

/// Build a provider from the shared options: CSV fixtures when
/// `--data-dir` is given, the HTTP API otherwise.
pub(crate) fn provider(opts: &DataOpts) -> Result<AnyProvider> {
    match &opts.data_dir {
        Some(dir) => Ok(AnyProvider::Csv(CsvProvider::new(dir))),
        None => Ok(AnyProvider::Http(
            ProviderClient::from_env().context("set RONDA_API_KEY or pass --data-dir")?,
        )),
    }
}
