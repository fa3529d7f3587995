//! The provider seam between the pipeline and its data sources.

use crate::client::ProviderClient;
use crate::csv;
use ronda_traits::{Date, FundamentalSnapshot, PriceHistory, Result, RondaError};
use std::path::PathBuf;

/// Source of raw market data for the pipeline.
///
/// The pipeline is generic over this trait so production runs can hit the
/// HTTP provider while tests and offline runs read local CSV fixtures.
pub trait DataProvider: Send + Sync {
    /// Daily bars for a ticker over an inclusive date range, ascending.
    fn price_history(
        &self,
        ticker: &str,
        from: Date,
        to: Date,
    ) -> impl std::future::Future<Output = Result<PriceHistory>> + Send;

    /// Fundamental snapshots for a ticker, ascending by `as_of_date`.
    /// An empty vector means fundamentals are unavailable, which the
    /// pipeline tolerates.
    fn fundamentals(
        &self,
        ticker: &str,
    ) -> impl std::future::Future<Output = Result<Vec<FundamentalSnapshot>>> + Send;
}

impl DataProvider for ProviderClient {
    async fn price_history(&self, ticker: &str, from: Date, to: Date) -> Result<PriceHistory> {
        Ok(self.historical_prices(ticker, from, to).await?)
    }

    async fn fundamentals(&self, ticker: &str) -> Result<Vec<FundamentalSnapshot>> {
        Ok(ProviderClient::fundamentals(self, ticker).await?)
    }
}

/// Offline provider reading `<TICKER>.csv` price files and optional
/// `<TICKER>_fundamentals.json` snapshot files from one directory.
#[derive(Debug, Clone)]
pub struct CsvProvider {
    root: PathBuf,
}

impl CsvProvider {
    /// Creates a provider rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn price_path(&self, ticker: &str) -> PathBuf {
        self.root.join(format!("{}.csv", ticker.to_uppercase()))
    }

    fn fundamentals_path(&self, ticker: &str) -> PathBuf {
        self.root
            .join(format!("{}_fundamentals.json", ticker.to_uppercase()))
    }
}

impl DataProvider for CsvProvider {
    async fn price_history(&self, ticker: &str, from: Date, to: Date) -> Result<PriceHistory> {
        let full = csv::read_price_history(ticker, &self.price_path(ticker))?;
        let restricted = full.restrict(from, to)?;
        if restricted.is_empty() {
            return Err(RondaError::DataUnavailable(format!(
                "{ticker}: no bars between {from} and {to}"
            )));
        }
        Ok(restricted)
    }

    async fn fundamentals(&self, ticker: &str) -> Result<Vec<FundamentalSnapshot>> {
        let path = self.fundamentals_path(ticker);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let json = std::fs::read_to_string(&path)
            .map_err(|e| RondaError::DataUnavailable(format!("reading {}: {e}", path.display())))?;
        let mut snapshots: Vec<FundamentalSnapshot> = serde_json::from_str(&json)
            .map_err(|e| RondaError::Other(format!("parsing {}: {e}", path.display())))?;
        snapshots.sort_by_key(|s| s.as_of_date);
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use ronda_traits::days_from_date;

    fn write_fixture(dir: &std::path::Path, ticker: &str, n: u64) -> Vec<Date> {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let dates: Vec<Date> = (0..n).map(|i| start + chrono::Days::new(i)).collect();
        let df = df! {
            "date" => dates.iter().map(|d| days_from_date(*d)).collect::<Vec<i32>>(),
            "open" => vec![10.0; n as usize],
            "high" => vec![10.5; n as usize],
            "low" => vec![9.5; n as usize],
            "close" => vec![10.2; n as usize],
            "volume" => vec![1000.0; n as usize],
        }
        .unwrap();
        let history = PriceHistory::new(ticker, df).unwrap();
        crate::csv::write_price_history(&history, &dir.join(format!("{ticker}.csv"))).unwrap();
        dates
    }

    #[tokio::test]
    async fn test_csv_provider_restricts_range() {
        let dir = tempfile::tempdir().unwrap();
        let dates = write_fixture(dir.path(), "TEST", 10);
        let provider = CsvProvider::new(dir.path());

        let history = provider
            .price_history("TEST", dates[2], dates[5])
            .await
            .unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history.dates().unwrap().first(), Some(&dates[2]));
    }

    #[tokio::test]
    async fn test_csv_provider_empty_range_errors() {
        let dir = tempfile::tempdir().unwrap();
        let dates = write_fixture(dir.path(), "TEST", 5);
        let provider = CsvProvider::new(dir.path());

        let out_of_range = dates[4] + chrono::Days::new(30);
        let err = provider
            .price_history("TEST", out_of_range, out_of_range + chrono::Days::new(5))
            .await
            .unwrap_err();
        assert!(matches!(err, RondaError::DataUnavailable(_)));
    }

    #[tokio::test]
    async fn test_missing_fundamentals_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "TEST", 5);
        let provider = CsvProvider::new(dir.path());
        assert!(provider.fundamentals("TEST").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fundamentals_sorted_after_load() {
        let dir = tempfile::tempdir().unwrap();
        let later = FundamentalSnapshot::empty("TEST", Date::from_ymd_opt(2024, 6, 30).unwrap());
        let earlier = FundamentalSnapshot::empty("TEST", Date::from_ymd_opt(2024, 3, 31).unwrap());
        let json = serde_json::to_string(&vec![later, earlier]).unwrap();
        std::fs::write(dir.path().join("TEST_fundamentals.json"), json).unwrap();

        let provider = CsvProvider::new(dir.path());
        let snapshots = provider.fundamentals("TEST").await.unwrap();
        assert!(snapshots[0].as_of_date < snapshots[1].as_of_date);
    }
}
