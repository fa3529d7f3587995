//! CSV storage for price histories and feature tables.
//!
//! Files carry ISO dates so they stay readable and diffable; the date
//! column is parsed to a proper date dtype on the way in.

use polars::prelude::*;
use ronda_features::FeatureTable;
use ronda_traits::{PriceHistory, Result, RondaError};
use std::fs::File;
use std::path::Path;

fn open_for_write(path: &Path) -> Result<File> {
    File::create(path).map_err(|e| RondaError::Other(format!("creating {}: {e}", path.display())))
}

/// Reads a DataFrame from CSV, parsing the `date` column.
fn read_frame(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(RondaError::DataUnavailable(format!(
            "{} does not exist",
            path.display()
        )));
    }
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_try_parse_dates(true)
        .finish()?
        .collect()?;
    Ok(df)
}

/// Writes a DataFrame as CSV, converting an integer `date` column to the
/// date dtype first so it serializes as ISO dates.
fn write_frame(df: &DataFrame, path: &Path) -> Result<()> {
    let mut out = df.clone();
    if let Ok(column) = out.column("date") {
        if column.dtype() == &DataType::Int32 {
            let as_date = column.cast(&DataType::Date)?;
            out.replace("date", as_date.as_materialized_series().clone())?;
        }
    }
    let file = open_for_write(path)?;
    CsvWriter::new(file).include_header(true).finish(&mut out)?;
    Ok(())
}

/// Loads a price history for `ticker` from a CSV file.
///
/// # Errors
///
/// [`RondaError::DataUnavailable`] when the file is missing; validation
/// errors from [`PriceHistory::new`] propagate.
pub fn read_price_history(ticker: &str, path: &Path) -> Result<PriceHistory> {
    PriceHistory::new(ticker, read_frame(path)?)
}

/// Writes a price history to a CSV file.
///
/// # Errors
///
/// Surfaces I/O and serialization failures.
pub fn write_price_history(history: &PriceHistory, path: &Path) -> Result<()> {
    write_frame(history.data(), path)
}

/// Loads a feature table for `ticker` from a CSV file.
///
/// # Errors
///
/// [`RondaError::DataUnavailable`] when the file is missing; the table's
/// reserved-column validation propagates.
pub fn read_feature_table(ticker: &str, path: &Path) -> Result<FeatureTable> {
    FeatureTable::new(ticker, read_frame(path)?)
}

/// Writes a feature table to a CSV file.
///
/// # Errors
///
/// Surfaces I/O and serialization failures.
pub fn write_feature_table(table: &FeatureTable, path: &Path) -> Result<()> {
    write_frame(table.data(), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_traits::days_from_date;
    use ronda_traits::Date;

    fn sample_history() -> PriceHistory {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        let n = 5;
        let df = df! {
            "date" => (0..n).map(|i| days_from_date(start + chrono::Days::new(i))).collect::<Vec<i32>>(),
            "open" => vec![10.0; n as usize],
            "high" => vec![10.5; n as usize],
            "low" => vec![9.5; n as usize],
            "close" => vec![10.2; n as usize],
            "volume" => vec![1000.0; n as usize],
        }
        .unwrap();
        PriceHistory::new("TEST", df).unwrap()
    }

    #[test]
    fn test_price_history_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TEST.csv");
        let history = sample_history();
        write_price_history(&history, &path).unwrap();

        let loaded = read_price_history("TEST", &path).unwrap();
        assert_eq!(loaded.len(), history.len());
        assert_eq!(loaded.dates().unwrap(), history.dates().unwrap());
        assert_eq!(loaded.closes().unwrap(), history.closes().unwrap());
    }

    #[test]
    fn test_missing_file_is_data_unavailable() {
        let err = read_price_history("TEST", Path::new("/nonexistent/TEST.csv")).unwrap_err();
        assert!(matches!(err, RondaError::DataUnavailable(_)));
    }
}
