//! The labeled feature table.

use polars::prelude::*;
use ronda_traits::types::dates_from_column;
use ronda_traits::{Date, FeatureVector, Result, RondaError, Symbol};

/// Columns of a feature table that are not features.
pub const RESERVED_COLUMNS: [&str; 3] = ["date", "close", "target_return"];

/// A rectangular table of feature vectors and forward-return targets for
/// one ticker.
///
/// Wraps a Polars DataFrame with a `date` column, a `close` column, one
/// column per feature (nulls mark explicitly-missing values), and a
/// `target_return` column that is non-null on every row: the feature
/// engine only emits rows whose target is computable.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    ticker: Symbol,
    data: DataFrame,
}

impl FeatureTable {
    /// Wraps a DataFrame as a feature table, validating the reserved
    /// columns exist.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::MissingColumn`] if `date`, `close`, or
    /// `target_return` is absent.
    pub fn new(ticker: impl Into<Symbol>, data: DataFrame) -> Result<Self> {
        for col in RESERVED_COLUMNS {
            if data.column(col).is_err() {
                return Err(RondaError::MissingColumn(col.to_string()));
            }
        }
        Ok(Self {
            ticker: ticker.into(),
            data,
        })
    }

    /// Ticker this table belongs to.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// The underlying DataFrame.
    #[must_use]
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row dates, in table order.
    ///
    /// # Errors
    ///
    /// Fails if the date column cannot be decoded.
    pub fn dates(&self) -> Result<Vec<Date>> {
        dates_from_column(&self.data, "date")
    }

    /// Names of all feature columns (everything except the reserved
    /// columns), in table order.
    #[must_use]
    pub fn feature_names(&self) -> Vec<String> {
        self.data
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .filter(|name| !RESERVED_COLUMNS.contains(&name.as_str()))
            .collect()
    }

    /// A feature column with explicit missing entries.
    ///
    /// # Errors
    ///
    /// Fails if the column is absent or non-numeric.
    pub fn feature_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let col = self
            .data
            .column(name)
            .map_err(|_| RondaError::MissingColumn(name.to_string()))?;
        let series = col.as_materialized_series().cast(&DataType::Float64)?;
        Ok(series.f64()?.into_iter().collect())
    }

    /// Realized forward returns, one per row.
    ///
    /// # Errors
    ///
    /// Fails if the target column contains nulls, which would mean the
    /// table was not produced by the feature engine's trimming rules.
    pub fn targets(&self) -> Result<Vec<f64>> {
        let series = self
            .data
            .column("target_return")?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let values: Vec<f64> = series.f64()?.into_iter().flatten().collect();
        if values.len() != self.data.height() {
            return Err(RondaError::Other(
                "target_return contains nulls; table was not trimmed".into(),
            ));
        }
        Ok(values)
    }

    /// Extracts one row as a [`FeatureVector`].
    ///
    /// Every feature column contributes a key; nulls become explicitly
    /// missing values, preserving the rectangular-table invariant.
    ///
    /// # Errors
    ///
    /// Fails if `idx` is out of bounds or a column cannot be read.
    pub fn row(&self, idx: usize) -> Result<FeatureVector> {
        if idx >= self.len() {
            return Err(RondaError::Other(format!(
                "row index {idx} out of bounds for table of {} rows",
                self.len()
            )));
        }
        let date = self.dates()?[idx];
        let mut vector = FeatureVector::new(self.ticker.clone(), date);
        for name in self.feature_names() {
            let value = self.feature_column(&name)?[idx];
            vector.insert(name, value);
        }
        Ok(vector)
    }

    /// The most recent row of the table.
    ///
    /// # Errors
    ///
    /// Fails on an empty table.
    pub fn latest_row(&self) -> Result<FeatureVector> {
        if self.is_empty() {
            return Err(RondaError::InsufficientData(
                "feature table is empty".into(),
            ));
        }
        self.row(self.len() - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_traits::days_from_date;

    fn sample_table() -> FeatureTable {
        let d = |day: u32| days_from_date(Date::from_ymd_opt(2024, 1, day).unwrap());
        let df = DataFrame::new(vec![
            Column::new("date".into(), vec![d(2), d(3), d(4)]),
            Column::new("close".into(), vec![100.0, 101.0, 102.0]),
            Column::new("rsi".into(), vec![Some(55.0), Some(60.0), None]),
            Column::new("pe_ratio".into(), vec![None::<f64>, None, None]),
            Column::new("target_return".into(), vec![0.01, 0.02, -0.01]),
        ])
        .unwrap();
        FeatureTable::new("AAPL", df).unwrap()
    }

    #[test]
    fn test_feature_names_exclude_reserved() {
        let table = sample_table();
        assert_eq!(table.feature_names(), vec!["rsi", "pe_ratio"]);
    }

    #[test]
    fn test_targets_dense() {
        let table = sample_table();
        assert_eq!(table.targets().unwrap(), vec![0.01, 0.02, -0.01]);
    }

    #[test]
    fn test_row_extraction_keeps_missing_keys() {
        let table = sample_table();
        let row = table.row(2).unwrap();
        assert_eq!(row.get("rsi"), None);
        assert_eq!(row.get("pe_ratio"), None);
        // Both keys still present even though values are missing.
        assert_eq!(row.values.len(), 2);
        assert_eq!(row.date, Date::from_ymd_opt(2024, 1, 4).unwrap());
    }

    #[test]
    fn test_row_out_of_bounds() {
        let table = sample_table();
        assert!(table.row(3).is_err());
    }

    #[test]
    fn test_missing_reserved_column_rejected() {
        let df = DataFrame::new(vec![Column::new("date".into(), vec![1i32])]).unwrap();
        assert!(matches!(
            FeatureTable::new("AAPL", df),
            Err(RondaError::MissingColumn(_))
        ));
    }
}
