//! Common types used throughout the ronda pipeline.
//!
//! This module defines the core data types for representing price history,
//! fundamental snapshots, and derived feature data.

use crate::error::{Result, RondaError};
use crate::label::Label;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier, e.g. "AAPL".
pub type Symbol = String;

/// Offset between polars date epoch (1970-01-01) and chrono's day-zero
/// when converting via `from_num_days_from_ce_opt`.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// Columns every price history must carry.
pub const PRICE_COLUMNS: [&str; 6] = ["date", "open", "high", "low", "close", "volume"];

/// Convert a polars date value (days since Unix epoch) to a [`Date`].
#[must_use]
pub fn date_from_days(days: i32) -> Option<Date> {
    Date::from_num_days_from_ce_opt(days + CE_TO_UNIX_EPOCH_DAYS)
}

/// Reads a date column (native date dtype or i32 days since the Unix
/// epoch) as chrono dates.
///
/// # Errors
///
/// Fails if the column is missing, has an unsupported dtype, or contains
/// nulls.
pub fn dates_from_column(df: &DataFrame, name: &str) -> Result<Vec<Date>> {
    let col = df
        .column(name)
        .map_err(|_| RondaError::MissingColumn(name.to_string()))?
        .as_materialized_series();
    let raw: Vec<Option<i32>> = if let Ok(dates) = col.date() {
        dates.into_iter().collect()
    } else if let Ok(ints) = col.i32() {
        ints.into_iter().collect()
    } else {
        return Err(RondaError::Other(format!(
            "column {name} has unsupported dtype {:?} for dates",
            col.dtype()
        )));
    };
    raw.into_iter()
        .map(|d| {
            d.and_then(date_from_days)
                .ok_or_else(|| RondaError::Other(format!("null or invalid date in column {name}")))
        })
        .collect()
}

/// Converts a [`Date`] to polars' date representation (days since the
/// Unix epoch).
#[must_use]
pub fn days_from_date(date: Date) -> i32 {
    chrono::Datelike::num_days_from_ce(&date) - CE_TO_UNIX_EPOCH_DAYS
}

/// Validated OHLCV history for a single ticker.
///
/// `PriceHistory` wraps a Polars DataFrame with columns
/// `date, open, high, low, close, volume`, sorted ascending by date with
/// unique dates. Construction validates these invariants so downstream
/// stages never have to re-check ordering.
///
/// # Example
///
/// ```no_run
/// use ronda_traits::PriceHistory;
/// use polars::prelude::*;
///
/// let df = df! {
///     "date" => &[19000i32, 19001],
///     "open" => &[100.0, 101.0],
///     "high" => &[102.0, 103.0],
///     "low" => &[99.0, 100.0],
///     "close" => &[101.0, 102.0],
///     "volume" => &[1_000_000.0, 1_200_000.0],
/// }.unwrap();
/// let history = PriceHistory::new("AAPL", df);
/// ```
#[derive(Debug, Clone)]
pub struct PriceHistory {
    ticker: Symbol,
    data: DataFrame,
}

impl PriceHistory {
    /// Creates a new `PriceHistory`, validating schema and date ordering.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::MissingColumn`] if a required column is absent,
    /// and [`RondaError::DataOrdering`] if dates are not strictly increasing.
    pub fn new(ticker: impl Into<Symbol>, data: DataFrame) -> Result<Self> {
        for col in PRICE_COLUMNS {
            if data.column(col).is_err() {
                return Err(RondaError::MissingColumn(col.to_string()));
            }
        }
        let history = Self {
            ticker: ticker.into(),
            data,
        };
        let dates = history.dates()?;
        for pair in dates.windows(2) {
            if pair[1] <= pair[0] {
                return Err(RondaError::DataOrdering(format!(
                    "price history for {} not strictly increasing at {}",
                    history.ticker, pair[1]
                )));
            }
        }
        Ok(history)
    }

    /// Returns the ticker this history belongs to.
    #[must_use]
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// Returns a reference to the underlying DataFrame.
    #[must_use]
    pub const fn data(&self) -> &DataFrame {
        &self.data
    }

    /// Consumes self and returns the underlying DataFrame.
    #[must_use]
    pub fn into_inner(self) -> DataFrame {
        self.data
    }

    /// Returns the number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.height()
    }

    /// Returns whether the history is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Extract the date column as chrono dates.
    ///
    /// Accepts either a native date column or an integer column of days
    /// since the Unix epoch.
    ///
    /// # Errors
    ///
    /// Fails if the column cannot be interpreted as dates or contains nulls.
    pub fn dates(&self) -> Result<Vec<Date>> {
        dates_from_column(&self.data, "date")
    }

    /// Returns a copy restricted to bars within `[from, to]` inclusive.
    /// Ordering is preserved, so the result needs no revalidation.
    ///
    /// # Errors
    ///
    /// Fails if the date column cannot be read or the filter fails.
    pub fn restrict(&self, from: Date, to: Date) -> Result<Self> {
        let dates = self.dates()?;
        let mask: Vec<bool> = dates.iter().map(|d| *d >= from && *d <= to).collect();
        let mask = BooleanChunked::from_slice("mask".into(), &mask);
        Ok(Self {
            ticker: self.ticker.clone(),
            data: self.data.filter(&mask)?,
        })
    }

    /// Extract a numeric column as a dense f64 vector.
    ///
    /// # Errors
    ///
    /// Fails if the column is missing, non-numeric, or contains nulls.
    pub fn f64_column(&self, name: &str) -> Result<Vec<f64>> {
        let col = self
            .data
            .column(name)
            .map_err(|_| RondaError::MissingColumn(name.to_string()))?;
        let series = col.as_materialized_series().cast(&DataType::Float64)?;
        let values: Vec<f64> = series.f64()?.into_iter().flatten().collect();
        if values.len() != self.data.height() {
            return Err(RondaError::Other(format!(
                "column {name} contains nulls"
            )));
        }
        Ok(values)
    }

    /// Closing prices.
    ///
    /// # Errors
    ///
    /// Fails if the close column is missing or contains nulls.
    pub fn closes(&self) -> Result<Vec<f64>> {
        self.f64_column("close")
    }

    /// Traded volumes.
    ///
    /// # Errors
    ///
    /// Fails if the volume column is missing or contains nulls.
    pub fn volumes(&self) -> Result<Vec<f64>> {
        self.f64_column("volume")
    }
}

/// A point-in-time snapshot of a ticker's fundamentals.
///
/// Every ratio is optional: providers routinely omit fields, and absence
/// must propagate as missing rather than be defaulted to zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalSnapshot {
    /// Ticker the snapshot belongs to.
    pub ticker: Symbol,
    /// The date this snapshot became knowable. Features for date `d` may
    /// only use snapshots with `as_of_date <= d`.
    pub as_of_date: Date,
    /// Price-to-earnings ratio.
    pub pe_ratio: Option<f64>,
    /// Price-to-book ratio.
    pub pb_ratio: Option<f64>,
    /// Debt-to-equity ratio.
    pub debt_to_equity: Option<f64>,
    /// Current ratio (current assets / current liabilities).
    pub current_ratio: Option<f64>,
    /// Return on equity.
    pub roe: Option<f64>,
    /// Return on assets.
    pub roa: Option<f64>,
    /// Year-over-year revenue growth.
    pub revenue_growth_yoy: Option<f64>,
    /// Year-over-year earnings growth.
    pub earnings_growth_yoy: Option<f64>,
    /// Market capitalization in dollars.
    pub market_cap: Option<f64>,
    /// Sector name, e.g. "Technology".
    pub sector: Option<String>,
    /// Industry name within the sector.
    pub industry: Option<String>,
}

impl FundamentalSnapshot {
    /// Creates an empty snapshot for a ticker at a date.
    #[must_use]
    pub fn empty(ticker: impl Into<Symbol>, as_of_date: Date) -> Self {
        Self {
            ticker: ticker.into(),
            as_of_date,
            pe_ratio: None,
            pb_ratio: None,
            debt_to_equity: None,
            current_ratio: None,
            roe: None,
            roa: None,
            revenue_growth_yoy: None,
            earnings_growth_yoy: None,
            market_cap: None,
            sector: None,
            industry: None,
        }
    }
}

/// A single (ticker, date) feature observation.
///
/// Values are keyed by feature name; `None` marks a feature that is present
/// but not computable, which is distinct from an absent key. Tables built by
/// the feature engine guarantee every vector carries the same key set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Ticker the observation belongs to.
    pub ticker: Symbol,
    /// Observation date.
    pub date: Date,
    /// Feature name to value; `None` means explicitly missing.
    pub values: BTreeMap<String, Option<f64>>,
}

impl FeatureVector {
    /// Creates an empty feature vector.
    #[must_use]
    pub fn new(ticker: impl Into<Symbol>, date: Date) -> Self {
        Self {
            ticker: ticker.into(),
            date,
            values: BTreeMap::new(),
        }
    }

    /// Returns the value for a feature, flattening "key absent" and
    /// "explicitly missing" into `None`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied().flatten()
    }

    /// Inserts a feature value.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.values.insert(name.into(), value);
    }

    /// Names of all features carried by this vector, missing or not.
    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// A model prediction for a single (ticker, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Ticker the prediction is for.
    pub ticker: Symbol,
    /// Date the prediction applies to.
    pub date: Date,
    /// Predicted forward return over the model's horizon.
    pub predicted_return: f64,
    /// Discrete decision derived from the predicted return.
    pub label: Label,
    /// Features that were present in the input.
    pub features_used: BTreeSet<String>,
    /// Features the model expected but had to impute.
    pub features_missing: BTreeSet<String>,
}
