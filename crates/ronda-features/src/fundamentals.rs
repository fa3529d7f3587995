//! Fundamental feature extraction.
//!
//! Snapshots are merged onto the price series with a strict as-of rule:
//! the feature row for date `d` may only see the most recent snapshot with
//! `as_of_date <= d`. Categorical fields are encoded against fixed
//! vocabularies so codes stay stable across tickers and retrainings.

use ronda_traits::{Date, FundamentalSnapshot};

/// Fundamental feature column names, in table order.
pub const FUNDAMENTAL_FEATURES: [&str; 11] = [
    "pe_ratio",
    "pb_ratio",
    "debt_to_equity",
    "current_ratio",
    "roe",
    "roa",
    "revenue_growth_yoy",
    "earnings_growth_yoy",
    "market_cap",
    "market_cap_category",
    "sector_code",
];

/// Market-cap buckets, encoded ordinally (Large > Mid > Small).
const LARGE_CAP_FLOOR: f64 = 10e9;
const MID_CAP_FLOOR: f64 = 2e9;

/// Ordinal market-cap category: Large (>= $10B) -> 3, Mid ($2-10B) -> 2,
/// Small (< $2B) -> 1.
#[must_use]
pub fn market_cap_category(market_cap: Option<f64>) -> Option<f64> {
    let cap = market_cap?;
    if !cap.is_finite() || cap <= 0.0 {
        return None;
    }
    Some(if cap >= LARGE_CAP_FLOOR {
        3.0
    } else if cap >= MID_CAP_FLOOR {
        2.0
    } else {
        1.0
    })
}

/// Stable integer code for a sector name from a fixed vocabulary.
///
/// Unknown or absent sectors encode as 0 so the column stays numeric
/// without inventing a sector.
#[must_use]
pub fn sector_code(sector: Option<&str>) -> f64 {
    let Some(sector) = sector else { return 0.0 };
    match sector.to_ascii_lowercase().as_str() {
        "technology" => 1.0,
        "healthcare" => 2.0,
        "financial services" | "financial" => 3.0,
        "consumer cyclical" | "consumer discretionary" => 4.0,
        "consumer defensive" | "consumer staples" => 5.0,
        "communication services" => 6.0,
        "industrials" => 7.0,
        "energy" => 8.0,
        "basic materials" | "materials" => 9.0,
        "real estate" => 10.0,
        "utilities" => 11.0,
        _ => 0.0,
    }
}

/// Selects the most recent snapshot visible at `date`.
///
/// `snapshots` must be sorted ascending by `as_of_date`; snapshots dated
/// after `date` are never considered.
#[must_use]
pub fn snapshot_as_of<'a>(
    snapshots: &'a [FundamentalSnapshot],
    date: Date,
) -> Option<&'a FundamentalSnapshot> {
    snapshots
        .iter()
        .take_while(|s| s.as_of_date <= date)
        .last()
}

/// Extracts the value of one fundamental feature from a snapshot.
///
/// Returns `None` both when no snapshot is visible and when the snapshot
/// lacks the field, so absence propagates instead of defaulting to zero.
#[must_use]
pub fn feature_value(snapshot: Option<&FundamentalSnapshot>, name: &str) -> Option<f64> {
    let snap = snapshot?;
    match name {
        "pe_ratio" => snap.pe_ratio,
        "pb_ratio" => snap.pb_ratio,
        "debt_to_equity" => snap.debt_to_equity,
        "current_ratio" => snap.current_ratio,
        "roe" => snap.roe,
        "roa" => snap.roa,
        "revenue_growth_yoy" => snap.revenue_growth_yoy,
        "earnings_growth_yoy" => snap.earnings_growth_yoy,
        "market_cap" => snap.market_cap,
        "market_cap_category" => market_cap_category(snap.market_cap),
        "sector_code" => snap.sector.is_some().then(|| sector_code(snap.sector.as_deref())),
        _ => None,
    }
}
