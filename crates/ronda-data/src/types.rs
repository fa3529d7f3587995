//! Data types for provider API responses and their conversions into the
//! pipeline's domain types.

use crate::error::{ProviderError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use ronda_traits::{days_from_date, FundamentalSnapshot, PriceHistory};
use serde::{Deserialize, Serialize};

/// One end-of-day price bar from the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading date, `YYYY-MM-DD`.
    pub date: String,
    /// Opening price.
    pub open: f64,
    /// Intraday high.
    pub high: f64,
    /// Intraday low.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Share volume.
    #[serde(default)]
    pub volume: f64,
}

impl PriceBar {
    /// Parse the date string into a NaiveDate.
    #[must_use]
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }
}

/// Valuation and balance-sheet ratios for one reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRatios {
    /// Filing date.
    pub date: String,
    /// Price-to-earnings ratio.
    #[serde(default)]
    pub price_to_earnings_ratio: Option<f64>,
    /// Price-to-book ratio.
    #[serde(default)]
    pub price_to_book_ratio: Option<f64>,
    /// Debt-to-equity ratio.
    #[serde(default)]
    pub debt_to_equity_ratio: Option<f64>,
    /// Current ratio.
    #[serde(default)]
    pub current_ratio: Option<f64>,
    /// Return on equity.
    #[serde(default)]
    pub return_on_equity: Option<f64>,
    /// Return on assets.
    #[serde(default)]
    pub return_on_assets: Option<f64>,
}

/// Year-over-year growth rates for one reporting period.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthRates {
    /// Filing date.
    pub date: String,
    /// Revenue growth, year over year.
    #[serde(default)]
    pub growth_revenue: Option<f64>,
    /// Net income growth, year over year.
    #[serde(default)]
    pub growth_net_income: Option<f64>,
}

/// Company profile data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    /// Ticker symbol.
    pub symbol: String,
    /// Market capitalization in dollars.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Sector name.
    #[serde(default)]
    pub sector: Option<String>,
    /// Industry name.
    #[serde(default)]
    pub industry: Option<String>,
}

/// Builds a validated [`PriceHistory`] from provider bars.
///
/// Bars arrive most-recent-first; they are sorted ascending. Bars with
/// unparseable dates or a non-positive close are dropped, so every close
/// can serve as a return denominator.
///
/// # Errors
///
/// [`ProviderError::NoData`] when no usable bar remains, and
/// [`ProviderError::Api`] when the assembled frame fails validation
/// (duplicate dates, for instance).
pub fn price_history_from_bars(ticker: &str, bars: &[PriceBar]) -> Result<PriceHistory> {
    let mut dated: Vec<(NaiveDate, &PriceBar)> = bars
        .iter()
        .filter(|bar| bar.close > 0.0)
        .filter_map(|bar| bar.parsed_date().map(|d| (d, bar)))
        .collect();
    if dated.is_empty() {
        return Err(ProviderError::NoData(ticker.to_string()));
    }
    dated.sort_by_key(|(date, _)| *date);

    let df = df! {
        "date" => dated.iter().map(|(d, _)| days_from_date(*d)).collect::<Vec<i32>>(),
        "open" => dated.iter().map(|(_, b)| b.open).collect::<Vec<f64>>(),
        "high" => dated.iter().map(|(_, b)| b.high).collect::<Vec<f64>>(),
        "low" => dated.iter().map(|(_, b)| b.low).collect::<Vec<f64>>(),
        "close" => dated.iter().map(|(_, b)| b.close).collect::<Vec<f64>>(),
        "volume" => dated.iter().map(|(_, b)| b.volume).collect::<Vec<f64>>(),
    }
    .map_err(|e| ProviderError::Api(format!("assembling price frame: {e}")))?;

    PriceHistory::new(ticker, df).map_err(|e| ProviderError::Api(e.to_string()))
}

/// Merges ratios, growth rates, and the company profile into dated
/// snapshots, sorted ascending by `as_of_date`.
///
/// Growth rates join ratios on the filing date; profile fields (market
/// cap, sector, industry) are treated as slowly varying and applied to
/// every snapshot. Periods with unparseable dates are dropped.
#[must_use]
pub fn snapshots_from_reports(
    ticker: &str,
    ratios: &[FinancialRatios],
    growth: &[GrowthRates],
    profile: Option<&CompanyProfile>,
) -> Vec<FundamentalSnapshot> {
    let mut snapshots: Vec<FundamentalSnapshot> = Vec::with_capacity(ratios.len());
    for entry in ratios {
        let Some(as_of_date) = NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").ok() else {
            continue;
        };
        let period_growth = growth.iter().find(|g| g.date == entry.date);
        snapshots.push(FundamentalSnapshot {
            pe_ratio: entry.price_to_earnings_ratio,
            pb_ratio: entry.price_to_book_ratio,
            debt_to_equity: entry.debt_to_equity_ratio,
            current_ratio: entry.current_ratio,
            roe: entry.return_on_equity,
            roa: entry.return_on_assets,
            revenue_growth_yoy: period_growth.and_then(|g| g.growth_revenue),
            earnings_growth_yoy: period_growth.and_then(|g| g.growth_net_income),
            market_cap: profile.and_then(|p| p.market_cap),
            sector: profile.and_then(|p| p.sector.clone()),
            industry: profile.and_then(|p| p.industry.clone()),
            ..FundamentalSnapshot::empty(ticker, as_of_date)
        });
    }
    snapshots.sort_by_key(|s| s.as_of_date);
    snapshots
}
