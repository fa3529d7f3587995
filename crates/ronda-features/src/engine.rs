//! Feature engine: bars + fundamentals in, labeled feature table out.

use crate::fundamentals::{feature_value, snapshot_as_of, FUNDAMENTAL_FEATURES};
use crate::indicators;
use crate::table::FeatureTable;
use polars::prelude::*;
use ronda_traits::{
    days_from_date, FundamentalSnapshot, PriceHistory, Result, RondaError,
};
use serde::{Deserialize, Serialize};

/// Indicator window configuration.
///
/// Volatility (20/60d) and momentum (5/20/60d) windows are part of the
/// feature vocabulary and fixed; the remaining windows are tunable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Simple moving average window.
    pub sma_window: usize,
    /// Exponential moving average window.
    pub ema_window: usize,
    /// RSI window.
    pub rsi_window: usize,
    /// Trailing average window for the volume ratio.
    pub volume_window: usize,
    /// Bollinger Band window.
    pub bollinger_window: usize,
    /// Bollinger Band width in standard deviations.
    pub bollinger_num_std: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sma_window: 20,
            ema_window: 20,
            rsi_window: 14,
            volume_window: 20,
            bollinger_window: 20,
            bollinger_num_std: 2.0,
        }
    }
}

/// Longest lookback among the fixed volatility/momentum windows.
const MAX_FIXED_LOOKBACK: usize = 60;

impl FeatureConfig {
    /// Trailing bars required before the first feature row. Rows with
    /// fewer prior bars are dropped, never padded.
    #[must_use]
    pub fn max_lookback(&self) -> usize {
        [
            self.sma_window,
            self.ema_window,
            self.rsi_window,
            self.volume_window,
            self.bollinger_window,
            MAX_FIXED_LOOKBACK,
        ]
        .into_iter()
        .max()
        .unwrap_or(MAX_FIXED_LOOKBACK)
    }
}

/// Turns raw bars and fundamental snapshots into a per-date feature table
/// with a forward-return target.
///
/// Pure over its inputs: no I/O, no shared state. Two leakage guards are
/// structural and unconditional: fundamental values come only from
/// snapshots dated at or before each row, and rows within `horizon_days`
/// of the end of the series are dropped rather than given fabricated
/// targets.
#[derive(Debug, Clone, Default)]
pub struct FeatureEngine {
    config: FeatureConfig,
}

impl FeatureEngine {
    /// Creates an engine with the given window configuration.
    #[must_use]
    pub const fn new(config: FeatureConfig) -> Self {
        Self { config }
    }

    /// The engine's window configuration.
    #[must_use]
    pub const fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Computes the labeled feature table for one ticker.
    ///
    /// `fundamentals` may be empty: the table then carries every
    /// fundamental column fully null instead of failing. Snapshots are
    /// consulted strictly as-of each row's date.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Config`] for a zero horizon and propagates
    /// column-access failures from the price history.
    pub fn compute(
        &self,
        history: &PriceHistory,
        fundamentals: &[FundamentalSnapshot],
        horizon_days: usize,
    ) -> Result<FeatureTable> {
        if horizon_days == 0 {
            return Err(RondaError::Config("horizon_days must be positive".into()));
        }

        let dates = history.dates()?;
        let closes = history.closes()?;
        let volumes = history.volumes()?;
        let n = closes.len();

        let cfg = &self.config;
        let sma = indicators::sma(&closes, cfg.sma_window);
        let ema = indicators::ema(&closes, cfg.ema_window);
        let technical: Vec<(&str, Vec<Option<f64>>)> = vec![
            ("sma", sma.clone()),
            ("ema", ema.clone()),
            ("rsi", indicators::rsi(&closes, cfg.rsi_window)),
            ("volatility_20d", indicators::rolling_volatility(&closes, 20)),
            ("volatility_60d", indicators::rolling_volatility(&closes, 60)),
            ("momentum_5d", indicators::momentum(&closes, 5)),
            ("momentum_20d", indicators::momentum(&closes, 20)),
            ("momentum_60d", indicators::momentum(&closes, 60)),
            ("volume_ratio", indicators::volume_ratio(&volumes, cfg.volume_window)),
            ("price_vs_sma", indicators::price_vs_ma(&closes, &sma)),
            ("price_vs_ema", indicators::price_vs_ma(&closes, &ema)),
            (
                "bb_position",
                indicators::bollinger_position(&closes, cfg.bollinger_window, cfg.bollinger_num_std),
            ),
        ];

        // Keep rows with a full trailing window and a computable target.
        let warmup = cfg.max_lookback();
        let keep: Vec<usize> = (0..n)
            .filter(|&i| i >= warmup && i + horizon_days < n)
            .collect();

        let mut sorted_fundamentals = fundamentals.to_vec();
        sorted_fundamentals.sort_by_key(|s| s.as_of_date);

        let mut columns = Vec::with_capacity(3 + technical.len() + FUNDAMENTAL_FEATURES.len());
        columns.push(Column::new(
            "date".into(),
            keep.iter().map(|&i| days_from_date(dates[i])).collect::<Vec<i32>>(),
        ));
        columns.push(Column::new(
            "close".into(),
            keep.iter().map(|&i| closes[i]).collect::<Vec<f64>>(),
        ));
        for (name, values) in &technical {
            columns.push(Column::new(
                (*name).into(),
                keep.iter().map(|&i| values[i]).collect::<Vec<Option<f64>>>(),
            ));
        }
        for name in FUNDAMENTAL_FEATURES {
            let values: Vec<Option<f64>> = keep
                .iter()
                .map(|&i| feature_value(snapshot_as_of(&sorted_fundamentals, dates[i]), name))
                .collect();
            columns.push(Column::new(name.into(), values));
        }
        columns.push(Column::new(
            "target_return".into(),
            keep.iter()
                .map(|&i| closes[i + horizon_days] / closes[i] - 1.0)
                .collect::<Vec<f64>>(),
        ));

        FeatureTable::new(history.ticker(), DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_traits::Date;

    fn make_history(closes: Vec<f64>) -> PriceHistory {
        let n = closes.len();
        let df = df! {
            "date" => (0..n as i32).map(|i| 19000 + i).collect::<Vec<i32>>(),
            "open" => closes.clone(),
            "high" => closes.iter().map(|c| c * 1.01).collect::<Vec<f64>>(),
            "low" => closes.iter().map(|c| c * 0.99).collect::<Vec<f64>>(),
            "close" => closes,
            "volume" => vec![1_000_000.0; n],
        }
        .unwrap();
        PriceHistory::new("TEST", df).unwrap()
    }

    fn drifting_closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 * 1.001f64.powi(i as i32)).collect()
    }

    #[test]
    fn test_row_count_after_trimming() {
        let engine = FeatureEngine::default();
        let table = engine.compute(&make_history(drifting_closes(100)), &[], 20).unwrap();
        // 100 bars - 60 warmup - 20 horizon = 20 rows.
        assert_eq!(table.len(), 20);
    }

    #[test]
    fn test_every_row_has_computable_target() {
        let engine = FeatureEngine::default();
        let closes = drifting_closes(120);
        let table = engine.compute(&make_history(closes.clone()), &[], 20).unwrap();
        let targets = table.targets().unwrap();
        assert_eq!(targets.len(), table.len());
        // First kept row is index 60; its target uses the bar at 80.
        let expected = closes[80] / closes[60] - 1.0;
        assert!((targets[0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_too_short_series_yields_empty_table() {
        let engine = FeatureEngine::default();
        let table = engine.compute(&make_history(drifting_closes(50)), &[], 20).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_zero_horizon_rejected() {
        let engine = FeatureEngine::default();
        let err = engine.compute(&make_history(drifting_closes(100)), &[], 0).unwrap_err();
        assert!(matches!(err, RondaError::Config(_)));
    }

    #[test]
    fn test_empty_fundamentals_degrade_gracefully() {
        let engine = FeatureEngine::default();
        let table = engine.compute(&make_history(drifting_closes(100)), &[], 20).unwrap();
        // All fundamental columns exist and are entirely null.
        for name in FUNDAMENTAL_FEATURES {
            let column = table.feature_column(name).unwrap();
            assert!(column.iter().all(Option::is_none), "{name} should be all-missing");
        }
        // Technical columns are populated.
        assert!(table.feature_column("rsi").unwrap().iter().all(Option::is_some));
        assert!(table.feature_column("momentum_60d").unwrap().iter().all(Option::is_some));
    }

    #[test]
    fn test_future_snapshot_never_leaks_backward() {
        let engine = FeatureEngine::default();
        let history = make_history(drifting_closes(100));
        let dates = history.dates().unwrap();

        // Snapshot dated after every feature row: must affect nothing.
        let future = FundamentalSnapshot {
            pe_ratio: Some(99.0),
            ..FundamentalSnapshot::empty("TEST", dates[95])
        };
        let table = engine.compute(&history, &[future], 20).unwrap();
        let pe = table.feature_column("pe_ratio").unwrap();
        // Feature rows cover indices 60..79, all before date[95].
        assert!(pe.iter().all(Option::is_none));
    }

    #[test]
    fn test_snapshot_applies_from_its_date_forward() {
        let engine = FeatureEngine::default();
        let history = make_history(drifting_closes(100));
        let dates = history.dates().unwrap();

        let snapshot = FundamentalSnapshot {
            pe_ratio: Some(15.0),
            market_cap: Some(50e9),
            sector: Some("Technology".to_string()),
            ..FundamentalSnapshot::empty("TEST", dates[70])
        };
        let table = engine.compute(&history, &[snapshot], 20).unwrap();
        let pe = table.feature_column("pe_ratio").unwrap();
        let cap_cat = table.feature_column("market_cap_category").unwrap();
        let sector = table.feature_column("sector_code").unwrap();

        // Rows 0..9 are dates[60..69]: before the snapshot.
        assert!(pe[..10].iter().all(Option::is_none));
        // Row 10 is dates[70]: snapshot visible from here on.
        assert!(pe[10..].iter().all(|v| *v == Some(15.0)));
        assert_eq!(cap_cat[10], Some(3.0));
        assert_eq!(sector[10], Some(1.0));
    }

    #[test]
    fn test_date_column_preserved() {
        let engine = FeatureEngine::default();
        let history = make_history(drifting_closes(100));
        let table = engine.compute(&history, &[], 20).unwrap();
        let dates = table.dates().unwrap();
        assert_eq!(dates.len(), 20);
        assert_eq!(dates[0], Date::from_ymd_opt(2022, 1, 8).unwrap() + chrono::Days::new(60));
    }
}
