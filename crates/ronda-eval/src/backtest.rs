//! Historical replay of the model's decisions.
//!
//! The backtest walks a feature table date by date, asks the predictor
//! for a decision at each row, takes the corresponding position, and
//! realizes the row's forward return. Input ordering is validated up
//! front; an out-of-order table aborts the whole run rather than
//! producing a silently wrong equity curve.

use crate::metrics;
use ronda_features::FeatureTable;
use ronda_model::Predictor;
use ronda_traits::{Date, Label, PipelineConfig, Result, RondaError, ShortPolicy};
use serde::{Deserialize, Serialize};

/// Backtesting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// How Sell decisions translate to positions.
    pub short_policy: ShortPolicy,
    /// Trading periods per year, for annualization.
    pub periods_per_year: f64,
    /// Forward-return horizon the table was built with.
    pub horizon_days: usize,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self::from(&PipelineConfig::default())
    }
}

impl From<&PipelineConfig> for BacktestConfig {
    fn from(config: &PipelineConfig) -> Self {
        Self {
            short_policy: config.short_policy,
            periods_per_year: config.periods_per_year,
            horizon_days: config.horizon_days,
        }
    }
}

impl BacktestConfig {
    /// Sharpe annualization factor for this horizon.
    #[must_use]
    pub fn annualization_factor(&self) -> f64 {
        (self.periods_per_year / self.horizon_days.max(1) as f64).sqrt()
    }

    fn position_for(&self, label: Label) -> f64 {
        match (label, self.short_policy) {
            (Label::Sell, ShortPolicy::Flat) => 0.0,
            (label, _) => label.direction(),
        }
    }
}

/// One decision and its realized outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestStep {
    /// Decision date.
    pub date: Date,
    /// The model's decision.
    pub label: Label,
    /// Position taken, in [-1, 1].
    pub position: f64,
    /// Realized forward return of the underlying over the horizon.
    pub realized_return: f64,
    /// Position times realized return.
    pub period_return: f64,
    /// Equity after this step (starts from 1.0).
    pub equity: f64,
}

/// Backtest results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Ticker the run covered.
    pub ticker: String,
    /// Per-date decisions and outcomes, in date order.
    pub steps: Vec<BacktestStep>,
    /// Final equity minus one.
    pub total_return: f64,
    /// Annualized Sharpe ratio of the period returns.
    pub sharpe_ratio: f64,
    /// Largest peak-to-trough equity decline, as a fraction.
    pub max_drawdown: f64,
    /// Fraction of decisive decisions with the right sign, if any existed.
    pub win_rate: Option<f64>,
    /// Number of decisive (non-Hold) decisions.
    pub n_trades: usize,
}

impl BacktestResult {
    /// The equity curve, one point per step.
    #[must_use]
    pub fn equity_curve(&self) -> Vec<f64> {
        self.steps.iter().map(|s| s.equity).collect()
    }
}

/// Replays a predictor over a historical feature table.
#[derive(Debug, Clone, Default)]
pub struct BacktestEngine {
    config: BacktestConfig,
}

impl BacktestEngine {
    /// Creates an engine with the given configuration.
    #[must_use]
    pub const fn new(config: BacktestConfig) -> Self {
        Self { config }
    }

    /// Runs the backtest over every row of `table`.
    ///
    /// # Errors
    ///
    /// [`RondaError::DataOrdering`] when dates are not strictly
    /// increasing; no partial result is produced. Prediction and
    /// column-access failures propagate.
    pub fn run(&self, table: &FeatureTable, predictor: &Predictor) -> Result<BacktestResult> {
        let dates = table.dates()?;
        validate_ordering(table.ticker(), &dates)?;

        let realized = table.targets()?;
        let mut steps = Vec::with_capacity(dates.len());
        let mut outcomes = Vec::new();
        let mut equity = 1.0_f64;

        for (i, date) in dates.iter().enumerate() {
            let prediction = predictor.predict(&table.row(i)?)?;
            let position = self.config.position_for(prediction.label);
            let period_return = position * realized[i];
            equity *= 1.0 + period_return;
            if prediction.label != Label::Hold {
                outcomes.push((prediction.label.direction(), realized[i]));
            }
            steps.push(BacktestStep {
                date: *date,
                label: prediction.label,
                position,
                realized_return: realized[i],
                period_return,
                equity,
            });
        }

        let period_returns: Vec<f64> = steps.iter().map(|s| s.period_return).collect();
        let equity_curve: Vec<f64> = steps.iter().map(|s| s.equity).collect();
        Ok(BacktestResult {
            ticker: table.ticker().to_string(),
            total_return: equity - 1.0,
            sharpe_ratio: metrics::sharpe_ratio(
                &period_returns,
                self.config.annualization_factor(),
            ),
            max_drawdown: metrics::max_drawdown(&equity_curve),
            win_rate: metrics::win_rate(&outcomes),
            n_trades: outcomes.len(),
            steps,
        })
    }
}

fn validate_ordering(ticker: &str, dates: &[Date]) -> Result<()> {
    for pair in dates.windows(2) {
        if pair[1] <= pair[0] {
            return Err(RondaError::DataOrdering(format!(
                "{ticker}: {} does not follow {}",
                pair[1], pair[0]
            )));
        }
    }
    Ok(())
}
