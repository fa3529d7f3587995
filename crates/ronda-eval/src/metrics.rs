//! Risk and performance metrics over a backtest's period returns.

use ronda_traits::stats;

/// Annualized Sharpe ratio: mean over sample stdev of the period returns,
/// scaled by `annualization_factor`.
///
/// The factor is supplied by configuration (typically
/// `sqrt(periods_per_year / horizon_days)`), never hardcoded here.
/// Returns `NaN` with fewer than two returns or zero dispersion.
#[must_use]
pub fn sharpe_ratio(returns: &[f64], annualization_factor: f64) -> f64 {
    let std = stats::sample_std(returns);
    if !std.is_finite() || std < stats::MIN_STD_THRESHOLD {
        return f64::NAN;
    }
    stats::mean(returns) / std * annualization_factor
}

/// Largest peak-to-trough decline of an equity curve, as a non-negative
/// fraction of the peak. Zero for a monotonically rising curve.
#[must_use]
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = f64::NEG_INFINITY;
    let mut worst = 0.0_f64;
    for &value in equity_curve {
        if value > peak {
            peak = value;
        } else if peak > 0.0 {
            worst = worst.max((peak - value) / peak);
        }
    }
    worst
}

/// Fraction of decisive (non-Hold) decisions whose realized return sign
/// matched the decision direction.
///
/// `outcomes` pairs each decision direction (+1.0 or -1.0) with its
/// realized return. `None` when there were no decisive decisions.
#[must_use]
pub fn win_rate(outcomes: &[(f64, f64)]) -> Option<f64> {
    if outcomes.is_empty() {
        return None;
    }
    let wins = outcomes
        .iter()
        .filter(|(direction, realized)| direction * realized > 0.0)
        .count();
    Some(wins as f64 / outcomes.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sharpe_known_series() {
        let returns = vec![0.01, 0.02, -0.005, 0.015, 0.0];
        let mean = 0.008_f64;
        let std = ((returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>()) / 4.0).sqrt();
        let factor = (252.0_f64 / 20.0).sqrt();
        assert_relative_eq!(
            sharpe_ratio(&returns, factor),
            mean / std * factor,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_sharpe_degenerate_inputs() {
        assert!(sharpe_ratio(&[0.01], 1.0).is_nan());
        assert!(sharpe_ratio(&[0.01, 0.01, 0.01], 1.0).is_nan());
    }

    #[test]
    fn test_max_drawdown_monotone_curve_is_zero() {
        let curve: Vec<f64> = (0..50).map(|i| 1.0 + 0.01 * f64::from(i)).collect();
        assert_eq!(max_drawdown(&curve), 0.0);
    }

    #[test]
    fn test_max_drawdown_single_dip() {
        // Peak 1.2, trough 0.9: drawdown 25%.
        let curve = vec![1.0, 1.2, 1.0, 0.9, 1.1, 1.3];
        assert_relative_eq!(max_drawdown(&curve), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_win_rate() {
        let outcomes = vec![(1.0, 0.02), (1.0, -0.01), (-1.0, -0.03), (-1.0, 0.01)];
        assert_relative_eq!(win_rate(&outcomes).unwrap(), 0.5, epsilon = 1e-12);
        assert!(win_rate(&[]).is_none());
    }

    #[test]
    fn test_win_rate_zero_return_is_not_a_win() {
        assert_eq!(win_rate(&[(1.0, 0.0)]), Some(0.0));
    }
}
