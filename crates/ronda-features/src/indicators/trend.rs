//! Moving-average and band indicators.

use ronda_traits::stats::MIN_STD_THRESHOLD;

/// Simple moving average over a trailing window.
///
/// Position `i` averages `values[i + 1 - window ..= i]`; positions before
/// the first full window are `None`.
#[must_use]
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Exponential moving average with smoothing `alpha = 2 / (window + 1)`.
///
/// Seeded with the simple average of the first window, matching the
/// conventional EMA warmup.
#[must_use]
pub fn ema(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }
    let alpha = 2.0 / (window as f64 + 1.0);
    let mut current: f64 = values[..window].iter().sum::<f64>() / window as f64;
    out[window - 1] = Some(current);
    for i in window..values.len() {
        current = alpha * values[i] + (1.0 - alpha) * current;
        out[i] = Some(current);
    }
    out
}

/// Price relative to a moving average, as `close / ma - 1`.
///
/// `None` wherever the moving average is unavailable or zero.
#[must_use]
pub fn price_vs_ma(closes: &[f64], ma: &[Option<f64>]) -> Vec<Option<f64>> {
    closes
        .iter()
        .zip(ma.iter())
        .map(|(&close, &m)| match m {
            Some(m) if m.abs() > MIN_STD_THRESHOLD => Some(close / m - 1.0),
            _ => None,
        })
        .collect()
}

/// Bollinger Band position: the close's normalized distance between the
/// lower and upper band, `(close - lower) / (upper - lower)`.
///
/// Bands are `sma ± num_std · rolling_std`. `None` during warmup and
/// wherever the band width is degenerate.
#[must_use]
pub fn bollinger_position(closes: &[f64], window: usize, num_std: f64) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window < 2 || closes.len() < window {
        return out;
    }
    for i in (window - 1)..closes.len() {
        let slice = &closes[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        let std = variance.sqrt();
        if std > MIN_STD_THRESHOLD {
            let lower = mean - num_std * std;
            let width = 2.0 * num_std * std;
            out[i] = Some((closes[i] - lower) / width);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sma_basic() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&values, 3);
        assert_eq!(result[0], None);
        assert_eq!(result[1], None);
        assert_relative_eq!(result[2].unwrap(), 2.0);
        assert_relative_eq!(result[3].unwrap(), 3.0);
        assert_relative_eq!(result[4].unwrap(), 4.0);
    }

    #[test]
    fn test_sma_window_longer_than_series() {
        let result = sma(&[1.0, 2.0], 5);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_ema_seeds_with_sma() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let result = ema(&values, 3);
        assert_eq!(result[1], None);
        assert_relative_eq!(result[2].unwrap(), 2.0);
        // alpha = 0.5: 0.5 * 4 + 0.5 * 2 = 3
        assert_relative_eq!(result[3].unwrap(), 3.0);
    }

    #[test]
    fn test_price_vs_ma() {
        let closes = [110.0, 100.0];
        let ma = [Some(100.0), None];
        let result = price_vs_ma(&closes, &ma);
        assert_relative_eq!(result[0].unwrap(), 0.1);
        assert_eq!(result[1], None);
    }

    #[test]
    fn test_bollinger_position_midpoint() {
        // Close equal to the rolling mean sits at band position 0.5.
        let closes = [10.0, 12.0, 8.0, 10.0, 10.0];
        let result = bollinger_position(&closes, 5, 2.0);
        assert_relative_eq!(result[4].unwrap(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_bollinger_degenerate_band_is_none() {
        let closes = [10.0; 6];
        let result = bollinger_position(&closes, 5, 2.0);
        assert!(result.iter().all(Option::is_none));
    }
}
