//! Volatility and volume indicators.

use ronda_traits::stats::MIN_STD_THRESHOLD;

/// Day-over-day returns, `None` at the first bar.
#[must_use]
pub fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    for i in 1..closes.len() {
        if closes[i - 1] != 0.0 {
            out[i] = Some(closes[i] / closes[i - 1] - 1.0);
        }
    }
    out
}

/// Rolling sample standard deviation of daily returns over a trailing
/// window.
///
/// Position `i` needs `window` consecutive returns ending at `i`, so the
/// first value appears at index `window` (returns themselves start at 1).
#[must_use]
pub fn rolling_volatility(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let returns = daily_returns(closes);
    let mut out = vec![None; closes.len()];
    if window < 2 {
        return out;
    }
    for i in window..closes.len() {
        let slice = &returns[i + 1 - window..=i];
        if slice.iter().any(Option::is_none) {
            continue;
        }
        let values: Vec<f64> = slice.iter().map(|r| r.unwrap()).collect();
        let mean = values.iter().sum::<f64>() / window as f64;
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = Some(variance.sqrt());
    }
    out
}

/// Current volume relative to its trailing average (inclusive of the
/// current bar): `volume / sma(volume, window)`.
#[must_use]
pub fn volume_ratio(volumes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; volumes.len()];
    if window == 0 || volumes.len() < window {
        return out;
    }
    let mut sum: f64 = volumes[..window].iter().sum();
    for i in (window - 1)..volumes.len() {
        if i >= window {
            sum += volumes[i] - volumes[i - window];
        }
        let avg = sum / window as f64;
        if avg > MIN_STD_THRESHOLD {
            out[i] = Some(volumes[i] / avg);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_daily_returns() {
        let closes = [100.0, 102.0, 96.9];
        let result = daily_returns(&closes);
        assert_eq!(result[0], None);
        assert_relative_eq!(result[1].unwrap(), 0.02);
        assert_relative_eq!(result[2].unwrap(), -0.05);
    }

    #[test]
    fn test_rolling_volatility_constant_returns_is_zero() {
        // Geometric series: every daily return is exactly 1%.
        let closes: Vec<f64> = (0..30).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let result = rolling_volatility(&closes, 20);
        assert_eq!(result[19], None);
        assert_relative_eq!(result[20].unwrap(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rolling_volatility_warmup_length() {
        let closes: Vec<f64> = (0..25).map(|i| 100.0 + (i % 3) as f64).collect();
        let result = rolling_volatility(&closes, 20);
        assert!(result[..20].iter().all(Option::is_none));
        assert!(result[20..].iter().all(Option::is_some));
    }

    #[test]
    fn test_volume_ratio() {
        let volumes = [100.0, 100.0, 100.0, 200.0];
        let result = volume_ratio(&volumes, 2);
        assert_eq!(result[0], None);
        assert_relative_eq!(result[1].unwrap(), 1.0);
        // 200 / mean(100, 200) ≈ 1.333
        assert_relative_eq!(result[3].unwrap(), 200.0 / 150.0);
    }

    #[test]
    fn test_volume_ratio_zero_average_is_none() {
        let volumes = [0.0, 0.0, 0.0];
        let result = volume_ratio(&volumes, 2);
        assert!(result.iter().all(Option::is_none));
    }
}
