//! Momentum oscillators.

/// Percent price change over a trailing window: `close[i] / close[i-window] - 1`.
#[must_use]
pub fn momentum(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 {
        return out;
    }
    for i in window..closes.len() {
        let past = closes[i - window];
        if past != 0.0 {
            out[i] = Some(closes[i] / past - 1.0);
        }
    }
    out
}

/// Relative Strength Index over a trailing window, using Wilder's smoothed
/// average gain/loss ratio.
///
/// The first value appears at index `window` (one full window of price
/// changes); an all-gain window reads 100, an all-loss window 0.
#[must_use]
pub fn rsi(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return out;
    }

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=window {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            avg_gain += change;
        } else {
            avg_loss += -change;
        }
    }
    avg_gain /= window as f64;
    avg_loss /= window as f64;
    out[window] = Some(rsi_value(avg_gain, avg_loss));

    let w = window as f64;
    for i in (window + 1)..closes.len() {
        let change = closes[i] - closes[i - 1];
        let (gain, loss) = if change > 0.0 {
            (change, 0.0)
        } else {
            (0.0, -change)
        };
        // Wilder smoothing
        avg_gain = (avg_gain * (w - 1.0) + gain) / w;
        avg_loss = (avg_loss * (w - 1.0) + loss) / w;
        out[i] = Some(rsi_value(avg_gain, avg_loss));
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_momentum() {
        let closes = [100.0, 110.0, 121.0];
        let result = momentum(&closes, 1);
        assert_eq!(result[0], None);
        assert_relative_eq!(result[1].unwrap(), 0.1);
        assert_relative_eq!(result[2].unwrap(), 0.1);
    }

    #[test]
    fn test_momentum_window_beyond_series() {
        let result = momentum(&[100.0, 101.0], 5);
        assert!(result.iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_all_gains_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let result = rsi(&closes, 14);
        assert_eq!(result[13], None);
        assert_relative_eq!(result[14].unwrap(), 100.0);
        assert_relative_eq!(result[19].unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_all_losses_is_0() {
        let closes: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let result = rsi(&closes, 14);
        assert_relative_eq!(result[14].unwrap(), 0.0);
    }

    #[test]
    fn test_rsi_flat_series_is_neutral() {
        let closes = [100.0; 20];
        let result = rsi(&closes, 14);
        assert_relative_eq!(result[14].unwrap(), 50.0);
    }

    #[test]
    fn test_rsi_bounded() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        let result = rsi(&closes, 14);
        for value in result.iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
        // Known series: first RSI lands around 70.
        assert_relative_eq!(result[14].unwrap(), 70.46, epsilon = 0.1);
    }
}
