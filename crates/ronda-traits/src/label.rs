//! Buy/Hold/Sell labeling of continuous returns.
//!
//! The labeler maps a return onto exactly one of three decisions using a
//! validated threshold pair. Boundary values are inclusive toward the
//! decisive label: a return exactly at the buy threshold is a Buy, exactly
//! at the sell threshold a Sell.

use crate::error::{Result, RondaError};
use serde::{Deserialize, Serialize};

/// A discrete trading decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Expected return at or above the buy threshold.
    Buy,
    /// Expected return strictly between the thresholds.
    Hold,
    /// Expected return at or below the sell threshold.
    Sell,
}

impl Label {
    /// Maps a continuous return to a label under the given thresholds.
    ///
    /// Total and deterministic: every finite return maps to exactly one
    /// label, and the mapping is monotone non-decreasing in bullishness.
    #[must_use]
    pub fn from_return(target_return: f64, thresholds: &Thresholds) -> Self {
        if target_return >= thresholds.buy {
            Self::Buy
        } else if target_return <= thresholds.sell {
            Self::Sell
        } else {
            Self::Hold
        }
    }

    /// Short string form used in tables and CSV exports.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "Buy",
            Self::Hold => "Hold",
            Self::Sell => "Sell",
        }
    }

    /// Directional position implied by this label when shorting is allowed.
    #[must_use]
    pub const fn direction(&self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Hold => 0.0,
            Self::Sell => -1.0,
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated buy/sell threshold pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Returns at or above this value label as Buy.
    pub buy: f64,
    /// Returns at or below this value label as Sell.
    pub sell: f64,
}

impl Thresholds {
    /// Creates a threshold pair, requiring `buy > sell`.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::Config`] if the ordering is violated or either
    /// value is non-finite.
    pub fn new(buy: f64, sell: f64) -> Result<Self> {
        if !buy.is_finite() || !sell.is_finite() {
            return Err(RondaError::Config(format!(
                "thresholds must be finite, got buy={buy}, sell={sell}"
            )));
        }
        if buy <= sell {
            return Err(RondaError::Config(format!(
                "buy threshold ({buy}) must exceed sell threshold ({sell})"
            )));
        }
        Ok(Self { buy, sell })
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            buy: 0.02,
            sell: -0.02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_ordering_enforced() {
        assert!(Thresholds::new(0.01, -0.01).is_ok());
        assert!(matches!(
            Thresholds::new(-0.01, 0.01),
            Err(RondaError::Config(_))
        ));
        assert!(matches!(
            Thresholds::new(0.01, 0.01),
            Err(RondaError::Config(_))
        ));
        assert!(matches!(
            Thresholds::new(f64::NAN, 0.0),
            Err(RondaError::Config(_))
        ));
    }

    #[test]
    fn test_label_policy() {
        let t = Thresholds::new(0.02, -0.02).unwrap();
        assert_eq!(Label::from_return(0.05, &t), Label::Buy);
        assert_eq!(Label::from_return(0.0, &t), Label::Hold);
        assert_eq!(Label::from_return(-0.05, &t), Label::Sell);
    }

    #[test]
    fn test_boundaries_go_to_decisive_label() {
        let t = Thresholds::new(0.02, -0.02).unwrap();
        assert_eq!(Label::from_return(0.02, &t), Label::Buy);
        assert_eq!(Label::from_return(-0.02, &t), Label::Sell);
    }

    #[test]
    fn test_display() {
        assert_eq!(Label::Buy.to_string(), "Buy");
        assert_eq!(Label::Sell.as_str(), "Sell");
    }
}
