//! Property tests for the label policy.
//!
//! Uses proptest to verify:
//! 1. Totality: every finite return maps to exactly one label
//! 2. Monotonicity: labels only become more bullish as the return grows
//! 3. Threshold validation: inverted pairs are always rejected

use proptest::prelude::*;
use ronda_traits::{Label, Thresholds};

// Strategies

fn arb_return() -> impl Strategy<Value = f64> {
    -1.0..1.0_f64
}

/// Threshold pairs with buy strictly above sell.
fn arb_thresholds() -> impl Strategy<Value = Thresholds> {
    (-0.5..0.5_f64, 1e-9..0.5_f64)
        .prop_map(|(sell, gap)| Thresholds::new(sell + gap, sell).unwrap())
}

fn bullishness(label: Label) -> i32 {
    match label {
        Label::Sell => -1,
        Label::Hold => 0,
        Label::Buy => 1,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10_000))]

    /// Every sampled return maps to exactly one of the three labels.
    #[test]
    fn labeler_is_total(r in arb_return(), t in arb_thresholds()) {
        let label = Label::from_return(r, &t);
        prop_assert!(matches!(label, Label::Buy | Label::Hold | Label::Sell));
        // Deterministic: a second call agrees.
        prop_assert_eq!(label, Label::from_return(r, &t));
    }

    /// label(x) is monotone non-decreasing in bullishness as x increases.
    #[test]
    fn labeler_is_monotone(
        a in arb_return(),
        b in arb_return(),
        t in arb_thresholds(),
    ) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo_label = Label::from_return(lo, &t);
        let hi_label = Label::from_return(hi, &t);
        prop_assert!(bullishness(lo_label) <= bullishness(hi_label));
    }

    /// Boundary returns take the decisive label, never Hold.
    #[test]
    fn boundaries_are_decisive(t in arb_thresholds()) {
        prop_assert_eq!(Label::from_return(t.buy, &t), Label::Buy);
        prop_assert_eq!(Label::from_return(t.sell, &t), Label::Sell);
    }

    /// Threshold pairs with buy <= sell never construct.
    #[test]
    fn inverted_thresholds_rejected(buy in arb_return(), extra in 0.0..0.5_f64) {
        let sell = buy + extra;
        prop_assert!(Thresholds::new(buy, sell).is_err());
    }
}
