//! Stop-loss placement.
//!
//! Three candidate stops are derived from structural anchors, each
//! discounted a little below the anchor itself. The recommended stop is
//! the highest candidate that sits below the current price, which keeps
//! the protective stop shallow.

use std::cmp::Ordering;

/// Raw (unrounded) stop candidates plus the recommendation.
///
/// Fields hold the discounted stop levels, not the anchors they came
/// from. `recommended` falls back to the EMA8 candidate when nothing
/// sits below the current price, even if that candidate is above it.
#[derive(Debug, Clone, PartialEq)]
pub struct StopLossPlan {
    pub darvas_bottom: f64,
    pub ema8: f64,
    pub swing_low: f64,
    pub recommended: f64,
    pub risk_percent: f64,
}

pub fn stop_loss_plan(price: f64, darvas_bottom: f64, ema8: f64, swing_low: f64) -> StopLossPlan {
    let darvas_stop = darvas_bottom * 0.98;
    let ema8_stop = ema8 * 0.97;
    let swing_stop = swing_low * 0.98;

    let mut candidates: Vec<f64> = [darvas_stop, ema8_stop, swing_stop]
        .into_iter()
        .filter(|v| v.is_finite() && *v > 0.0 && *v < price)
        .collect();
    candidates.sort_by(|a, b| b.partial_cmp(a).unwrap_or(Ordering::Equal));

    let recommended = candidates.first().copied().unwrap_or(ema8_stop);
    let risk_percent = if price > 0.0 {
        (price - recommended) / price * 100.0
    } else {
        0.0
    };

    StopLossPlan {
        darvas_bottom: darvas_stop,
        ema8: ema8_stop,
        swing_low: swing_stop,
        recommended,
        risk_percent,
    }
}
