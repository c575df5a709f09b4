//! SMA50 pullback gate.
//!
//! Entry: in a bull regime (SMA50 above SMA200), the prior close tagged
//! the SMA50 from above within 1% and today's close bounces back over
//! both the prior close and the average. Exit: price loses the SMA50 by
//! more than 2%.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PullbackGate {
    pub entry: bool,
    pub exit: bool,
}

pub fn evaluate(closes: &[f64], sma50: &[f64], sma200: &[f64], i: usize) -> PullbackGate {
    let price = closes[i];

    let entry = i >= 1
        && sma50[i].is_finite()
        && sma200[i].is_finite()
        && sma50[i] > sma200[i]
        && closes[i - 1] <= sma50[i - 1] * 1.01
        && price > closes[i - 1]
        && price > sma50[i];

    let exit = price < sma50[i] * 0.98;

    PullbackGate { entry, exit }
}
