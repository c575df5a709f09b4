//! Three-bar reversal gate.
//!
//! Entry: three consecutive up-closes while RSI is still below 40 (a
//! bounce that has not yet run hot). Exit: RSI above 60 on a down-close.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ThreeBarGate {
    pub entry: bool,
    pub exit: bool,
}

pub fn evaluate(opens: &[f64], closes: &[f64], rsi14: &[f64], i: usize) -> ThreeBarGate {
    let rsi_value = rsi14[i];

    let entry = i >= 2
        && closes[i] > opens[i]
        && closes[i - 1] > opens[i - 1]
        && closes[i - 2] > opens[i - 2]
        && rsi_value.is_finite()
        && rsi_value < 40.0;

    let exit = rsi_value.is_finite() && rsi_value > 60.0 && closes[i] < opens[i];

    ThreeBarGate { entry, exit }
}
