//! EMA 8/21 crossover gate.
//!
//! Entry fires on the bar where EMA8 crosses above EMA21. Exit fires
//! while EMA8 sits below EMA21.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EmaCrossGate {
    pub entry: bool,
    pub exit: bool,
    pub bullish: bool,
}

impl EmaCrossGate {
    pub fn status(&self) -> &'static str {
        if self.bullish {
            "EMA8 > EMA21"
        } else {
            "EMA8 <= EMA21"
        }
    }
}

pub fn evaluate(ema8: &[f64], ema21: &[f64], i: usize) -> EmaCrossGate {
    let bullish = if ema8[i].is_finite() && ema21[i].is_finite() {
        ema8[i] > ema21[i]
    } else {
        false
    };

    let entry = i >= 1
        && ema8[i - 1].is_finite()
        && ema21[i - 1].is_finite()
        && ema8[i].is_finite()
        && ema21[i].is_finite()
        && ema8[i - 1] <= ema21[i - 1]
        && ema8[i] > ema21[i];

    let exit = ema8[i] < ema21[i];

    EmaCrossGate {
        entry,
        exit,
        bullish,
    }
}
