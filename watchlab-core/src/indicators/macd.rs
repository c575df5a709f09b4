//! MACD: moving average convergence/divergence.
//!
//! line = EMA(fast) - EMA(slow), NaN where either leg is undefined.
//! signal = EMA(line, signal_period) computed over the line with NaN
//! positions zero-filled, so the signal leg starts early instead of
//! waiting out the slow warm-up.
//! histogram = line - signal, NaN where either side is undefined.

use crate::primitives::ema;

/// The three MACD series, aligned with the input.
#[derive(Debug, Clone)]
pub struct Macd {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn macd(values: &[f64], fast: usize, slow: usize, signal_period: usize) -> Macd {
    let n = values.len();
    let ema_fast = ema(values, fast);
    let ema_slow = ema(values, slow);

    let mut line = vec![f64::NAN; n];
    for i in 0..n {
        if ema_fast[i].is_finite() && ema_slow[i].is_finite() {
            line[i] = ema_fast[i] - ema_slow[i];
        }
    }

    let zero_filled: Vec<f64> = line
        .iter()
        .map(|&v| if v.is_finite() { v } else { 0.0 })
        .collect();
    let signal = ema(&zero_filled, signal_period);

    let histogram = line
        .iter()
        .zip(signal.iter())
        .map(|(&l, &s)| {
            if l.is_finite() && s.is_finite() {
                l - s
            } else {
                f64::NAN
            }
        })
        .collect();

    Macd {
        line,
        signal,
        histogram,
    }
}
