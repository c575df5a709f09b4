//! Stop-falling and bottoming pattern catalogues.
//!
//! Each pattern inspects the final bar of the series with a trailing
//! window, guarded by a minimum-history check. Patterns with too little
//! history simply stay silent.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopFallingSignal {
    ThreeDayNoNewLow,
    LongBullishCandle,
    RangeContraction,
    VolumeFlat,
    FalseBreakdownRecovery,
    RsiBullishDivergence,
    VolumeExhaustionReversal,
}

impl StopFallingSignal {
    pub const CATALOGUE_SIZE: usize = 7;

    pub fn label(&self) -> &'static str {
        match self {
            Self::ThreeDayNoNewLow => "three days without a new low",
            Self::LongBullishCandle => "long bullish candle",
            Self::RangeContraction => "price flattening into a range",
            Self::VolumeFlat => "volume surge with flat price",
            Self::FalseBreakdownRecovery => "support break quickly reclaimed",
            Self::RsiBullishDivergence => "RSI bullish divergence",
            Self::VolumeExhaustionReversal => "volume-exhaustion rebound",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomSignal {
    VolumeConfirmedBreakout,
    RsiBottomDivergence,
    MacdHistogramFlip,
}

impl BottomSignal {
    pub const CATALOGUE_SIZE: usize = 3;

    pub fn label(&self) -> &'static str {
        match self {
            Self::VolumeConfirmedBreakout => "volume-confirmed breakout",
            Self::RsiBottomDivergence => "RSI bottom divergence",
            Self::MacdHistogramFlip => "MACD histogram turned positive",
        }
    }
}

/// Population coefficient of variation.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / mean
}

pub fn stop_falling_signals(
    opens: &[f64],
    closes: &[f64],
    lows: &[f64],
    volumes: &[f64],
    rsi14: &[f64],
) -> Vec<StopFallingSignal> {
    let n = closes.len();
    let mut signals = Vec::new();
    if n == 0 {
        return signals;
    }

    let i = n - 1;
    let price = closes[i];
    let prev_close = if i >= 1 { closes[i - 1] } else { price };

    // 1. Three-day no-new-low: the last 3 lows hold above 99% of the
    //    prior 7-bar low.
    if i >= 9 {
        let last3_low = lows[i - 2..=i].iter().copied().fold(f64::INFINITY, f64::min);
        let prior_low = lows[i - 9..=i - 3]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if last3_low >= prior_low * 0.99 {
            signals.push(StopFallingSignal::ThreeDayNoNewLow);
        }
    }

    // 2. Long bullish candle: today's body/open ratio beats 1.5x the
    //    trailing 20-bar average ratio.
    let body = (closes[i] - opens[i]).abs();
    let window_start = i.saturating_sub(19);
    let avg_body = (window_start..=i)
        .map(|k| {
            let denom = if opens[k] != 0.0 { opens[k] } else { 1.0 };
            (closes[k] - opens[k]).abs() / denom
        })
        .sum::<f64>()
        / 20.0_f64.min((i + 1) as f64);
    if closes[i] > opens[i] && opens[i] > 0.0 && body / opens[i] > avg_body * 1.5 {
        signals.push(StopFallingSignal::LongBullishCandle);
    }

    // 3. Range contraction: 5-bar close volatility under 70% of the
    //    prior 20-bar value.
    if i >= 24 {
        let recent = coefficient_of_variation(&closes[i - 4..=i]);
        let older = coefficient_of_variation(&closes[i - 24..=i - 5]);
        if recent < older * 0.7 {
            signals.push(StopFallingSignal::RangeContraction);
        }
    }

    // 4. Volume surge with flat price.
    if i >= 19 {
        let avg_volume = volumes[i - 19..=i].iter().sum::<f64>() / 20.0;
        let price_change = if prev_close != 0.0 {
            ((price - prev_close) / prev_close).abs()
        } else {
            0.0
        };
        if volumes[i] > avg_volume * 1.5 && price_change < 0.01 {
            signals.push(StopFallingSignal::VolumeFlat);
        }
    }

    // 5. False breakdown recovery: the low breaches 20-bar support by 1%
    //    but the close reclaims it.
    if i >= 21 {
        let support = lows[i - 20..=i - 1]
            .iter()
            .copied()
            .fold(f64::INFINITY, f64::min);
        if lows[i] < support * 0.99 && closes[i] > support {
            signals.push(StopFallingSignal::FalseBreakdownRecovery);
        }
    }

    // 6. RSI bullish divergence: price makes the 21-bar low while RSI
    //    holds above its own window minimum.
    if i >= 20 {
        let min_low = lows[i - 20..=i].iter().copied().fold(f64::INFINITY, f64::min);
        let min_rsi = rsi14[i - 20..=i]
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(f64::INFINITY, f64::min);
        let min_rsi = if min_rsi.is_finite() { min_rsi } else { rsi14[i] };
        if lows[i] <= min_low && rsi14[i].is_finite() && rsi14[i] > min_rsi {
            signals.push(StopFallingSignal::RsiBullishDivergence);
        }
    }

    // 7. Volume-exhaustion reversal: three shrinking-volume down-closes,
    //    then an up-close on a 50% volume spike.
    if i >= 4 {
        let shrinking = volumes[i - 4] > volumes[i - 3]
            && volumes[i - 3] > volumes[i - 2]
            && closes[i - 4] > closes[i - 3]
            && closes[i - 3] > closes[i - 2];
        let rebound = closes[i] > closes[i - 1] && volumes[i] > volumes[i - 1] * 1.5;
        if shrinking && rebound {
            signals.push(StopFallingSignal::VolumeExhaustionReversal);
        }
    }

    signals
}

pub fn bottom_signals(
    closes: &[f64],
    volumes: &[f64],
    histogram: &[f64],
    stop_falling: &[StopFallingSignal],
) -> Vec<BottomSignal> {
    let n = closes.len();
    let mut signals = Vec::new();
    if n == 0 {
        return signals;
    }

    let i = n - 1;
    let price = closes[i];
    let prev_close = if i >= 1 { closes[i - 1] } else { price };

    if i >= 19 {
        let avg_volume = volumes[i - 19..=i].iter().sum::<f64>() / 20.0;
        let pct = if prev_close != 0.0 {
            (price - prev_close) / prev_close
        } else {
            0.0
        };
        if volumes[i] > avg_volume * 2.0 && pct > 0.03 {
            signals.push(BottomSignal::VolumeConfirmedBreakout);
        }
    }

    if stop_falling.contains(&StopFallingSignal::RsiBullishDivergence) {
        signals.push(BottomSignal::RsiBottomDivergence);
    }

    if i >= 1 && histogram[i - 1] < 0.0 && histogram[i] > 0.0 {
        signals.push(BottomSignal::MacdHistogramFlip);
    }

    signals
}
