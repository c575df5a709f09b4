//! Mimi composite score.
//!
//! Trend, momentum, and technical sub-scores each start at 50 and move
//! by fixed deltas keyed on indicator state, clamp to [0, 100], and
//! blend 40/30/30 into a rounded total. Labels accumulate alongside so
//! the verdict can explain itself.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::indicators::BandPosition;
use crate::structure::{DarvasStatus, MomentumDirection, StructureTrend, TtmSqueeze};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MimiVerdict {
    StrongBuy,
    BullishWatch,
    HoldWatch,
    Caution,
    Avoid,
}

impl fmt::Display for MimiVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StrongBuy => "strong buy",
            Self::BullishWatch => "bullish watch",
            Self::HoldWatch => "hold/watch",
            Self::Caution => "caution",
            Self::Avoid => "avoid",
        };
        f.write_str(label)
    }
}

pub struct MimiInputs<'a> {
    pub price: f64,
    pub sma200: f64,
    pub sma50: f64,
    pub ema8: f64,
    pub ema21: f64,
    pub smc_trend: StructureTrend,
    pub macd_line: f64,
    pub macd_hist: f64,
    pub rsi_value: f64,
    pub ttm: &'a TtmSqueeze,
    pub vol_ratio: f64,
    pub bb_position: BandPosition,
    pub darvas_status: DarvasStatus,
    pub stop_signal_count: usize,
    pub bottom_signal_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MimiScore {
    pub total: i32,
    pub trend: i32,
    pub momentum: i32,
    pub technical: i32,
    pub verdict: MimiVerdict,
    pub positive_signals: Vec<String>,
    pub risk_signals: Vec<String>,
}

/// NaN comparisons are false, so missing indicator values always take
/// the bearish/neutral branch.
pub fn mimi_score(input: &MimiInputs) -> MimiScore {
    let mut trend = 50i32;
    let mut momentum = 50i32;
    let mut technical = 50i32;
    let mut positive_signals = Vec::new();
    let mut risk_signals = Vec::new();

    if input.price > input.sma200 {
        trend += 15;
        positive_signals.push("above the 200-day MA".to_string());
    } else {
        trend -= 20;
        risk_signals.push("broke the 200-day MA".to_string());
    }
    if input.price > input.sma50 {
        trend += 10;
    } else {
        trend -= 10;
    }

    if input.ema8 > input.ema21 {
        trend += 12;
        positive_signals.push("EMA bull stack".to_string());
    } else {
        trend -= 12;
        risk_signals.push("EMA death cross".to_string());
    }

    if input.smc_trend == StructureTrend::Uptrend {
        trend += 13;
        positive_signals.push("uptrend structure".to_string());
    }
    if input.smc_trend == StructureTrend::Downtrend {
        trend -= 15;
        risk_signals.push("downtrend structure".to_string());
    }

    if input.macd_line > 0.0 {
        momentum += 10;
    }
    if input.macd_hist > 0.0 {
        momentum += 10;
        positive_signals.push("MACD bullish momentum".to_string());
    } else {
        momentum -= 10;
    }

    if input.rsi_value < 35.0 {
        momentum += 6;
        positive_signals.push("RSI oversold zone".to_string());
    }
    if input.rsi_value > 70.0 {
        momentum -= 8;
        risk_signals.push("RSI overheated".to_string());
    }

    if !input.ttm.squeeze_on && input.ttm.direction == MomentumDirection::Rising {
        momentum += 8;
    }
    if input.vol_ratio > 1.2 {
        momentum += 6;
    }

    if input.bb_position == BandPosition::UpperHalf {
        technical += 8;
    }
    if input.bb_position == BandPosition::BelowLower {
        technical -= 10;
    }

    if input.darvas_status == DarvasStatus::Breakout {
        technical += 12;
        positive_signals.push("Darvas breakout".to_string());
    }
    if input.darvas_status == DarvasStatus::Breakdown {
        technical -= 15;
        risk_signals.push("Darvas breakdown".to_string());
    }

    technical += 10.min(input.stop_signal_count as i32 * 2);
    technical += 8.min(input.bottom_signal_count as i32 * 2);

    let trend = trend.clamp(0, 100);
    let momentum = momentum.clamp(0, 100);
    let technical = technical.clamp(0, 100);

    let total =
        (trend as f64 * 0.4 + momentum as f64 * 0.3 + technical as f64 * 0.3).round() as i32;
    let verdict = if total >= 75 {
        MimiVerdict::StrongBuy
    } else if total >= 60 {
        MimiVerdict::BullishWatch
    } else if total >= 45 {
        MimiVerdict::HoldWatch
    } else if total >= 30 {
        MimiVerdict::Caution
    } else {
        MimiVerdict::Avoid
    };

    MimiScore {
        total,
        trend,
        momentum,
        technical,
        verdict,
        positive_signals,
        risk_signals,
    }
}
