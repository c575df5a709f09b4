//! Market regime gauge over index and volatility series.
//!
//! Everything here is pure: the caller supplies close series for the
//! two benchmark indexes and the VIX, and gets back a scored stance.
//! Metric blocks hold display-rounded values and the scorer reads those
//! same values, so breakdown notes always agree with the arithmetic.

use serde::{Deserialize, Serialize};

use watchlab_core::indicators::{bollinger, rsi};
use watchlab_core::primitives::{ema, round_to, sma};

/// Volatility tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VixStatus {
    Low,
    Moderate,
    High,
    Extreme,
}

/// VIX direction against its 20-day mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VixTrend {
    Rising,
    Falling,
    Stable,
}

/// VIX reading with moving-average context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VixGauge {
    pub current: f64,
    pub ma20: f64,
    pub ma50: f64,
    pub status: VixStatus,
    pub trend: VixTrend,
}

impl VixGauge {
    /// Build the gauge from the latest reading and a close series.
    ///
    /// A series shorter than 50 bars is replaced by a flat line at the
    /// current reading (20 when even that is unknown), so the gauge
    /// always yields a usable stance.
    pub fn from_series(current: Option<f64>, closes: &[f64]) -> Self {
        let fallback = vec![current.unwrap_or(20.0); 50];
        let series: &[f64] = if closes.len() >= 50 {
            closes
        } else {
            &fallback
        };
        let vix_now = match current {
            Some(value) => value,
            None => last(series),
        };

        let ma20_raw = last(&sma(series, 20));
        let ma50_raw = last(&sma(series, 50));
        let ma20 = if ma20_raw.is_finite() { ma20_raw } else { vix_now };
        let ma50 = if ma50_raw.is_finite() { ma50_raw } else { vix_now };

        VixGauge {
            current: round_to(vix_now, 2),
            ma20: round_to(ma20, 2),
            ma50: round_to(ma50, 2),
            status: Self::status_for(vix_now),
            trend: Self::trend_for(vix_now, ma20),
        }
    }

    fn status_for(vix: f64) -> VixStatus {
        if vix < 15.0 {
            VixStatus::Low
        } else if vix < 20.0 {
            VixStatus::Moderate
        } else if vix < 30.0 {
            VixStatus::High
        } else {
            VixStatus::Extreme
        }
    }

    fn trend_for(current: f64, ma20: f64) -> VixTrend {
        let diff = current - ma20;
        if diff.abs() < 0.2 {
            VixTrend::Stable
        } else if diff > 0.0 {
            VixTrend::Rising
        } else {
            VixTrend::Falling
        }
    }
}

/// Index posture against its 200-day mean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexTrend {
    Bull,
    Bear,
}

/// Price posture against the 8-day EMA lifeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifelineStatus {
    AboveEma8,
    BelowEma8,
}

/// One benchmark index measured for the regime score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexMetrics {
    pub price: f64,
    pub change_percent: f64,
    pub ema8: f64,
    pub sma50: f64,
    pub sma200: f64,
    pub rsi: f64,
    pub bb_position: f64,
    pub trend: IndexTrend,
    pub lifeline_status: LifelineStatus,
    pub dist_from_200: f64,
}

impl IndexMetrics {
    /// Measure one index from its latest quote and close series.
    ///
    /// Unwarmed averages fall back to the price itself (RSI to 50), so
    /// a short series scores as flat rather than broken.
    pub fn from_closes(price: f64, change_percent: f64, closes: &[f64]) -> Self {
        let ema8_v = last(&ema(closes, 8));
        let sma50_v = last(&sma(closes, 50));
        let sma200_v = last(&sma(closes, 200));
        let rsi_v = last(&rsi(closes, 14));
        let bands = bollinger(closes, 20, 2.0);
        let upper = last(&bands.upper);
        let lower = last(&bands.lower);

        let bb_position = if upper.is_finite() && lower.is_finite() && upper != lower {
            ((price - lower) / (upper - lower) * 100.0).clamp(0.0, 100.0)
        } else {
            50.0
        };

        let dist_from_200 = if sma200_v.is_finite() && sma200_v != 0.0 {
            (price - sma200_v) / sma200_v * 100.0
        } else {
            0.0
        };

        IndexMetrics {
            price: round_to(price, 2),
            change_percent: round_to(change_percent, 2),
            ema8: round_to(if ema8_v.is_finite() { ema8_v } else { price }, 2),
            sma50: round_to(if sma50_v.is_finite() { sma50_v } else { price }, 2),
            sma200: round_to(if sma200_v.is_finite() { sma200_v } else { price }, 2),
            rsi: round_to(if rsi_v.is_finite() { rsi_v } else { 50.0 }, 2),
            bb_position: round_to(bb_position, 2),
            trend: if sma200_v.is_finite() && price > sma200_v {
                IndexTrend::Bull
            } else {
                IndexTrend::Bear
            },
            lifeline_status: if ema8_v.is_finite() && price >= ema8_v {
                LifelineStatus::AboveEma8
            } else {
                LifelineStatus::BelowEma8
            },
            dist_from_200: round_to(dist_from_200, 2),
        }
    }
}

fn last(series: &[f64]) -> f64 {
    series.last().copied().unwrap_or(f64::NAN)
}

/// One factor line in the regime breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeFactor {
    pub key: String,
    pub label: String,
    pub score: i32,
    pub note: String,
}

/// Stance buckets, strongest risk-on first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeStance {
    ExtremeOffense,
    Offense,
    Neutral,
    Defense,
    CrisisBuy,
}

impl RegimeStance {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ExtremeOffense => "extreme offense",
            Self::Offense => "offense",
            Self::Neutral => "neutral",
            Self::Defense => "defense",
            Self::CrisisBuy => "crisis buy",
        }
    }
}

/// Scored stance with its factor breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeScore {
    pub score: i32,
    pub stance: RegimeStance,
    pub suggestion: String,
    pub breakdown: Vec<RegimeFactor>,
}

/// Score the overall regime from the VIX gauge and both index blocks.
///
/// A VIX above 30 scores as a contrarian positive; the panic-bottom
/// override (VIX above 30 with an oversold index) forces the crisis-buy
/// stance when the score lands in its band.
pub fn score_market_regime(
    vix: &VixGauge,
    spy: &IndexMetrics,
    qqq: &IndexMetrics,
) -> RegimeScore {
    let mut breakdown = Vec::new();
    let mut score = 0_i32;

    let vix_score = if vix.current < 15.0 {
        1
    } else if vix.current < 20.0 {
        0
    } else if vix.current < 25.0 {
        -1
    } else if vix.current < 30.0 {
        -2
    } else {
        2
    };
    score += vix_score;
    breakdown.push(RegimeFactor {
        key: "vix".to_string(),
        label: "VIX risk".to_string(),
        score: vix_score,
        note: format!("VIX {}", vix.current),
    });

    for (name, index) in [("spy", spy), ("qqq", qqq)] {
        let mut points = 0;
        if index.price > index.sma200 {
            points += 2;
        }
        if index.price > index.sma50 {
            points += 1;
        }
        if index.price > index.ema8 {
            points += 1;
        }
        score += points;
        breakdown.push(RegimeFactor {
            key: format!("{name}_trend"),
            label: format!("{} trend", name.to_uppercase()),
            score: points,
            note: format!(
                "P:{} / EMA8:{} / SMA50:{} / SMA200:{}",
                index.price, index.ema8, index.sma50, index.sma200
            ),
        });
    }

    for (name, index) in [("spy", spy), ("qqq", qqq)] {
        let points = if index.rsi < 30.0 {
            1
        } else if index.rsi > 70.0 {
            -1
        } else {
            0
        };
        score += points;
        breakdown.push(RegimeFactor {
            key: format!("{name}_rsi"),
            label: format!("{} RSI", name.to_uppercase()),
            score: points,
            note: format!("RSI {}", index.rsi),
        });
    }

    for (name, index) in [("spy", spy), ("qqq", qqq)] {
        let points = if index.bb_position < 20.0 { 1 } else { 0 };
        score += points;
        breakdown.push(RegimeFactor {
            key: format!("{name}_bb"),
            label: format!("{} band position", name.to_uppercase()),
            score: points,
            note: format!("band position {}%", index.bb_position),
        });
    }

    let score = score.clamp(-10, 10);
    let panic_bottom = vix.current > 30.0 && (spy.rsi < 30.0 || qqq.rsi < 30.0);

    let (stance, suggestion) = if score >= 7 {
        (
            RegimeStance::ExtremeOffense,
            "Full risk-on, favor the strongest names first.",
        )
    } else if score >= 4 {
        (
            RegimeStance::Offense,
            "Buy actively, raise exposure in steps.",
        )
    } else if score >= 1 {
        (
            RegimeStance::Neutral,
            "Hold positions, wait for a clearer direction.",
        )
    } else if score <= -3 || panic_bottom {
        (
            RegimeStance::CrisisBuy,
            if panic_bottom {
                "Panic zone, accumulate in tranches with strict risk control."
            } else {
                "Deeply weak tape, only staged oversold entries."
            },
        )
    } else {
        (
            RegimeStance::Defense,
            "Cut leverage and position size, hold cash.",
        )
    };

    RegimeScore {
        score,
        stance,
        suggestion: suggestion.to_string(),
        breakdown,
    }
}
