//! Full analysis battery: one symbol in, one snapshot out.
//!
//! `analyze` canonicalizes the bar series, then runs every indicator,
//! structure detector, pattern scan and scorer over it. The assembled
//! snapshot is serializable; numeric fields are rounded for display at
//! this boundary (non-finite values become 0), so a snapshot never
//! carries NaN into serialized output.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{canonicalize, Bar, PriceColumns};
use crate::indicators::{
    adx, band_position, bollinger, macd, rsi, squeeze_on, width_percent, z_score, BandPosition,
};
use crate::primitives::{ema, round_to, sma};
use crate::score::{mimi_score, overall_score, MimiInputs, MimiScore, OverallInputs, OverallScore};
use crate::signals::{
    bottom_signals, evaluate_gates, stop_falling_signals, BottomSignal, GateSeries, SignalGates,
    StopFallingSignal, TrendLabel,
};
use crate::stops::stop_loss_plan;
use crate::structure::{
    darvas_box, market_structure, ttm_squeeze, DarvasStatus, MomentumDirection, StructureTrend,
};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("no usable bars for {0}")]
    NoUsableBars(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSide {
    Above,
    Below,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageBlock {
    pub sma200: f64,
    pub sma50: f64,
    pub sma20: f64,
    pub ema21: f64,
    pub ema8: f64,
    pub price_vs_200: PriceSide,
    pub golden_cross: bool,
    pub trend_score: i32,
}

/// Five-state MACD posture, keyed on the zero line and the signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MacdTrend {
    BestBullish,
    BullishContinuation,
    ReboundWatch,
    Bearish,
    Neutral,
}

impl MacdTrend {
    pub fn label(&self) -> &'static str {
        match self {
            Self::BestBullish => "golden cross above zero (best bullish)",
            Self::BullishContinuation => "bullish continuation above zero",
            Self::ReboundWatch => "golden cross below zero (rebound watch)",
            Self::Bearish => "bearish below zero",
            Self::Neutral => "trend neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramTrend {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdBlock {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
    pub above_zero: bool,
    pub golden_cross: bool,
    pub trend: MacdTrend,
    pub histogram_trend: HistogramTrend,
    pub bull_divergence: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BollingerBlock {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
    pub position: BandPosition,
    pub squeeze: bool,
    pub z_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RsiStatus {
    Overbought,
    Neutral,
    Oversold,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiBlock {
    pub value: f64,
    pub status: RsiStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeBlock {
    pub current: u64,
    pub avg20: u64,
    pub ratio: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendStrength {
    Strong,
    Weak,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdxBlock {
    pub value: f64,
    pub trend_strength: TrendStrength,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarvasBlock {
    pub top: f64,
    pub bottom: f64,
    pub formation_days: usize,
    pub status: DarvasStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtmBlock {
    pub squeeze_on: bool,
    pub momentum: f64,
    pub direction: MomentumDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmcBlock {
    pub trend: StructureTrend,
    pub swing_high: f64,
    pub swing_low: f64,
    pub higher_high: bool,
    pub higher_low: bool,
    pub lower_high: bool,
    pub lower_low: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopLossBlock {
    pub darvas_bottom: f64,
    pub ema8: f64,
    pub swing_low: f64,
    pub recommended: f64,
    pub risk_percent: f64,
    pub logic: String,
}

/// Fired detectors out of a fixed catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalTally {
    pub count: usize,
    pub total: usize,
    pub signals: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategiesBlock {
    pub entry_count: usize,
    pub exit_count: usize,
    pub trend: TrendLabel,
    pub gates: SignalGates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub change_amount: f64,
    pub moving_averages: MovingAverageBlock,
    pub macd: MacdBlock,
    pub bollinger: BollingerBlock,
    pub rsi: RsiBlock,
    pub volume: VolumeBlock,
    pub adx: AdxBlock,
    pub darvas_box: DarvasBlock,
    pub ttm_squeeze: TtmBlock,
    pub smc: SmcBlock,
    pub stop_loss: StopLossBlock,
    pub mimi_score: MimiScore,
    pub stop_falling: SignalTally,
    pub bottom_signals: SignalTally,
    pub strategies: StrategiesBlock,
    pub overall_score: OverallScore,
}

fn rsi_status(value: f64) -> RsiStatus {
    if value > 70.0 {
        RsiStatus::Overbought
    } else if value < 30.0 {
        RsiStatus::Oversold
    } else {
        RsiStatus::Neutral
    }
}

fn macd_trend(above_zero: bool, golden_cross: bool, line: f64, signal: f64) -> MacdTrend {
    if above_zero && golden_cross {
        MacdTrend::BestBullish
    } else if above_zero && line > signal {
        MacdTrend::BullishContinuation
    } else if !above_zero && golden_cross {
        MacdTrend::ReboundWatch
    } else if !above_zero && line < signal {
        MacdTrend::Bearish
    } else {
        MacdTrend::Neutral
    }
}

/// Run the full battery over a bar series.
///
/// Bars are canonicalized first (sorted, de-duplicated, insane bars
/// dropped); a single surviving bar is enough, indicators that need
/// more history just read as undefined and round to 0.
pub fn analyze(symbol: &str, bars: &[Bar]) -> Result<AnalysisSnapshot, AnalysisError> {
    let ordered = canonicalize(bars.to_vec());
    if ordered.is_empty() {
        return Err(AnalysisError::NoUsableBars(symbol.to_string()));
    }
    let cols = PriceColumns::from_bars(&ordered);
    Ok(snapshot_from_columns(symbol, &cols))
}

fn snapshot_from_columns(symbol: &str, cols: &PriceColumns) -> AnalysisSnapshot {
    let closes = &cols.closes;
    let i = closes.len() - 1;

    let sma200 = sma(closes, 200);
    let sma50 = sma(closes, 50);
    let sma20 = sma(closes, 20);
    let ema21 = ema(closes, 21);
    let ema8 = ema(closes, 8);
    let rsi14 = rsi(closes, 14);
    let macd_data = macd(closes, 12, 26, 9);
    let bands = bollinger(closes, 20, 2.0);
    let adx14 = adx(&cols.highs, &cols.lows, closes, 14);
    let volume_sma20 = sma(&cols.volumes, 20);

    let price = closes[i];
    let prev_close = if i >= 1 { closes[i - 1] } else { price };
    let change = if prev_close != 0.0 {
        (price - prev_close) / prev_close * 100.0
    } else {
        0.0
    };
    let change_amount = price - prev_close;

    let ma_trend_score = (if sma200[i].is_finite() && price > sma200[i] {
        1
    } else {
        -1
    }) + (if sma50[i].is_finite() && price > sma50[i] {
        1
    } else {
        -1
    });
    let ma_golden_cross =
        sma50[i].is_finite() && sma200[i].is_finite() && sma50[i] > sma200[i];
    let price_vs_200 = if price >= sma200[i] {
        PriceSide::Above
    } else {
        PriceSide::Below
    };

    let macd_line = macd_data.line[i];
    let macd_signal = macd_data.signal[i];
    let macd_hist = macd_data.histogram[i];
    let macd_above_zero = macd_line > 0.0;
    let macd_golden_cross = i >= 1
        && macd_data.line[i] > macd_data.signal[i]
        && macd_data.line[i - 1] <= macd_data.signal[i - 1];
    let prev_hist = if i >= 1 {
        macd_data.histogram[i - 1]
    } else {
        macd_hist
    };
    let histogram_trend = if macd_hist >= prev_hist {
        HistogramTrend::Increasing
    } else {
        HistogramTrend::Decreasing
    };

    let bb_upper = bands.upper[i];
    let bb_middle = bands.middle[i];
    let bb_lower = bands.lower[i];
    let bb_width = width_percent(bb_upper, bb_middle, bb_lower);
    let bb_pos = band_position(price, bb_upper, bb_middle, bb_lower);
    let bb_squeeze = squeeze_on(&bands, i);
    let bb_z = z_score(price, bb_upper, bb_middle);

    let rsi_value = rsi14[i];
    let vol_ratio = if volume_sma20[i].is_finite() && volume_sma20[i] > 0.0 {
        cols.volumes[i] / volume_sma20[i]
    } else {
        0.0
    };

    let darvas = darvas_box(&cols.highs, &cols.lows, price);
    let ttm = ttm_squeeze(closes, &cols.highs, &cols.lows);
    let smc = market_structure(&cols.highs, &cols.lows);

    let stop_list = stop_falling_signals(&cols.opens, closes, &cols.lows, &cols.volumes, &rsi14);
    let bottom_list = bottom_signals(closes, &cols.volumes, &macd_data.histogram, &stop_list);
    let bull_divergence = stop_list.contains(&StopFallingSignal::RsiBullishDivergence);

    let plan = stop_loss_plan(price, darvas.bottom, ema8[i], smc.swing_low);

    let mimi = mimi_score(&MimiInputs {
        price,
        sma200: sma200[i],
        sma50: sma50[i],
        ema8: ema8[i],
        ema21: ema21[i],
        smc_trend: smc.trend,
        macd_line,
        macd_hist,
        rsi_value,
        ttm: &ttm,
        vol_ratio,
        bb_position: bb_pos,
        darvas_status: darvas.status,
        stop_signal_count: stop_list.len(),
        bottom_signal_count: bottom_list.len(),
    });

    let mut gates = evaluate_gates(&GateSeries {
        opens: &cols.opens,
        closes,
        volumes: &cols.volumes,
        ema8: &ema8,
        ema21: &ema21,
        sma50: &sma50,
        sma200: &sma200,
        volume_sma20: &volume_sma20,
        rsi14: &rsi14,
        bands: &bands,
    });
    gates.rsi.value = round_to(gates.rsi.value, 2);

    let overall = overall_score(&OverallInputs {
        price,
        sma200: sma200[i],
        sma50: sma50[i],
        golden_cross: ma_golden_cross,
        macd_line,
        macd_golden_cross,
        rsi_value,
        stop_signal_count: stop_list.len(),
        bottom_signal_count: bottom_list.len(),
        entry_count: gates.entry_count(),
        exit_count: gates.exit_count(),
    });

    AnalysisSnapshot {
        symbol: symbol.to_string(),
        price: round_to(price, 2),
        change: round_to(change, 2),
        change_amount: round_to(change_amount, 2),
        moving_averages: MovingAverageBlock {
            sma200: round_to(sma200[i], 2),
            sma50: round_to(sma50[i], 2),
            sma20: round_to(sma20[i], 2),
            ema21: round_to(ema21[i], 2),
            ema8: round_to(ema8[i], 2),
            price_vs_200,
            golden_cross: ma_golden_cross,
            trend_score: ma_trend_score,
        },
        macd: MacdBlock {
            line: round_to(macd_line, 4),
            signal: round_to(macd_signal, 4),
            histogram: round_to(macd_hist, 4),
            above_zero: macd_above_zero,
            golden_cross: macd_golden_cross,
            trend: macd_trend(macd_above_zero, macd_golden_cross, macd_line, macd_signal),
            histogram_trend,
            bull_divergence,
        },
        bollinger: BollingerBlock {
            upper: round_to(bb_upper, 2),
            middle: round_to(bb_middle, 2),
            lower: round_to(bb_lower, 2),
            width: round_to(bb_width, 2),
            position: bb_pos,
            squeeze: bb_squeeze,
            z_score: round_to(bb_z, 2),
        },
        rsi: RsiBlock {
            value: round_to(rsi_value, 2),
            status: rsi_status(rsi_value),
        },
        volume: VolumeBlock {
            current: cols.volumes[i].round() as u64,
            avg20: round_to(volume_sma20[i], 0) as u64,
            ratio: round_to(vol_ratio, 2),
        },
        adx: AdxBlock {
            value: round_to(adx14[i], 2),
            trend_strength: if adx14[i] >= 25.0 {
                TrendStrength::Strong
            } else {
                TrendStrength::Weak
            },
        },
        darvas_box: DarvasBlock {
            top: round_to(darvas.top, 2),
            bottom: round_to(darvas.bottom, 2),
            formation_days: darvas.formation_days,
            status: darvas.status,
        },
        ttm_squeeze: TtmBlock {
            squeeze_on: ttm.squeeze_on,
            momentum: round_to(ttm.momentum, 5),
            direction: ttm.direction,
        },
        smc: SmcBlock {
            trend: smc.trend,
            swing_high: round_to(smc.swing_high, 2),
            swing_low: round_to(smc.swing_low, 2),
            higher_high: smc.higher_high,
            higher_low: smc.higher_low,
            lower_high: smc.lower_high,
            lower_low: smc.lower_low,
        },
        stop_loss: StopLossBlock {
            darvas_bottom: round_to(plan.darvas_bottom, 2),
            ema8: round_to(plan.ema8, 2),
            swing_low: round_to(plan.swing_low, 2),
            recommended: round_to(plan.recommended, 2),
            risk_percent: round_to(plan.risk_percent, 2),
            logic: "closest reasonable support below the current price, keeping the protective stop shallow".to_string(),
        },
        mimi_score: mimi,
        stop_falling: SignalTally {
            count: stop_list.len(),
            total: StopFallingSignal::CATALOGUE_SIZE,
            signals: stop_list.iter().map(|s| s.label().to_string()).collect(),
        },
        bottom_signals: SignalTally {
            count: bottom_list.len(),
            total: BottomSignal::CATALOGUE_SIZE,
            signals: bottom_list.iter().map(|s| s.label().to_string()).collect(),
        },
        strategies: StrategiesBlock {
            entry_count: gates.entry_count(),
            exit_count: gates.exit_count(),
            trend: gates.trend(),
            gates,
        },
        overall_score: overall,
    }
}
