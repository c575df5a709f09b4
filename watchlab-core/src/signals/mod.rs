//! Signal detectors: discrete entry/exit conditions.
//!
//! Detectors never hold state: each fires against the final two bars of
//! precomputed indicator columns. They represent "is this condition true
//! right now?", not a position or a recommendation.

pub mod ema_cross;
pub mod patterns;
pub mod pullback;
pub mod rsi_gate;
pub mod squeeze_breakout;
pub mod three_bar;
pub mod volume_breakout;

pub use ema_cross::EmaCrossGate;
pub use patterns::{bottom_signals, stop_falling_signals, BottomSignal, StopFallingSignal};
pub use pullback::PullbackGate;
pub use rsi_gate::RsiGate;
pub use squeeze_breakout::SqueezeBreakoutGate;
pub use three_bar::ThreeBarGate;
pub use volume_breakout::VolumeBreakoutGate;

use serde::{Deserialize, Serialize};

use crate::indicators::BollingerBands;

/// Trend label derived from the EMA 8/21 stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendLabel {
    Bull,
    Bear,
}

/// Precomputed columns shared by every gate.
pub struct GateSeries<'a> {
    pub opens: &'a [f64],
    pub closes: &'a [f64],
    pub volumes: &'a [f64],
    pub ema8: &'a [f64],
    pub ema21: &'a [f64],
    pub sma50: &'a [f64],
    pub sma200: &'a [f64],
    pub volume_sma20: &'a [f64],
    pub rsi14: &'a [f64],
    pub bands: &'a BollingerBands,
}

/// One reading of all six gates at the final bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalGates {
    pub ema_cross: EmaCrossGate,
    pub vol_breakout: VolumeBreakoutGate,
    pub bar3_reversal: ThreeBarGate,
    pub rsi: RsiGate,
    pub bb_squeeze: SqueezeBreakoutGate,
    pub sma50_pullback: PullbackGate,
}

impl SignalGates {
    pub fn entry_count(&self) -> usize {
        [
            self.ema_cross.entry,
            self.vol_breakout.entry,
            self.bar3_reversal.entry,
            self.rsi.entry,
            self.bb_squeeze.entry,
            self.sma50_pullback.entry,
        ]
        .iter()
        .filter(|&&flag| flag)
        .count()
    }

    pub fn exit_count(&self) -> usize {
        [
            self.ema_cross.exit,
            self.vol_breakout.exit,
            self.bar3_reversal.exit,
            self.rsi.exit,
            self.bb_squeeze.exit,
            self.sma50_pullback.exit,
        ]
        .iter()
        .filter(|&&flag| flag)
        .count()
    }

    pub fn trend(&self) -> TrendLabel {
        if self.ema_cross.bullish {
            TrendLabel::Bull
        } else {
            TrendLabel::Bear
        }
    }
}

/// Evaluate all six gates at the last bar of the series.
pub fn evaluate_gates(series: &GateSeries) -> SignalGates {
    if series.closes.is_empty() {
        return SignalGates::default();
    }
    let i = series.closes.len() - 1;

    SignalGates {
        ema_cross: ema_cross::evaluate(series.ema8, series.ema21, i),
        vol_breakout: volume_breakout::evaluate(
            series.closes,
            series.volumes,
            series.volume_sma20,
            series.sma50,
            i,
        ),
        bar3_reversal: three_bar::evaluate(series.opens, series.closes, series.rsi14, i),
        rsi: rsi_gate::evaluate(series.rsi14, i),
        bb_squeeze: squeeze_breakout::evaluate(series.closes, series.bands, i),
        sma50_pullback: pullback::evaluate(series.closes, series.sma50, series.sma200, i),
    }
}
