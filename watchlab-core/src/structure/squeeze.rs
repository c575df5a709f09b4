//! TTM Squeeze: volatility compression plus momentum.
//!
//! The squeeze is ON when the Bollinger band (20, 2) sits entirely inside
//! a Keltner-like channel of EMA(20) ± 1.5 × ATR(20). Momentum is the
//! linear-regression slope of the close detrended by the average of the
//! Bollinger midline and EMA(20), over the trailing 20-bar window.

use serde::{Deserialize, Serialize};

use crate::indicators::{atr, bollinger};
use crate::primitives::{ema, linreg_slope};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MomentumDirection {
    Rising,
    Falling,
}

#[derive(Debug, Clone)]
pub struct TtmSqueeze {
    pub squeeze_on: bool,
    pub momentum: f64,
    pub direction: MomentumDirection,
}

pub fn ttm_squeeze(closes: &[f64], highs: &[f64], lows: &[f64]) -> TtmSqueeze {
    let n = closes.len();
    let bands = bollinger(closes, 20, 2.0);
    let ema20 = ema(closes, 20);
    let atr20 = atr(highs, lows, closes, 20);

    // Slope of the detrended close over the trailing window. Needs at
    // least 5 finite points, otherwise flat.
    let momentum_at = |i: usize| -> f64 {
        let start = i.saturating_sub(19);
        let detrended: Vec<f64> = (start..=i)
            .filter_map(|j| {
                let mid = (bands.middle[j] + ema20[j]) / 2.0;
                let v = closes[j] - mid;
                v.is_finite().then_some(v)
            })
            .collect();
        if detrended.len() >= 5 {
            linreg_slope(&detrended)
        } else {
            0.0
        }
    };

    if n == 0 {
        return TtmSqueeze {
            squeeze_on: false,
            momentum: 0.0,
            direction: MomentumDirection::Rising,
        };
    }

    let i = n - 1;
    let keltner_mid = ema20[i];
    let keltner_range = atr20[i] * 1.5;
    let squeeze_on = bands.upper[i].is_finite()
        && bands.lower[i].is_finite()
        && keltner_mid.is_finite()
        && keltner_range.is_finite()
        && bands.upper[i] < keltner_mid + keltner_range
        && bands.lower[i] > keltner_mid - keltner_range;

    let momentum = momentum_at(i);
    let prev_momentum = if i >= 1 { momentum_at(i - 1) } else { 0.0 };
    let direction = if momentum >= prev_momentum {
        MomentumDirection::Rising
    } else {
        MomentumDirection::Falling
    };

    TtmSqueeze {
        squeeze_on,
        momentum,
        direction,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns_from_closes(closes: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let highs = closes.iter().map(|c| c + 1.0).collect();
        let lows = closes.iter().map(|c| c - 1.0).collect();
        (highs, lows)
    }

    #[test]
    fn short_series_is_neutral() {
        let closes = vec![100.0; 10];
        let (highs, lows) = columns_from_closes(&closes);
        let result = ttm_squeeze(&closes, &highs, &lows);

        assert!(!result.squeeze_on);
        assert_eq!(result.momentum, 0.0);
        assert_eq!(result.direction, MomentumDirection::Rising);
    }

    #[test]
    fn flat_series_squeezes() {
        // Flat closes give zero-width bands while true range stays at 2,
        // so the bands sit well inside the Keltner channel.
        let closes = vec![100.0; 40];
        let (highs, lows) = columns_from_closes(&closes);
        let result = ttm_squeeze(&closes, &highs, &lows);

        assert!(result.squeeze_on);
        assert_eq!(result.momentum, 0.0);
        assert_eq!(result.direction, MomentumDirection::Rising);
    }

    #[test]
    fn steady_trend_releases_squeeze() {
        // A steady climb spreads the Bollinger bands (stddev of a ramp)
        // while true range stays small, so the bands poke outside the
        // Keltner channel.
        let closes: Vec<f64> = (0..40).map(|i| 100.0 + i as f64 * 2.0).collect();
        let highs: Vec<f64> = closes.iter().map(|c| c + 0.5).collect();
        let lows: Vec<f64> = closes.iter().map(|c| c - 0.5).collect();
        let result = ttm_squeeze(&closes, &highs, &lows);

        assert!(!result.squeeze_on);
    }

    #[test]
    fn rally_momentum_rises() {
        // Accelerating rally: close pulls away from its own midline, so
        // the detrended slope is positive and the direction is rising.
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01f64.powi(i)).collect();
        let (highs, lows) = columns_from_closes(&closes);
        let result = ttm_squeeze(&closes, &highs, &lows);

        assert!(result.momentum > 0.0);
        assert_eq!(result.direction, MomentumDirection::Rising);
    }
}
