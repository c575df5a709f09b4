//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! middle = SMA(period), upper/lower = middle +/- mult * stddev(period)
//! with population stddev. The width, band-position and z-score helpers
//! live here too so every consumer shares one definition.

use serde::{Deserialize, Serialize};

use crate::primitives::{rolling_stddev, sma};

/// The three band series, aligned with the input.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
}

/// Where the last price sits relative to the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandPosition {
    AboveUpper,
    UpperHalf,
    LowerHalf,
    BelowLower,
}

pub fn bollinger(values: &[f64], period: usize, mult: f64) -> BollingerBands {
    let middle = sma(values, period);
    let stddev = rolling_stddev(values, period);

    let mut upper = vec![f64::NAN; values.len()];
    let mut lower = vec![f64::NAN; values.len()];
    for i in 0..values.len() {
        if middle[i].is_finite() && stddev[i].is_finite() {
            upper[i] = middle[i] + mult * stddev[i];
            lower[i] = middle[i] - mult * stddev[i];
        }
    }

    BollingerBands {
        upper,
        middle,
        lower,
    }
}

/// Band width as a percentage of the middle band.
///
/// NaN when any band is undefined or the middle is not positive;
/// callers either filter (squeeze windows) or round it to 0 (snapshots).
pub fn width_percent(upper: f64, middle: f64, lower: f64) -> f64 {
    if middle.is_finite() && middle > 0.0 && upper.is_finite() && lower.is_finite() {
        (upper - lower) / middle * 100.0
    } else {
        f64::NAN
    }
}

/// True when the width at `index` sits within 10% of the tightest width
/// over the trailing 20 bars (the band has contracted to a local floor).
pub fn squeeze_on(bands: &BollingerBands, index: usize) -> bool {
    if index >= bands.middle.len() {
        return false;
    }
    let width = width_percent(bands.upper[index], bands.middle[index], bands.lower[index]);

    let start = index.saturating_sub(19);
    let mut min_width = f64::NAN;
    for j in start..=index {
        let w = width_percent(bands.upper[j], bands.middle[j], bands.lower[j]);
        if w.is_finite() && !(min_width.is_finite() && min_width <= w) {
            min_width = w;
        }
    }

    width.is_finite() && min_width.is_finite() && width <= min_width * 1.1
}

/// Price location relative to the bands. Undefined bands make every
/// comparison false, which lands in `LowerHalf`.
pub fn band_position(price: f64, upper: f64, middle: f64, lower: f64) -> BandPosition {
    if price > upper {
        BandPosition::AboveUpper
    } else if price < lower {
        BandPosition::BelowLower
    } else if price >= middle {
        BandPosition::UpperHalf
    } else {
        BandPosition::LowerHalf
    }
}

/// Price distance from the middle band in band-sigma units, where one
/// sigma is half the upper half-width. 0 when sigma is not positive.
pub fn z_score(price: f64, upper: f64, middle: f64) -> f64 {
    let sigma = (upper - middle) / 2.0;
    if sigma > 0.0 {
        (price - middle) / sigma
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn bollinger_middle_is_sma() {
        let bands = bollinger(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        assert!(bands.middle[0].is_nan());
        assert!(bands.middle[1].is_nan());
        assert_approx(bands.middle[2], 11.0, DEFAULT_EPSILON);
        assert_approx(bands.middle[3], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_symmetric() {
        let bands = bollinger(&[10.0, 11.0, 12.0, 13.0, 14.0], 3, 2.0);
        for i in 2..5 {
            let half_up = bands.upper[i] - bands.middle[i];
            let half_down = bands.middle[i] - bands.lower[i];
            assert_approx(half_up, half_down, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_width_is_four_sigma() {
        let values = [10.0, 12.0, 11.0, 13.0, 15.0, 14.0];
        let bands = bollinger(&values, 3, 2.0);
        let sd = crate::primitives::rolling_stddev(&values, 3);
        for i in 2..values.len() {
            assert_approx(bands.upper[i] - bands.lower[i], 4.0 * sd[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bands = bollinger(&[100.0, 100.0, 100.0, 100.0], 3, 2.0);
        assert_approx(bands.upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(bands.lower[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn width_percent_known_value() {
        // upper 104, middle 100, lower 96 → 8%
        assert_approx(width_percent(104.0, 100.0, 96.0), 8.0, DEFAULT_EPSILON);
    }

    #[test]
    fn width_percent_degenerate_is_nan() {
        assert!(width_percent(f64::NAN, 100.0, 96.0).is_nan());
        assert!(width_percent(104.0, 0.0, 96.0).is_nan());
        assert!(width_percent(104.0, -5.0, 96.0).is_nan());
    }

    #[test]
    fn band_position_ordering() {
        assert_eq!(band_position(105.0, 104.0, 100.0, 96.0), BandPosition::AboveUpper);
        assert_eq!(band_position(101.0, 104.0, 100.0, 96.0), BandPosition::UpperHalf);
        assert_eq!(band_position(98.0, 104.0, 100.0, 96.0), BandPosition::LowerHalf);
        assert_eq!(band_position(95.0, 104.0, 100.0, 96.0), BandPosition::BelowLower);
    }

    #[test]
    fn band_position_nan_bands_is_lower_half() {
        let nan = f64::NAN;
        assert_eq!(band_position(100.0, nan, nan, nan), BandPosition::LowerHalf);
    }

    #[test]
    fn z_score_known_value() {
        // sigma = (104-100)/2 = 2; price 103 → 1.5
        assert_approx(z_score(103.0, 104.0, 100.0), 1.5, DEFAULT_EPSILON);
    }

    #[test]
    fn z_score_degenerate_is_zero() {
        assert_eq!(z_score(103.0, 100.0, 100.0), 0.0);
        assert_eq!(z_score(103.0, f64::NAN, 100.0), 0.0);
    }

    #[test]
    fn squeeze_detects_contraction() {
        // Flat stretch first (width at its floor), then wide swings.
        let mut values = vec![105.0; 10];
        values.extend((0..10).map(|i| if i % 2 == 0 { 100.0 } else { 110.0 }));
        let bands = bollinger(&values, 5, 2.0);
        // Inside the flat stretch the width equals the trailing minimum.
        assert!(squeeze_on(&bands, 9));
        // In the noisy stretch the width towers over the flat floor.
        assert!(!squeeze_on(&bands, 15));
    }

    #[test]
    fn squeeze_false_during_warmup() {
        let values = [1.0, 2.0, 3.0];
        let bands = bollinger(&values, 20, 2.0);
        assert!(!squeeze_on(&bands, 2));
        assert!(!squeeze_on(&bands, 99));
    }
}
