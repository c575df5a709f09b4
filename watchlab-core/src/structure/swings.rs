//! Swing-point detection and market structure (higher-high / higher-low
//! classification).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    pub index: usize,
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SwingPoints {
    pub highs: Vec<SwingPoint>,
    pub lows: Vec<SwingPoint>,
}

/// Pivot scan. A bar is a swing high when its high is >= every high in
/// the `look_around` bars on each side (ties count), and a swing low when
/// its low is <= every neighbouring low.
pub fn detect_swings(highs: &[f64], lows: &[f64], look_around: usize) -> SwingPoints {
    let n = highs.len();
    let mut points = SwingPoints::default();

    for i in look_around..n.saturating_sub(look_around) {
        let neighbourhood_high = highs[i - look_around..i]
            .iter()
            .chain(&highs[i + 1..=i + look_around])
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        if highs[i] >= neighbourhood_high {
            points.highs.push(SwingPoint {
                index: i,
                value: highs[i],
            });
        }

        let neighbourhood_low = lows[i - look_around..i]
            .iter()
            .chain(&lows[i + 1..=i + look_around])
            .copied()
            .fold(f64::INFINITY, f64::min);
        if lows[i] <= neighbourhood_low {
            points.lows.push(SwingPoint {
                index: i,
                value: lows[i],
            });
        }
    }

    points
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureTrend {
    Uptrend,
    Downtrend,
    Sideways,
}

#[derive(Debug, Clone)]
pub struct MarketStructure {
    pub trend: StructureTrend,
    pub swing_high: f64,
    pub swing_low: f64,
    pub higher_high: bool,
    pub higher_low: bool,
    pub lower_high: bool,
    pub lower_low: bool,
}

/// Classify the trend from the last two swing highs and lows. When fewer
/// than two swings exist, the raw series extremes stand in and the
/// comparison degrades to sideways.
pub fn market_structure(highs: &[f64], lows: &[f64]) -> MarketStructure {
    let swings = detect_swings(highs, lows, 5);

    let last_high = swings
        .highs
        .last()
        .map(|p| p.value)
        .or_else(|| highs.last().copied())
        .unwrap_or(0.0);
    let prev_high = swings
        .highs
        .iter()
        .rev()
        .nth(1)
        .map(|p| p.value)
        .unwrap_or(last_high);
    let last_low = swings
        .lows
        .last()
        .map(|p| p.value)
        .or_else(|| lows.last().copied())
        .unwrap_or(0.0);
    let prev_low = swings
        .lows
        .iter()
        .rev()
        .nth(1)
        .map(|p| p.value)
        .unwrap_or(last_low);

    let higher_high = last_high > prev_high;
    let higher_low = last_low > prev_low;
    let lower_high = last_high < prev_high;
    let lower_low = last_low < prev_low;

    let trend = if higher_high && higher_low {
        StructureTrend::Uptrend
    } else if lower_high && lower_low {
        StructureTrend::Downtrend
    } else {
        StructureTrend::Sideways
    };

    MarketStructure {
        trend,
        swing_high: last_high,
        swing_low: last_low,
        higher_high,
        higher_low,
        lower_high,
        lower_low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tent-shaped segment peaking at `peak`, wide enough to register as
    // a swing with look_around = 5.
    fn tent(peak: f64) -> Vec<f64> {
        let mut seg = Vec::new();
        for i in 0..6 {
            seg.push(peak - (5 - i) as f64);
        }
        for i in 1..=5 {
            seg.push(peak - i as f64);
        }
        seg
    }

    #[test]
    fn detects_single_peak_and_trough() {
        let highs = tent(100.0);
        let lows: Vec<f64> = highs.iter().map(|h| -h).collect();
        let swings = detect_swings(&highs, &lows, 5);

        assert_eq!(swings.highs.len(), 1);
        assert_eq!(swings.highs[0].index, 5);
        assert_eq!(swings.highs[0].value, 100.0);

        assert_eq!(swings.lows.len(), 1);
        assert_eq!(swings.lows[0].value, -100.0);
    }

    #[test]
    fn edges_are_never_swings() {
        // Monotonic series: the global max sits at the edge, outside the
        // scan range.
        let highs: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let lows: Vec<f64> = highs.iter().map(|h| h - 2.0).collect();
        let swings = detect_swings(&highs, &lows, 5);

        assert!(swings.highs.is_empty());
    }

    #[test]
    fn short_series_has_no_swings() {
        let highs = vec![100.0; 8];
        let lows = vec![90.0; 8];
        let swings = detect_swings(&highs, &lows, 5);
        assert!(swings.highs.is_empty() && swings.lows.is_empty());
    }

    // Linear interpolation between pivot closes, 5 bars per leg, so each
    // pivot has a clear 5-bar neighbourhood.
    fn zigzag(pivots: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let mut closes = Vec::new();
        for pair in pivots.windows(2) {
            for t in 0..5 {
                closes.push(pair[0] + (pair[1] - pair[0]) * t as f64 / 5.0);
            }
        }
        closes.push(pivots[pivots.len() - 1]);
        let highs = closes.iter().map(|c| c + 1.0).collect();
        let lows = closes.iter().map(|c| c - 1.0).collect();
        (highs, lows)
    }

    #[test]
    fn rising_swings_classify_uptrend() {
        // Troughs 95 then 100, peaks 110 then 115.
        let (highs, lows) = zigzag(&[100.0, 95.0, 110.0, 100.0, 115.0, 110.0]);
        let result = market_structure(&highs, &lows);

        assert_eq!(result.trend, StructureTrend::Uptrend);
        assert!(result.higher_high && result.higher_low);
        assert_eq!(result.swing_high, 116.0);
        assert_eq!(result.swing_low, 99.0);
    }

    #[test]
    fn falling_swings_classify_downtrend() {
        // Peaks 115 then 110, troughs 100 then 95.
        let (highs, lows) = zigzag(&[110.0, 115.0, 100.0, 110.0, 95.0, 100.0]);
        let result = market_structure(&highs, &lows);

        assert_eq!(result.trend, StructureTrend::Downtrend);
        assert!(result.lower_high && result.lower_low);
    }

    #[test]
    fn no_swings_fall_back_to_last_bar_sideways() {
        let highs = vec![100.0; 4];
        let lows = vec![90.0; 4];
        let result = market_structure(&highs, &lows);

        assert_eq!(result.trend, StructureTrend::Sideways);
        assert_eq!(result.swing_high, 100.0);
        assert_eq!(result.swing_low, 90.0);
    }
}
