//! Darvas Box: breakout channel over the trailing year of bars.
//!
//! The box forms over the bars before the evaluation bar: top and bottom
//! are the extreme high/low of the trailing min(252, n-1) window ending
//! at the previous bar, so a close can actually clear the top (or break
//! the bottom). Formation days count consecutive bars from the window
//! end whose high stays within 0.5% of the top or whose low stays within
//! 0.5% of the bottom.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DarvasStatus {
    Breakout,
    Breakdown,
    Inside,
}

#[derive(Debug, Clone)]
pub struct DarvasBox {
    pub top: f64,
    pub bottom: f64,
    pub formation_days: usize,
    pub status: DarvasStatus,
}

pub fn darvas_box(highs: &[f64], lows: &[f64], close: f64) -> DarvasBox {
    let n = highs.len();
    if n == 0 {
        return DarvasBox {
            top: f64::NAN,
            bottom: f64::NAN,
            formation_days: 1,
            status: DarvasStatus::Inside,
        };
    }

    // A single bar has no prior window; it forms its own box.
    let end = if n == 1 { 1 } else { n - 1 };
    let start = end.saturating_sub(252);

    let top = highs[start..end]
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    let bottom = lows[start..end].iter().copied().fold(f64::INFINITY, f64::min);

    let mut formation_days = 1usize;
    for i in (start..end).rev() {
        if highs[i] > top * 0.995 || lows[i] < bottom * 1.005 {
            formation_days += 1;
        } else {
            break;
        }
    }

    let status = if close > top {
        DarvasStatus::Breakout
    } else if close < bottom {
        DarvasStatus::Breakdown
    } else {
        DarvasStatus::Inside
    };

    DarvasBox {
        top,
        bottom,
        formation_days,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn box_bounds_are_prior_window_extremes() {
        let highs = [105.0, 110.0, 108.0, 109.0];
        let lows = [95.0, 99.0, 97.0, 100.0];
        let result = darvas_box(&highs, &lows, 104.0);

        assert_approx(result.top, 110.0, DEFAULT_EPSILON);
        assert_approx(result.bottom, 95.0, DEFAULT_EPSILON);
        assert_eq!(result.status, DarvasStatus::Inside);
    }

    #[test]
    fn rally_close_clears_prior_top() {
        // Each bar closes at its high; the final close beats every
        // earlier high even though it equals its own.
        let highs = [100.0, 101.0, 102.0, 103.0];
        let lows = [98.0, 99.0, 100.0, 101.0];
        let result = darvas_box(&highs, &lows, 103.0);

        assert_eq!(result.status, DarvasStatus::Breakout);
        assert_approx(result.top, 102.0, DEFAULT_EPSILON);
    }

    #[test]
    fn breakdown_when_close_below_prior_bottom() {
        let highs = [105.0, 104.0, 103.0];
        let lows = [95.0, 94.0, 93.0];
        let result = darvas_box(&highs, &lows, 93.0);

        assert_eq!(result.status, DarvasStatus::Breakdown);
        assert_approx(result.bottom, 94.0, DEFAULT_EPSILON);
    }

    #[test]
    fn formation_days_count_bars_hugging_the_box() {
        // The two bars before the evaluation bar press against the top;
        // the bar before them sits mid-box and breaks the streak.
        let highs = [100.0, 90.0, 99.8, 99.9, 100.0];
        let lows = [80.0, 85.0, 95.0, 95.0, 95.0];
        let result = darvas_box(&highs, &lows, 98.0);

        assert_eq!(result.formation_days, 3);
    }

    #[test]
    fn window_caps_at_252_bars() {
        // An early spike outside the trailing 252-bar window is ignored.
        let mut highs = vec![500.0];
        let mut lows = vec![400.0];
        for _ in 0..253 {
            highs.push(110.0);
            lows.push(90.0);
        }
        let result = darvas_box(&highs, &lows, 100.0);

        assert_approx(result.top, 110.0, DEFAULT_EPSILON);
        assert_approx(result.bottom, 90.0, DEFAULT_EPSILON);
    }

    #[test]
    fn single_bar_forms_its_own_box() {
        let result = darvas_box(&[105.0], &[95.0], 100.0);

        assert_eq!(result.status, DarvasStatus::Inside);
        assert_approx(result.top, 105.0, DEFAULT_EPSILON);
        assert_approx(result.bottom, 95.0, DEFAULT_EPSILON);
    }

    #[test]
    fn empty_series_is_neutral() {
        let result = darvas_box(&[], &[], 100.0);
        assert_eq!(result.status, DarvasStatus::Inside);
        assert!(result.top.is_nan() && result.bottom.is_nan());
    }
}
