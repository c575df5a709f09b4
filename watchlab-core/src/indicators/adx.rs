//! ADX: Average Directional Index (Wilder).
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Accumulate +DM, -DM, and TR with Wilder's running sums
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR)
//! 4. -DI = 100 * smoothed(-DM) / smoothed(TR)
//! 5. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 6. ADX seeds as the average of the first `period` DX values, then
//!    follows adx = (adx_prev * (period - 1) + dx) / period
//!
//! Lookback: 2 * period (period for DI smoothing, then period for ADX
//! seeding). All NaN when the series is shorter than that.

use crate::indicators::atr::true_range;

pub fn adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = highs.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < 2 * period {
        return result;
    }

    // Step 1: directional movement, defined from the second bar.
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let high_diff = highs[i] - highs[i - 1];
        let low_diff = lows[i - 1] - lows[i];

        if high_diff > low_diff && high_diff > 0.0 {
            plus_dm[i] = high_diff;
        }
        if low_diff > high_diff && low_diff > 0.0 {
            minus_dm[i] = low_diff;
        }
    }

    // Step 2: Wilder's running sums over the first `period` deltas, then
    // smoothed = smoothed - smoothed/period + current.
    let tr = true_range(highs, lows, closes);
    let smooth_tr = wilder_sum(&tr, period);
    let smooth_plus_dm = wilder_sum(&plus_dm, period);
    let smooth_minus_dm = wilder_sum(&minus_dm, period);

    // Steps 3-5: DI pair and DX, defined from index `period`.
    let mut dx = vec![f64::NAN; n];
    for i in period..n {
        let (plus_di, minus_di) = if smooth_tr[i] > 0.0 {
            (
                100.0 * smooth_plus_dm[i] / smooth_tr[i],
                100.0 * smooth_minus_dm[i] / smooth_tr[i],
            )
        } else {
            (0.0, 0.0)
        };

        let di_sum = plus_di + minus_di;
        dx[i] = if di_sum > 0.0 {
            100.0 * (plus_di - minus_di).abs() / di_sum
        } else {
            0.0
        };
    }

    // Step 6: seed ADX with the plain average of the first `period` DX
    // values, then apply the Wilder recurrence.
    let first = 2 * period - 1;
    let seed = dx[period..=first].iter().sum::<f64>() / period as f64;
    result[first] = seed;

    let mut prev = seed;
    for i in first + 1..n {
        let val = (prev * (period as f64 - 1.0) + dx[i]) / period as f64;
        result[i] = val;
        prev = val;
    }

    result
}

/// Wilder's cumulative smoothing. Output[i] is the running sum, defined
/// from index `period` (the sum of inputs 1..=period, skipping index 0
/// where directional movement has no predecessor).
fn wilder_sum(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut out = vec![f64::NAN; n];
    if n <= period {
        return out;
    }

    let mut sum = values[1..=period].iter().sum::<f64>();
    out[period] = sum;
    for i in period + 1..n {
        sum = sum - sum / period as f64 + values[i];
        out[i] = sum;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_columns() -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let data = [
            (105.0, 95.0, 102.0),
            (108.0, 100.0, 106.0),
            (107.0, 98.0, 99.0),
            (103.0, 97.0, 101.0),
            (106.0, 100.0, 105.0),
            (110.0, 103.0, 108.0),
            (112.0, 106.0, 110.0),
            (111.0, 104.0, 105.0),
            (109.0, 103.0, 107.0),
            (113.0, 105.0, 112.0),
        ];
        let highs = data.iter().map(|d| d.0).collect();
        let lows = data.iter().map(|d| d.1).collect();
        let closes = data.iter().map(|d| d.2).collect();
        (highs, lows, closes)
    }

    #[test]
    fn adx_bounds() {
        let (highs, lows, closes) = sample_columns();
        let result = adx(&highs, &lows, &closes, 3);

        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(v >= 0.0 && v <= 100.0, "ADX out of bounds at bar {i}: {v}");
            }
        }
    }

    #[test]
    fn adx_first_defined_at_double_lookback() {
        let (highs, lows, closes) = sample_columns();
        let result = adx(&highs, &lows, &closes, 3);

        assert!(result[4].is_nan());
        assert!(!result[5].is_nan());
    }

    #[test]
    fn adx_strong_trend_elevated() {
        let mut highs = Vec::new();
        let mut lows = Vec::new();
        let mut closes = Vec::new();
        for i in 0..20 {
            let base = 100.0 + i as f64 * 5.0;
            highs.push(base + 3.0);
            lows.push(base - 3.0);
            closes.push(base + 2.0);
        }
        let result = adx(&highs, &lows, &closes, 5);

        let last = result.iter().rev().find(|v| !v.is_nan());
        assert!(last.is_some());
        if let Some(&v) = last {
            assert!(v > 20.0, "ADX should be elevated in a strong trend, got {v}");
        }
    }

    #[test]
    fn adx_too_few_bars() {
        let (highs, lows, closes) = sample_columns();
        let result = adx(&highs[..5], &lows[..5], &closes[..5], 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }
}
