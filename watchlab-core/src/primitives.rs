//! Series primitives shared by the indicator library.
//!
//! All rolling functions return a Vec aligned index-for-index with the
//! input, with NaN in every position before the first full window.
//! `out[i]` is defined only for `i >= period - 1`.

/// Simple moving average over a lookback window.
///
/// Running sum with trailing subtract; a window containing NaN yields
/// NaN at that index without poisoning later windows.
pub fn sma(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let mut sum = 0.0;
    let mut nan_in_window = false;
    for &v in values.iter().take(period) {
        if v.is_nan() {
            nan_in_window = true;
        }
        sum += v;
    }

    if !nan_in_window {
        result[period - 1] = sum / period as f64;
    }

    for i in period..n {
        let leaving = values[i - period];
        let entering = values[i];
        sum = sum - leaving + entering;

        if entering.is_nan() || leaving.is_nan() || nan_in_window {
            // Rescan the window; the running sum is tainted.
            nan_in_window = false;
            sum = 0.0;
            for &v in &values[(i + 1 - period)..=i] {
                if v.is_nan() {
                    nan_in_window = true;
                }
                sum += v;
            }
            if nan_in_window {
                continue;
            }
        }

        result[i] = sum / period as f64;
    }

    result
}

/// Exponential moving average.
///
/// Seed: SMA of the first `period` values, placed at index `period - 1`.
/// Then `ema[i] = alpha * values[i] + (1 - alpha) * ema[i-1]` with
/// `alpha = 2 / (period + 1)`. No smoothing happens before the seed.
/// NaN inputs flow through the recurrence arithmetically; callers that
/// feed partially-defined series (the MACD signal line does) zero-fill
/// first.
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let alpha = 2.0 / (period as f64 + 1.0);

    let seed = values.iter().take(period).sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let val = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = val;
        prev = val;
    }

    result
}

/// Rolling population standard deviation (divide by `period`).
pub fn rolling_stddev(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];

        let mut has_nan = false;
        let mut sum = 0.0;
        for &v in window {
            if v.is_nan() {
                has_nan = true;
                break;
            }
            sum += v;
        }
        if has_nan {
            continue;
        }

        let mean = sum / period as f64;
        let variance = window
            .iter()
            .map(|&v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        result[i] = variance.sqrt();
    }

    result
}

/// Ordinary-least-squares slope of `values` against x = 1..=n.
///
/// Returns 0.0 for an empty slice or a degenerate (zero) denominator.
pub fn linreg_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }

    let nf = n as f64;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;
    for (i, &y) in values.iter().enumerate() {
        let x = (i + 1) as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }

    let denom = nf * sum_x2 - sum_x * sum_x;
    if denom == 0.0 {
        return 0.0;
    }
    (nf * sum_xy - sum_x * sum_y) / denom
}

/// Round to `digits` decimal places. Non-finite input maps to 0.0 so
/// snapshot fields never carry NaN into serialized output.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}
