//! Average True Range (ATR).
//!
//! TR[0] = high - low; TR[i] = max(high - low, |high - prev_close|,
//! |low - prev_close|). ATR seeds with the plain average of the first
//! `period` TR values at index period - 1, then applies the Wilder
//! recurrence atr = (atr_prev * (period - 1) + tr) / period.

/// True range series. Defined from index 0.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len();
    let mut tr = vec![f64::NAN; n];
    for i in 0..n {
        if i == 0 {
            tr[i] = highs[i] - lows[i];
        } else {
            let prev_close = closes[i - 1];
            tr[i] = (highs[i] - lows[i])
                .max((highs[i] - prev_close).abs())
                .max((lows[i] - prev_close).abs());
        }
    }
    tr
}

/// Wilder-smoothed ATR. All NaN when fewer than `period` bars.
pub fn atr(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Vec<f64> {
    let n = highs.len();
    let mut result = vec![f64::NAN; n];

    if period == 0 || n < period {
        return result;
    }

    let tr = true_range(highs, lows, closes);

    let seed = tr.iter().take(period).sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let mut prev = seed;
    for i in period..n {
        let val = (prev * (period as f64 - 1.0) + tr[i]) / period as f64;
        result[i] = val;
        prev = val;
    }

    result
}
