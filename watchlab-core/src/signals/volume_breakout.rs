//! Volume breakout gate.
//!
//! Entry: day change above 2% on at least double the 20-bar average
//! volume, with price above SMA50. Exit: day change below -2% on at
//! least 1.5x the average volume.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeBreakoutGate {
    pub entry: bool,
    pub exit: bool,
}

pub fn evaluate(
    closes: &[f64],
    volumes: &[f64],
    volume_sma20: &[f64],
    sma50: &[f64],
    i: usize,
) -> VolumeBreakoutGate {
    let price = closes[i];
    let prev_close = if i >= 1 { closes[i - 1] } else { price };
    let change = if prev_close != 0.0 {
        (price - prev_close) / prev_close * 100.0
    } else {
        0.0
    };

    let entry = change > 2.0
        && volume_sma20[i].is_finite()
        && volumes[i] > volume_sma20[i] * 2.0
        && sma50[i].is_finite()
        && price > sma50[i];

    let exit = change < -2.0 && volume_sma20[i].is_finite() && volumes[i] > volume_sma20[i] * 1.5;

    VolumeBreakoutGate { entry, exit }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_on_heavy_volume_surge() {
        let gate = evaluate(
            &[100.0, 103.0],
            &[1000.0, 2500.0],
            &[f64::NAN, 1000.0],
            &[f64::NAN, 99.0],
            1,
        );
        assert!(gate.entry);
        assert!(!gate.exit);
    }

    #[test]
    fn no_entry_below_sma50() {
        let gate = evaluate(
            &[100.0, 103.0],
            &[1000.0, 2500.0],
            &[f64::NAN, 1000.0],
            &[f64::NAN, 105.0],
            1,
        );
        assert!(!gate.entry);
    }

    #[test]
    fn no_entry_on_light_volume() {
        let gate = evaluate(
            &[100.0, 103.0],
            &[1000.0, 1500.0],
            &[f64::NAN, 1000.0],
            &[f64::NAN, 99.0],
            1,
        );
        assert!(!gate.entry);
    }

    #[test]
    fn exit_on_heavy_selloff() {
        let gate = evaluate(
            &[100.0, 97.0],
            &[1000.0, 1600.0],
            &[f64::NAN, 1000.0],
            &[f64::NAN, 99.0],
            1,
        );
        assert!(gate.exit);
        assert!(!gate.entry);
    }

    #[test]
    fn unavailable_average_volume_is_neutral() {
        let gate = evaluate(
            &[100.0, 103.0],
            &[1000.0, 2500.0],
            &[f64::NAN, f64::NAN],
            &[f64::NAN, 99.0],
            1,
        );
        assert!(!gate.entry && !gate.exit);
    }
}
