//! Bollinger squeeze breakout gate.
//!
//! Entry: band width sits within 10% of its trailing 20-bar minimum
//! while the close pushes above the upper band. Exit: close below the
//! lower band.

use serde::{Deserialize, Serialize};

use crate::indicators::{squeeze_on, BollingerBands};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SqueezeBreakoutGate {
    pub entry: bool,
    pub exit: bool,
}

pub fn evaluate(closes: &[f64], bands: &BollingerBands, i: usize) -> SqueezeBreakoutGate {
    let price = closes[i];
    SqueezeBreakoutGate {
        entry: squeeze_on(bands, i) && price > bands.upper[i],
        exit: price < bands.lower[i],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_bands(len: usize) -> BollingerBands {
        BollingerBands {
            upper: vec![101.0; len],
            middle: vec![100.0; len],
            lower: vec![99.0; len],
        }
    }

    #[test]
    fn entry_on_break_above_pinched_bands() {
        let mut closes = vec![100.0; 25];
        closes[24] = 102.0;
        let gate = evaluate(&closes, &flat_bands(25), 24);
        assert!(gate.entry);
        assert!(!gate.exit);
    }

    #[test]
    fn no_entry_inside_the_bands() {
        let closes = vec![100.0; 25];
        let gate = evaluate(&closes, &flat_bands(25), 24);
        assert!(!gate.entry);
    }

    #[test]
    fn no_entry_when_bands_expanding() {
        // Bands widen sharply at the end: the current width is far above
        // the trailing minimum, so the squeeze filter rejects the break.
        let mut bands = flat_bands(25);
        bands.upper[24] = 110.0;
        bands.lower[24] = 90.0;
        let mut closes = vec![100.0; 25];
        closes[24] = 111.0;
        let gate = evaluate(&closes, &bands, 24);
        assert!(!gate.entry);
    }

    #[test]
    fn exit_below_lower_band() {
        let mut closes = vec![100.0; 25];
        closes[24] = 98.0;
        let gate = evaluate(&closes, &flat_bands(25), 24);
        assert!(gate.exit);
    }

    #[test]
    fn warmup_bands_are_neutral() {
        let bands = BollingerBands {
            upper: vec![f64::NAN; 5],
            middle: vec![f64::NAN; 5],
            lower: vec![f64::NAN; 5],
        };
        let gate = evaluate(&[100.0; 5], &bands, 4);
        assert!(!gate.entry && !gate.exit);
    }
}
