//! RSI extremes gate. Entry below 30, exit above 70.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiGate {
    pub value: f64,
    pub entry: bool,
    pub exit: bool,
}

impl Default for RsiGate {
    fn default() -> Self {
        Self {
            value: f64::NAN,
            entry: false,
            exit: false,
        }
    }
}

pub fn evaluate(rsi14: &[f64], i: usize) -> RsiGate {
    let value = rsi14[i];
    RsiGate {
        value,
        entry: value.is_finite() && value < 30.0,
        exit: value.is_finite() && value > 70.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oversold_enters() {
        let gate = evaluate(&[25.0], 0);
        assert!(gate.entry && !gate.exit);
    }

    #[test]
    fn overbought_exits() {
        let gate = evaluate(&[75.0], 0);
        assert!(gate.exit && !gate.entry);
    }

    #[test]
    fn middle_is_neutral() {
        let gate = evaluate(&[50.0], 0);
        assert!(!gate.entry && !gate.exit);
    }

    #[test]
    fn nan_is_neutral() {
        let gate = evaluate(&[f64::NAN], 0);
        assert!(!gate.entry && !gate.exit);
    }
}
