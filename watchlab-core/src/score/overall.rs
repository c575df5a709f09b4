//! Overall score: an integer point system independent of the Mimi
//! blend, clipped to [-10, 10].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::primitives::round_to;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverallRating {
    StrongBuy,
    ConsiderBuy,
    Neutral,
    Caution,
    Avoid,
}

impl fmt::Display for OverallRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::StrongBuy => "strong buy",
            Self::ConsiderBuy => "consider buy",
            Self::Neutral => "neutral",
            Self::Caution => "caution",
            Self::Avoid => "avoid",
        };
        f.write_str(label)
    }
}

pub struct OverallInputs {
    pub price: f64,
    pub sma200: f64,
    pub sma50: f64,
    pub golden_cross: bool,
    pub macd_line: f64,
    pub macd_golden_cross: bool,
    pub rsi_value: f64,
    pub stop_signal_count: usize,
    pub bottom_signal_count: usize,
    pub entry_count: usize,
    pub exit_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    pub score: f64,
    pub rating: OverallRating,
    pub reasons: Vec<String>,
}

pub fn overall_score(input: &OverallInputs) -> OverallScore {
    let mut points = 0.0f64;
    let mut reasons = Vec::new();

    if input.sma200.is_finite() && input.price > input.sma200 {
        points += 2.0;
        reasons.push("above the 200-day MA (+2)".to_string());
    }
    if input.sma50.is_finite() && input.price > input.sma50 {
        points += 1.0;
        reasons.push("above the 50-day MA (+1)".to_string());
    }
    if input.golden_cross {
        points += 1.0;
        reasons.push("SMA50/SMA200 golden cross (+1)".to_string());
    }
    if input.macd_line > 0.0 {
        points += 1.0;
        reasons.push("MACD above zero (+1)".to_string());
    }
    if input.macd_golden_cross {
        points += 1.0;
        reasons.push("MACD golden cross (+1)".to_string());
    }
    if input.rsi_value.is_finite() && input.rsi_value < 30.0 {
        points += 1.0;
        reasons.push("RSI oversold (+1)".to_string());
    } else if input.rsi_value.is_finite() && input.rsi_value > 70.0 {
        points -= 1.0;
        reasons.push("RSI overheated (-1)".to_string());
    }

    let stop_points = if input.stop_signal_count >= 4 {
        2.0
    } else if input.stop_signal_count >= 2 {
        1.0
    } else {
        0.0
    };
    if stop_points > 0.0 {
        points += stop_points;
        reasons.push(format!(
            "stop-falling signals x{} (+{})",
            input.stop_signal_count, stop_points
        ));
    }

    if input.bottom_signal_count > 0 {
        points += input.bottom_signal_count as f64;
        reasons.push(format!(
            "bottom signals x{} (+{})",
            input.bottom_signal_count, input.bottom_signal_count
        ));
    }

    if input.entry_count > 0 {
        points += 0.5 * input.entry_count as f64;
        reasons.push(format!(
            "entry signals x{} (+{:.1})",
            input.entry_count,
            0.5 * input.entry_count as f64
        ));
    }
    if input.exit_count > 0 {
        points -= 0.5 * input.exit_count as f64;
        reasons.push(format!(
            "exit signals x{} (-{:.1})",
            input.exit_count,
            0.5 * input.exit_count as f64
        ));
    }

    let clipped = points.clamp(-10.0, 10.0);
    let rating = if clipped >= 6.0 {
        OverallRating::StrongBuy
    } else if clipped >= 3.0 {
        OverallRating::ConsiderBuy
    } else if clipped >= 0.0 {
        OverallRating::Neutral
    } else if clipped >= -3.0 {
        OverallRating::Caution
    } else {
        OverallRating::Avoid
    };

    OverallScore {
        score: round_to(clipped, 1),
        rating,
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_inputs() -> OverallInputs {
        OverallInputs {
            price: 100.0,
            sma200: f64::NAN,
            sma50: f64::NAN,
            golden_cross: false,
            macd_line: f64::NAN,
            macd_golden_cross: false,
            rsi_value: f64::NAN,
            stop_signal_count: 0,
            bottom_signal_count: 0,
            entry_count: 0,
            exit_count: 0,
        }
    }

    #[test]
    fn quiet_board_is_neutral() {
        let score = overall_score(&quiet_inputs());
        assert_eq!(score.score, 0.0);
        assert_eq!(score.rating, OverallRating::Neutral);
        assert!(score.reasons.is_empty());
    }

    #[test]
    fn strong_bull_board_tops_out() {
        let score = overall_score(&OverallInputs {
            price: 200.0,
            sma200: 150.0,
            sma50: 180.0,
            golden_cross: true,
            macd_line: 1.5,
            macd_golden_cross: true,
            rsi_value: 85.0,
            stop_signal_count: 2,
            bottom_signal_count: 1,
            entry_count: 0,
            exit_count: 1,
        });

        // 2 + 1 + 1 + 1 + 1 - 1 + 1 + 1 - 0.5
        assert_eq!(score.score, 6.5);
        assert_eq!(score.rating, OverallRating::StrongBuy);
        assert!(score
            .reasons
            .contains(&"RSI overheated (-1)".to_string()));
        assert!(score
            .reasons
            .contains(&"exit signals x1 (-0.5)".to_string()));
    }

    #[test]
    fn heavy_exits_fall_to_avoid() {
        let mut inputs = quiet_inputs();
        inputs.rsi_value = 75.0;
        inputs.exit_count = 6;
        let score = overall_score(&inputs);

        assert_eq!(score.score, -4.0);
        assert_eq!(score.rating, OverallRating::Avoid);
    }

    #[test]
    fn caution_band_holds_at_minus_three() {
        let mut inputs = quiet_inputs();
        inputs.exit_count = 6;
        let score = overall_score(&inputs);

        assert_eq!(score.score, -3.0);
        assert_eq!(score.rating, OverallRating::Caution);
    }

    #[test]
    fn score_clips_at_ten() {
        let score = overall_score(&OverallInputs {
            price: 200.0,
            sma200: 150.0,
            sma50: 180.0,
            golden_cross: true,
            macd_line: 1.5,
            macd_golden_cross: true,
            rsi_value: 25.0,
            stop_signal_count: 4,
            bottom_signal_count: 3,
            entry_count: 6,
            exit_count: 0,
        });

        // 2+1+1+1+1+1+2+3+3 = 15 before the clip.
        assert_eq!(score.score, 10.0);
        assert_eq!(score.rating, OverallRating::StrongBuy);
    }
}
