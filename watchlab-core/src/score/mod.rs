//! Composite scoring.
//!
//! Two scorers sit on top of the indicator and signal layers. The Mimi
//! score blends trend, momentum and technical sub-scores into a 0-100
//! value, while the overall score is a coarser point system on the
//! [-10, 10] range. Both are pure functions of already-computed
//! indicator values and never look at raw bars.

pub mod mimi;
pub mod overall;

pub use mimi::{mimi_score, MimiInputs, MimiScore, MimiVerdict};
pub use overall::{overall_score, OverallInputs, OverallRating, OverallScore};
