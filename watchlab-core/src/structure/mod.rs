//! Structural analyzers layered on the indicator library.
//!
//! Each analyzer reads whole price columns and reduces them to a small
//! summary of the latest bar: the Darvas breakout channel, the TTM
//! squeeze state, and swing-based market structure.

pub mod darvas;
pub mod squeeze;
pub mod swings;

pub use darvas::{darvas_box, DarvasBox, DarvasStatus};
pub use squeeze::{ttm_squeeze, MomentumDirection, TtmSqueeze};
pub use swings::{detect_swings, market_structure, MarketStructure, StructureTrend, SwingPoint, SwingPoints};
