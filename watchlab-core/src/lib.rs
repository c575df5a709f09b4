//! WatchLab Core: bar domain, indicator library, structural analyzers,
//! signal detectors, scoring.
//!
//! This crate contains the analysis engine:
//! - Domain types (bars, column views) with canonicalization
//! - Series indicators (SMA/EMA, RSI, MACD, Bollinger, ATR, ADX)
//! - Structural analyzers (Darvas box, TTM squeeze, market structure)
//! - Entry/exit gates and stabilization/bottom pattern detectors
//! - Composite scoring (Mimi blend and the overall point system)
//! - `analyze`: the full battery over one symbol's bar series

pub mod analysis;
pub mod domain;
pub mod indicators;
pub mod primitives;
pub mod score;
pub mod signals;
pub mod stops;
pub mod structure;

pub use analysis::{analyze, AnalysisError, AnalysisSnapshot};
pub use domain::{canonicalize, Bar, PriceColumns};
