//! Scan orchestration around the analysis core.
//!
//! Layers:
//! - `provider`: bar sources (CSV files, deterministic synthetic walk)
//! - `cache`: in-memory TTL cache with content-hashed keys
//! - `config`: TOML scanner settings
//! - `service`: the scanner itself: analyses, sweeps, regime reports
//! - `regime`: pure market-regime scoring over index series

pub mod cache;
pub mod config;
pub mod provider;
pub mod regime;
pub mod service;

pub use cache::{request_key, TtlCache, DEFAULT_TTL};
pub use config::{ConfigError, ScanConfig};
pub use provider::{BarProvider, CsvBarProvider, ProviderError, SyntheticBarProvider};
pub use regime::{
    score_market_regime, IndexMetrics, IndexTrend, LifelineStatus, RegimeFactor, RegimeScore,
    RegimeStance, VixGauge, VixStatus, VixTrend,
};
pub use service::{
    normalize_symbols, AnalysisReport, RegimeReport, ScanError, Scanner, SignalReport, SignalSweep,
};

#[cfg(test)]
mod tests {
    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_send_sync() {
        assert_send_sync::<crate::Scanner>();
        assert_send_sync::<crate::SignalSweep>();
        assert_send_sync::<crate::RegimeReport>();
        assert_send_sync::<crate::ScanError>();
        assert_send_sync::<crate::TtlCache<String>>();
    }
}
