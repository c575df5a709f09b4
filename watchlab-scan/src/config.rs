//! Scanner configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {detail}")]
    Read { path: String, detail: String },

    #[error("failed to parse {path}: {detail}")]
    Parse { path: String, detail: String },
}

/// Scanner settings.
///
/// Every knob has a default, so a config file only needs the watchlist
/// it cares about.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Symbols scanned when the caller passes no explicit list.
    #[serde(default)]
    pub watchlist: Vec<String>,

    /// Directory holding `{SYMBOL}.csv` history files.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Bars fetched for a full analysis.
    #[serde(default = "default_analysis_lookback")]
    pub analysis_lookback: usize,

    /// Bars fetched for a signal sweep.
    #[serde(default = "default_signal_lookback")]
    pub signal_lookback: usize,

    /// Minimum usable bars before an analysis is attempted.
    #[serde(default = "default_min_history")]
    pub min_history: usize,

    /// Cache entry lifetime in seconds.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Upper bound on symbols per sweep.
    #[serde(default = "default_max_symbols")]
    pub max_symbols: usize,
}

fn default_analysis_lookback() -> usize {
    400
}

fn default_signal_lookback() -> usize {
    120
}

fn default_min_history() -> usize {
    60
}

fn default_cache_ttl_secs() -> u64 {
    120
}

fn default_max_symbols() -> usize {
    200
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            watchlist: Vec::new(),
            data_dir: None,
            analysis_lookback: default_analysis_lookback(),
            signal_lookback: default_signal_lookback(),
            min_history: default_min_history(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_symbols: default_max_symbols(),
        }
    }
}

impl ScanConfig {
    /// Load from a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    /// Content hash of the configuration, used to namespace cache keys.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("ScanConfig serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: ScanConfig = toml::from_str("").unwrap();
        assert_eq!(config, ScanConfig::default());
        assert_eq!(config.analysis_lookback, 400);
        assert_eq!(config.signal_lookback, 120);
        assert_eq!(config.min_history, 60);
        assert_eq!(config.cache_ttl_secs, 120);
        assert_eq!(config.max_symbols, 200);
    }

    #[test]
    fn watchlist_and_overrides_parse() {
        let config: ScanConfig = toml::from_str(
            r#"
            watchlist = ["aapl", "MSFT"]
            data_dir = "fixtures/history"
            signal_lookback = 90
            "#,
        )
        .unwrap();
        assert_eq!(config.watchlist, vec!["aapl", "MSFT"]);
        assert_eq!(
            config.data_dir.as_deref(),
            Some(Path::new("fixtures/history"))
        );
        assert_eq!(config.signal_lookback, 90);
        assert_eq!(config.analysis_lookback, 400);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = ScanConfig::default();
        let mut b = ScanConfig::default();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.signal_lookback = 200;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScanConfig::from_path("does-not-exist.toml").unwrap_err();
        assert!(err.to_string().contains("does-not-exist.toml"));
    }
}
