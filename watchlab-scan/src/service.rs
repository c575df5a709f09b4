//! Scan service: fetch, analyze, sweep, and cache.
//!
//! The scanner owns a bar provider, one TTL cache per payload kind, and
//! the config. Full analyses run one symbol at a time; signal sweeps
//! fan out over the symbol list with rayon and skip unusable symbols
//! instead of failing the whole sweep.

use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use watchlab_core::indicators::{bollinger, rsi};
use watchlab_core::primitives::{ema, round_to, sma};
use watchlab_core::signals::{evaluate_gates, GateSeries, SignalGates, TrendLabel};
use watchlab_core::{analyze, canonicalize, AnalysisSnapshot, Bar, PriceColumns};

use crate::cache::{request_key, TtlCache};
use crate::config::ScanConfig;
use crate::provider::BarProvider;
use crate::regime::{score_market_regime, IndexMetrics, RegimeScore, VixGauge};

/// Minimum usable bars for a sweep row.
const SWEEP_MIN_HISTORY: usize = 30;

/// Bars fetched per index for the regime gauge.
const REGIME_LOOKBACK: usize = 250;

/// Minimum index history before a regime is scored.
const REGIME_MIN_HISTORY: usize = 200;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("no symbols provided")]
    NoSymbols,

    #[error("too many symbols (max {max}, got {got})")]
    TooManySymbols { max: usize, got: usize },

    #[error("insufficient history for {symbol}: {got} bars, need {need}")]
    InsufficientHistory {
        symbol: String,
        got: usize,
        need: usize,
    },

    #[error(transparent)]
    Provider(#[from] crate::provider::ProviderError),

    #[error(transparent)]
    Analysis(#[from] watchlab_core::AnalysisError),
}

/// Envelope for one full analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub scanned_at: DateTime<Utc>,
    pub result: AnalysisSnapshot,
}

/// One row of a signal sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalReport {
    pub symbol: String,
    pub price: f64,
    pub change: f64,
    pub signals: SignalGates,
    pub entry_count: usize,
    pub exit_count: usize,
    pub trend: TrendLabel,
}

/// Gate sweep over a symbol list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSweep {
    pub scanned_at: DateTime<Utc>,
    pub results: Vec<SignalReport>,
}

/// Market regime report with its scan stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeReport {
    pub scanned_at: DateTime<Utc>,
    pub vix: VixGauge,
    pub spy: IndexMetrics,
    pub qqq: IndexMetrics,
    pub overall: RegimeScore,
}

/// Trim and uppercase symbols, then deduplicate them preserving
/// first-seen order. Entries may themselves be comma-separated lists.
pub fn normalize_symbols(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for entry in raw {
        for part in entry.split(',') {
            let symbol = part.trim().to_uppercase();
            if symbol.is_empty() || !seen.insert(symbol.clone()) {
                continue;
            }
            out.push(symbol);
        }
    }
    out
}

/// Scan coordinator.
pub struct Scanner {
    provider: Box<dyn BarProvider>,
    config: ScanConfig,
    fingerprint: String,
    analysis_cache: TtlCache<AnalysisReport>,
    sweep_cache: TtlCache<SignalSweep>,
    regime_cache: TtlCache<RegimeReport>,
}

impl Scanner {
    pub fn new(provider: Box<dyn BarProvider>, config: ScanConfig) -> Self {
        let ttl = Duration::from_secs(config.cache_ttl_secs);
        let fingerprint = config.fingerprint();
        Scanner {
            provider,
            fingerprint,
            analysis_cache: TtlCache::new(ttl),
            sweep_cache: TtlCache::new(ttl),
            regime_cache: TtlCache::new(ttl),
            config,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Full indicator analysis for one symbol, answered from cache
    /// within the TTL.
    pub fn analyze_symbol(&self, symbol: &str) -> Result<AnalysisReport, ScanError> {
        let symbol = symbol.trim().to_uppercase();
        let key = request_key(&[&self.fingerprint, "analysis", &symbol]);
        if let Some(report) = self.analysis_cache.get(&key) {
            debug!(symbol = %symbol, "analysis served from cache");
            return Ok(report);
        }

        let bars = self.provider.fetch(&symbol, self.config.analysis_lookback)?;
        let usable = canonicalize(bars);
        if usable.len() < self.config.min_history {
            return Err(ScanError::InsufficientHistory {
                symbol,
                got: usable.len(),
                need: self.config.min_history,
            });
        }

        let result = analyze(&symbol, &usable)?;
        let report = AnalysisReport {
            scanned_at: Utc::now(),
            result,
        };
        self.analysis_cache.put(key, report.clone());
        Ok(report)
    }

    /// Gate sweep over a symbol list.
    ///
    /// Histories shorter than the sweep minimum are skipped with a
    /// warning instead of failing the whole sweep, as are symbols the
    /// provider cannot serve.
    pub fn scan_signals(&self, symbols: &[String]) -> Result<SignalSweep, ScanError> {
        let normalized = normalize_symbols(symbols);
        if normalized.is_empty() {
            return Err(ScanError::NoSymbols);
        }
        if normalized.len() > self.config.max_symbols {
            return Err(ScanError::TooManySymbols {
                max: self.config.max_symbols,
                got: normalized.len(),
            });
        }

        let mut sorted = normalized.clone();
        sorted.sort();
        let key = request_key(&[&self.fingerprint, "signals", &sorted.join(",")]);
        if let Some(sweep) = self.sweep_cache.get(&key) {
            debug!(symbols = normalized.len(), "sweep served from cache");
            return Ok(sweep);
        }

        let results: Vec<SignalReport> = normalized
            .par_iter()
            .filter_map(|symbol| self.sweep_symbol(symbol))
            .collect();

        let sweep = SignalSweep {
            scanned_at: Utc::now(),
            results,
        };
        self.sweep_cache.put(key, sweep.clone());
        Ok(sweep)
    }

    fn sweep_symbol(&self, symbol: &str) -> Option<SignalReport> {
        let bars = match self.provider.fetch(symbol, self.config.signal_lookback) {
            Ok(bars) => bars,
            Err(err) => {
                warn!(symbol = %symbol, error = %err, "skipping symbol, fetch failed");
                return None;
            }
        };

        let usable = canonicalize(bars);
        if usable.len() < SWEEP_MIN_HISTORY {
            warn!(
                symbol = %symbol,
                bars = usable.len(),
                "skipping symbol, not enough history for a sweep"
            );
            return None;
        }

        Some(signal_report(symbol, &usable))
    }

    /// Regime gauge over SPY, QQQ, and the VIX.
    pub fn market_regime(&self) -> Result<RegimeReport, ScanError> {
        self.market_regime_for("SPY", "QQQ", "VIX")
    }

    /// Regime gauge with explicit stand-in symbols for the two indexes
    /// and the volatility series.
    ///
    /// VIX history is optional: when the provider has no series under
    /// `vix` the gauge falls back to a flat neutral line.
    pub fn market_regime_for(
        &self,
        spy: &str,
        qqq: &str,
        vix: &str,
    ) -> Result<RegimeReport, ScanError> {
        let key = request_key(&[&self.fingerprint, "regime", spy, qqq, vix]);
        if let Some(report) = self.regime_cache.get(&key) {
            debug!("regime served from cache");
            return Ok(report);
        }

        let spy = self.index_metrics(spy)?;
        let qqq = self.index_metrics(qqq)?;

        let vix_closes: Vec<f64> = match self.provider.fetch(vix, REGIME_LOOKBACK) {
            Ok(bars) => canonicalize(bars).iter().map(|b| b.close).collect(),
            Err(err) => {
                warn!(error = %err, "no VIX history, using flat fallback");
                Vec::new()
            }
        };
        let vix_current = vix_closes.last().copied();
        let vix = VixGauge::from_series(vix_current, &vix_closes);

        let overall = score_market_regime(&vix, &spy, &qqq);
        let report = RegimeReport {
            scanned_at: Utc::now(),
            vix,
            spy,
            qqq,
            overall,
        };
        self.regime_cache.put(key, report.clone());
        Ok(report)
    }

    fn index_metrics(&self, symbol: &str) -> Result<IndexMetrics, ScanError> {
        let bars = canonicalize(self.provider.fetch(symbol, REGIME_LOOKBACK)?);
        if bars.len() < REGIME_MIN_HISTORY {
            return Err(ScanError::InsufficientHistory {
                symbol: symbol.to_string(),
                got: bars.len(),
                need: REGIME_MIN_HISTORY,
            });
        }

        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let price = closes[closes.len() - 1];
        let prev = closes[closes.len() - 2];
        let change = if prev != 0.0 {
            (price - prev) / prev * 100.0
        } else {
            0.0
        };
        Ok(IndexMetrics::from_closes(price, change, &closes))
    }
}

/// Evaluate the six gates for one canonical series.
fn signal_report(symbol: &str, bars: &[Bar]) -> SignalReport {
    let cols = PriceColumns::from_bars(bars);
    let i = cols.len() - 1;

    let ema8 = ema(&cols.closes, 8);
    let ema21 = ema(&cols.closes, 21);
    let sma50 = sma(&cols.closes, 50);
    let sma200 = sma(&cols.closes, 200);
    let volume_sma20 = sma(&cols.volumes, 20);
    let rsi14 = rsi(&cols.closes, 14);
    let bands = bollinger(&cols.closes, 20, 2.0);

    let mut gates = evaluate_gates(&GateSeries {
        opens: &cols.opens,
        closes: &cols.closes,
        volumes: &cols.volumes,
        ema8: &ema8,
        ema21: &ema21,
        sma50: &sma50,
        sma200: &sma200,
        volume_sma20: &volume_sma20,
        rsi14: &rsi14,
        bands: &bands,
    });
    gates.rsi.value = round_to(gates.rsi.value, 2);

    let price = cols.closes[i];
    let prev_close = if i >= 1 { cols.closes[i - 1] } else { price };
    let change = if prev_close != 0.0 {
        (price - prev_close) / prev_close * 100.0
    } else {
        0.0
    };

    SignalReport {
        symbol: symbol.to_string(),
        price: round_to(price, 2),
        change: round_to(change, 2),
        entry_count: gates.entry_count(),
        exit_count: gates.exit_count(),
        trend: gates.trend(),
        signals: gates,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ProviderError, SyntheticBarProvider};
    use chrono::NaiveDate;

    fn scanner() -> Scanner {
        let provider = SyntheticBarProvider::new(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap());
        Scanner::new(Box::new(provider), ScanConfig::default())
    }

    #[test]
    fn normalize_dedupes_and_uppercases() {
        let raw = vec!["aapl, msft".to_string(), "AAPL".to_string(), " ".to_string()];
        assert_eq!(normalize_symbols(&raw), vec!["AAPL", "MSFT"]);
    }

    #[test]
    fn empty_sweep_is_rejected() {
        let err = scanner().scan_signals(&[]).unwrap_err();
        assert!(matches!(err, ScanError::NoSymbols));
    }

    #[test]
    fn symbol_cap_is_enforced() {
        let symbols: Vec<String> = (0..201).map(|n| format!("SYM{n}")).collect();
        let err = scanner().scan_signals(&symbols).unwrap_err();
        assert!(matches!(
            err,
            ScanError::TooManySymbols { max: 200, got: 201 }
        ));
    }

    #[test]
    fn sweep_covers_every_symbol_in_order() {
        let sweep = scanner()
            .scan_signals(&["NVDA".into(), "AAPL".into(), "MSFT".into()])
            .unwrap();
        let names: Vec<&str> = sweep.results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(names, vec!["NVDA", "AAPL", "MSFT"]);
        for row in &sweep.results {
            assert!(row.price > 0.0);
            assert!(row.entry_count <= 6);
            assert!(row.exit_count <= 6);
        }
    }

    #[test]
    fn failed_symbols_are_skipped_not_fatal() {
        struct PickyProvider {
            inner: SyntheticBarProvider,
        }

        impl BarProvider for PickyProvider {
            fn name(&self) -> &str {
                "picky"
            }

            fn fetch(&self, symbol: &str, lookback: usize) -> Result<Vec<Bar>, ProviderError> {
                if symbol == "BAD" {
                    return Err(ProviderError::SymbolNotFound(symbol.to_string()));
                }
                self.inner.fetch(symbol, lookback)
            }
        }

        let provider = PickyProvider {
            inner: SyntheticBarProvider::new(NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()),
        };
        let scanner = Scanner::new(Box::new(provider), ScanConfig::default());
        let sweep = scanner
            .scan_signals(&["AAPL".into(), "BAD".into()])
            .unwrap();
        assert_eq!(sweep.results.len(), 1);
        assert_eq!(sweep.results[0].symbol, "AAPL");
    }

    #[test]
    fn analysis_hits_cache_second_time() {
        let scanner = scanner();
        let first = scanner.analyze_symbol("tsla").unwrap();
        let second = scanner.analyze_symbol("TSLA ").unwrap();
        // Identical scan stamp proves the cache answered.
        assert_eq!(first, second);
    }

    #[test]
    fn thin_history_is_an_analysis_error() {
        struct ThinProvider;

        impl BarProvider for ThinProvider {
            fn name(&self) -> &str {
                "thin"
            }

            fn fetch(&self, symbol: &str, _lookback: usize) -> Result<Vec<Bar>, ProviderError> {
                let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
                Ok((0..10)
                    .map(|n| Bar {
                        symbol: symbol.to_string(),
                        date: start + chrono::Duration::days(n),
                        open: 100.0,
                        high: 101.0,
                        low: 99.0,
                        close: 100.0,
                        volume: 1_000,
                    })
                    .collect())
            }
        }

        let scanner = Scanner::new(Box::new(ThinProvider), ScanConfig::default());
        let err = scanner.analyze_symbol("ACME").unwrap_err();
        assert!(matches!(
            err,
            ScanError::InsufficientHistory { got: 10, need: 60, .. }
        ));
    }

    #[test]
    fn regime_runs_offline_end_to_end() {
        let report = scanner().market_regime().unwrap();
        assert_eq!(report.overall.breakdown.len(), 7);
        assert!(report.overall.score >= -10 && report.overall.score <= 10);
        assert!(report.vix.current > 0.0);
        assert!(report.spy.price > 0.0);
        assert!(report.qqq.price > 0.0);
    }
}
