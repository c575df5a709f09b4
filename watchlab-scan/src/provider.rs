//! Bar providers: where the scanner gets its price history.
//!
//! A provider fetches and types raw bars; canonical ordering and sanity
//! filtering stay with the core. Both built-in providers work offline:
//! CSV files on disk, and a deterministic synthetic walk for demos and
//! tests.

use std::path::PathBuf;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

use watchlab_core::Bar;

/// Errors a provider can surface to the scan service.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no data for symbol: {0}")]
    SymbolNotFound(String),

    #[error("malformed history for {symbol}: {detail}")]
    Malformed { symbol: String, detail: String },

    #[error("I/O failure for {symbol}: {detail}")]
    Io { symbol: String, detail: String },
}

/// Source of daily bars for one symbol.
pub trait BarProvider: Send + Sync {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Fetch up to `lookback` daily bars for `symbol`, oldest first.
    fn fetch(&self, symbol: &str, lookback: usize) -> Result<Vec<Bar>, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Reads `{data_dir}/{SYMBOL}.csv` files with a
/// `date,open,high,low,close,volume` header.
#[derive(Debug, Clone)]
pub struct CsvBarProvider {
    data_dir: PathBuf,
}

impl CsvBarProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        CsvBarProvider {
            data_dir: data_dir.into(),
        }
    }
}

impl BarProvider for CsvBarProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, symbol: &str, lookback: usize) -> Result<Vec<Bar>, ProviderError> {
        let path = self.data_dir.join(format!("{symbol}.csv"));
        if !path.exists() {
            return Err(ProviderError::SymbolNotFound(symbol.to_string()));
        }

        let mut reader = csv::Reader::from_path(&path).map_err(|e| ProviderError::Io {
            symbol: symbol.to_string(),
            detail: e.to_string(),
        })?;

        let mut bars = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| ProviderError::Malformed {
                symbol: symbol.to_string(),
                detail: e.to_string(),
            })?;
            bars.push(Bar {
                symbol: symbol.to_string(),
                date: row.date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }
        Ok(bars)
    }
}

/// Deterministic per-symbol random walk for offline runs.
///
/// The RNG seed is a blake3 hash of the symbol, so the same symbol
/// always yields the same history. Weekends are skipped to mimic a
/// daily equity calendar.
#[derive(Debug, Clone)]
pub struct SyntheticBarProvider {
    end: NaiveDate,
}

impl SyntheticBarProvider {
    /// Walk ends on `end`; bars are generated backwards from there.
    pub fn new(end: NaiveDate) -> Self {
        SyntheticBarProvider { end }
    }
}

impl Default for SyntheticBarProvider {
    fn default() -> Self {
        SyntheticBarProvider {
            end: chrono::Utc::now().date_naive(),
        }
    }
}

impl BarProvider for SyntheticBarProvider {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, symbol: &str, lookback: usize) -> Result<Vec<Bar>, ProviderError> {
        let seed: [u8; 32] = *blake3::hash(symbol.as_bytes()).as_bytes();
        let mut rng = StdRng::from_seed(seed);

        // Enough calendar days to cover `lookback` weekdays.
        let span = (lookback as i64) * 7 / 5 + 7;
        let start = self.end - Duration::days(span);

        let mut bars = Vec::new();
        let mut price = 100.0_f64;
        let mut current = start;

        while current <= self.end {
            let weekday = current.weekday();
            if weekday == Weekday::Sat || weekday == Weekday::Sun {
                current += Duration::days(1);
                continue;
            }

            let daily_return: f64 = rng.gen_range(-0.03..0.03);
            let open = price;
            let close = price * (1.0 + daily_return);
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(500_000..5_000_000u64);

            bars.push(Bar {
                symbol: symbol.to_string(),
                date: current,
                open,
                high,
                low,
                close,
                volume,
            });

            price = close;
            current += Duration::days(1);
        }

        if bars.len() > lookback {
            bars.drain(..bars.len() - lookback);
        }
        Ok(bars)
    }
}
