//! Column views over a bar series.

use crate::domain::Bar;

/// Per-column extraction of a bar series, computed once per analysis.
///
/// Index i in every column refers to the same bar as `bars[i]`. Volumes
/// are carried as f64 so they can flow through the same series math as
/// prices.
#[derive(Debug, Clone, Default)]
pub struct PriceColumns {
    pub opens: Vec<f64>,
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl PriceColumns {
    pub fn from_bars(bars: &[Bar]) -> Self {
        let mut cols = PriceColumns {
            opens: Vec::with_capacity(bars.len()),
            highs: Vec::with_capacity(bars.len()),
            lows: Vec::with_capacity(bars.len()),
            closes: Vec::with_capacity(bars.len()),
            volumes: Vec::with_capacity(bars.len()),
        };
        for bar in bars {
            cols.opens.push(bar.open);
            cols.highs.push(bar.high);
            cols.lows.push(bar.low);
            cols.closes.push(bar.close);
            cols.volumes.push(bar.volume as f64);
        }
        cols
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}
