// =============================================================================
// Shared price-series types used across the breakout scanner
// =============================================================================

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily OHLCV bar on a timezone-naive date index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: u64,
}

/// Time-ordered daily bars for a single ticker.
///
/// Dates are strictly increasing. Construct through [`PriceSeries::from_bars`]
/// so that ordering and de-duplication are enforced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Sort `bars` by date and drop duplicate dates (the last bar supplied for
    /// a date wins).
    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps supply order within a date, so "last wins" holds.
        bars.sort_by_key(|b| b.date);
        let mut out: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match out.last_mut() {
                Some(prev) if prev.date == bar.date => *prev = bar,
                _ => out.push(bar),
            }
        }
        Self { bars: out }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume as f64).collect()
    }

    /// Project onto the close column only.
    pub fn to_closes(&self) -> CloseSeries {
        CloseSeries {
            points: self
                .bars
                .iter()
                .map(|b| ClosePoint {
                    date: b.date,
                    close: b.close,
                })
                .collect(),
        }
    }
}

/// A single dated close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Close-only daily series, used for the benchmark and synthetic sector index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CloseSeries {
    points: Vec<ClosePoint>,
}

impl CloseSeries {
    /// Same ordering / de-duplication rules as [`PriceSeries::from_bars`].
    pub fn from_points(mut points: Vec<ClosePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        let mut out: Vec<ClosePoint> = Vec::with_capacity(points.len());
        for p in points {
            match out.last_mut() {
                Some(prev) if prev.date == p.date => *prev = p,
                _ => out.push(p),
            }
        }
        Self { points: out }
    }

    pub fn points(&self) -> &[ClosePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.points.last().map(|p| p.close)
    }
}
