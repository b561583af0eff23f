// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators the breakout
// checklist reads. Every series function returns one value per input bar and
// only looks at history up to that bar.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod obv;
pub mod rsi;
pub mod sma;

use serde::Serialize;

use crate::types::{Bar, PriceSeries};

pub const RSI_PERIOD: usize = 14;
pub const MACD_FAST: usize = 12;
pub const MACD_SLOW: usize = 26;
pub const MACD_SIGNAL: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_STD: f64 = 2.0;

/// Derived values attached to one bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub ma20: f64,
    pub ma50: f64,
    pub ma100: f64,
    pub ma200: f64,
    pub rsi: f64,
    pub macd: f64,
    pub signal_line: f64,
    pub bb_middle: f64,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
    pub obv: f64,
}

/// A price series together with its per-bar indicators.
///
/// `rows()[i]` always belongs to `bars()[i]`.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    series: PriceSeries,
    rows: Vec<IndicatorSet>,
}

impl IndicatorSeries {
    pub fn bars(&self) -> &[Bar] {
        self.series.bars()
    }

    pub fn rows(&self) -> &[IndicatorSet] {
        &self.rows
    }

    pub fn latest(&self) -> Option<(&Bar, &IndicatorSet)> {
        Some((self.series.last()?, self.rows.last()?))
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }
}

/// Compute every indicator for `series`, preserving row count and order.
pub fn compute_indicators(series: PriceSeries) -> IndicatorSeries {
    let closes = series.closes();
    let volumes = series.volumes();

    let ma20 = sma::rolling_mean(&closes, 20);
    let ma50 = sma::rolling_mean(&closes, 50);
    let ma100 = sma::rolling_mean(&closes, 100);
    let ma200 = sma::rolling_mean(&closes, 200);
    let rsi = rsi::calculate_rsi(&closes, RSI_PERIOD);
    let macd = macd::calculate_macd(&closes, MACD_FAST, MACD_SLOW, MACD_SIGNAL);
    let bands = bollinger::calculate_bollinger(&closes, BOLLINGER_PERIOD, BOLLINGER_STD);
    let obv = obv::calculate_obv(&closes, &volumes);

    let rows = (0..series.len())
        .map(|i| IndicatorSet {
            ma20: ma20[i],
            ma50: ma50[i],
            ma100: ma100[i],
            ma200: ma200[i],
            rsi: rsi[i],
            macd: macd.macd[i],
            signal_line: macd.signal[i],
            bb_middle: bands.middle[i],
            bb_upper: bands.upper[i],
            bb_lower: bands.lower[i],
            obv: obv[i],
        })
        .collect();

    IndicatorSeries { series, rows }
}
