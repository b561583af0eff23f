// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), where σ is the rolling sample standard
// deviation of the closes over the same window.
//
// A close above the upper band is read as a volatility breakout.

use super::sma::{rolling_mean, rolling_std};

/// Band series aligned one-to-one with the input closes.
///
/// `upper` / `lower` are `None` where σ is undefined (fewer than two points).
#[derive(Debug, Clone, Default)]
pub struct BollingerBands {
    pub middle: Vec<f64>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands over a trailing `period` with `num_std` width.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> BollingerBands {
    let middle = rolling_mean(closes, period);
    let std = rolling_std(closes, period);

    let upper = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| s.map(|s| m + num_std * s))
        .collect();
    let lower = middle
        .iter()
        .zip(std.iter())
        .map(|(m, s)| s.map(|s| m - num_std * s))
        .collect();

    BollingerBands {
        middle,
        upper,
        lower,
    }
}
