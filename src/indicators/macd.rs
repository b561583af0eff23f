// =============================================================================
// MACD — Moving Average Convergence Divergence
// =============================================================================
//
//   MACD   = EMA(close, fast) - EMA(close, slow)
//   Signal = EMA(MACD, signal)
//
// Standard parameters are 12 / 26 / 9.

use super::ema::calculate_ema;

/// MACD line and its signal line, aligned one-to-one with the input closes.
#[derive(Debug, Clone, Default)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

/// Calculate MACD and the signal line.
///
/// Returns empty series when the input is empty or any span is zero.
pub fn calculate_macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    if ema_fast.is_empty() || ema_slow.is_empty() || signal == 0 {
        return MacdSeries::default();
    }

    let macd: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal = calculate_ema(&macd, signal);

    MacdSeries { macd, signal }
}
