// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes.
//
// Step 1 — Daily change d_t = close_t - close_{t-1}; the first change is 0.
// Step 2 — gain_t = max(d_t, 0), loss_t = max(-d_t, 0).
// Step 3 — avg_gain / avg_loss = trailing `period` rolling means of gain / loss
//          (minimum periods = 1, see `sma::rolling_mean`).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// When avg_loss is zero RS is infinite and RSI is pinned to its limit, 100.
// =============================================================================

use super::sma::rolling_mean;

/// Compute the RSI series for `closes`. One output per input.
///
/// # Edge cases
/// - `period == 0` => empty vec
/// - zero average loss over the window => 100.0 (also for a flat window)
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    if period == 0 || closes.is_empty() {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);
    for w in closes.windows(2) {
        let delta = w[1] - w[0];
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(avg_loss.iter())
        .map(|(&g, &l)| rsi_from_averages(g, l))
        .collect()
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
