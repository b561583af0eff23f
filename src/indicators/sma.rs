// =============================================================================
// Rolling Simple Moving Average / Rolling Standard Deviation
// =============================================================================
//
// Both functions use a "minimum periods = 1" convention: the output has one
// value per input element, and while fewer than `window` observations exist
// the statistic is taken over everything seen so far.
//
//   SMA_t = mean(x[max(0, t-window+1) ..= t])
//   STD_t = sample std-dev (n - 1 denominator) over the same slice
// =============================================================================

/// Rolling mean over a trailing `window`, one output per input.
///
/// Returns an empty `Vec` when `window == 0`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    if window == 0 {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(values.len());
    let mut sum = 0.0_f64;

    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        let n = (i + 1).min(window);
        result.push(sum / n as f64);
    }

    result
}

/// Rolling sample standard deviation over a trailing `window`.
///
/// The statistic is undefined for a single observation, so the element is
/// `None` until at least two observations are available.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return Vec::new();
    }

    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            let n = slice.len();
            if n < 2 {
                return None;
            }
            let mean = slice.iter().sum::<f64>() / n as f64;
            let var = slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            Some(var.sqrt())
        })
        .collect()
}
