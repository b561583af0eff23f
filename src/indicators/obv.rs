// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
//   OBV_0 = 0
//   OBV_t = OBV_{t-1} + sign(close_t - close_{t-1}) * volume_t
//
// Unchanged closes contribute nothing.

/// Cumulative signed-volume series. `closes` and `volumes` must have equal
/// length; extra elements of the longer slice are ignored.
pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> Vec<f64> {
    let n = closes.len().min(volumes.len());
    if n == 0 {
        return Vec::new();
    }

    let mut result = Vec::with_capacity(n);
    let mut obv = 0.0_f64;
    result.push(obv);

    for i in 1..n {
        let delta = closes[i] - closes[i - 1];
        if delta > 0.0 {
            obv += volumes[i];
        } else if delta < 0.0 {
            obv -= volumes[i];
        }
        result.push(obv);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obv_empty() {
        assert!(calculate_obv(&[], &[]).is_empty());
    }

    #[test]
    fn obv_first_value_is_zero() {
        assert_eq!(calculate_obv(&[10.0], &[5_000.0]), vec![0.0]);
    }

    #[test]
    fn obv_signed_accumulation() {
        let closes = [10.0, 11.0, 11.0, 9.0, 12.0];
        let volumes = [100.0, 200.0, 300.0, 400.0, 500.0];
        // 0, +200, +0, -400, +500
        assert_eq!(
            calculate_obv(&closes, &volumes),
            vec![0.0, 200.0, 200.0, -200.0, 300.0]
        );
    }
}
