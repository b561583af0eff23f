// =============================================================================
// Breakout Checklist — nine boolean conditions per equity
// =============================================================================
//
// Every condition is evaluated on the latest bar. "Prior N" windows exclude
// the latest bar; "trailing N" windows include it.
//
//   1. tasi            index close    > mean(trailing 5 index closes)
//   2. sector          sector close   > mean(trailing 5 sector closes)
//   3. obv             OBV            > mean(prior 9 OBV)
//   4. volume          volume         > 2 * mean(prior 20 volumes)
//   5. price_breakout  close          > max(prior 10 highs)
//   6. ma              close          > MA50
//   7. rsi             50 < RSI < 70
//   8. macd            MACD > signal line and MACD > 0
//   9. bollinger       close          > upper Bollinger band
//
// signal = all nine hold.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorSeries;
use crate::types::CloseSeries;

pub const MIN_EQUITY_HISTORY: usize = 200;
pub const MIN_CONTEXT_HISTORY: usize = 5;
pub const CONDITION_COUNT: usize = 9;

const MOMENTUM_WINDOW: usize = 5;
const OBV_LOOKBACK: usize = 9;
const VOLUME_LOOKBACK: usize = 20;
const VOLUME_SURGE_FACTOR: f64 = 2.0;
const BREAKOUT_LOOKBACK: usize = 10;
const RSI_LOWER: f64 = 50.0;
const RSI_UPPER: f64 = 70.0;

/// Outcome of each checklist item, keyed as the dashboard expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conditions {
    #[serde(rename = "tasi")]
    pub benchmark_momentum: bool,
    #[serde(rename = "sector")]
    pub sector_momentum: bool,
    #[serde(rename = "obv")]
    pub accumulation: bool,
    #[serde(rename = "volume")]
    pub volume_surge: bool,
    pub price_breakout: bool,
    #[serde(rename = "ma")]
    pub trend: bool,
    #[serde(rename = "rsi")]
    pub momentum_band: bool,
    #[serde(rename = "macd")]
    pub macd_confirmation: bool,
    #[serde(rename = "bollinger")]
    pub volatility_breakout: bool,
}

impl Conditions {
    pub fn as_array(&self) -> [bool; CONDITION_COUNT] {
        [
            self.benchmark_momentum,
            self.sector_momentum,
            self.accumulation,
            self.volume_surge,
            self.price_breakout,
            self.trend,
            self.momentum_band,
            self.macd_confirmation,
            self.volatility_breakout,
        ]
    }

    pub fn met(&self) -> usize {
        self.as_array().iter().filter(|&&c| c).count()
    }
}

/// Scored result for one equity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityAnalysis {
    pub name: String,
    pub symbol: String,
    pub price: f64,
    pub volume: u64,
    pub rsi: f64,
    pub met_conditions: usize,
    pub percentage: f64,
    pub signal: bool,
    pub conditions: Conditions,
}

impl EquityAnalysis {
    fn new(
        name: &str,
        symbol: &str,
        price: f64,
        volume: u64,
        rsi: f64,
        conditions: Conditions,
    ) -> Self {
        let met = conditions.met();
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            price,
            volume,
            rsi,
            met_conditions: met,
            percentage: met as f64 / CONDITION_COUNT as f64 * 100.0,
            signal: met == CONDITION_COUNT,
            conditions,
        }
    }
}

/// Score one equity against the checklist.
///
/// Returns `None` when there is not enough history: fewer than
/// [`MIN_EQUITY_HISTORY`] equity bars or fewer than [`MIN_CONTEXT_HISTORY`]
/// index / sector points.
pub fn score_equity(
    name: &str,
    symbol: &str,
    equity: &IndicatorSeries,
    index: &CloseSeries,
    sector: &CloseSeries,
) -> Option<EquityAnalysis> {
    let n = equity.bars().len();
    if n < MIN_EQUITY_HISTORY
        || index.len() < MIN_CONTEXT_HISTORY
        || sector.len() < MIN_CONTEXT_HISTORY
    {
        return None;
    }

    let (latest, ind) = equity.latest()?;

    let prior_obv: Vec<f64> = prior(equity.rows(), OBV_LOOKBACK)
        .iter()
        .map(|r| r.obv)
        .collect();

    let volumes = equity.series().volumes();
    let prior_volume = prior(&volumes, VOLUME_LOOKBACK);

    let highs = equity.series().highs();
    let prior_high = prior(&highs, BREAKOUT_LOOKBACK)
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);

    let conditions = Conditions {
        benchmark_momentum: above_trailing_mean(&index.closes()),
        sector_momentum: above_trailing_mean(&sector.closes()),
        accumulation: ind.obv > mean(&prior_obv),
        volume_surge: latest.volume as f64 > mean(prior_volume) * VOLUME_SURGE_FACTOR,
        price_breakout: latest.close > prior_high,
        trend: latest.close > ind.ma50,
        momentum_band: ind.rsi > RSI_LOWER && ind.rsi < RSI_UPPER,
        macd_confirmation: ind.macd > ind.signal_line && ind.macd > 0.0,
        volatility_breakout: ind.bb_upper.is_some_and(|upper| latest.close > upper),
    };

    Some(EquityAnalysis::new(
        name,
        symbol,
        latest.close,
        latest.volume,
        ind.rsi,
        conditions,
    ))
}

/// The `lookback` elements immediately before the last one.
fn prior<T>(values: &[T], lookback: usize) -> &[T] {
    let end = values.len().saturating_sub(1);
    &values[end.saturating_sub(lookback)..end]
}

/// Latest value strictly above the mean of the trailing window (itself
/// included).
fn above_trailing_mean(closes: &[f64]) -> bool {
    let Some(&last) = closes.last() else {
        return false;
    };
    let start = closes.len().saturating_sub(MOMENTUM_WINDOW);
    last > mean(&closes[start..])
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::indicators::compute_indicators;

    #[test]
    fn insufficient_equity_history_is_skipped() {
        let closes: Vec<f64> = (0..199).map(|i| 100.0 + i as f64).collect();
        let ind = compute_indicators(series_from(&closes, &vec![1; 199]));
        assert!(score_equity("n", "s", &ind, &rising_context(), &rising_context()).is_none());
    }

    #[test]
    fn insufficient_context_history_is_skipped() {
        let ind = compute_indicators(breakout_fixture());
        let short = close_series(&[1.0, 2.0, 3.0, 4.0]);
        assert!(score_equity("n", "s", &ind, &short, &rising_context()).is_none());
        assert!(score_equity("n", "s", &ind, &rising_context(), &short).is_none());
        assert!(score_equity("n", "s", &ind, &rising_context(), &rising_context()).is_some());
    }

    #[test]
    fn breakout_fixture_meets_all_conditions() {
        let ind = compute_indicators(breakout_fixture());
        let (_, row) = ind.latest().unwrap();
        let a = score_equity("Fixture", "0000", &ind, &rising_context(), &rising_context())
            .unwrap();
        assert_eq!(a.conditions.as_array(), [true; 9], "rsi = {}", row.rsi);
        assert_eq!(a.met_conditions, 9);
        assert!(a.signal);
        assert!((a.percentage - 100.0).abs() < 1e-12);
        assert_eq!(a.volume, 5_000);
    }

    #[test]
    fn falling_context_drops_momentum_conditions() {
        let ind = compute_indicators(breakout_fixture());
        let falling = close_series(&[105.0, 104.0, 103.0, 102.0, 101.0]);
        let a = score_equity("n", "s", &ind, &falling, &falling).unwrap();
        assert!(!a.conditions.benchmark_momentum);
        assert!(!a.conditions.sector_momentum);
        assert_eq!(a.met_conditions, 7);
        assert!(!a.signal);
        assert_eq!(a.percentage, 7.0 / 9.0 * 100.0);
    }

    #[test]
    fn steady_ramp_fails_rsi_band_and_breakouts() {
        // Strictly increasing closes: RSI pins at 100 and the close stays
        // inside its band on flat volume.
        let ind = compute_indicators(ramp(250));
        let a = score_equity("n", "s", &ind, &rising_context(), &rising_context()).unwrap();
        assert!((a.rsi - 100.0).abs() < 1e-10);
        assert!(!a.conditions.momentum_band);
        assert!(!a.conditions.volume_surge);
        assert!(!a.conditions.volatility_breakout);
        assert!(a.conditions.trend);
        assert!(a.conditions.macd_confirmation);
        assert!(a.conditions.price_breakout);
        assert!(a.conditions.accumulation);
        assert!(!a.signal);
    }

    #[test]
    fn obv_compares_against_the_nine_bars_before_latest() {
        // OBV path around the end of the series (n = 250):
        //   bar n-11: +5_000_000   just outside the window
        //   bar n-10: -1_000_000   oldest bar inside the window
        //   bars n-9 ..= n-2: 1_000
        //   bar n-1 (latest): 500
        // mean(prior 9) is about -110_222, so the latest bar is above it.
        // Widening the window to n-11, or sliding it onto the latest bar,
        // pushes the mean above 500.
        let n = 250;
        let mut closes = vec![100.0; n];
        let mut volumes = vec![1_000u64; n];
        closes[n - 11] = 101.0;
        volumes[n - 11] = 5_000_000;
        closes[n - 10] = 99.0;
        volumes[n - 10] = 6_000_000;
        volumes[n - 9] = 1_001_000;
        closes[n - 1] = 99.0;
        volumes[n - 1] = 500;

        let ind = compute_indicators(series_from(&closes, &volumes));
        let obv: Vec<f64> = ind.rows().iter().map(|r| r.obv).collect();
        assert_eq!(obv[n - 11], 5_000_000.0);
        assert_eq!(obv[n - 10], -1_000_000.0);
        assert!(obv[n - 9..n - 1].iter().all(|&v| v == 1_000.0));
        assert_eq!(obv[n - 1], 500.0);

        let a = score_equity("n", "s", &ind, &rising_context(), &rising_context()).unwrap();
        assert!(a.conditions.accumulation);

        // The same latest OBV against the neighbouring windows fails.
        assert!(obv[n - 1] <= mean(&obv[n - 11..n - 1]));
        assert!(obv[n - 1] <= mean(&obv[n - 9..n]));
    }

    #[test]
    fn volume_compares_against_the_twenty_bars_before_latest() {
        // bar n-22: 1_000_000   just outside the window
        // bar n-21: 0           oldest bar inside the window
        // bars n-20 ..= n-2: 1_000
        // bar n-1 (latest): 2_000
        // 2 * mean(prior 20) = 1_900 < 2_000. A 21-bar window, a 19-bar
        // window, or one that slides onto the latest bar all lift the
        // threshold to at least 2_000.
        let n = 250;
        let closes = vec![100.0; n];
        let mut volumes = vec![1_000u64; n];
        volumes[n - 22] = 1_000_000;
        volumes[n - 21] = 0;
        volumes[n - 1] = 2_000;

        let ind = compute_indicators(series_from(&closes, &volumes));
        let a = score_equity("n", "s", &ind, &rising_context(), &rising_context()).unwrap();
        assert!(a.conditions.volume_surge);

        let v: Vec<f64> = volumes.iter().map(|&x| x as f64).collect();
        assert!(v[n - 1] <= 2.0 * mean(&v[n - 22..n - 1]));
        assert!(v[n - 1] <= 2.0 * mean(&v[n - 20..n - 1]));
        assert!(v[n - 1] <= 2.0 * mean(&v[n - 20..n]));
    }

    #[test]
    fn latest_volume_spike_alone_is_not_its_own_baseline() {
        // A huge value placed only on the latest bar must not leak into the
        // baselines it is compared against.
        let n = 250;
        let mut volumes = vec![1_000u64; n];
        volumes[n - 1] = 1_000_000;
        let mut closes = vec![100.0; n];
        closes[n - 1] = 101.0;

        let ind = compute_indicators(series_from(&closes, &volumes));
        let a = score_equity("n", "s", &ind, &rising_context(), &rising_context()).unwrap();
        assert!(a.conditions.volume_surge);
        assert!(a.conditions.accumulation);
        assert!(a.conditions.price_breakout);
    }

    #[test]
    fn prior_excludes_latest() {
        let v = [1, 2, 3, 4, 5];
        assert_eq!(prior(&v, 2), &[3, 4]);
        assert_eq!(prior(&v, 10), &[1, 2, 3, 4]);
        assert!(prior::<i32>(&[], 3).is_empty());
    }

    #[test]
    fn percentage_and_signal_follow_met_count() {
        let mut c = Conditions::default();
        for k in 0..=CONDITION_COUNT {
            let a = EquityAnalysis::new("n", "s", 1.0, 1, 50.0, c);
            assert_eq!(a.met_conditions, k);
            assert_eq!(a.percentage, k as f64 / 9.0 * 100.0);
            assert_eq!(a.signal, k == 9);
            match k {
                0 => c.benchmark_momentum = true,
                1 => c.sector_momentum = true,
                2 => c.accumulation = true,
                3 => c.volume_surge = true,
                4 => c.price_breakout = true,
                5 => c.trend = true,
                6 => c.momentum_band = true,
                7 => c.macd_confirmation = true,
                8 => c.volatility_breakout = true,
                _ => {}
            }
        }
    }

    #[test]
    fn conditions_serialise_with_dashboard_keys() {
        let json = serde_json::to_value(Conditions::default()).unwrap();
        let obj = json.as_object().unwrap();
        for key in [
            "tasi",
            "sector",
            "obv",
            "volume",
            "price_breakout",
            "ma",
            "rsi",
            "macd",
            "bollinger",
        ] {
            assert!(obj.contains_key(key), "missing {key}");
        }
        assert_eq!(obj.len(), 9);
    }

    #[test]
    fn trailing_mean_includes_latest() {
        // mean([1,1,1,1,5]) = 1.8 < 5
        assert!(above_trailing_mean(&[9.0, 1.0, 1.0, 1.0, 1.0, 5.0]));
        // Flat: not strictly above.
        assert!(!above_trailing_mean(&[2.0; 5]));
        assert!(!above_trailing_mean(&[]));
    }
}
