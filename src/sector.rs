// =============================================================================
// Sector Index Synthesizer
// =============================================================================
//
// A sector's strength is proxied by a weighted average of its leading stocks'
// closes:
//
//   1. Fetch each leader's closes in basket order; leaders with no data are
//      skipped.
//   2. Renormalise the surviving weights so they sum to 1.
//   3. Inner-join the surviving series on date and take the weighted sum.
//
// The resulting index lives only for the analysis request that built it.
// =============================================================================

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, warn};

use crate::market_data::PriceProvider;
use crate::runtime_config::RuntimeConfig;
use crate::types::{ClosePoint, CloseSeries};

#[derive(Debug, Error, PartialEq)]
pub enum SectorError {
    #[error("sector '{0}' has no configured basket")]
    UnknownSector(String),

    #[error("no leading stock of sector '{0}' returned data")]
    NoLeaderData(String),

    #[error("leading stocks of sector '{0}' share no trading dates")]
    NoCommonDates(String),
}

/// Scale `weights` so they sum to 1. Returns an empty vec when the total is
/// not positive.
pub fn renormalize(weights: &[f64]) -> Vec<f64> {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return Vec::new();
    }
    weights.iter().map(|w| w / total).collect()
}

/// Weighted sum of `components` over the dates present in every component.
///
/// Weights are renormalised first, so callers may pass the raw basket
/// weights of whichever leaders survived.
pub fn combine(components: &[(CloseSeries, f64)]) -> CloseSeries {
    if components.is_empty() {
        return CloseSeries::default();
    }
    let raw: Vec<f64> = components.iter().map(|(_, w)| *w).collect();
    let weights = renormalize(&raw);
    if weights.is_empty() {
        return CloseSeries::default();
    }

    let mut acc: BTreeMap<chrono::NaiveDate, (f64, usize)> = BTreeMap::new();
    for ((series, _), weight) in components.iter().zip(weights.iter()) {
        for p in series.points() {
            let slot = acc.entry(p.date).or_insert((0.0, 0));
            slot.0 += p.close * weight;
            slot.1 += 1;
        }
    }

    let points = acc
        .into_iter()
        .filter(|(_, (value, seen))| *seen == components.len() && value.is_finite())
        .map(|(date, (close, _))| ClosePoint { date, close })
        .collect();

    CloseSeries::from_points(points)
}

/// Build the synthetic index for `sector` by fetching its leading stocks one
/// at a time.
pub async fn build_sector_index(
    provider: &dyn PriceProvider,
    config: &RuntimeConfig,
    sector: &str,
) -> Result<CloseSeries, SectorError> {
    let basket = config
        .sector(sector)
        .ok_or_else(|| SectorError::UnknownSector(sector.to_string()))?;

    let mut components = Vec::with_capacity(basket.leaders.len());
    for leader in &basket.leaders {
        let ticker = config.ticker_for(&leader.symbol);
        match provider.daily_closes(&ticker).await {
            Ok(closes) => components.push((closes, leader.weight)),
            Err(e) => warn!(sector, ticker = %ticker, error = %e, "leading stock skipped"),
        }
    }

    if components.is_empty() {
        return Err(SectorError::NoLeaderData(sector.to_string()));
    }

    let index = combine(&components);
    if index.is_empty() {
        return Err(SectorError::NoCommonDates(sector.to_string()));
    }

    debug!(
        sector,
        leaders = components.len(),
        points = index.len(),
        "sector index built"
    );
    Ok(index)
}
