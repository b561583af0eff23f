// =============================================================================
// Analyzer — one full scan of the monitored universe
// =============================================================================
//
// Pipeline (strictly sequential, one provider request at a time):
//   1. Fetch the benchmark index. Failure aborts the whole scan.
//   2. For each monitored equity, in configured order:
//        a. fetch daily bars            (no data   => skip)
//        b. compute indicators
//        c. synthesise its sector index (no data   => skip)
//        d. score the checklist         (too short => skip)
//   3. Rank by percentage, highest first; signals are the all-nine subset.
//
// Nothing survives the call: every series is rebuilt on every scan.
// =============================================================================

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::indicators::compute_indicators;
use crate::market_data::{FetchError, PriceProvider};
use crate::runtime_config::{EquitySpec, RuntimeConfig};
use crate::sector::build_sector_index;
use crate::signals::{score_equity, EquityAnalysis};
use crate::types::CloseSeries;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("failed to fetch TASI benchmark data: {0}")]
    BenchmarkUnavailable(#[source] FetchError),
}

/// Result of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Local wall-clock time the scan finished.
    pub timestamp: String,
    /// Latest benchmark close.
    pub tasi: f64,
    /// Equities meeting all nine conditions.
    pub signals: Vec<EquityAnalysis>,
    /// Every scored equity, highest percentage first.
    pub stocks: Vec<EquityAnalysis>,
}

pub struct Analyzer {
    provider: Arc<dyn PriceProvider>,
    config: Arc<RuntimeConfig>,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn PriceProvider>, config: Arc<RuntimeConfig>) -> Self {
        Self { provider, config }
    }

    /// Scan the whole universe.
    #[instrument(skip(self), name = "analysis", fields(run_id = %Uuid::new_v4()))]
    pub async fn run(&self) -> Result<AnalysisReport, AnalyzeError> {
        let benchmark_ticker = &self.config.benchmark_symbol;
        let benchmark = self
            .provider
            .daily_closes(benchmark_ticker)
            .await
            .map_err(AnalyzeError::BenchmarkUnavailable)?;
        let tasi = benchmark.last_close().ok_or_else(|| {
            AnalyzeError::BenchmarkUnavailable(FetchError::no_data(benchmark_ticker.as_str()))
        })?;

        info!(
            tasi,
            benchmark_points = benchmark.len(),
            equities = self.config.equities.len(),
            "analysis started"
        );

        let mut results = Vec::with_capacity(self.config.equities.len());
        for equity in &self.config.equities {
            if let Some(analysis) = self.analyze_equity(equity, &benchmark).await {
                results.push(analysis);
            }
        }

        let stocks = rank(results);
        let signals: Vec<EquityAnalysis> = stocks.iter().filter(|a| a.signal).cloned().collect();

        info!(
            scored = stocks.len(),
            signals = signals.len(),
            "analysis finished"
        );

        Ok(AnalysisReport {
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            tasi,
            signals,
            stocks,
        })
    }

    async fn analyze_equity(
        &self,
        equity: &EquitySpec,
        benchmark: &CloseSeries,
    ) -> Option<EquityAnalysis> {
        let ticker = self.config.ticker_for(&equity.symbol);

        let bars = match self.provider.daily_bars(&ticker).await {
            Ok(bars) => bars,
            Err(e) => {
                warn!(symbol = %equity.symbol, error = %e, "equity skipped: no price data");
                return None;
            }
        };
        let indicators = compute_indicators(bars);

        let sector =
            match build_sector_index(self.provider.as_ref(), &self.config, &equity.sector).await {
                Ok(sector) => sector,
                Err(e) => {
                    warn!(symbol = %equity.symbol, error = %e, "equity skipped: sector unavailable");
                    return None;
                }
            };

        let Some(analysis) =
            score_equity(&equity.name, &equity.symbol, &indicators, benchmark, &sector)
        else {
            info!(
                symbol = %equity.symbol,
                bars = indicators.bars().len(),
                benchmark_points = benchmark.len(),
                sector_points = sector.len(),
                "equity skipped: insufficient history"
            );
            return None;
        };

        debug!(
            symbol = %equity.symbol,
            met = analysis.met_conditions,
            conditions = ?analysis.conditions,
            "equity scored"
        );
        Some(analysis)
    }
}

/// Order by percentage, highest first. Ties keep their input order.
pub fn rank(mut results: Vec<EquityAnalysis>) -> Vec<EquityAnalysis> {
    results.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    results
}
