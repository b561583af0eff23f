// =============================================================================
// Price Provider — the seam between the scanner and any market-data source
// =============================================================================
//
// A provider returns a daily OHLCV table for a ticker or an explicit error.
// An empty table is never returned as `Ok`; it is reported as
// `FetchError::NoData` so callers can match on it.
// =============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{CloseSeries, PriceSeries};

/// Why a provider could not produce data for a ticker.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no price data available for {ticker}")]
    NoData { ticker: String },

    #[error("request for {ticker} failed: {source}")]
    Request {
        ticker: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("provider returned HTTP {status} for {ticker}: {message}")]
    Status {
        ticker: String,
        status: u16,
        message: String,
    },

    #[error("malformed response for {ticker}: {reason}")]
    Malformed { ticker: String, reason: String },
}

impl FetchError {
    pub fn no_data(ticker: impl Into<String>) -> Self {
        Self::NoData {
            ticker: ticker.into(),
        }
    }
}

/// Source of daily price history.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Daily OHLCV bars for `ticker` over the configured lookback.
    async fn daily_bars(&self, ticker: &str) -> Result<PriceSeries, FetchError>;

    /// Close-only projection of [`PriceProvider::daily_bars`].
    async fn daily_closes(&self, ticker: &str) -> Result<CloseSeries, FetchError> {
        let bars = self.daily_bars(ticker).await?;
        Ok(bars.to_closes())
    }
}
