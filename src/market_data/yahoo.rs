// =============================================================================
// Yahoo Finance chart client — daily OHLCV over the public v8 chart API
// =============================================================================
//
// GET {base}/v8/finance/chart/{ticker}?range=1y&interval=1d
//
// The payload is column-oriented: one `timestamp` array plus parallel
// open/high/low/close/volume arrays, any element of which may be null.
// Bars are re-indexed on the exchange-local calendar date (timestamp shifted
// by `meta.gmtoffset`) and auto-adjusted with `adjclose` when present.
// =============================================================================

use anyhow::Context;
use async_trait::async_trait;
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, instrument, warn};

use crate::market_data::provider::{FetchError, PriceProvider};
use crate::market_data::throttle::FetchThrottle;
use crate::runtime_config::RuntimeConfig;
use crate::types::{Bar, PriceSeries};

const CLIENT_USER_AGENT: &str = "Mozilla/5.0 (compatible; tasi-breakout/1.0)";

/// Longest provider error body echoed into a `FetchError::Status`.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug)]
pub struct YahooChartClient {
    base_url: String,
    range: String,
    client: reqwest::Client,
    throttle: FetchThrottle,
}

impl YahooChartClient {
    pub fn new(config: &RuntimeConfig) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(config.http_timeout)
            .build()
            .context("failed to build HTTP client for chart provider")?;

        debug!(base_url = %config.provider_base_url, "YahooChartClient initialised");

        Ok(Self {
            base_url: config.provider_base_url.clone(),
            range: config.lookback_range.clone(),
            client,
            throttle: FetchThrottle::new(config.fetch_delay),
        })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}?range={}&interval=1d&events=div%2Csplit",
            self.base_url,
            ticker.replace('^', "%5E"),
            self.range
        )
    }
}

#[async_trait]
impl PriceProvider for YahooChartClient {
    #[instrument(skip(self), name = "yahoo::daily_bars")]
    async fn daily_bars(&self, ticker: &str) -> Result<PriceSeries, FetchError> {
        self.throttle.wait().await;

        let url = self.chart_url(ticker);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                ticker: ticker.to_string(),
                source,
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|source| FetchError::Request {
            ticker: ticker.to_string(),
            source,
        })?;

        let series = parse_chart(ticker, status.as_u16(), &body)?;
        debug!(ticker, bars = series.len(), "chart fetched");
        Ok(series)
    }
}

// =============================================================================
// Payload
// =============================================================================

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteColumns>,
    #[serde(default)]
    adjclose: Vec<AdjCloseColumn>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteColumns {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjCloseColumn {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

/// Turn a chart response into a [`PriceSeries`].
fn parse_chart(ticker: &str, status: u16, body: &str) -> Result<PriceSeries, FetchError> {
    let success = (200..300).contains(&status);

    let envelope: ChartEnvelope = match serde_json::from_str(body) {
        Ok(env) => env,
        Err(e) if success => {
            return Err(FetchError::Malformed {
                ticker: ticker.to_string(),
                reason: e.to_string(),
            })
        }
        Err(_) => {
            return Err(FetchError::Status {
                ticker: ticker.to_string(),
                status,
                message: body.chars().take(MAX_ERROR_BODY).collect(),
            })
        }
    };

    if let Some(err) = envelope.chart.error {
        return Err(FetchError::Status {
            ticker: ticker.to_string(),
            status,
            message: format!("{}: {}", err.code, err.description),
        });
    }
    if !success {
        return Err(FetchError::Status {
            ticker: ticker.to_string(),
            status,
            message: "request rejected".to_string(),
        });
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| FetchError::no_data(ticker))?;

    let series = PriceSeries::from_bars(build_bars(ticker, &result));
    if series.is_empty() {
        return Err(FetchError::no_data(ticker));
    }
    Ok(series)
}

fn build_bars(ticker: &str, result: &ChartResult) -> Vec<Bar> {
    let Some(quote) = result.indicators.quote.first() else {
        return Vec::new();
    };
    let adjclose = result.indicators.adjclose.first().map(|c| &c.adjclose);
    let at = |col: &Vec<Option<f64>>, i: usize| col.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    let mut skipped = 0usize;

    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            skipped += 1;
            continue;
        };
        let Some(local) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            skipped += 1;
            continue;
        };

        let ratio = match adjclose.and_then(|col| at(col, i)) {
            Some(adj) if close != 0.0 => adj / close,
            _ => 1.0,
        };
        let volume = at(&quote.volume, i).unwrap_or(0.0).max(0.0).round() as u64;

        bars.push(Bar {
            date: local.date_naive(),
            open: open * ratio,
            high: high * ratio,
            low: low * ratio,
            close: close * ratio,
            volume,
        });
    }

    if skipped > 0 {
        warn!(ticker, skipped, "dropped incomplete chart rows");
    }
    bars
}
