// =============================================================================
// Runtime Configuration — immutable scanner settings built once at startup
// =============================================================================
//
// The monitored-equity list and the sector baskets are compiled in. Only
// process-level knobs (port, provider endpoint, request pacing) come from the
// environment. After `validate()` the config is shared read-only as
// `Arc<RuntimeConfig>`.
//
// =============================================================================

use std::time::Duration;

use anyhow::{ensure, Context, Result};
use tracing::info;

// =============================================================================
// Default-value helpers
// =============================================================================

const DEFAULT_PORT: u16 = 10_000;
const DEFAULT_PROVIDER_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_FETCH_DELAY_MS: u64 = 200;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const MAX_FETCH_DELAY: Duration = Duration::from_secs(60);

fn default_benchmark_symbol() -> String {
    "^TASI.SR".to_string()
}

fn default_exchange_suffix() -> String {
    ".SR".to_string()
}

fn default_lookback_range() -> String {
    "1y".to_string()
}

fn default_equities() -> Vec<EquitySpec> {
    [
        ("نسيج", "1213", "المواد الأساسية"),
        ("أيان للاستثمار", "2140", "البنوك والخدمات المالية"),
        ("الكابلات السعودية", "2110", "الصناعة"),
        ("ريدان الغذائية", "6012", "السلع الاستهلاكية الكمالية"),
        ("صدر للخدمات اللوجستية", "1832", "الصناعة"),
    ]
    .into_iter()
    .map(|(name, symbol, sector)| EquitySpec {
        name: name.to_string(),
        symbol: symbol.to_string(),
        sector: sector.to_string(),
    })
    .collect()
}

fn default_sectors() -> Vec<SectorBasket> {
    let basket = |name: &str, leaders: &[(&str, f64)]| SectorBasket {
        name: name.to_string(),
        leaders: leaders
            .iter()
            .map(|&(symbol, weight)| LeaderWeight {
                symbol: symbol.to_string(),
                weight,
            })
            .collect(),
    };

    vec![
        basket(
            "المواد الأساسية",
            &[("2010", 0.40), ("1211", 0.30), ("2060", 0.20), ("2001", 0.10)],
        ),
        basket(
            "البنوك والخدمات المالية",
            &[
                ("1120", 0.30),
                ("1180", 0.25),
                ("1060", 0.20),
                ("1050", 0.15),
                ("1150", 0.10),
            ],
        ),
        basket(
            "الصناعة",
            &[("2040", 0.30), ("2240", 0.25), ("2250", 0.25), ("2290", 0.20)],
        ),
        basket(
            "السلع الاستهلاكية الكمالية",
            &[("4190", 0.30), ("4003", 0.30), ("4008", 0.25), ("1810", 0.15)],
        ),
    ]
}

// =============================================================================
// Universe tables
// =============================================================================

/// One monitored equity.
#[derive(Debug, Clone, PartialEq)]
pub struct EquitySpec {
    /// Display name.
    pub name: String,
    /// Exchange code, e.g. "1213".
    pub symbol: String,
    /// Sector name; must match a [`SectorBasket::name`].
    pub sector: String,
}

/// A leading stock and its static weight inside a sector basket.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderWeight {
    pub symbol: String,
    pub weight: f64,
}

/// Fixed basket of leading stocks used to synthesise a sector index.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorBasket {
    pub name: String,
    pub leaders: Vec<LeaderWeight>,
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    // --- Process ------------------------------------------------------------

    /// Listening port (`PORT`).
    pub port: u16,

    // --- Provider -----------------------------------------------------------

    /// Chart API base URL (`BREAKOUT_PROVIDER_URL`).
    pub provider_base_url: String,

    /// Minimum spacing between provider requests (`BREAKOUT_FETCH_DELAY_MS`).
    pub fetch_delay: Duration,

    /// Per-request timeout (`BREAKOUT_HTTP_TIMEOUT_SECS`).
    pub http_timeout: Duration,

    /// History window requested from the provider.
    pub lookback_range: String,

    // --- Universe -----------------------------------------------------------

    /// Benchmark index ticker, already in provider form.
    pub benchmark_symbol: String,

    /// Suffix appended to exchange codes to form provider tickers.
    pub exchange_suffix: String,

    pub equities: Vec<EquitySpec>,
    pub sectors: Vec<SectorBasket>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            provider_base_url: DEFAULT_PROVIDER_URL.to_string(),
            fetch_delay: Duration::from_millis(DEFAULT_FETCH_DELAY_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            lookback_range: default_lookback_range(),
            benchmark_symbol: default_benchmark_symbol(),
            exchange_suffix: default_exchange_suffix(),
            equities: default_equities(),
            sectors: default_sectors(),
        }
    }
}

impl RuntimeConfig {
    /// Defaults plus overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults plus overrides read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = lookup("PORT") {
            config.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{port}'"))?;
        }
        if let Some(url) = lookup("BREAKOUT_PROVIDER_URL") {
            config.provider_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(ms) = lookup("BREAKOUT_FETCH_DELAY_MS") {
            let ms: u64 = ms
                .trim()
                .parse()
                .with_context(|| format!("BREAKOUT_FETCH_DELAY_MS must be an integer, got '{ms}'"))?;
            config.fetch_delay = Duration::from_millis(ms);
        }
        if let Some(secs) = lookup("BREAKOUT_HTTP_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().with_context(|| {
                format!("BREAKOUT_HTTP_TIMEOUT_SECS must be an integer, got '{secs}'")
            })?;
            config.http_timeout = Duration::from_secs(secs);
        }

        config.validate()?;

        info!(
            port = config.port,
            provider = %config.provider_base_url,
            fetch_delay_ms = config.fetch_delay.as_millis() as u64,
            equities = config.equities.len(),
            sectors = config.sectors.len(),
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Check the universe tables for internal consistency.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.equities.is_empty(), "no equities configured");
        ensure!(
            !self.provider_base_url.is_empty(),
            "provider base URL must not be empty"
        );
        ensure!(
            self.fetch_delay <= MAX_FETCH_DELAY,
            "fetch delay must be at most {} ms, got {} ms",
            MAX_FETCH_DELAY.as_millis(),
            self.fetch_delay.as_millis()
        );

        for basket in &self.sectors {
            ensure!(
                !basket.leaders.is_empty(),
                "sector '{}' has no leading stocks",
                basket.name
            );
            for leader in &basket.leaders {
                ensure!(
                    leader.weight.is_finite() && leader.weight > 0.0,
                    "sector '{}': weight of {} must be positive, got {}",
                    basket.name,
                    leader.symbol,
                    leader.weight
                );
            }
        }

        for equity in &self.equities {
            ensure!(
                self.sector(&equity.sector).is_some(),
                "equity {} ({}) references unknown sector '{}'",
                equity.name,
                equity.symbol,
                equity.sector
            );
        }

        Ok(())
    }

    /// Provider ticker for an exchange code.
    pub fn ticker_for(&self, code: &str) -> String {
        format!("{code}{}", self.exchange_suffix)
    }

    pub fn sector(&self, name: &str) -> Option<&SectorBasket> {
        self.sectors.iter().find(|s| s.name == name)
    }
}
