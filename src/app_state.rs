// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// Holds the analyzer and a request counter. Every analysis request
// rebuilds all series from scratch; no price data is cached between requests.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::analyzer::Analyzer;
use crate::market_data::PriceProvider;
use crate::runtime_config::RuntimeConfig;

pub struct AppState {
    pub analyzer: Analyzer,

    /// Number of analysis requests served since startup.
    analyses_started: AtomicU64,
}

impl AppState {
    pub fn new(config: RuntimeConfig, provider: Arc<dyn PriceProvider>) -> Self {
        Self {
            analyzer: Analyzer::new(provider, Arc::new(config)),
            analyses_started: AtomicU64::new(0),
        }
    }

    /// Bump the request counter, returning the new value.
    pub fn next_analysis(&self) -> u64 {
        self.analyses_started.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn analyses_started(&self) -> u64 {
        self.analyses_started.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::provider::testing::StaticProvider;

    #[test]
    fn counter_starts_at_zero_and_increments() {
        let state = AppState::new(RuntimeConfig::default(), Arc::new(StaticProvider::new()));
        assert_eq!(state.analyses_started(), 0);
        assert_eq!(state.next_analysis(), 1);
        assert_eq!(state.next_analysis(), 2);
        assert_eq!(state.analyses_started(), 2);
    }
}
