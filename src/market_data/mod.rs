pub mod provider;
pub mod throttle;
pub mod yahoo;

pub use provider::{FetchError, PriceProvider};
pub use yahoo::YahooChartClient;
