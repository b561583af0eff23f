// =============================================================================
// Signals Module
// =============================================================================
//
// Breakout checklist scoring: nine boolean market conditions per equity,
// rolled up into a percentage and an all-conditions-met signal.

pub mod breakout;

pub use breakout::{score_equity, EquityAnalysis};
