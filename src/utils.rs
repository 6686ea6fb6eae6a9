//! Miscellaneous helper utilities.

use crate::arbitrage::{OpportunityResult, Strategy};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize `tracing` subscriber with env-based filter.
///
/// If `RUST_LOG` is not set, defaults to `info` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// One-line summary of an evaluated contract for the logs.
pub fn describe(result: &OpportunityResult) -> String {
    let side = match result.strategy {
        Strategy::CashCarry => "Carry: buy spot, sell future",
        Strategy::Reverse => "Reverse: sell spot, buy future",
        Strategy::None => "no edge",
    };
    let rate = |r: Option<f64>| match r {
        Some(r) => format!("{:.2}%", r * 100.0),
        None => "n/a".to_string(),
    };
    format!(
        "{} ({}d) bid {} ask {} mid {:.2}%{} | {} | {:.0} bps",
        result.symbol,
        result.days_to_maturity,
        rate(result.implied_rate_bid),
        rate(result.implied_rate_ask),
        result.implied_rate_mid * 100.0,
        if result.mid_only { " [settlement only]" } else { "" },
        side,
        result.spread_bps
    )
}
