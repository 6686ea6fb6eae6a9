use anyhow::Result;
use carry_monitor::{aggregator, config::AppConfig, utils};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    utils::init_logging();

    let config = AppConfig::load()?;
    let chain = config.source_chain()?;

    tracing::info!(
        sources = ?config.data_sources,
        refresh_secs = config.refresh_secs,
        spread_widen_bps = config.friction.spread_widen_bps,
        commission_bps = config.friction.commission_bps,
        funding_rate_override = ?config.friction.funding_rate_override,
        "[INIT] carry-monitor starting"
    );

    let monitor = aggregator::spawn_monitor(Box::new(chain), config.friction, config.refresh_secs);

    tokio::select! {
        res = monitor => res?,
        _ = tokio::signal::ctrl_c() => tracing::info!("[SHUTDOWN] interrupted"),
    }
    Ok(())
}
