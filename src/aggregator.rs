//! Refresh loop: fetch a snapshot, evaluate it, report opportunities.

use crate::{
    arbitrage::{Evaluation, FrictionConfig, best_opportunity, evaluate_with_report},
    errors::Result,
    sources::SnapshotSource,
    utils,
};
use std::time::Duration;
use tracing;

/// One refresh: fetch from `source` and evaluate with `friction`.
pub async fn refresh_once(
    source: &dyn SnapshotSource,
    friction: &FrictionConfig,
) -> Result<Evaluation> {
    let snapshot = source.fetch_snapshot().await?;
    evaluate_with_report(&snapshot, friction)
}

/// Spawn the periodic evaluation loop
pub fn spawn_monitor(
    source: Box<dyn SnapshotSource>,
    friction: FrictionConfig,
    refresh_secs: u64,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(refresh_secs));
        let mut ticks: u64 = 0;

        loop {
            ticker.tick().await;
            ticks += 1;

            let evaluation = match refresh_once(source.as_ref(), &friction).await {
                Ok(evaluation) => evaluation,
                Err(e) => {
                    tracing::error!(error = %e, "[SNAPSHOT] data unavailable");
                    continue;
                }
            };

            if evaluation.results.is_empty() {
                if ticks % 5 == 0 {
                    tracing::info!(
                        dropped = evaluation.dropped.len(),
                        "[HEARTBEAT] no priceable contracts"
                    );
                }
                continue;
            }

            let rows: Vec<String> = evaluation.results.iter().map(utils::describe).collect();
            match best_opportunity(&evaluation.results) {
                Some(best) => tracing::info!(
                    best = %best.symbol,
                    spread_bps = best.spread_bps,
                    strategy = ?best.strategy,
                    curve = ?rows,
                    "[OPP] opportunities found"
                ),
                None if ticks % 5 == 0 => tracing::info!(
                    commission_bps = friction.commission_bps,
                    spread_widen_bps = friction.spread_widen_bps,
                    curve = ?rows,
                    "[HEARTBEAT] no edge survives friction"
                ),
                None => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SyntheticSource;

    #[tokio::test]
    async fn refresh_prices_synthetic_curve() {
        let source = SyntheticSource::new(Some(3));
        let evaluation = refresh_once(&source, &FrictionConfig::default())
            .await
            .unwrap();
        assert_eq!(evaluation.results.len(), 6);
        assert!(evaluation.dropped.is_empty());
        assert!(
            evaluation
                .results
                .windows(2)
                .all(|w| w[0].maturity_date < w[1].maturity_date)
        );
    }
}
