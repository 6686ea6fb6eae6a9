//! Market data sources.
//!
//! Responsibilities:
//! • Produce a validated `MarketSnapshot` per refresh.
//! • Chain sources in priority order and hand back the first that answers.
//!
//! Sources never run the rate engine; they only deliver data.

use crate::errors::{AppError, Result};
use crate::models::MarketSnapshot;
use futures::future::BoxFuture;
use tracing::{info, warn};

pub mod file;
pub mod synthetic;
pub mod ticker;

pub use file::FileSource;
pub use synthetic::SyntheticSource;
pub use ticker::{last_business_day, parse_dlr_maturity};

/// Anything that can deliver a market snapshot.
pub trait SnapshotSource: Send + Sync {
    fn name(&self) -> &str;

    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<MarketSnapshot>>;
}

/// Ordered list of sources tried one after another.
pub struct FallbackChain {
    sources: Vec<Box<dyn SnapshotSource>>,
}

impl FallbackChain {
    pub fn new(sources: Vec<Box<dyn SnapshotSource>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl SnapshotSource for FallbackChain {
    fn name(&self) -> &str {
        "fallback-chain"
    }

    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<MarketSnapshot>> {
        Box::pin(async move {
            let mut failures = Vec::with_capacity(self.sources.len());
            for source in &self.sources {
                match source.fetch_snapshot().await {
                    Ok(snapshot) => {
                        info!(
                            source = source.name(),
                            spot_price = snapshot.spot_price(),
                            contracts = snapshot.contracts().len(),
                            "[SNAPSHOT] fetched"
                        );
                        return Ok(snapshot);
                    }
                    Err(e) => {
                        warn!(source = source.name(), error = %e, "[SNAPSHOT] source failed");
                        failures.push(format!("{}: {e}", source.name()));
                    }
                }
            }
            if failures.is_empty() {
                return Err(AppError::SourceUnavailable("no sources configured".into()));
            }
            Err(AppError::SourceUnavailable(failures.join("; ")))
        })
    }
}
