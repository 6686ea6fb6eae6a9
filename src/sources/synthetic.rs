use super::SnapshotSource;
use crate::errors::{AppError, Result};
use crate::models::{FuturesQuote, MarketSnapshot, market_date};
use chrono::{DateTime, Days, Utc};
use futures::future::BoxFuture;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SPOT_PRICE: f64 = 1450.50;
const FUNDING_RATE: f64 = 0.35;
/// Carry the generated curve is centred on.
const CURVE_RATE: f64 = 0.40;
const MONTHS: u64 = 6;
const HALF_SPREAD: f64 = 2.0;

/// Generates a plausible dollar-futures curve for demos and offline use.
///
/// With a seed every fetch yields the same prices; without one each fetch
/// draws fresh noise.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: Option<u64>,
}

impl SyntheticSource {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed }
    }

    pub fn generate(&self, now: DateTime<Utc>) -> Result<MarketSnapshot> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let today = market_date(now);

        let mut contracts = Vec::with_capacity(MONTHS as usize);
        for m in 1..=MONTHS {
            let days = 30 * m;
            let maturity_date = today
                .checked_add_days(Days::new(days))
                .ok_or_else(|| {
                    AppError::InvalidSnapshot(format!("maturity out of range: {today} + {days}d"))
                })?;
            let fair_price = SPOT_PRICE * (1.0 + CURVE_RATE * days as f64 / 365.0);
            let price = fair_price + rng.gen_range(-5.0..10.0);
            contracts.push(FuturesQuote {
                symbol: format!("DLR/MOCK{m}"),
                maturity_date,
                bid: Some(round_cents(price - HALF_SPREAD)),
                ask: Some(round_cents(price + HALF_SPREAD)),
                settlement: Some(round_cents(price)),
            });
        }

        MarketSnapshot::new(now, SPOT_PRICE, FUNDING_RATE, contracts)
    }
}

impl SnapshotSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_snapshot(&self) -> BoxFuture<'_, Result<MarketSnapshot>> {
        Box::pin(async move { self.generate(Utc::now()) })
    }
}

fn round_cents(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
