//! Shared data structures used throughout the application.

use crate::errors::{AppError, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Contracts listed further out than this are ignored.
pub const MAX_DAYS_TO_MATURITY: i64 = 730;

/// Buenos Aires offset from UTC. Argentina has no daylight saving time.
pub const MARKET_UTC_OFFSET_SECS: i64 = -3 * 3600;

/// Exchange-local calendar date of an instant.
pub fn market_date(at: DateTime<Utc>) -> NaiveDate {
    at.naive_utc()
        .checked_add_signed(Duration::seconds(MARKET_UTC_OFFSET_SECS))
        .map_or_else(|| at.date_naive(), |local| local.date())
}

/// One dollar-futures contract as delivered by a data source.
///
/// Missing prices are `None`. A zero is never a placeholder for "no quote".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuturesQuote {
    /// Contract ticker, e.g. "DLR/ENE26".
    pub symbol: String,
    pub maturity_date: NaiveDate,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    /// Last settlement (theoretical close), fallback when the book is empty.
    #[serde(default)]
    pub settlement: Option<f64>,
}

impl FuturesQuote {
    pub fn days_to_maturity(&self, as_of: NaiveDate) -> i64 {
        (self.maturity_date - as_of).num_days()
    }

    /// Classify which prices this quote actually carries.
    pub fn prices(&self) -> Result<QuotePrices> {
        let bid = checked_price("bid", self.bid)?;
        let ask = checked_price("ask", self.ask)?;
        let settlement = checked_price("settlement", self.settlement)?;

        match (bid, ask, settlement) {
            (Some(bid), Some(ask), _) if bid >= ask => Err(AppError::InvalidQuote(format!(
                "{}: crossed book (bid {bid} >= ask {ask})",
                self.symbol
            ))),
            (Some(bid), Some(ask), settlement) => Ok(QuotePrices::TwoSided {
                bid,
                ask,
                settlement,
            }),
            (Some(bid), None, settlement) => Ok(QuotePrices::BidOnly { bid, settlement }),
            (None, Some(ask), settlement) => Ok(QuotePrices::AskOnly { ask, settlement }),
            (None, None, Some(settlement)) => Ok(QuotePrices::SettlementOnly { settlement }),
            (None, None, None) => Err(AppError::InvalidQuote(format!(
                "{}: no bid, ask or settlement",
                self.symbol
            ))),
        }
    }
}

fn checked_price(field: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(p) if !(p.is_finite() && p > 0.0) => Err(AppError::InvalidQuote(format!(
            "{field} must be positive and finite, got {p}"
        ))),
        other => Ok(other),
    }
}

/// Prices a validated contract carries, by which sides of the book are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuotePrices {
    TwoSided {
        bid: f64,
        ask: f64,
        settlement: Option<f64>,
    },
    BidOnly {
        bid: f64,
        settlement: Option<f64>,
    },
    AskOnly {
        ask: f64,
        settlement: Option<f64>,
    },
    SettlementOnly {
        settlement: f64,
    },
}

impl QuotePrices {
    pub fn bid(&self) -> Option<f64> {
        match *self {
            QuotePrices::TwoSided { bid, .. } | QuotePrices::BidOnly { bid, .. } => Some(bid),
            _ => None,
        }
    }

    pub fn ask(&self) -> Option<f64> {
        match *self {
            QuotePrices::TwoSided { ask, .. } | QuotePrices::AskOnly { ask, .. } => Some(ask),
            _ => None,
        }
    }

    pub fn settlement(&self) -> Option<f64> {
        match *self {
            QuotePrices::TwoSided { settlement, .. }
            | QuotePrices::BidOnly { settlement, .. }
            | QuotePrices::AskOnly { settlement, .. } => settlement,
            QuotePrices::SettlementOnly { settlement } => Some(settlement),
        }
    }
}

/// Snapshot as handed over by a source, before any sanity checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UncheckedSnapshot {
    pub timestamp: DateTime<Utc>,
    pub spot_price: f64,
    /// Caución TNA as a fraction (0.40 = 40%).
    pub funding_rate: f64,
    #[serde(default)]
    pub contracts: Vec<FuturesQuote>,
}

/// Market state at a single instant. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedSnapshot", into = "UncheckedSnapshot")]
pub struct MarketSnapshot {
    timestamp: DateTime<Utc>,
    spot_price: f64,
    funding_rate: f64,
    contracts: Vec<FuturesQuote>,
}

impl MarketSnapshot {
    /// Reject snapshots with an unusable spot or funding rate and order the
    /// contracts by maturity.
    pub fn new(
        timestamp: DateTime<Utc>,
        spot_price: f64,
        funding_rate: f64,
        mut contracts: Vec<FuturesQuote>,
    ) -> Result<Self> {
        if !(spot_price.is_finite() && spot_price > 0.0) {
            return Err(AppError::InvalidSnapshot(format!(
                "spot price must be positive and finite, got {spot_price}"
            )));
        }
        if !funding_rate.is_finite() {
            return Err(AppError::InvalidSnapshot(format!(
                "funding rate must be finite, got {funding_rate}"
            )));
        }
        contracts.sort_by_key(|c| c.maturity_date);
        Ok(Self {
            timestamp,
            spot_price,
            funding_rate,
            contracts,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Exchange-local calendar date days-to-maturity are counted from.
    pub fn as_of(&self) -> NaiveDate {
        market_date(self.timestamp)
    }

    pub fn spot_price(&self) -> f64 {
        self.spot_price
    }

    pub fn funding_rate(&self) -> f64 {
        self.funding_rate
    }

    pub fn contracts(&self) -> &[FuturesQuote] {
        &self.contracts
    }

    /// Days to maturity and prices for a contract the engine may price.
    pub fn validate_contract(&self, quote: &FuturesQuote) -> Result<(i64, QuotePrices)> {
        let days = quote.days_to_maturity(self.as_of());
        if days <= 0 {
            return Err(AppError::InvalidQuote(format!(
                "{}: expired ({days} days to maturity)",
                quote.symbol
            )));
        }
        if days > MAX_DAYS_TO_MATURITY {
            return Err(AppError::InvalidQuote(format!(
                "{}: {days} days to maturity exceeds {MAX_DAYS_TO_MATURITY}",
                quote.symbol
            )));
        }
        Ok((days, quote.prices()?))
    }
}

impl TryFrom<UncheckedSnapshot> for MarketSnapshot {
    type Error = AppError;

    fn try_from(raw: UncheckedSnapshot) -> Result<Self> {
        Self::new(raw.timestamp, raw.spot_price, raw.funding_rate, raw.contracts)
    }
}

impl From<MarketSnapshot> for UncheckedSnapshot {
    fn from(snapshot: MarketSnapshot) -> Self {
        Self {
            timestamp: snapshot.timestamp,
            spot_price: snapshot.spot_price,
            funding_rate: snapshot.funding_rate,
            contracts: snapshot.contracts,
        }
    }
}
