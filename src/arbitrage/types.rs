use crate::errors::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Execution frictions layered on top of quoted prices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrictionConfig {
    /// Extra bid/ask width in basis points; half is taken off the bid and half
    /// added to the ask.
    #[serde(default)]
    pub spread_widen_bps: f64,
    /// Round-trip commission in basis points, charged against every edge.
    #[serde(default)]
    pub commission_bps: f64,
    /// Replaces the snapshot funding rate (TNA fraction) for stress testing.
    #[serde(default)]
    pub funding_rate_override: Option<f64>,
}

impl FrictionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.spread_widen_bps.is_finite() && (0.0..20_000.0).contains(&self.spread_widen_bps))
        {
            return Err(AppError::InvalidFriction(format!(
                "spread_widen_bps must be in [0, 20000), got {}",
                self.spread_widen_bps
            )));
        }
        if !(self.commission_bps.is_finite() && self.commission_bps >= 0.0) {
            return Err(AppError::InvalidFriction(format!(
                "commission_bps must be >= 0, got {}",
                self.commission_bps
            )));
        }
        if let Some(rate) = self.funding_rate_override {
            if !rate.is_finite() {
                return Err(AppError::InvalidFriction(format!(
                    "funding_rate_override must be finite, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

/// Direction of the carry trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Borrow pesos, buy spot dollars, sell the future at bid.
    CashCarry,
    /// Sell spot dollars, lend pesos at the funding rate, buy the future at ask.
    Reverse,
    None,
}

/// Evaluated carry opportunity for one futures contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityResult {
    pub symbol: String,
    pub maturity_date: NaiveDate,
    pub days_to_maturity: i64,
    /// Absent when the contract has no (usable) bid.
    pub implied_rate_bid: Option<f64>,
    pub implied_rate_ask: Option<f64>,
    pub implied_rate_mid: f64,
    /// Fair futures price at the effective funding rate.
    pub implied_spot: f64,
    /// Spot implied by the mid price discounted at the effective funding rate.
    pub discounted_spot: f64,
    pub cash_carry_edge_bps: Option<f64>,
    pub reverse_edge_bps: Option<f64>,
    /// Size of the winning edge, 0 when no strategy survives friction.
    pub spread_bps: f64,
    pub strategy: Strategy,
    /// Priced from settlement only; rates carry more uncertainty.
    pub mid_only: bool,
}

/// A contract left out of an evaluation and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedContract {
    pub symbol: String,
    pub maturity_date: NaiveDate,
    pub reason: String,
}

/// Full outcome of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub results: Vec<OpportunityResult>,
    pub dropped: Vec<DroppedContract>,
}
