use super::rates::{BPS_PER_UNIT, discounted_spot, implied_rate, implied_spot};
use super::types::{DroppedContract, Evaluation, FrictionConfig, OpportunityResult, Strategy};
use crate::errors::{AppError, Result};
use crate::models::{FuturesQuote, MarketSnapshot, QuotePrices};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Evaluate carry opportunities along the whole term structure.
///
/// Results come back in maturity order. Contracts that cannot be priced are
/// left out; use [`evaluate_with_report`] to see which ones and why.
pub fn evaluate(
    snapshot: &MarketSnapshot,
    friction: &FrictionConfig,
) -> Result<Vec<OpportunityResult>> {
    Ok(evaluate_with_report(snapshot, friction)?.results)
}

/// Same as [`evaluate`], also returning the contracts that were dropped.
///
/// Only an invalid `friction` fails the call. An empty or fully invalid term
/// structure yields an empty evaluation.
pub fn evaluate_with_report(
    snapshot: &MarketSnapshot,
    friction: &FrictionConfig,
) -> Result<Evaluation> {
    friction.validate()?;
    let funding_rate = friction
        .funding_rate_override
        .unwrap_or(snapshot.funding_rate());

    let mut evaluation = Evaluation::default();
    let mut last_maturity: Option<NaiveDate> = None;

    // Contracts are sorted by maturity, so duplicates are adjacent.
    // Only a priced contract claims its maturity date.
    for quote in snapshot.contracts() {
        let outcome = if last_maturity == Some(quote.maturity_date) {
            Err(AppError::InvalidQuote(format!(
                "{}: duplicate maturity {}",
                quote.symbol, quote.maturity_date
            )))
        } else {
            evaluate_contract(snapshot, quote, funding_rate, friction)
        };

        match outcome {
            Ok(result) => {
                last_maturity = Some(quote.maturity_date);
                evaluation.results.push(result);
            }
            Err(e) => {
                warn!(symbol = %quote.symbol, error = %e, "[OPP] contract dropped");
                evaluation.dropped.push(DroppedContract {
                    symbol: quote.symbol.clone(),
                    maturity_date: quote.maturity_date,
                    reason: e.to_string(),
                });
            }
        }
    }

    debug!(
        priced = evaluation.results.len(),
        dropped = evaluation.dropped.len(),
        funding_rate,
        "[OPP] evaluation done"
    );
    Ok(evaluation)
}

/// Evaluate Cash & Carry and Reverse for a single contract
fn evaluate_contract(
    snapshot: &MarketSnapshot,
    quote: &FuturesQuote,
    funding_rate: f64,
    friction: &FrictionConfig,
) -> Result<OpportunityResult> {
    let (days, prices) = snapshot.validate_contract(quote)?;
    let spot = snapshot.spot_price();

    let half_widen = friction.spread_widen_bps / BPS_PER_UNIT / 2.0;
    let bid = prices.bid().map(|b| b * (1.0 - half_widen));
    let ask = prices.ask().map(|a| a * (1.0 + half_widen));

    let mid_price = match (prices.settlement(), bid, ask) {
        (Some(settlement), _, _) => settlement,
        (None, Some(b), Some(a)) => (b + a) / 2.0,
        (None, Some(p), None) | (None, None, Some(p)) => p,
        (None, None, None) => {
            return Err(AppError::InvalidQuote(format!(
                "{}: no usable price",
                quote.symbol
            )));
        }
    };

    let implied_rate_bid = bid.map(|b| implied_rate(spot, b, days)).transpose()?;
    let implied_rate_ask = ask.map(|a| implied_rate(spot, a, days)).transpose()?;
    let implied_rate_mid = implied_rate(spot, mid_price, days)?;

    // Selling the future lifts the bid; buying it pays the ask.
    let commission = friction.commission_bps / BPS_PER_UNIT;
    let cash_carry_edge = implied_rate_bid.map(|r| r - funding_rate - commission);
    let reverse_edge = implied_rate_ask.map(|r| funding_rate - r - commission);

    let (strategy, edge) = pick_strategy(cash_carry_edge, reverse_edge);

    Ok(OpportunityResult {
        symbol: quote.symbol.clone(),
        maturity_date: quote.maturity_date,
        days_to_maturity: days,
        implied_rate_bid,
        implied_rate_ask,
        implied_rate_mid,
        implied_spot: implied_spot(spot, funding_rate, days),
        discounted_spot: discounted_spot(mid_price, funding_rate, days),
        cash_carry_edge_bps: cash_carry_edge.map(|e| e * BPS_PER_UNIT),
        reverse_edge_bps: reverse_edge.map(|e| e * BPS_PER_UNIT),
        spread_bps: edge * BPS_PER_UNIT,
        strategy,
        mid_only: matches!(prices, QuotePrices::SettlementOnly { .. }),
    })
}

/// Winning direction and its edge; ties go to Cash & Carry.
fn pick_strategy(cash_carry: Option<f64>, reverse: Option<f64>) -> (Strategy, f64) {
    let cc = cash_carry.unwrap_or(f64::NEG_INFINITY);
    let rev = reverse.unwrap_or(f64::NEG_INFINITY);
    if cc > 0.0 && cc >= rev {
        (Strategy::CashCarry, cc)
    } else if rev > 0.0 && rev > cc {
        (Strategy::Reverse, rev)
    } else {
        (Strategy::None, 0.0)
    }
}

/// Widest surviving spread; the nearest maturity wins ties.
pub fn best_opportunity(results: &[OpportunityResult]) -> Option<&OpportunityResult> {
    results
        .iter()
        .filter(|r| r.strategy != Strategy::None)
        .fold(None, |best: Option<&OpportunityResult>, r| match best {
            Some(b) if b.spread_bps >= r.spread_bps => Some(b),
            _ => Some(r),
        })
}
