//! Carry-rate math: futures prices to annualized implied rates and back.
//!
//! All rates are simple (non-compounded) annual rates on a 365-day year, the
//! same convention the caución TNA is quoted in, so implied and funding rates
//! compare directly.

use crate::errors::{AppError, Result};

pub const DAYS_PER_YEAR: f64 = 365.0;
pub const BPS_PER_UNIT: f64 = 10_000.0;

/// Annualized devaluation rate implied by a futures price.
///
/// `((futures_price / spot_price) - 1) * 365 / days_to_maturity`. Negative when
/// the future trades below spot.
pub fn implied_rate(spot_price: f64, futures_price: f64, days_to_maturity: i64) -> Result<f64> {
    if !(spot_price.is_finite() && spot_price > 0.0) {
        return Err(AppError::InvalidQuote(format!(
            "spot price must be positive, got {spot_price}"
        )));
    }
    if !(futures_price.is_finite() && futures_price > 0.0) {
        return Err(AppError::InvalidQuote(format!(
            "futures price must be positive, got {futures_price}"
        )));
    }
    if days_to_maturity <= 0 {
        return Err(AppError::InvalidQuote(format!(
            "days to maturity must be positive, got {days_to_maturity}"
        )));
    }
    Ok((futures_price / spot_price - 1.0) * (DAYS_PER_YEAR / days_to_maturity as f64))
}

/// No-arbitrage futures price: spot carried forward at the funding rate.
pub fn implied_spot(spot_price: f64, funding_rate: f64, days_to_maturity: i64) -> f64 {
    spot_price * carry_factor(funding_rate, days_to_maturity)
}

/// Spot price consistent with a futures price once discounted at the funding rate.
pub fn discounted_spot(futures_price: f64, funding_rate: f64, days_to_maturity: i64) -> f64 {
    futures_price / carry_factor(funding_rate, days_to_maturity)
}

fn carry_factor(rate: f64, days_to_maturity: i64) -> f64 {
    1.0 + rate * days_to_maturity as f64 / DAYS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implied_rate_matches_worked_example() {
        let bid = implied_rate(1000.0, 1080.0, 90).unwrap();
        let ask = implied_rate(1000.0, 1090.0, 90).unwrap();
        assert!((bid - 0.08 * 365.0 / 90.0).abs() < 1e-12);
        assert!((bid - 0.3244).abs() < 1e-4);
        assert!((ask - 0.3650).abs() < 1e-4);
    }

    #[test]
    fn implied_rate_negative_below_spot() {
        let r = implied_rate(1000.0, 990.0, 30).unwrap();
        assert!(r < 0.0);
    }

    #[test]
    fn implied_rate_rejects_bad_inputs() {
        assert!(matches!(
            implied_rate(0.0, 1000.0, 30),
            Err(AppError::InvalidQuote(_))
        ));
        assert!(matches!(
            implied_rate(1000.0, -1.0, 30),
            Err(AppError::InvalidQuote(_))
        ));
        assert!(matches!(
            implied_rate(1000.0, f64::NAN, 30),
            Err(AppError::InvalidQuote(_))
        ));
        assert!(matches!(
            implied_rate(1000.0, 1010.0, 0),
            Err(AppError::InvalidQuote(_))
        ));
    }

    #[test]
    fn fair_value_carries_spot_forward() {
        let fv = implied_spot(1000.0, 0.40, 90);
        assert!((fv - 1000.0 * (1.0 + 0.40 * 90.0 / 365.0)).abs() < 1e-9);
        // Discounting the fair value lands back on spot.
        assert!((discounted_spot(fv, 0.40, 90) - 1000.0).abs() < 1e-9);
    }
}
