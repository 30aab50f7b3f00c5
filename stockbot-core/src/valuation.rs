//! Portfolio valuation: cost basis + current price → profit/loss.
//!
//! Pure arithmetic, recomputed on every run:
//! `total_cost = buy_price × shares`, `current_value = price × shares`,
//! `pnl = current_value − total_cost`, `pnl_percent = pnl / total_cost × 100`.

use crate::domain::Position;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Valuation {
    pub current_price: f64,
    pub total_cost: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
}

/// Why a position could not be valued. Never fatal for the other rows.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("{ticker}: shares must be positive (got {shares})")]
    InvalidShares { ticker: String, shares: i64 },

    #[error("{ticker}: buy price must be positive (got {buy_price})")]
    InvalidBuyPrice { ticker: String, buy_price: f64 },

    #[error("{ticker}: current price unavailable")]
    PriceUnavailable { ticker: String },
}

/// Value `position` at `current_price`.
///
/// `None` (an upstream Skip) or a non-positive / non-finite price is
/// `PriceUnavailable`; nothing is ever divided by zero.
pub fn valuate(position: &Position, current_price: Option<f64>) -> Result<Valuation, ValuationError> {
    let ticker = || position.ticker.clone();

    if position.shares <= 0 {
        return Err(ValuationError::InvalidShares {
            ticker: ticker(),
            shares: position.shares,
        });
    }
    if !(position.buy_price > 0.0 && position.buy_price.is_finite()) {
        return Err(ValuationError::InvalidBuyPrice {
            ticker: ticker(),
            buy_price: position.buy_price,
        });
    }
    let current_price = current_price
        .filter(|p| *p > 0.0 && p.is_finite())
        .ok_or_else(|| ValuationError::PriceUnavailable { ticker: ticker() })?;

    let total_cost = position.total_cost();
    let current_value = position.market_value(current_price);
    let pnl = current_value - total_cost;

    Ok(Valuation {
        current_price,
        total_cost,
        current_value,
        pnl,
        pnl_percent: pnl / total_cost * 100.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::assert_approx;

    #[test]
    fn gain_of_twenty_percent() {
        let v = valuate(&Position::new("AAPL", 100.0, 10), Some(120.0)).unwrap();
        assert_approx(v.total_cost, 1000.0, 1e-9);
        assert_approx(v.current_value, 1200.0, 1e-9);
        assert_approx(v.pnl, 200.0, 1e-9);
        assert_approx(v.pnl_percent, 20.0, 1e-9);
    }

    #[test]
    fn loss_is_negative() {
        let v = valuate(&Position::new("KO", 50.0, 4), Some(40.0)).unwrap();
        assert_approx(v.pnl, -40.0, 1e-9);
        assert_approx(v.pnl_percent, -20.0, 1e-9);
    }

    #[test]
    fn invalid_shares_error_names_the_count() {
        let err = valuate(&Position::new("NVDA", 10.0, -2), Some(12.0)).unwrap_err();
        assert_eq!(
            err,
            ValuationError::InvalidShares {
                ticker: "NVDA".into(),
                shares: -2
            }
        );
        assert_eq!(err.to_string(), "NVDA: shares must be positive (got -2)");
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        assert!(matches!(
            valuate(&Position::new("A", 100.0, 0), Some(1.0)),
            Err(ValuationError::InvalidShares { .. })
        ));
        assert!(matches!(
            valuate(&Position::new("A", 100.0, -3), Some(1.0)),
            Err(ValuationError::InvalidShares { .. })
        ));
        assert!(matches!(
            valuate(&Position::new("A", 0.0, 3), Some(1.0)),
            Err(ValuationError::InvalidBuyPrice { .. })
        ));
    }

    #[test]
    fn missing_price_is_unvalued() {
        let err = valuate(&Position::new("ZZZZ", 10.0, 1), None).unwrap_err();
        assert_eq!(
            err,
            ValuationError::PriceUnavailable {
                ticker: "ZZZZ".into()
            }
        );
        assert!(valuate(&Position::new("ZZZZ", 10.0, 1), Some(f64::NAN)).is_err());
    }
}
