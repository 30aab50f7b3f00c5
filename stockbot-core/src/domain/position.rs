use serde::{Deserialize, Serialize};

/// One cost-basis record from the portfolio ledger.
///
/// Shares are whole units. Both numbers must be positive for the position
/// to be valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub ticker: String,
    pub buy_price: f64,
    pub shares: i64,
}

impl Position {
    pub fn new(ticker: impl Into<String>, buy_price: f64, shares: i64) -> Self {
        Self {
            ticker: ticker.into(),
            buy_price,
            shares,
        }
    }

    pub fn total_cost(&self) -> f64 {
        self.buy_price * self.shares as f64
    }

    pub fn market_value(&self, current_price: f64) -> f64 {
        self.shares as f64 * current_price
    }
}
