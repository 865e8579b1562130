//! Single-asset portfolio state.

use super::error::ReviewError;
use super::rule_eval::percent_change;

pub const DEFAULT_INITIAL_CASH: f64 = 100_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
}

/// Cash plus at most one whole-share lot.
///
/// Invariant: `shares > 0` implies `entry_price > 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares: u64,
    pub entry_price: f64,
}

/// Outcome of closing the open lot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub shares: u64,
    pub price: f64,
    pub amount: f64,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        PortfolioState {
            cash: initial_cash,
            shares: 0,
            entry_price: 0.0,
        }
    }

    pub fn state(&self) -> PositionState {
        if self.shares > 0 {
            PositionState::Long
        } else {
            PositionState::Flat
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    pub fn total_value(&self, price: f64) -> f64 {
        self.cash + self.market_value(price)
    }

    /// At least one whole share is affordable at `price`.
    pub fn can_afford(&self, price: f64) -> bool {
        price > 0.0 && self.cash >= price
    }

    /// Spend as much cash as whole shares allow. Returns `None` when
    /// already long or nothing is affordable, and an error when the share
    /// count does not fit in a `u64`.
    pub fn buy_all(&mut self, price: f64) -> Result<Option<Fill>, ReviewError> {
        if self.state() == PositionState::Long || !self.can_afford(price) {
            return Ok(None);
        }
        let quotient = (self.cash / price).floor();
        if !quotient.is_finite() || quotient >= u64::MAX as f64 {
            return Err(ReviewError::simulation(format!(
                "share count {quotient} at price {price} is not representable"
            )));
        }
        let shares = quotient as u64;
        if shares == 0 {
            return Ok(None);
        }
        let cost = shares as f64 * price;
        self.cash -= cost;
        self.shares = shares;
        self.entry_price = price;
        Ok(Some(Fill {
            shares,
            price,
            amount: cost,
        }))
    }

    /// Close the whole lot at `price`. Returns the fill and the realized
    /// profit percent, or `None` when flat.
    pub fn sell_all(&mut self, price: f64) -> Option<(Fill, f64)> {
        if self.state() == PositionState::Flat {
            return None;
        }
        let shares = self.shares;
        let proceeds = shares as f64 * price;
        let profit_percent = percent_change(self.entry_price, price);
        self.cash += proceeds;
        self.shares = 0;
        Some((
            Fill {
                shares,
                price,
                amount: proceeds,
            },
            profit_percent,
        ))
    }
}
