//! Transaction log entries.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub label: String,
    pub action: Action,
    pub price: f64,
    pub shares: u64,
    /// Realized profit in percent; SELL only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_percent: Option<f64>,
}

impl Transaction {
    pub fn buy(label: &str, price: f64, shares: u64) -> Self {
        Transaction {
            label: label.to_string(),
            action: Action::Buy,
            price,
            shares,
            profit_percent: None,
        }
    }

    pub fn sell(label: &str, price: f64, shares: u64, profit_percent: f64) -> Self {
        Transaction {
            label: label.to_string(),
            action: Action::Sell,
            price,
            shares,
            profit_percent: Some(profit_percent),
        }
    }

    pub fn is_sell(&self) -> bool {
        self.action == Action::Sell
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} at {:.2}", self.label, self.action, self.price)?;
        if let Some(pct) = self.profit_percent {
            write!(f, " (Profit: {pct:.2}%)")?;
        }
        Ok(())
    }
}
