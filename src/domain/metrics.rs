//! Performance metrics and coaching insights.

use super::error::ReviewError;
use super::simulation::SimulationOutcome;

const STRONG_RETURN_PERCENT: f64 = 15.0;
const HIGH_TRADE_COUNT: usize = 50;
const LOW_TRADE_COUNT: usize = 5;

/// Qualitative observation derived from the metrics. Rules are independent;
/// every matching one is reported, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    StrongPerformance,
    NetLoss,
    HighTradeFrequency,
    LowSignalFrequency,
}

impl Insight {
    pub fn text(&self) -> &'static str {
        match self {
            Insight::StrongPerformance => {
                "Strong overall profitability: the strategy beat the market benchmark."
            }
            Insight::NetLoss => {
                "The strategy lost money over this backtest; review the entry and stop-loss conditions."
            }
            Insight::HighTradeFrequency => {
                "Trading is frequent; keep in mind the impact of transaction costs."
            }
            Insight::LowSignalFrequency => {
                "Few trading signals: the strategy sat in cash most of the time and may miss opportunities."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub final_value: f64,
    pub total_return_percent: f64,
    pub win_rate_percent: f64,
    pub wins: usize,
    pub losses: usize,
    pub total_trades: usize,
    pub insights: Vec<Insight>,
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive metrics from a finished run. The open lot, if any, is valued at
/// the last price.
pub fn analyze(outcome: &SimulationOutcome, initial_cash: f64) -> Result<Analysis, ReviewError> {
    if !initial_cash.is_finite() || initial_cash <= 0.0 {
        return Err(ReviewError::configuration(format!(
            "initial cash must be positive, got {initial_cash}"
        )));
    }

    let final_value = outcome.portfolio.total_value(outcome.last.price);
    if !final_value.is_finite() {
        return Err(ReviewError::simulation(format!(
            "final portfolio value is not finite: {final_value}"
        )));
    }

    let total_return_percent = round2((final_value - initial_cash) / initial_cash * 100.0);

    let wins = outcome.wins;
    let losses = outcome.losses;
    let total_trades = wins + losses;
    let win_rate_percent = if total_trades > 0 {
        round2(wins as f64 / total_trades as f64 * 100.0)
    } else {
        0.0
    };

    Ok(Analysis {
        final_value,
        total_return_percent,
        win_rate_percent,
        wins,
        losses,
        total_trades,
        insights: insights(total_return_percent, total_trades),
    })
}

pub fn insights(total_return_percent: f64, total_trades: usize) -> Vec<Insight> {
    let mut out = Vec::new();
    if total_return_percent > STRONG_RETURN_PERCENT {
        out.push(Insight::StrongPerformance);
    }
    if total_return_percent < 0.0 {
        out.push(Insight::NetLoss);
    }
    if total_trades > HIGH_TRADE_COUNT {
        out.push(Insight::HighTradeFrequency);
    }
    if total_trades < LOW_TRADE_COUNT {
        out.push(Insight::LowSignalFrequency);
    }
    out
}
