//! Position state machine and simulation loop.
//!
//! One run walks the price series in order. Each period evaluates exactly one
//! rule group, chosen by the current state:
//!
//! - `LONG`: exit group against the percent change from entry; on `true`
//!   sell the whole lot, record a SELL and classify it as win (`profit > 0`)
//!   or loss
//! - `FLAT`: if at least one share is affordable, entry group against the
//!   current point; on `true` buy `floor(cash / price)` shares and record a BUY
//!
//! An open position at the end of the series is marked to market by the
//! analyzer, never force-closed.

use tracing::{debug, info};

use super::error::ReviewError;
use super::metrics;
use super::portfolio::{DEFAULT_INITIAL_CASH, PortfolioState, PositionState};
use super::price::{PricePoint, validate_series};
use super::report::{self, Report};
use super::rule_eval::{self, EvalContext};
use super::strategy::StrategySpec;
use super::transaction::Transaction;

pub const DEFAULT_EXCERPT_LEN: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_cash: f64,
    /// Number of earliest transactions kept in the report.
    pub excerpt_len: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            initial_cash: DEFAULT_INITIAL_CASH,
            excerpt_len: DEFAULT_EXCERPT_LEN,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ReviewError> {
        if !self.initial_cash.is_finite() || self.initial_cash <= 0.0 {
            return Err(ReviewError::configuration(format!(
                "initial cash must be positive, got {}",
                self.initial_cash
            )));
        }
        if self.excerpt_len == 0 {
            return Err(ReviewError::configuration(
                "transaction excerpt length must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Final state of one run, handed to the analyzer.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOutcome {
    pub portfolio: PortfolioState,
    pub transactions: Vec<Transaction>,
    pub wins: usize,
    pub losses: usize,
    pub first: PricePoint,
    pub last: PricePoint,
}

/// Every custom factor the strategy reads must exist on every point.
pub fn validate_factors(spec: &StrategySpec, series: &[PricePoint]) -> Result<(), ReviewError> {
    let required = spec.custom_factors();
    for point in series {
        if let Some(missing) = required.iter().find(|f| point.factor(f).is_none()) {
            return Err(ReviewError::configuration(format!(
                "unknown factor '{missing}': not supplied at {}",
                point.label
            )));
        }
    }
    Ok(())
}

pub fn run_simulation(
    spec: &StrategySpec,
    series: &[PricePoint],
    config: &SimulationConfig,
) -> Result<SimulationOutcome, ReviewError> {
    config.validate()?;
    validate_series(series)?;
    validate_factors(spec, series)?;

    let (first, last) = match (series.first(), series.last()) {
        (Some(f), Some(l)) => (f.clone(), l.clone()),
        _ => return Err(ReviewError::simulation("price series is empty")),
    };

    let mut portfolio = PortfolioState::new(config.initial_cash);
    let mut transactions = Vec::new();
    let mut wins = 0usize;
    let mut losses = 0usize;

    for point in series {
        match portfolio.state() {
            PositionState::Long => {
                let ctx = EvalContext::long(point, portfolio.entry_price);
                if !rule_eval::evaluate(&spec.exit_conditions, &ctx)? {
                    continue;
                }
                if let Some((fill, profit_percent)) = portfolio.sell_all(point.price) {
                    if profit_percent > 0.0 {
                        wins += 1;
                    } else {
                        losses += 1;
                    }
                    debug!(
                        label = %point.label,
                        price = fill.price,
                        shares = fill.shares,
                        profit_percent,
                        "sell"
                    );
                    transactions.push(Transaction::sell(
                        &point.label,
                        fill.price,
                        fill.shares,
                        profit_percent,
                    ));
                }
            }
            PositionState::Flat => {
                if !portfolio.can_afford(point.price) {
                    continue;
                }
                let ctx = EvalContext::flat(point);
                if !rule_eval::evaluate(&spec.entry_conditions, &ctx)? {
                    continue;
                }
                if let Some(fill) = portfolio.buy_all(point.price)? {
                    debug!(
                        label = %point.label,
                        price = fill.price,
                        shares = fill.shares,
                        "buy"
                    );
                    transactions.push(Transaction::buy(&point.label, fill.price, fill.shares));
                }
            }
        }
    }

    info!(
        strategy = %spec.name,
        periods = series.len(),
        transactions = transactions.len(),
        wins,
        losses,
        "simulation complete"
    );

    Ok(SimulationOutcome {
        portfolio,
        transactions,
        wins,
        losses,
        first,
        last,
    })
}

/// Run one simulation and build its report. Holds no shared state, so
/// independent calls may run concurrently.
pub fn simulate_and_review(
    spec: &StrategySpec,
    series: &[PricePoint],
    config: &SimulationConfig,
) -> Result<Report, ReviewError> {
    let outcome = run_simulation(spec, series, config)?;
    let analysis = metrics::analyze(&outcome, config.initial_cash)?;
    Ok(report::build(spec, &outcome, &analysis, config.excerpt_len))
}
