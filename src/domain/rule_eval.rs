//! Condition and rule-group evaluation.
//!
//! # Evaluation Semantics
//!
//! - A condition resolves its factor from the [`EvalContext`] and compares it
//!   with the threshold; `==` uses an absolute tolerance of `1e-9`
//! - `AND`: short-circuits on first `false`
//! - `OR`: short-circuits on first `true`
//! - Empty groups and unresolvable factors are configuration errors, never
//!   a silent `false`

use super::condition::{Condition, ConditionGroup, Factor, Logic, Operator};
use super::error::ReviewError;
use super::price::PricePoint;

const EPSILON: f64 = 1e-9;

/// Values visible to a condition at one simulated period.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub point: &'a PricePoint,
    /// Entry price of the open position, if any.
    pub entry_price: Option<f64>,
}

impl<'a> EvalContext<'a> {
    pub fn flat(point: &'a PricePoint) -> Self {
        EvalContext {
            point,
            entry_price: None,
        }
    }

    pub fn long(point: &'a PricePoint, entry_price: f64) -> Self {
        EvalContext {
            point,
            entry_price: Some(entry_price),
        }
    }

    pub fn resolve(&self, factor: &Factor) -> Result<f64, ReviewError> {
        match factor {
            Factor::Price => Ok(self.point.price),
            Factor::PercentChange => match self.entry_price {
                Some(entry) if entry > 0.0 => Ok(percent_change(entry, self.point.price)),
                _ => Err(ReviewError::configuration(format!(
                    "factor {factor} requires an open position"
                ))),
            },
            Factor::Custom(name) => self.point.factor(name).ok_or_else(|| {
                ReviewError::configuration(format!(
                    "unknown factor '{name}' at {}",
                    self.point.label
                ))
            }),
        }
    }
}

/// `(current - entry) / entry * 100`
pub fn percent_change(entry: f64, current: f64) -> f64 {
    (current - entry) / entry * 100.0
}

pub fn compare(operator: Operator, left: f64, right: f64) -> bool {
    match operator {
        Operator::Lt => left < right,
        Operator::Le => left <= right,
        Operator::Gt => left > right,
        Operator::Ge => left >= right,
        Operator::Eq => (left - right).abs() < EPSILON,
    }
}

pub fn evaluate_condition(condition: &Condition, ctx: &EvalContext) -> Result<bool, ReviewError> {
    let value = ctx.resolve(&condition.factor)?;
    Ok(compare(condition.operator, value, condition.value))
}

pub fn evaluate(group: &ConditionGroup, ctx: &EvalContext) -> Result<bool, ReviewError> {
    if group.conditions.is_empty() {
        return Err(ReviewError::configuration(format!(
            "{} group must specify at least one condition",
            group.logic
        )));
    }
    match group.logic {
        Logic::And => {
            for c in &group.conditions {
                if !evaluate_condition(c, ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        Logic::Or => {
            for c in &group.conditions {
                if evaluate_condition(c, ctx)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }
}
