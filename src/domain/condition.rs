//! Rule condition data structures.
//!
//! - `Factor`: the named signal a condition reads
//! - `Operator`: one of the five numeric comparisons
//! - `Condition`: `factor operator value`
//! - `ConditionGroup`: conditions combined with `AND` / `OR`

use std::fmt;
use std::str::FromStr;

use super::error::ReviewError;

/// A named numeric signal resolved against the evaluation context.
#[derive(Debug, Clone, PartialEq)]
pub enum Factor {
    /// Current price.
    Price,
    /// Percent change from the open position's entry price.
    PercentChange,
    /// Any other signal, looked up on the price point by exact name.
    Custom(String),
}

impl Factor {
    /// Parse a factor name. Built-ins match case-insensitively with `_`/`-`
    /// ignored; anything else is a custom factor.
    pub fn parse(name: &str) -> Result<Factor, ReviewError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ReviewError::configuration("condition factor is empty"));
        }
        let normalized: String = trimmed
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_uppercase();
        let factor = match normalized.as_str() {
            "PRICE" | "CLOSE" => Factor::Price,
            "PERCENTCHANGE" | "STOPLOSSPERCENT" | "TAKEPROFITPERCENT" => Factor::PercentChange,
            _ => Factor::Custom(trimmed.to_string()),
        };
        Ok(factor)
    }

    /// True for factors that only exist while a position is open.
    pub fn requires_position(&self) -> bool {
        matches!(self, Factor::PercentChange)
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Factor::Price => write!(f, "PRICE"),
            Factor::PercentChange => write!(f, "PERCENT_CHANGE"),
            Factor::Custom(name) => write!(f, "{name}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Lt => "<",
            Operator::Le => "<=",
            Operator::Gt => ">",
            Operator::Ge => ">=",
            Operator::Eq => "==",
        }
    }
}

impl FromStr for Operator {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::Le),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::Ge),
            "==" => Ok(Operator::Eq),
            other => Err(ReviewError::configuration(format!(
                "unknown operator '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Logic {
    And,
    Or,
}

impl FromStr for Logic {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AND" => Ok(Logic::And),
            "OR" => Ok(Logic::Or),
            other => Err(ReviewError::configuration(format!(
                "unknown logic '{other}', expected AND or OR"
            ))),
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::And => write!(f, "AND"),
            Logic::Or => write!(f, "OR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub factor: Factor,
    pub operator: Operator,
    pub value: f64,
}

impl Condition {
    pub fn new(factor: Factor, operator: Operator, value: f64) -> Self {
        Condition {
            factor,
            operator,
            value,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.factor, self.operator, self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionGroup {
    pub logic: Logic,
    pub conditions: Vec<Condition>,
}

impl ConditionGroup {
    /// Build a group, rejecting an empty condition list.
    pub fn new(logic: Logic, conditions: Vec<Condition>) -> Result<Self, ReviewError> {
        if conditions.is_empty() {
            return Err(ReviewError::configuration(format!(
                "{logic} group must specify at least one condition"
            )));
        }
        Ok(ConditionGroup { logic, conditions })
    }

    pub fn factors(&self) -> impl Iterator<Item = &Factor> {
        self.conditions.iter().map(|c| &c.factor)
    }
}

impl fmt::Display for ConditionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joiner = format!(" {} ", self.logic);
        let parts: Vec<String> = self.conditions.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join(&joiner))
    }
}
