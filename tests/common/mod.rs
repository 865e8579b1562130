#![allow(dead_code)]

use std::collections::HashMap;

use stratreview::domain::error::ReviewError;
pub use stratreview::domain::price::{PricePoint, series_from_prices};
use stratreview::domain::strategy::{
    ConditionDocument, ConditionGroupDocument, RulesDocument, StrategyDocument, StrategySpec,
};
use stratreview::ports::price_port::PricePort;

pub struct MockPricePort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
}

impl MockPricePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_series(mut self, symbol: &str, series: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), series);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl PricePort for MockPricePort {
    fn fetch_series(&self, symbol: &str) -> Result<Vec<PricePoint>, ReviewError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(ReviewError::data_source(reason.clone()));
        }
        Ok(self.data.get(symbol).cloned().unwrap_or_default())
    }
}

pub fn cond(factor: &str, operator: &str, value: f64) -> ConditionDocument {
    ConditionDocument::new(factor, operator, value)
}

pub fn document(
    name: &str,
    entry: ConditionGroupDocument,
    exit: ConditionGroupDocument,
) -> StrategyDocument {
    StrategyDocument {
        strategy_name: Some(name.to_string()),
        rules: Some(RulesDocument {
            entry_conditions: Some(entry),
            exit_conditions: Some(exit),
            ..RulesDocument::default()
        }),
        ..StrategyDocument::default()
    }
}

/// Entry `price < 1000`, exit `percentChange <= exit_pct`.
pub fn always_enter(exit_pct: f64) -> StrategySpec {
    let doc = document(
        "Always Enter",
        ConditionGroupDocument::new("AND", vec![cond("PRICE", "<", 1000.0)]),
        ConditionGroupDocument::new("OR", vec![cond("PERCENT_CHANGE", "<=", exit_pct)]),
    );
    StrategySpec::from_document(&doc).unwrap()
}

/// Stop loss at `stop`, take profit at `take`, entry always true.
pub fn bracket(stop: f64, take: f64) -> StrategySpec {
    let doc = document(
        "Bracket",
        ConditionGroupDocument::new("AND", vec![cond("PRICE", ">", 0.0)]),
        ConditionGroupDocument::new(
            "OR",
            vec![
                cond("STOP_LOSS_PERCENT", "<=", stop),
                cond("TAKE_PROFIT_PERCENT", ">=", take),
            ],
        ),
    );
    StrategySpec::from_document(&doc).unwrap()
}

pub const VALUE_STRATEGY_JSON: &str = r#"{
  "strategyName": "Value Picks",
  "strategyType": "VALUE",
  "rules": {
    "universe": ["CSI300"],
    "entryConditions": {
      "logic": "AND",
      "conditions": [
        {"factor": "PE_TTM", "operator": "<", "value": 15},
        {"factor": "ROE", "operator": ">", "value": 12}
      ]
    },
    "exitConditions": {
      "logic": "OR",
      "conditions": [
        {"factor": "STOP_LOSS_PERCENT", "operator": "<=", "value": -10},
        {"factor": "TAKE_PROFIT_PERCENT", "operator": ">=", "value": 25}
      ]
    },
    "positionSizing": {"maxPositions": 5, "sizingMethod": "EQUAL_WEIGHT"},
    "rebalancing": {"frequency": "QUARTERLY"}
  }
}"#;

pub const SIMPLE_STRATEGY_JSON: &str = r#"{
  "strategyName": "Dip Buyer",
  "rules": {
    "entryConditions": {
      "logic": "AND",
      "conditions": [{"factor": "PRICE", "operator": "<", "value": 95}]
    },
    "exitConditions": {
      "logic": "OR",
      "conditions": [
        {"factor": "PERCENT_CHANGE", "operator": "<=", "value": -5},
        {"factor": "PERCENT_CHANGE", "operator": ">=", "value": 8}
      ]
    }
  }
}"#;

/// Points carrying PE_TTM and ROE alongside the price.
pub fn factor_series(rows: &[(f64, f64, f64)]) -> Vec<PricePoint> {
    rows.iter()
        .enumerate()
        .map(|(i, &(price, pe, roe))| {
            PricePoint::new(format!("day_{}", i + 1), price)
                .with_factor("PE_TTM", pe)
                .with_factor("ROE", roe)
        })
        .collect()
}
