//! Strategy documents and their validated, typed form.
//!
//! A [`StrategyDocument`] is the loose JSON shape produced by the authoring
//! side. [`StrategySpec::from_document`] checks it and builds the typed
//! strategy the engine consumes; nothing reaches the simulation loop
//! unvalidated.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::condition::{Condition, ConditionGroup, Factor, Logic, Operator};
use super::error::ReviewError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<RulesDocument>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universe: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry_conditions: Option<ConditionGroupDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exit_conditions: Option<ConditionGroupDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_sizing: Option<PositionSizingDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rebalancing: Option<RebalancingDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroupDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logic: Option<String>,
    #[serde(default)]
    pub conditions: Vec<ConditionDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSizingDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_positions: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizing_method: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalancingDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
}

impl StrategyDocument {
    pub fn from_json(input: &str) -> Result<Self, ReviewError> {
        serde_json::from_str(input).map_err(|e| {
            ReviewError::configuration(format!("invalid strategy document: {e}"))
        })
    }

    pub fn to_json_pretty(&self) -> Result<String, ReviewError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl ConditionDocument {
    pub fn new(factor: &str, operator: &str, value: f64) -> Self {
        ConditionDocument {
            factor: Some(factor.to_string()),
            operator: Some(operator.to_string()),
            value: Some(serde_json::Value::from(value)),
        }
    }
}

impl ConditionGroupDocument {
    pub fn new(logic: &str, conditions: Vec<ConditionDocument>) -> Self {
        ConditionGroupDocument {
            logic: Some(logic.to_string()),
            conditions,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingMethod {
    EqualWeight,
}

impl FromStr for SizingMethod {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EQUAL_WEIGHT" => Ok(SizingMethod::EqualWeight),
            other => Err(ReviewError::configuration(format!(
                "unknown sizing method '{other}'"
            ))),
        }
    }
}

impl fmt::Display for SizingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingMethod::EqualWeight => write!(f, "EQUAL_WEIGHT"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    HalfYearly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "QUARTERLY" => Ok(Frequency::Quarterly),
            "HALF_YEARLY" => Ok(Frequency::HalfYearly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(ReviewError::configuration(format!(
                "unknown rebalancing frequency '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Daily => "DAILY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Quarterly => "QUARTERLY",
            Frequency::HalfYearly => "HALF_YEARLY",
            Frequency::Yearly => "YEARLY",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionSizing {
    pub max_positions: usize,
    pub sizing_method: SizingMethod,
}

impl Default for PositionSizing {
    fn default() -> Self {
        PositionSizing {
            max_positions: 1,
            sizing_method: SizingMethod::EqualWeight,
        }
    }
}

/// Validated strategy. Read-only input to the simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategySpec {
    pub name: String,
    pub entry_conditions: ConditionGroup,
    pub exit_conditions: ConditionGroup,
    pub position_sizing: PositionSizing,
    pub rebalancing: Frequency,
    pub universe: BTreeSet<String>,
}

impl StrategySpec {
    pub fn from_json(input: &str) -> Result<Self, ReviewError> {
        Self::from_document(&StrategyDocument::from_json(input)?)
    }

    pub fn from_document(doc: &StrategyDocument) -> Result<Self, ReviewError> {
        let name = doc
            .strategy_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ReviewError::configuration("strategyName is required"))?
            .to_string();

        let rules = doc
            .rules
            .as_ref()
            .ok_or_else(|| ReviewError::configuration("rules is required"))?;

        let entry_doc = rules
            .entry_conditions
            .as_ref()
            .ok_or_else(|| ReviewError::configuration("rules.entryConditions is required"))?;
        let exit_doc = rules
            .exit_conditions
            .as_ref()
            .ok_or_else(|| ReviewError::configuration("rules.exitConditions is required"))?;

        let entry_conditions = build_group(entry_doc, "entryConditions")?;
        let exit_conditions = build_group(exit_doc, "exitConditions")?;

        if let Some(factor) = entry_conditions.factors().find(|f| f.requires_position()) {
            return Err(ReviewError::configuration(format!(
                "entryConditions cannot reference {factor}: no position is open at entry"
            )));
        }

        let position_sizing = match &rules.position_sizing {
            Some(ps) => build_position_sizing(ps)?,
            None => PositionSizing::default(),
        };

        let rebalancing = match rules.rebalancing.as_ref().and_then(|r| r.frequency.as_deref()) {
            Some(freq) => freq.parse()?,
            None => Frequency::Quarterly,
        };

        let universe = rules
            .universe
            .iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(StrategySpec {
            name,
            entry_conditions,
            exit_conditions,
            position_sizing,
            rebalancing,
            universe,
        })
    }

    /// Custom factors either group reads from price points.
    pub fn custom_factors(&self) -> BTreeSet<&str> {
        self.entry_conditions
            .factors()
            .chain(self.exit_conditions.factors())
            .filter_map(|f| match f {
                Factor::Custom(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

fn build_group(doc: &ConditionGroupDocument, field: &str) -> Result<ConditionGroup, ReviewError> {
    let logic: Logic = doc
        .logic
        .as_deref()
        .ok_or_else(|| ReviewError::configuration(format!("{field}.logic is required")))?
        .parse()?;

    let conditions = doc
        .conditions
        .iter()
        .enumerate()
        .map(|(i, c)| build_condition(c, &format!("{field}.conditions[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    ConditionGroup::new(logic, conditions)
        .map_err(|e| ReviewError::configuration(format!("{field}: {e}")))
}

fn build_condition(doc: &ConditionDocument, path: &str) -> Result<Condition, ReviewError> {
    let factor_name = doc
        .factor
        .as_deref()
        .ok_or_else(|| ReviewError::configuration(format!("{path}.factor is required")))?;
    let factor = Factor::parse(factor_name)?;

    let operator: Operator = doc
        .operator
        .as_deref()
        .ok_or_else(|| ReviewError::configuration(format!("{path}.operator is required")))?
        .parse()?;

    let value = match &doc.value {
        Some(v) => v.as_f64().filter(|x| x.is_finite()).ok_or_else(|| {
            ReviewError::configuration(format!("{path}.value must be a finite number, got {v}"))
        })?,
        None => {
            return Err(ReviewError::configuration(format!(
                "{path}.value is required"
            )));
        }
    };

    Ok(Condition::new(factor, operator, value))
}

fn build_position_sizing(doc: &PositionSizingDocument) -> Result<PositionSizing, ReviewError> {
    let max_positions = match &doc.max_positions {
        Some(v) => v
            .as_u64()
            .filter(|n| *n >= 1)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                ReviewError::configuration(format!(
                    "positionSizing.maxPositions must be a positive integer, got {v}"
                ))
            })?,
        None => 1,
    };
    let sizing_method = match &doc.sizing_method {
        Some(m) => m.parse()?,
        None => SizingMethod::EqualWeight,
    };
    Ok(PositionSizing {
        max_positions,
        sizing_method,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALUE_STRATEGY: &str = r#"{
        "strategyName": "Value Select",
        "rules": {
            "universe": ["CSI300"],
            "entryConditions": {"logic": "AND", "conditions": [
                {"factor": "PE_TTM", "operator": "<", "value": 15},
                {"factor": "ROE", "operator": ">", "value": 12}
            ]},
            "exitConditions": {"logic": "OR", "conditions": [
                {"factor": "STOP_LOSS_PERCENT", "operator": "<=", "value": -10},
                {"factor": "TAKE_PROFIT_PERCENT", "operator": ">=", "value": 25}
            ]},
            "positionSizing": {"maxPositions": 5, "sizingMethod": "EQUAL_WEIGHT"},
            "rebalancing": {"frequency": "QUARTERLY"}
        }
    }"#;

    fn config_reason(result: Result<StrategySpec, ReviewError>) -> String {
        match result {
            Err(ReviewError::Configuration { reason }) => reason,
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn parses_full_document() {
        let spec = StrategySpec::from_json(VALUE_STRATEGY).unwrap();
        assert_eq!(spec.name, "Value Select");
        assert_eq!(spec.entry_conditions.logic, Logic::And);
        assert_eq!(spec.entry_conditions.conditions.len(), 2);
        assert_eq!(
            spec.entry_conditions.conditions[0].factor,
            Factor::Custom("PE_TTM".into())
        );
        assert_eq!(spec.exit_conditions.logic, Logic::Or);
        assert_eq!(
            spec.exit_conditions.conditions[1].factor,
            Factor::PercentChange
        );
        assert_eq!(spec.position_sizing.max_positions, 5);
        assert_eq!(spec.rebalancing, Frequency::Quarterly);
        assert!(spec.universe.contains("CSI300"));
    }

    #[test]
    fn custom_factors_collected() {
        let spec = StrategySpec::from_json(VALUE_STRATEGY).unwrap();
        let factors: Vec<&str> = spec.custom_factors().into_iter().collect();
        assert_eq!(factors, vec!["PE_TTM", "ROE"]);
    }

    #[test]
    fn defaults_applied() {
        let json = r#"{
            "strategyName": "Minimal",
            "rules": {
                "entryConditions": {"logic": "AND", "conditions": [{"factor": "price", "operator": "<", "value": 1000}]},
                "exitConditions": {"logic": "OR", "conditions": [{"factor": "percentChange", "operator": "<=", "value": -50}]}
            }
        }"#;
        let spec = StrategySpec::from_json(json).unwrap();
        assert_eq!(spec.position_sizing, PositionSizing::default());
        assert_eq!(spec.rebalancing, Frequency::Quarterly);
        assert!(spec.universe.is_empty());
    }

    #[test]
    fn missing_exit_conditions_rejected() {
        let json = r#"{
            "strategyName": "No exit",
            "rules": {
                "entryConditions": {"logic": "AND", "conditions": [{"factor": "price", "operator": "<", "value": 1000}]}
            }
        }"#;
        let reason = config_reason(StrategySpec::from_json(json));
        assert!(reason.contains("exitConditions"));
    }

    #[test]
    fn missing_entry_conditions_rejected() {
        let json = r#"{
            "strategyName": "No entry",
            "rules": {
                "exitConditions": {"logic": "OR", "conditions": [{"factor": "percentChange", "operator": "<=", "value": -5}]}
            }
        }"#;
        let reason = config_reason(StrategySpec::from_json(json));
        assert!(reason.contains("entryConditions"));
    }

    #[test]
    fn missing_name_rejected() {
        let json = r#"{"rules": {}}"#;
        let reason = config_reason(StrategySpec::from_json(json));
        assert!(reason.contains("strategyName"));
    }

    #[test]
    fn missing_rules_rejected() {
        let json = r#"{"strategyName": "x"}"#;
        let reason = config_reason(StrategySpec::from_json(json));
        assert!(reason.contains("rules"));
    }

    #[test]
    fn non_numeric_value_rejected() {
        let json = r#"{
            "strategyName": "Bad",
            "rules": {
                "entryConditions": {"logic": "AND", "conditions": [{"factor": "price", "operator": "<", "value": "cheap"}]},
                "exitConditions": {"logic": "OR", "conditions": [{"factor": "percentChange", "operator": "<=", "value": -5}]}
            }
        }"#;
        let reason = config_reason(StrategySpec::from_json(json));
        assert!(reason.contains("entryConditions.conditions[0].value"));
    }

    #[test]
    fn empty_condition_list_rejected() {
        let json = r#"{
            "strategyName": "Empty",
            "rules": {
                "entryConditions": {"logic": "AND", "conditions": []},
                "exitConditions": {"logic": "OR", "conditions": [{"factor": "percentChange", "operator": "<=", "value": -5}]}
            }
        }"#;
        let reason = config_reason(StrategySpec::from_json(json));
        assert!(reason.contains("at least one condition"));
    }

    #[test]
    fn unknown_operator_rejected() {
        let json = r#"{
            "strategyName": "Bad op",
            "rules": {
                "entryConditions": {"logic": "AND", "conditions": [{"factor": "price", "operator": "=>", "value": 1}]},
                "exitConditions": {"logic": "OR", "conditions": [{"factor": "percentChange", "operator": "<=", "value": -5}]}
            }
        }"#;
        assert!(StrategySpec::from_json(json).is_err());
    }

    #[test]
    fn entry_on_percent_change_rejected() {
        let json = r#"{
            "strategyName": "Backwards",
            "rules": {
                "entryConditions": {"logic": "AND", "conditions": [{"factor": "STOP_LOSS_PERCENT", "operator": "<", "value": 1}]},
                "exitConditions": {"logic": "OR", "conditions": [{"factor": "percentChange", "operator": "<=", "value": -5}]}
            }
        }"#;
        let reason = config_reason(StrategySpec::from_json(json));
        assert!(reason.contains("PERCENT_CHANGE"));
    }

    #[test]
    fn zero_max_positions_rejected() {
        let json = r#"{
            "strategyName": "Zero",
            "rules": {
                "entryConditions": {"logic": "AND", "conditions": [{"factor": "price", "operator": "<", "value": 1}]},
                "exitConditions": {"logic": "OR", "conditions": [{"factor": "percentChange", "operator": "<=", "value": -5}]},
                "positionSizing": {"maxPositions": 0}
            }
        }"#;
        assert!(StrategySpec::from_json(json).is_err());
    }

    #[test]
    fn malformed_json_is_configuration_error() {
        let err = StrategySpec::from_json("{ nope").unwrap_err();
        assert!(matches!(err, ReviewError::Configuration { .. }));
    }

    #[test]
    fn document_round_trips_optional_fields() {
        let doc = StrategyDocument::from_json(VALUE_STRATEGY).unwrap();
        let out = doc.to_json_pretty().unwrap();
        assert!(out.contains("\"strategyName\": \"Value Select\""));
        assert!(!out.contains("strategyId"));
    }

    #[test]
    fn frequency_parse_and_display() {
        assert_eq!("half_yearly".parse::<Frequency>().unwrap(), Frequency::HalfYearly);
        assert_eq!(Frequency::Monthly.to_string(), "MONTHLY");
        assert!("HOURLY".parse::<Frequency>().is_err());
    }
}
