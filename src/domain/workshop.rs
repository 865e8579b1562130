//! Strategy authoring: built-in templates and questionnaire-driven strategies.
//!
//! Produces [`StrategyDocument`]s only. The simulation engine never calls
//! into this module; it consumes the documents after validation.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use super::error::ReviewError;
use super::strategy::{
    ConditionDocument, ConditionGroupDocument, PositionSizingDocument, RebalancingDocument,
    RulesDocument, StrategyDocument,
};

const DEFAULT_UNIVERSE: &str = "CSI300";
const CUSTOM_MAX_POSITIONS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Value,
    Trend,
}

impl FromStr for Template {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(Template::Value),
            "trend" => Ok(Template::Trend),
            other => Err(ReviewError::configuration(format!(
                "unknown template '{other}', expected value or trend"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    #[default]
    Value,
    Growth,
    Trend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Horizon {
    Short,
    #[default]
    Medium,
    Long,
}

impl FromStr for Style {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "value" => Ok(Style::Value),
            "growth" => Ok(Style::Growth),
            "trend" => Ok(Style::Trend),
            other => Err(ReviewError::configuration(format!("unknown style '{other}'"))),
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(RiskTolerance::Low),
            "medium" => Ok(RiskTolerance::Medium),
            "high" => Ok(RiskTolerance::High),
            other => Err(ReviewError::configuration(format!(
                "unknown risk tolerance '{other}'"
            ))),
        }
    }
}

impl FromStr for Horizon {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(Horizon::Short),
            "medium" => Ok(Horizon::Medium),
            "long" => Ok(Horizon::Long),
            other => Err(ReviewError::configuration(format!(
                "unknown horizon '{other}'"
            ))),
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Value => write!(f, "Value"),
            Style::Growth => write!(f, "Growth"),
            Style::Trend => write!(f, "Trend"),
        }
    }
}

impl RiskTolerance {
    fn stop_loss_percent(&self) -> f64 {
        match self {
            RiskTolerance::Low => -8.0,
            RiskTolerance::Medium => -15.0,
            RiskTolerance::High => -22.0,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            RiskTolerance::Low => "Conservative",
            RiskTolerance::Medium => "Balanced",
            RiskTolerance::High => "Aggressive",
        }
    }
}

impl Horizon {
    fn rebalancing(&self) -> &'static str {
        match self {
            Horizon::Short => "MONTHLY",
            Horizon::Medium => "QUARTERLY",
            Horizon::Long => "HALF_YEARLY",
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Horizon::Short => "Short-term",
            Horizon::Medium => "Medium-term",
            Horizon::Long => "Long-term",
        }
    }
}

/// Questionnaire answers. Unanswered questions take the defaults
/// (value style, medium risk, medium horizon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Answers {
    pub style: Style,
    pub risk_tolerance: RiskTolerance,
    pub horizon: Horizon,
}

impl Answers {
    pub fn parse(
        style: Option<&str>,
        risk_tolerance: Option<&str>,
        horizon: Option<&str>,
    ) -> Result<Self, ReviewError> {
        Ok(Answers {
            style: style.map(str::parse).transpose()?.unwrap_or_default(),
            risk_tolerance: risk_tolerance
                .map(str::parse)
                .transpose()?
                .unwrap_or_default(),
            horizon: horizon.map(str::parse).transpose()?.unwrap_or_default(),
        })
    }
}

pub fn template(which: Template) -> StrategyDocument {
    match which {
        Template::Value => StrategyDocument {
            template_id: Some("template_value_01".into()),
            strategy_name: Some("Value Investing Select".into()),
            strategy_type: Some("Value".into()),
            description: Some(
                "Financially healthy companies the market currently undervalues; suited to long holding periods."
                    .into(),
            ),
            rules: Some(RulesDocument {
                universe: Some(vec![DEFAULT_UNIVERSE.into()]),
                entry_conditions: Some(ConditionGroupDocument::new(
                    "AND",
                    vec![
                        ConditionDocument::new("PE_TTM", "<", 15.0),
                        ConditionDocument::new("PB", "<", 2.0),
                        ConditionDocument::new("ROE", ">", 12.0),
                    ],
                )),
                exit_conditions: Some(ConditionGroupDocument::new(
                    "OR",
                    vec![
                        ConditionDocument::new("STOP_LOSS_PERCENT", "<=", -10.0),
                        ConditionDocument::new("TAKE_PROFIT_PERCENT", ">=", 25.0),
                    ],
                )),
                position_sizing: Some(sizing(5)),
                rebalancing: Some(rebalancing("QUARTERLY")),
            }),
            ..StrategyDocument::default()
        },
        Template::Trend => StrategyDocument {
            template_id: Some("template_trend_01".into()),
            strategy_name: Some("Trend Following Starter".into()),
            strategy_type: Some("Trend".into()),
            description: Some(
                "Follows strong stocks and buys breakouts above key resistance; expect larger swings."
                    .into(),
            ),
            rules: Some(RulesDocument {
                universe: Some(vec!["ALL".into()]),
                entry_conditions: Some(ConditionGroupDocument::new(
                    "AND",
                    vec![
                        ConditionDocument::new("PRICE_VS_MA60", ">", 1.1),
                        ConditionDocument::new("TURNOVER_RATE_5D", ">", 3.0),
                    ],
                )),
                exit_conditions: Some(ConditionGroupDocument::new(
                    "OR",
                    vec![
                        ConditionDocument::new("STOP_LOSS_PERCENT", "<=", -8.0),
                        ConditionDocument::new("PRICE_VS_MA20", "<", 1.0),
                    ],
                )),
                position_sizing: Some(sizing(8)),
                rebalancing: Some(rebalancing("MONTHLY")),
            }),
            ..StrategyDocument::default()
        },
    }
}

/// Build a personalised strategy from questionnaire answers.
pub fn build_strategy(answers: &Answers, user_id: &str) -> Result<StrategyDocument, ReviewError> {
    let user_id = user_id.trim();
    if user_id.is_empty() {
        return Err(ReviewError::configuration("user id is required"));
    }

    let entry = match answers.style {
        Style::Value => vec![
            ConditionDocument::new("PE_TTM", "<", 20.0),
            ConditionDocument::new("ROE", ">", 10.0),
        ],
        Style::Growth => vec![
            ConditionDocument::new("G_REVENUE_YOY", ">", 20.0),
            ConditionDocument::new("G_PROFIT_YOY", ">", 20.0),
        ],
        Style::Trend => vec![ConditionDocument::new("PRICE_VS_MA60", ">", 1.05)],
    };

    let exit = vec![ConditionDocument::new(
        "STOP_LOSS_PERCENT",
        "<=",
        answers.risk_tolerance.stop_loss_percent(),
    )];

    let horizon = answers.horizon.label();
    let risk = answers.risk_tolerance.label();
    let style = answers.style;

    Ok(StrategyDocument {
        strategy_id: Some(format!("strategy_{}", Uuid::new_v4())),
        strategy_name: Some(format!("{user_id}'s {horizon} {risk} {style} Strategy")),
        strategy_type: Some(style.to_string()),
        creation_method: Some("ai_guided".into()),
        author_id: Some(user_id.to_string()),
        description: Some(format!(
            "A strategy tailored to your {} horizon, {} risk appetite and {} investing style.",
            horizon.to_lowercase(),
            risk.to_lowercase(),
            style.to_string().to_lowercase()
        )),
        rules: Some(RulesDocument {
            universe: Some(vec![DEFAULT_UNIVERSE.into()]),
            entry_conditions: Some(ConditionGroupDocument::new("AND", entry)),
            exit_conditions: Some(ConditionGroupDocument::new("OR", exit)),
            position_sizing: Some(sizing(CUSTOM_MAX_POSITIONS)),
            rebalancing: Some(rebalancing(answers.horizon.rebalancing())),
        }),
        ..StrategyDocument::default()
    })
}

fn sizing(max_positions: u64) -> PositionSizingDocument {
    PositionSizingDocument {
        max_positions: Some(serde_json::Value::from(max_positions)),
        sizing_method: Some("EQUAL_WEIGHT".into()),
    }
}

fn rebalancing(frequency: &str) -> RebalancingDocument {
    RebalancingDocument {
        frequency: Some(frequency.into()),
    }
}
