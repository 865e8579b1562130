//! Review report assembly.

use serde::Serialize;

use super::error::ReviewError;
use super::metrics::Analysis;
use super::simulation::SimulationOutcome;
use super::strategy::StrategySpec;
use super::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationPeriod {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total_return_percent: f64,
    pub win_rate_percent: f64,
    pub total_trades: usize,
    pub final_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub strategy_name: String,
    pub simulation_period: SimulationPeriod,
    pub performance_metrics: PerformanceMetrics,
    pub ai_coaching_insights: Vec<String>,
    /// Earliest transactions only, bounded by the excerpt length.
    pub transaction_history: Vec<Transaction>,
}

impl Report {
    pub fn to_json_pretty(&self) -> Result<String, ReviewError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn build(
    spec: &StrategySpec,
    outcome: &SimulationOutcome,
    analysis: &Analysis,
    excerpt_len: usize,
) -> Report {
    Report {
        strategy_name: spec.name.clone(),
        simulation_period: SimulationPeriod {
            start: outcome.first.label.clone(),
            end: outcome.last.label.clone(),
        },
        performance_metrics: PerformanceMetrics {
            total_return_percent: analysis.total_return_percent,
            win_rate_percent: analysis.win_rate_percent,
            total_trades: analysis.total_trades,
            final_value: analysis.final_value,
        },
        ai_coaching_insights: analysis
            .insights
            .iter()
            .map(|i| i.text().to_string())
            .collect(),
        transaction_history: outcome
            .transactions
            .iter()
            .take(excerpt_len)
            .cloned()
            .collect(),
    }
}
