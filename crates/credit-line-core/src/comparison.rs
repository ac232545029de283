//! Side-by-side comparison of line of credit scenarios.
//!
//! Each scenario is computed independently; the first one is the baseline
//! every other scenario is measured against.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::amortization::{compute_schedule, ScheduleResult};
use crate::config::CreditLineConfig;
use crate::error::CreditLineError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::CreditLineResult;

/// A configuration labelled for comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    pub config: CreditLineConfig,
}

/// Input for comparing two or more scenarios.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonInput {
    pub scenarios: Vec<NamedScenario>,
}

/// Summary metrics for one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub name: String,
    pub principal_and_interest_payment: Money,
    pub peak_balance: Money,
    pub total_interest: Money,
    pub total_fees: Money,
    pub total_payment: Money,
    pub effective_apr: Percent,
    /// Interest plus fees.
    pub cost_of_credit: Money,
    pub periods: usize,
}

/// Scenario minus baseline for each summary metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub name: String,
    pub baseline: String,
    pub principal_and_interest_payment: Money,
    pub peak_balance: Money,
    pub total_interest: Money,
    pub total_fees: Money,
    pub total_payment: Money,
    pub effective_apr: Percent,
    pub cost_of_credit: Money,
}

/// Output of a scenario comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonOutput {
    pub summaries: Vec<ScenarioSummary>,
    pub deltas: Vec<ScenarioDelta>,
    /// Scenario with the lowest interest plus fees; first wins ties.
    /// Scenarios that produced no schedule are not candidates; `None` when
    /// no scenario produced one.
    pub lowest_cost: Option<String>,
}

fn summarize(name: &str, result: &ScheduleResult) -> ScenarioSummary {
    ScenarioSummary {
        name: name.to_string(),
        principal_and_interest_payment: result.principal_and_interest_payment,
        peak_balance: result.peak_balance,
        total_interest: result.total_interest,
        total_fees: result.total_fees,
        total_payment: result.total_payment,
        effective_apr: result.effective_apr,
        cost_of_credit: result.total_interest + result.total_fees,
        periods: result.schedule.len(),
    }
}

fn delta(scenario: &ScenarioSummary, baseline: &ScenarioSummary) -> ScenarioDelta {
    ScenarioDelta {
        name: scenario.name.clone(),
        baseline: baseline.name.clone(),
        principal_and_interest_payment: scenario.principal_and_interest_payment
            - baseline.principal_and_interest_payment,
        peak_balance: scenario.peak_balance - baseline.peak_balance,
        total_interest: scenario.total_interest - baseline.total_interest,
        total_fees: scenario.total_fees - baseline.total_fees,
        total_payment: scenario.total_payment - baseline.total_payment,
        effective_apr: scenario.effective_apr - baseline.effective_apr,
        cost_of_credit: scenario.cost_of_credit - baseline.cost_of_credit,
    }
}

/// Run every scenario and compare it against the first.
pub fn compare_scenarios(
    input: &ComparisonInput,
) -> CreditLineResult<ComputationOutput<ComparisonOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.scenarios.len() < 2 {
        return Err(CreditLineError::InsufficientData(
            "Comparison requires at least 2 scenarios".into(),
        ));
    }
    let mut seen = HashSet::new();
    for scenario in &input.scenarios {
        if scenario.name.trim().is_empty() {
            return Err(CreditLineError::InvalidInput {
                field: "scenarios.name".into(),
                reason: "Scenario names must not be empty".into(),
            });
        }
        if !seen.insert(scenario.name.as_str()) {
            return Err(CreditLineError::InvalidInput {
                field: "scenarios.name".into(),
                reason: format!("Duplicate scenario name '{}'", scenario.name),
            });
        }
    }

    let summaries: Vec<ScenarioSummary> = input
        .scenarios
        .iter()
        .map(|s| {
            let result = compute_schedule(&s.config);
            if result.schedule.is_empty() {
                warnings.push(format!(
                    "Scenario '{}': negative rate or non-positive term, all metrics are zero",
                    s.name
                ));
            }
            summarize(&s.name, &result)
        })
        .collect();

    let baseline = &summaries[0];
    let deltas: Vec<ScenarioDelta> = summaries[1..]
        .iter()
        .map(|s| delta(s, baseline))
        .collect();

    let lowest_cost = summaries
        .iter()
        .filter(|s| s.periods > 0)
        .fold(None::<&ScenarioSummary>, |best, s| match best {
            Some(b) if b.cost_of_credit <= s.cost_of_credit => Some(b),
            _ => Some(s),
        })
        .map(|s| s.name.clone());
    if lowest_cost.is_none() {
        warnings.push("No scenario produced a schedule; lowest cost is undetermined".into());
    }

    let output = ComparisonOutput {
        summaries,
        deltas,
        lowest_cost,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Line of Credit Scenario Comparison",
        &serde_json::json!({
            "scenarios": input.scenarios.iter().map(|s| s.name.as_str()).collect::<Vec<_>>(),
            "baseline": input.scenarios[0].name,
        }),
        warnings,
        elapsed,
        output,
    ))
}
