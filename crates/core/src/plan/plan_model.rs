//! Budget plan domain models.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::forecast::ForecastMethod;
use crate::history::{AggregatedHistory, Period};

/// Forecasted allocation for one top-level module.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModuleBudget {
    pub amount_minor: i64,
}

/// Forecasted allocation for one day-to-day category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubBudget {
    pub category_id: String,
    pub name: String,
    pub amount_minor: i64,
}

/// Day-to-day module: total plus per-category sub-budgets.
/// Invariant: `amount_minor` equals the sum of the sub-budget amounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayToDayBudget {
    pub amount_minor: i64,
    pub sub_budgets: Vec<SubBudget>,
}

/// One month's forecasted budget allocation across all modules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPlan {
    pub period: Period,
    pub savings: ModuleBudget,
    pub commitments: ModuleBudget,
    pub events: ModuleBudget,
    pub dtd: DayToDayBudget,
}

/// Selection evidence for one forecasted series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SeriesMetrics {
    pub method: ForecastMethod,
    /// Backtest error of the chosen candidate; absent on the
    /// short-history fallback and the rent override.
    pub backtest_error: Option<f64>,
    pub blended: bool,
}

/// Per-target selection evidence for a whole plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlanMetrics {
    pub savings: SeriesMetrics,
    pub commitments: SeriesMetrics,
    pub events: SeriesMetrics,
    /// Keyed by category id.
    pub categories: HashMap<String, SeriesMetrics>,
}

/// Parameters for a forecast invocation. Unset fields use engine defaults.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPlanRequest {
    /// Trailing months of history to aggregate.
    pub months_back: Option<usize>,
    /// The month being planned; history ends at the month before it.
    pub next_period: Option<Period>,
}

/// Everything a forecast invocation produces: the plan, the selection
/// evidence, and the aggregated history rows it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPlanOutput {
    pub plan: BudgetPlan,
    pub metrics: PlanMetrics,
    pub rows: AggregatedHistory,
}

impl BudgetPlan {
    /// Checks the dtd-sum and non-negativity invariants.
    pub fn is_consistent(&self) -> bool {
        let sub_total: i64 = self.dtd.sub_budgets.iter().map(|s| s.amount_minor).sum();
        self.dtd.amount_minor == sub_total
            && self.dtd.amount_minor >= 0
            && self.savings.amount_minor >= 0
            && self.commitments.amount_minor >= 0
            && self.events.amount_minor >= 0
            && self.dtd.sub_budgets.iter().all(|s| s.amount_minor >= 0)
    }
}
