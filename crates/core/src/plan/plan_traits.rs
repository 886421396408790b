use async_trait::async_trait;

use super::plan_model::{BudgetPlan, ForecastPlanOutput, ForecastPlanRequest};
use crate::errors::Result;
use crate::history::Period;

/// Trait for budget-plan persistence.
///
/// Implemented by the storage layer; the engine itself never retries or
/// reconciles a partially applied plan.
#[async_trait]
pub trait PlanRepositoryTrait: Send + Sync {
    /// Fetches the stored plan for a period, if any.
    async fn get_plan(&self, period: Period) -> Result<Option<BudgetPlan>>;

    /// Persists a plan for a period that has none.
    async fn create_plan(&self, plan: BudgetPlan) -> Result<BudgetPlan>;

    /// Replaces the existing plan for a period.
    async fn replace_plan(&self, period: Period, plan: BudgetPlan) -> Result<BudgetPlan>;
}

/// Trait for the forecasting engine's entry points.
#[async_trait]
pub trait PlanServiceTrait: Send + Sync {
    /// Projects the next month's budget allocation from history.
    ///
    /// Fails with [`crate::Error::NoHistoricalData`] when the aggregated
    /// history is empty; performs no writes.
    async fn forecast_plan(&self, request: ForecastPlanRequest) -> Result<ForecastPlanOutput>;

    /// Persists a forecasted plan: creates it when the period has no plan
    /// yet, replaces it otherwise.
    async fn apply_forecast_plan(&self, period: Period, plan: BudgetPlan) -> Result<BudgetPlan>;
}
