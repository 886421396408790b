pub mod plan_model;
pub mod plan_service;
pub mod plan_traits;

pub use plan_model::{
    BudgetPlan, DayToDayBudget, ForecastPlanOutput, ForecastPlanRequest, ModuleBudget,
    PlanMetrics, SeriesMetrics, SubBudget,
};
pub use plan_service::PlanService;
pub use plan_traits::{PlanRepositoryTrait, PlanServiceTrait};
