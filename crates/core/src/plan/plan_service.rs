//! Plan assembly: the engine's top-level entry points.
//!
//! `forecast_plan` fetches all history sources concurrently (fail-fast),
//! aggregates them, forecasts each target series, and assembles a single
//! budget plan. It performs no writes; persistence happens only through
//! the explicitly separate `apply_forecast_plan`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use rayon::prelude::*;

use super::plan_model::{
    BudgetPlan, DayToDayBudget, ForecastPlanOutput, ForecastPlanRequest, ModuleBudget,
    PlanMetrics, SeriesMetrics, SubBudget,
};
use super::plan_traits::{PlanRepositoryTrait, PlanServiceTrait};
use crate::categories::CategoryRepositoryTrait;
use crate::commitments::CommitmentRepositoryTrait;
use crate::constants::DTD_FALLBACK_TOP_N;
use crate::errors::{Error, Result};
use crate::events::EventRepositoryTrait;
use crate::expenses::ExpenseRepositoryTrait;
use crate::forecast::{
    forecast_series, round_minor_to_unit, ForecastConfig, ForecastMethod, SeriesForecast,
};
use crate::history::{CategorySeries, HistoryAggregator, Period};
use crate::savings::SavingsRepositoryTrait;

/// The budget forecasting engine, wired to its read collaborators and the
/// plan store. All state is per-invocation; the service itself is
/// immutable and cheap to share.
pub struct PlanService {
    expense_repository: Arc<dyn ExpenseRepositoryTrait>,
    commitment_repository: Arc<dyn CommitmentRepositoryTrait>,
    event_repository: Arc<dyn EventRepositoryTrait>,
    savings_repository: Arc<dyn SavingsRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
    plan_repository: Arc<dyn PlanRepositoryTrait>,
    config: ForecastConfig,
}

impl PlanService {
    pub fn new(
        expense_repository: Arc<dyn ExpenseRepositoryTrait>,
        commitment_repository: Arc<dyn CommitmentRepositoryTrait>,
        event_repository: Arc<dyn EventRepositoryTrait>,
        savings_repository: Arc<dyn SavingsRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
        plan_repository: Arc<dyn PlanRepositoryTrait>,
    ) -> Self {
        PlanService {
            expense_repository,
            commitment_repository,
            event_repository,
            savings_repository,
            category_repository,
            plan_repository,
            config: ForecastConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ForecastConfig) -> Self {
        self.config = config;
        self
    }

    fn series_metrics(forecast: &SeriesForecast) -> SeriesMetrics {
        SeriesMetrics {
            method: forecast.result.method,
            backtest_error: forecast.backtest_error,
            blended: forecast.result.blended,
        }
    }

    /// Day-to-day categories worth budgeting: those with nonzero activity
    /// in the window; when none qualify, the top categories by lifetime
    /// spend (keeping sub-budgets populated for fresh histories).
    fn select_dtd_categories(categories: &[CategorySeries]) -> Vec<&CategorySeries> {
        let active: Vec<&CategorySeries> = categories
            .iter()
            .filter(|c| c.series.total_minor() != 0)
            .collect();
        if !active.is_empty() {
            return active;
        }
        let mut all: Vec<&CategorySeries> = categories.iter().collect();
        all.sort_by(|a, b| b.series.total_minor().cmp(&a.series.total_minor()));
        all.truncate(DTD_FALLBACK_TOP_N);
        all
    }

    /// Forecasts one category. Categories whose resolved name mentions
    /// rent get the literal last-known value: rent is typically fixed,
    /// and a regression-smoothed projection of it would mislead.
    fn forecast_category(
        category: &CategorySeries,
        target: Period,
        config: &ForecastConfig,
    ) -> (SubBudget, SeriesMetrics) {
        if category.name.to_lowercase().contains("rent") {
            let amount_minor = round_minor_to_unit(
                category.series.last_amount_minor().max(0),
                config.rounding_unit_minor,
            );
            return (
                SubBudget {
                    category_id: category.category_id.clone(),
                    name: category.name.clone(),
                    amount_minor,
                },
                SeriesMetrics {
                    method: ForecastMethod::LastValue,
                    backtest_error: None,
                    blended: false,
                },
            );
        }

        let forecast = forecast_series(&category.series, target, false, config);
        (
            SubBudget {
                category_id: category.category_id.clone(),
                name: category.name.clone(),
                amount_minor: forecast.result.amount_minor,
            },
            Self::series_metrics(&forecast),
        )
    }
}

#[async_trait]
impl PlanServiceTrait for PlanService {
    async fn forecast_plan(&self, request: ForecastPlanRequest) -> Result<ForecastPlanOutput> {
        let next_period = request
            .next_period
            .unwrap_or_else(|| Period::from_date(Utc::now().date_naive()).next());
        let months_back = request.months_back.unwrap_or(self.config.months_back);
        debug!(
            "forecasting plan for {} over {} months of history",
            next_period, months_back
        );

        // Fetch every history source concurrently; any failure aborts the
        // whole invocation (no partial plans).
        let (expenses, commitments, events, ledgers, catalog) = tokio::try_join!(
            self.expense_repository.get_expenses(),
            self.commitment_repository.get_commitments(),
            self.event_repository.get_events(),
            self.savings_repository.get_savings_ledgers(),
            self.category_repository.get_categories(),
        )?;

        let aggregator = HistoryAggregator::new(
            next_period.prev(),
            months_back,
            self.config.savings_clamp_zero,
        );
        let history = aggregator.aggregate(&expenses, &commitments, &events, &ledgers, &catalog);
        if history.is_empty() {
            return Err(Error::NoHistoricalData);
        }

        let savings = forecast_series(&history.savings, next_period, false, &self.config);
        let commitments_fc = forecast_series(&history.commitments, next_period, false, &self.config);
        // Event spend is heavy-tailed: use the log-transformed regression.
        let events_fc = forecast_series(&history.events, next_period, true, &self.config);

        let selected = Self::select_dtd_categories(&history.categories);
        // Independent series with no shared mutable state: forecast them
        // in parallel.
        let per_category: Vec<(SubBudget, SeriesMetrics)> = selected
            .par_iter()
            .map(|category| Self::forecast_category(category, next_period, &self.config))
            .collect();

        let mut sub_budgets = Vec::with_capacity(per_category.len());
        let mut category_metrics: HashMap<String, SeriesMetrics> = HashMap::new();
        for (sub, metrics) in per_category {
            category_metrics.insert(sub.category_id.clone(), metrics);
            sub_budgets.push(sub);
        }
        let dtd_total: i64 = sub_budgets.iter().map(|s| s.amount_minor).sum();

        let plan = BudgetPlan {
            period: next_period,
            savings: ModuleBudget {
                amount_minor: savings.result.amount_minor,
            },
            commitments: ModuleBudget {
                amount_minor: commitments_fc.result.amount_minor,
            },
            events: ModuleBudget {
                amount_minor: events_fc.result.amount_minor,
            },
            dtd: DayToDayBudget {
                amount_minor: dtd_total,
                sub_budgets,
            },
        };
        debug_assert!(plan.is_consistent());

        info!(
            "forecasted plan for {}: savings={} commitments={} events={} dtd={} ({} categories)",
            next_period,
            plan.savings.amount_minor,
            plan.commitments.amount_minor,
            plan.events.amount_minor,
            plan.dtd.amount_minor,
            plan.dtd.sub_budgets.len()
        );

        Ok(ForecastPlanOutput {
            plan,
            metrics: PlanMetrics {
                savings: Self::series_metrics(&savings),
                commitments: Self::series_metrics(&commitments_fc),
                events: Self::series_metrics(&events_fc),
                categories: category_metrics,
            },
            rows: history,
        })
    }

    async fn apply_forecast_plan(&self, period: Period, plan: BudgetPlan) -> Result<BudgetPlan> {
        match self.plan_repository.get_plan(period).await? {
            Some(_) => {
                debug!("replacing existing plan for {}", period);
                self.plan_repository.replace_plan(period, plan).await
            }
            None => {
                debug!("creating plan for {}", period);
                self.plan_repository.create_plan(plan).await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::Category;
    use crate::commitments::{Commitment, CommitmentStatus};
    use crate::events::Event;
    use crate::expenses::Expense;
    use crate::savings::{LedgerEntry, LedgerEntryKind, SavingsGoalLedger};
    use chrono::NaiveDate;
    use std::sync::RwLock;

    // ============== Mock Repositories ==============

    struct MockExpenseRepository {
        expenses: Vec<Expense>,
        fail: bool,
    }

    #[async_trait]
    impl ExpenseRepositoryTrait for MockExpenseRepository {
        async fn get_expenses(&self) -> Result<Vec<Expense>> {
            if self.fail {
                return Err(Error::Repository("expense store unavailable".to_string()));
            }
            Ok(self.expenses.clone())
        }
    }

    struct MockCommitmentRepository {
        commitments: Vec<Commitment>,
    }

    #[async_trait]
    impl CommitmentRepositoryTrait for MockCommitmentRepository {
        async fn get_commitments(&self) -> Result<Vec<Commitment>> {
            Ok(self.commitments.clone())
        }
    }

    struct MockEventRepository {
        events: Vec<Event>,
    }

    #[async_trait]
    impl EventRepositoryTrait for MockEventRepository {
        async fn get_events(&self) -> Result<Vec<Event>> {
            Ok(self.events.clone())
        }
    }

    struct MockSavingsRepository {
        ledgers: Vec<SavingsGoalLedger>,
    }

    #[async_trait]
    impl SavingsRepositoryTrait for MockSavingsRepository {
        async fn get_savings_ledgers(&self) -> Result<Vec<SavingsGoalLedger>> {
            Ok(self.ledgers.clone())
        }
    }

    struct MockCategoryRepository {
        categories: Vec<Category>,
    }

    #[async_trait]
    impl CategoryRepositoryTrait for MockCategoryRepository {
        async fn get_categories(&self) -> Result<Vec<Category>> {
            Ok(self.categories.clone())
        }
    }

    struct MockPlanRepository {
        plans: RwLock<HashMap<Period, BudgetPlan>>,
    }

    impl MockPlanRepository {
        fn new() -> Self {
            MockPlanRepository {
                plans: RwLock::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl PlanRepositoryTrait for MockPlanRepository {
        async fn get_plan(&self, period: Period) -> Result<Option<BudgetPlan>> {
            Ok(self.plans.read().unwrap().get(&period).cloned())
        }

        async fn create_plan(&self, plan: BudgetPlan) -> Result<BudgetPlan> {
            let mut plans = self.plans.write().unwrap();
            if plans.contains_key(&plan.period) {
                return Err(Error::Plan(format!("plan already exists for {}", plan.period)));
            }
            plans.insert(plan.period, plan.clone());
            Ok(plan)
        }

        async fn replace_plan(&self, period: Period, plan: BudgetPlan) -> Result<BudgetPlan> {
            let mut plans = self.plans.write().unwrap();
            if !plans.contains_key(&period) {
                return Err(Error::Plan(format!("no plan to replace for {}", period)));
            }
            plans.insert(period, plan.clone());
            Ok(plan)
        }
    }

    // ============== Helpers ==============

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// The month being planned in all tests; history covers the 12
    /// months ending 2025-06.
    fn next_period() -> Period {
        Period::new(2025, 7)
    }

    fn request() -> ForecastPlanRequest {
        ForecastPlanRequest {
            months_back: Some(12),
            next_period: Some(next_period()),
        }
    }

    fn expense(d: NaiveDate, amount_minor: i64, cat: &str, name: Option<&str>) -> Expense {
        Expense {
            date: Some(d),
            amount_minor,
            category_id: cat.to_string(),
            category_name: name.map(|n| n.to_string()),
        }
    }

    /// Monthly expenses for a category across the whole window.
    fn monthly_expenses(amount_minor: i64, cat: &str, name: Option<&str>) -> Vec<Expense> {
        Period::new(2025, 6)
            .window_ending_here(12)
            .into_iter()
            .map(|p| expense(date(p.year, p.month, 15), amount_minor, cat, name))
            .collect()
    }

    struct Fixture {
        expenses: Vec<Expense>,
        commitments: Vec<Commitment>,
        events: Vec<Event>,
        ledgers: Vec<SavingsGoalLedger>,
        categories: Vec<Category>,
        fail_expenses: bool,
    }

    impl Fixture {
        fn empty() -> Self {
            Fixture {
                expenses: vec![],
                commitments: vec![],
                events: vec![],
                ledgers: vec![],
                categories: vec![],
                fail_expenses: false,
            }
        }

        fn into_service(self) -> PlanService {
            PlanService::new(
                Arc::new(MockExpenseRepository {
                    expenses: self.expenses,
                    fail: self.fail_expenses,
                }),
                Arc::new(MockCommitmentRepository {
                    commitments: self.commitments,
                }),
                Arc::new(MockEventRepository {
                    events: self.events,
                }),
                Arc::new(MockSavingsRepository {
                    ledgers: self.ledgers,
                }),
                Arc::new(MockCategoryRepository {
                    categories: self.categories,
                }),
                Arc::new(MockPlanRepository::new()),
            )
        }
    }

    fn full_fixture() -> Fixture {
        let mut expenses = monthly_expenses(250_00, "food", Some("Food"));
        expenses.extend(monthly_expenses(60_00, "transport", Some("Transport")));

        let commitments: Vec<Commitment> = Period::new(2025, 6)
            .window_ending_here(12)
            .into_iter()
            .map(|p| Commitment {
                due_date: date(p.year, p.month, 1),
                paid_at: Some(date(p.year, p.month, 3)),
                status: CommitmentStatus::Paid,
                amount_minor: 900_00,
            })
            .collect();

        let events = vec![
            Event {
                date: Some(date(2024, 12, 20)),
                due_date: None,
                end_date: None,
                amount_minor: None,
                spent_minor: Some(400_00),
                sub_items: vec![],
            },
            Event {
                date: Some(date(2025, 4, 5)),
                due_date: None,
                end_date: None,
                amount_minor: Some(150_00),
                spent_minor: None,
                sub_items: vec![],
            },
        ];

        let ledgers = vec![SavingsGoalLedger {
            goal_id: "vacation".to_string(),
            entries: Period::new(2025, 6)
                .window_ending_here(12)
                .into_iter()
                .map(|p| LedgerEntry {
                    at: Some(date(p.year, p.month, 28)),
                    kind: LedgerEntryKind::Fund,
                    amount_minor: 200_00,
                })
                .collect(),
        }];

        let categories = vec![
            Category {
                id: "food".to_string(),
                name: "Food".to_string(),
            },
            Category {
                id: "transport".to_string(),
                name: "Transport".to_string(),
            },
        ];

        Fixture {
            expenses,
            commitments,
            events,
            ledgers,
            categories,
            fail_expenses: false,
        }
    }

    // ============== Tests ==============

    #[tokio::test]
    async fn test_empty_history_raises_no_historical_data() {
        let service = Fixture::empty().into_service();
        let result = service.forecast_plan(request()).await;
        assert!(matches!(result, Err(Error::NoHistoricalData)));
    }

    #[tokio::test]
    async fn test_forecast_plan_assembles_consistent_plan() {
        let service = full_fixture().into_service();
        let output = service.forecast_plan(request()).await.unwrap();

        let plan = &output.plan;
        assert_eq!(plan.period, next_period());
        assert!(plan.is_consistent());

        // Constant histories forecast their constants
        assert_eq!(plan.commitments.amount_minor, 900_00);
        assert_eq!(plan.savings.amount_minor, 200_00);

        // Both active categories got sub-budgets, summing to dtd
        assert_eq!(plan.dtd.sub_budgets.len(), 2);
        let sum: i64 = plan.dtd.sub_budgets.iter().map(|s| s.amount_minor).sum();
        assert_eq!(plan.dtd.amount_minor, sum);

        // All amounts land on the rounding grid
        let unit = ForecastConfig::default().rounding_unit_minor;
        assert_eq!(plan.savings.amount_minor % unit, 0);
        assert_eq!(plan.commitments.amount_minor % unit, 0);
        assert_eq!(plan.events.amount_minor % unit, 0);
        for sub in &plan.dtd.sub_budgets {
            assert_eq!(sub.amount_minor % unit, 0);
        }

        // Rows expose the aggregated history behind the plan
        assert_eq!(output.rows.savings.len(), 12);
        assert_eq!(output.metrics.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_rent_category_uses_literal_last_value() {
        let mut fixture = full_fixture();
        // Fluctuating 12-month rent history ending at exactly 25000.00
        let rent_amounts = [
            24_000_00, 26_500_00, 23_750_00, 25_250_00, 24_800_00, 26_100_00, 23_900_00,
            25_700_00, 24_300_00, 26_900_00, 24_600_00, 25_000_00,
        ];
        let window = Period::new(2025, 6).window_ending_here(12);
        for (p, amount) in window.iter().zip(rent_amounts.iter()) {
            fixture.expenses.push(expense(
                date(p.year, p.month, 1),
                *amount,
                "rent",
                Some("Monthly Rent"),
            ));
        }
        fixture.categories.push(Category {
            id: "rent".to_string(),
            name: "Monthly Rent".to_string(),
        });

        let service = fixture.into_service();
        let output = service.forecast_plan(request()).await.unwrap();

        let rent = output
            .plan
            .dtd
            .sub_budgets
            .iter()
            .find(|s| s.category_id == "rent")
            .unwrap();
        assert_eq!(rent.amount_minor, 25_000_00);
        assert_eq!(
            output.metrics.categories.get("rent").unwrap().method,
            ForecastMethod::LastValue
        );
    }

    #[tokio::test]
    async fn test_dtd_falls_back_to_top_categories_when_all_inactive() {
        let mut fixture = Fixture::empty();
        // Nonzero commitments keep the aggregated history non-empty
        fixture.commitments = vec![Commitment {
            due_date: date(2025, 5, 1),
            paid_at: None,
            status: CommitmentStatus::Planned,
            amount_minor: 100_00,
        }];
        fixture.categories = (0..10)
            .map(|i| Category {
                id: format!("c{}", i),
                name: format!("Category {}", i),
            })
            .collect();

        let service = fixture.into_service();
        let output = service.forecast_plan(request()).await.unwrap();

        assert_eq!(output.plan.dtd.sub_budgets.len(), DTD_FALLBACK_TOP_N);
        assert_eq!(output.plan.dtd.amount_minor, 0);
    }

    #[tokio::test]
    async fn test_collaborator_failure_propagates_unmodified() {
        let mut fixture = full_fixture();
        fixture.fail_expenses = true;
        let service = fixture.into_service();

        let result = service.forecast_plan(request()).await;
        assert!(matches!(result, Err(Error::Repository(_))));
    }

    #[tokio::test]
    async fn test_apply_creates_then_replaces() {
        let service = full_fixture().into_service();
        let output = service.forecast_plan(request()).await.unwrap();

        let created = service
            .apply_forecast_plan(next_period(), output.plan.clone())
            .await
            .unwrap();
        assert_eq!(created.period, next_period());

        // Second apply replaces instead of failing
        let mut updated = output.plan.clone();
        updated.savings.amount_minor += 100_00;
        let replaced = service
            .apply_forecast_plan(next_period(), updated.clone())
            .await
            .unwrap();
        assert_eq!(replaced.savings.amount_minor, updated.savings.amount_minor);
    }
}
