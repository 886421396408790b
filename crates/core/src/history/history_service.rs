//! History aggregation: raw records to fixed-cadence monthly series.

use std::collections::HashMap;

use log::debug;

use super::history_model::{AggregatedHistory, CategorySeries, Period, SeriesPoint, TimeSeries};
use crate::categories::Category;
use crate::commitments::Commitment;
use crate::events::Event;
use crate::expenses::Expense;
use crate::savings::SavingsGoalLedger;

/// Turns raw time-stamped records into monthly series over a fixed window.
///
/// The aggregator is a pure computation over collaborator-supplied data;
/// it holds only the window definition and the savings clamp policy.
pub struct HistoryAggregator {
    window: Vec<Period>,
    savings_clamp_zero: bool,
}

impl HistoryAggregator {
    /// Creates an aggregator for the `months_back` periods ending at `end`
    /// (the last fully elapsed month).
    pub fn new(end: Period, months_back: usize, savings_clamp_zero: bool) -> Self {
        HistoryAggregator {
            window: end.window_ending_here(months_back),
            savings_clamp_zero,
        }
    }

    pub fn window(&self) -> &[Period] {
        &self.window
    }

    /// Aggregates all record sets into per-target monthly series.
    pub fn aggregate(
        &self,
        expenses: &[Expense],
        commitments: &[Commitment],
        events: &[Event],
        ledgers: &[SavingsGoalLedger],
        catalog: &[Category],
    ) -> AggregatedHistory {
        let history = AggregatedHistory {
            savings: self.savings_series(ledgers),
            commitments: self.commitments_series(commitments),
            events: self.events_series(events),
            categories: self.category_series(expenses, catalog),
        };
        debug!(
            "aggregated {} months of history ({} categories)",
            self.window.len(),
            history.categories.len()
        );
        history
    }

    /// Savings net flow per month: funded minus withdrawn, optionally
    /// floored at zero per month for downstream forecasting.
    pub fn savings_series(&self, ledgers: &[SavingsGoalLedger]) -> TimeSeries {
        let mut totals: HashMap<Period, i64> = HashMap::new();
        for ledger in ledgers {
            for entry in &ledger.entries {
                let Some(at) = entry.at else { continue };
                *totals.entry(Period::from_date(at)).or_insert(0) += entry.signed_amount();
            }
        }
        if self.savings_clamp_zero {
            for amount in totals.values_mut() {
                *amount = (*amount).max(0);
            }
        }
        self.project(totals)
    }

    /// Commitments paid per month, bucketed by effective date.
    pub fn commitments_series(&self, commitments: &[Commitment]) -> TimeSeries {
        let mut totals: HashMap<Period, i64> = HashMap::new();
        for commitment in commitments {
            let period = Period::from_date(commitment.effective_date());
            *totals.entry(period).or_insert(0) += commitment.amount_minor;
        }
        self.project(totals)
    }

    /// Event spend per month, using each event's spent fallback chain.
    pub fn events_series(&self, events: &[Event]) -> TimeSeries {
        let mut totals: HashMap<Period, i64> = HashMap::new();
        for event in events {
            let Some(date) = event.effective_date() else {
                continue;
            };
            *totals.entry(Period::from_date(date)).or_insert(0) += event.spent();
        }
        self.project(totals)
    }

    /// One series per category observed in the expenses, plus zero-filled
    /// series for catalog categories with no activity in the window so that
    /// per-category sub-budgets stay stable across months.
    pub fn category_series(&self, expenses: &[Expense], catalog: &[Category]) -> Vec<CategorySeries> {
        let mut totals: HashMap<String, HashMap<Period, i64>> = HashMap::new();
        // Latest record that mentioned a display name, per category.
        let mut latest_names: HashMap<String, (chrono::NaiveDate, String)> = HashMap::new();

        for expense in expenses {
            let Some(date) = expense.date else { continue };
            let period = Period::from_date(date);
            *totals
                .entry(expense.category_id.clone())
                .or_default()
                .entry(period)
                .or_insert(0) += expense.amount_minor;

            if let Some(name) = &expense.category_name {
                let entry = latest_names
                    .entry(expense.category_id.clone())
                    .or_insert((date, name.clone()));
                if date >= entry.0 {
                    *entry = (date, name.clone());
                }
            }
        }

        let catalog_names: HashMap<&str, &str> = catalog
            .iter()
            .map(|c| (c.id.as_str(), c.name.as_str()))
            .collect();

        // Catalog order first, then observed-but-uncatalogued ids.
        let mut ids: Vec<String> = catalog.iter().map(|c| c.id.clone()).collect();
        let mut extras: Vec<String> = totals
            .keys()
            .filter(|id| !catalog_names.contains_key(id.as_str()))
            .cloned()
            .collect();
        extras.sort();
        ids.extend(extras);

        ids.into_iter()
            .map(|id| {
                let name = catalog_names
                    .get(id.as_str())
                    .map(|n| n.to_string())
                    .or_else(|| latest_names.get(&id).map(|(_, n)| n.clone()))
                    .unwrap_or_else(|| id.clone());
                let series = self.project(totals.remove(&id).unwrap_or_default());
                CategorySeries {
                    category_id: id,
                    name,
                    series,
                }
            })
            .collect()
    }

    /// Projects month totals onto the window, zero-filling missing months.
    fn project(&self, totals: HashMap<Period, i64>) -> TimeSeries {
        TimeSeries {
            points: self
                .window
                .iter()
                .map(|&period| SeriesPoint {
                    period,
                    amount_minor: totals.get(&period).copied().unwrap_or(0),
                })
                .collect(),
        }
    }
}
