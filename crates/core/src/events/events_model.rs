//! Event domain models (one-off planned spending: trips, gifts, repairs).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A budgeted line item inside an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventSubItem {
    pub spent_minor: Option<i64>,
}

/// Domain model for an event record.
///
/// Older records carry only a flat `amount_minor`; newer ones track an
/// explicit `spent_minor` or per-item spend, so reads fall back through
/// those representations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub amount_minor: Option<i64>,
    pub spent_minor: Option<i64>,
    #[serde(default)]
    pub sub_items: Vec<EventSubItem>,
}

impl Event {
    /// Effective date fallback chain: date, then due date, then end date.
    /// `None` means the record cannot be placed in a month and is skipped.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.date.or(self.due_date).or(self.end_date)
    }

    /// Spent amount fallback chain: explicit spend, then summed sub-item
    /// spend, then the flat amount.
    pub fn spent(&self) -> i64 {
        if let Some(spent) = self.spent_minor {
            return spent;
        }
        let item_total: i64 = self.sub_items.iter().filter_map(|i| i.spent_minor).sum();
        if item_total != 0 {
            return item_total;
        }
        self.amount_minor.unwrap_or(0)
    }
}
