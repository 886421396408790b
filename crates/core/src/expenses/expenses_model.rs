//! Expense domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Domain model for a single day-to-day expense record.
///
/// Amounts are integer minor currency units (cents). A record without a
/// usable transaction date is excluded from aggregation rather than
/// zero-filled or rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub date: Option<NaiveDate>,
    pub amount_minor: i64,
    pub category_id: String,
    pub category_name: Option<String>,
}
