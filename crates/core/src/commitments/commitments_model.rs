//! Commitment domain models (recurring fixed obligations).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Payment status of a commitment instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommitmentStatus {
    Planned,
    Paid,
}

/// Domain model for a commitment instance (rent, utilities, loan payment).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Commitment {
    pub due_date: NaiveDate,
    pub paid_at: Option<NaiveDate>,
    pub status: CommitmentStatus,
    pub amount_minor: i64,
}

impl Commitment {
    /// The month bucket a commitment belongs to: the paid date when the
    /// commitment is settled, the due date otherwise.
    pub fn effective_date(&self) -> NaiveDate {
        match (self.status, self.paid_at) {
            (CommitmentStatus::Paid, Some(paid)) => paid,
            _ => self.due_date,
        }
    }
}
