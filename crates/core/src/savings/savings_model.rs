//! Savings goal ledger domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a savings ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEntryKind {
    Fund,
    Withdraw,
}

/// A single funding or withdrawal entry against a savings goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub at: Option<NaiveDate>,
    pub kind: LedgerEntryKind,
    pub amount_minor: i64,
}

impl LedgerEntry {
    /// Signed flow in minor units: funding positive, withdrawal negative.
    pub fn signed_amount(&self) -> i64 {
        match self.kind {
            LedgerEntryKind::Fund => self.amount_minor,
            LedgerEntryKind::Withdraw => -self.amount_minor,
        }
    }
}

/// Domain model for one savings goal and its ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalLedger {
    pub goal_id: String,
    pub entries: Vec<LedgerEntry>,
}
