use async_trait::async_trait;

use super::savings_model::SavingsGoalLedger;
use crate::errors::Result;

/// Trait for savings ledger read access.
#[async_trait]
pub trait SavingsRepositoryTrait: Send + Sync {
    /// Lists every savings goal together with its full ledger.
    async fn get_savings_ledgers(&self) -> Result<Vec<SavingsGoalLedger>>;
}
