use async_trait::async_trait;

use super::expenses_model::Expense;
use crate::errors::Result;

/// Trait for expense record read access.
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    /// Lists all expense records.
    async fn get_expenses(&self) -> Result<Vec<Expense>>;
}
