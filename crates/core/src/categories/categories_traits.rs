use async_trait::async_trait;

use super::categories_model::Category;
use crate::errors::Result;

/// Trait for category catalog read access.
///
/// The catalog is the source of truth for category display names and for
/// keeping inactive categories present in per-category sub-budgets.
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    /// Lists all known categories.
    async fn get_categories(&self) -> Result<Vec<Category>>;
}
