use async_trait::async_trait;

use super::commitments_model::Commitment;
use crate::errors::Result;

/// Trait for commitment record read access.
#[async_trait]
pub trait CommitmentRepositoryTrait: Send + Sync {
    /// Lists all commitment instances.
    async fn get_commitments(&self) -> Result<Vec<Commitment>>;
}
