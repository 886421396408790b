use async_trait::async_trait;

use super::events_model::Event;
use crate::errors::Result;

/// Trait for event record read access.
#[async_trait]
pub trait EventRepositoryTrait: Send + Sync {
    /// Lists all event records.
    async fn get_events(&self) -> Result<Vec<Event>>;
}
