pub mod events_model;
pub mod events_traits;

pub use events_model::{Event, EventSubItem};
pub use events_traits::EventRepositoryTrait;
