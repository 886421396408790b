//! Pocketplan Core - Domain entities, services, and traits.
//!
//! This crate contains the budget forecasting engine for Pocketplan.
//! It is storage-agnostic: the record stores (expenses, commitments,
//! events, savings ledgers, category catalog) and the budget-plan store
//! are defined as traits and implemented elsewhere.

pub mod categories;
pub mod commitments;
pub mod constants;
pub mod errors;
pub mod events;
pub mod expenses;
pub mod forecast;
pub mod history;
pub mod plan;
pub mod savings;

// Re-export common types from history and plan modules
pub use history::*;
pub use plan::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
