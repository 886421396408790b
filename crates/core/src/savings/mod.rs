pub mod savings_model;
pub mod savings_traits;

pub use savings_model::{LedgerEntry, LedgerEntryKind, SavingsGoalLedger};
pub use savings_traits::SavingsRepositoryTrait;
