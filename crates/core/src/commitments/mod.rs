pub mod commitments_model;
pub mod commitments_traits;

pub use commitments_model::{Commitment, CommitmentStatus};
pub use commitments_traits::CommitmentRepositoryTrait;
