pub mod executor;
pub mod types;

pub use executor::MutationExecutor;
pub use types::{MutationError, MutationResult, OrderChange, ReorderBlocks};
