use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::block::validate::BlockValidationError;
use crate::block::BlockOrder;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BlockValidationError> for MutationError {
    fn from(err: BlockValidationError) -> Self {
        MutationError::Validation(err.to_string())
    }
}

pub type MutationResult<T> = Result<T, MutationError>;

/// Explicit order assignment for blocks of one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBlocks {
    pub orders: Vec<BlockOrder>,
}

/// Outcome of a reorder or normalize pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderChange {
    pub page_id: i64,
    pub changed: u64,
}
