//! Checks applied to admin-supplied block input before it is stored.
use thiserror::Error;

use super::model::{BlockKind, BlockUpdate, NewPageBlock};
use crate::json::is_object_or_empty;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BlockValidationError {
    #[error("unknown block type: {0}")]
    UnknownType(String),
    #[error("{0} must be a JSON object")]
    NotAnObject(&'static str),
    #[error("page id must be positive")]
    InvalidPage,
    #[error("update has no fields")]
    EmptyUpdate,
}

fn check_json(field: &'static str, raw: Option<&str>) -> Result<(), BlockValidationError> {
    match raw {
        Some(raw) if !is_object_or_empty(raw) => Err(BlockValidationError::NotAnObject(field)),
        _ => Ok(()),
    }
}

pub fn validate_new_block(input: &NewPageBlock) -> Result<BlockKind, BlockValidationError> {
    if input.page_id <= 0 {
        return Err(BlockValidationError::InvalidPage);
    }
    let kind = input
        .block_type
        .parse::<BlockKind>()
        .map_err(|e| BlockValidationError::UnknownType(e.0))?;
    check_json("settings", Some(&input.settings))?;
    check_json("visibility", Some(&input.visibility))?;
    check_json("animation", Some(&input.animation))?;
    Ok(kind)
}

pub fn validate_update(update: &BlockUpdate) -> Result<(), BlockValidationError> {
    if update.is_empty() {
        return Err(BlockValidationError::EmptyUpdate);
    }
    check_json("settings", update.settings.as_deref())?;
    check_json("visibility", update.visibility.as_deref())?;
    check_json("animation", update.animation.as_deref())?;
    Ok(())
}
