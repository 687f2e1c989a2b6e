use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::block::PageBlock;

/// A prior state of a [`PageBlock`], captured before an edit overwrote it.
/// Rows in `block_versions` are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct BlockVersion {
    pub id: i64,
    pub block_id: i64,
    pub page_id: i64,
    #[serde(rename = "type")]
    pub block_type: String,
    pub version_number: i32,
    pub content: String,
    pub settings: String,
    #[sqlx(rename = "block_order")]
    pub order: i32,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

impl BlockVersion {
    /// Snapshot `block` as version `version_number`. The id is assigned by the store.
    pub fn snapshot(block: &PageBlock, version_number: i32, created_by: Option<&str>) -> Self {
        Self {
            id: 0,
            block_id: block.id,
            page_id: block.page_id,
            block_type: block.block_type.clone(),
            version_number,
            content: block.content.clone(),
            settings: block.settings.clone(),
            order: block.order,
            created_at: Utc::now(),
            created_by: created_by.map(str::to_string),
        }
    }
}

/// Highest version number in `versions`, shown as "Latest".
pub fn latest_version_number(versions: &[BlockVersion]) -> Option<i32> {
    versions.iter().map(|v| v.version_number).max()
}

/// Version numbers start at 1 and increase by one per save.
pub fn next_version_number(versions: &[BlockVersion]) -> i32 {
    latest_version_number(versions).unwrap_or(0) + 1
}
