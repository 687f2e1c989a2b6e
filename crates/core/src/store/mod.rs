//! Persistence seam for everything the content core reads and writes.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::block::{BlockOrder, BlockUpdate, NewPageBlock, PageBlock};
use crate::content::{ContentEntry, TextStyleRow, UpsertContent, UpsertTextStyle};
use crate::section::{NewPageSection, PageSection, UpdatePageSection};
use crate::version::BlockVersion;

pub use memory::MemoryContentStore;
pub use postgres::PgContentStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("store unavailable")]
    Unavailable,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reads return rows already ordered the way the renderer expects:
/// sections by `(section_order, id)`, blocks by `(order, id)`, versions by
/// ascending `version_number`.
#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    async fn content_by_page(&self, page: &str) -> StoreResult<Vec<ContentEntry>>;
    async fn text_styles_by_page(&self, page: &str) -> StoreResult<Vec<TextStyleRow>>;
    async fn upsert_content(&self, input: &UpsertContent) -> StoreResult<ContentEntry>;
    /// Fails with `NotFound` when the field has no content entry yet.
    async fn upsert_text_style(&self, input: &UpsertTextStyle) -> StoreResult<TextStyleRow>;

    async fn sections_by_page(&self, page_id: i64) -> StoreResult<Vec<PageSection>>;
    async fn create_section(&self, input: &NewPageSection) -> StoreResult<PageSection>;
    async fn update_section(&self, id: i64, input: &UpdatePageSection) -> StoreResult<PageSection>;
    async fn delete_section(&self, id: i64) -> StoreResult<()>;

    async fn blocks_by_page(&self, page_id: i64) -> StoreResult<Vec<PageBlock>>;
    async fn block(&self, id: i64) -> StoreResult<Option<PageBlock>>;
    async fn create_block(&self, input: &NewPageBlock) -> StoreResult<PageBlock>;
    /// Snapshot the block's current state as the next version, then apply
    /// `update`. Both happen or neither does.
    async fn save_block(
        &self,
        id: i64,
        update: &BlockUpdate,
        created_by: Option<&str>,
    ) -> StoreResult<(PageBlock, BlockVersion)>;
    async fn delete_block(&self, id: i64) -> StoreResult<()>;
    /// Set `order` for blocks of `page_id`. Returns how many rows changed.
    async fn set_block_orders(&self, page_id: i64, orders: &[BlockOrder]) -> StoreResult<u64>;

    async fn list_versions(&self, block_id: i64) -> StoreResult<Vec<BlockVersion>>;
    /// Copy a version's content and settings onto its block. Existing
    /// versions are left untouched.
    async fn restore_version(&self, version_id: i64) -> StoreResult<PageBlock>;
}
