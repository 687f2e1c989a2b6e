//! Admin writes: validate, persist through the store, then announce the
//! change on the event bus.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::Value;

use super::types::{MutationError, MutationResult, OrderChange, ReorderBlocks};
use crate::block::validate::{validate_new_block, validate_update};
use crate::block::{BlockOrder, BlockUpdate, NewPageBlock, PageBlock};
use crate::content::{ContentEntry, TextStyleRow, UpsertContent, UpsertTextStyle};
use crate::events::{ChangeEvent, ChangeKind, ContentEvent, EventBus};
use crate::section::{NewPageSection, PageSection, UpdatePageSection};
use crate::store::{ContentStore, StoreError};
use crate::version::BlockVersion;

#[derive(Clone)]
pub struct MutationExecutor {
    store: Arc<dyn ContentStore>,
    events: EventBus,
}

fn require(field: &str, value: &str) -> MutationResult<()> {
    if value.trim().is_empty() {
        return Err(MutationError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_page_id(page_id: i64) -> MutationResult<()> {
    if page_id <= 0 {
        return Err(MutationError::Validation("page id must be positive".to_string()));
    }
    Ok(())
}

fn require_object(field: &str, value: &Value) -> MutationResult<()> {
    if !value.is_object() {
        return Err(MutationError::Validation(format!("{field} must be a JSON object")));
    }
    Ok(())
}

impl MutationExecutor {
    pub fn new(store: Arc<dyn ContentStore>, events: EventBus) -> Self {
        Self { store, events }
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    fn publish(&self, change: ChangeEvent) {
        let delivered = self.events.publish(ContentEvent::Change(change));
        tracing::debug!(delivered, "content change published");
    }

    pub async fn upsert_content(&self, input: &UpsertContent) -> MutationResult<ContentEntry> {
        require("page", &input.page)?;
        require("contentKey", &input.content_key)?;

        let entry = self.store.upsert_content(input).await?;
        tracing::info!(page = %entry.page, section = %entry.section, key = %entry.content_key, "content saved");
        self.publish(
            ChangeEvent::new(ChangeKind::ContentUpdated)
                .page(entry.page.clone())
                .entity(entry.id),
        );
        Ok(entry)
    }

    pub async fn upsert_text_style(&self, input: &UpsertTextStyle) -> MutationResult<TextStyleRow> {
        require("page", &input.page)?;
        require("contentKey", &input.content_key)?;

        let style = self.store.upsert_text_style(input).await?;
        self.publish(
            ChangeEvent::new(ChangeKind::TextStyleUpdated)
                .page(input.page.clone())
                .entity(style.content_id),
        );
        Ok(style)
    }

    pub async fn create_section(&self, input: &NewPageSection) -> MutationResult<PageSection> {
        require_page_id(input.page_id)?;
        require("sectionType", &input.section_type)?;
        require_object("content", &input.content)?;

        let section = self.store.create_section(input).await?;
        self.publish(
            ChangeEvent::new(ChangeKind::SectionCreated)
                .page_id(section.page_id)
                .entity(section.id),
        );
        Ok(section)
    }

    pub async fn update_section(&self, id: i64, input: &UpdatePageSection) -> MutationResult<PageSection> {
        require_object("content", &input.content)?;

        let section = self.store.update_section(id, input).await?;
        self.publish(
            ChangeEvent::new(ChangeKind::SectionUpdated)
                .page_id(section.page_id)
                .entity(section.id),
        );
        Ok(section)
    }

    pub async fn delete_section(&self, id: i64) -> MutationResult<()> {
        self.store.delete_section(id).await?;
        self.publish(ChangeEvent::new(ChangeKind::SectionDeleted).entity(id));
        Ok(())
    }

    pub async fn create_block(&self, input: &NewPageBlock) -> MutationResult<PageBlock> {
        let kind = validate_new_block(input)?;

        let block = self.store.create_block(input).await?;
        tracing::info!(block_id = block.id, page_id = block.page_id, kind = %kind, "block created");
        self.publish(
            ChangeEvent::new(ChangeKind::BlockCreated)
                .page_id(block.page_id)
                .entity(block.id),
        );
        Ok(block)
    }

    /// Snapshot then overwrite. Returns the updated block and the version
    /// that now holds its previous state.
    pub async fn save_block(
        &self,
        id: i64,
        update: &BlockUpdate,
        actor: Option<&str>,
    ) -> MutationResult<(PageBlock, BlockVersion)> {
        validate_update(update)?;

        let (block, version) = self.store.save_block(id, update, actor).await?;
        tracing::info!(
            block_id = block.id,
            version = version.version_number,
            "block saved"
        );
        self.publish(
            ChangeEvent::new(ChangeKind::BlockSaved)
                .page_id(block.page_id)
                .entity(block.id)
                .version(version.version_number)
                .actor(actor),
        );
        Ok((block, version))
    }

    /// Versions of a deleted block are kept.
    pub async fn delete_block(&self, id: i64) -> MutationResult<()> {
        let block = self
            .store
            .block(id)
            .await?
            .ok_or_else(|| StoreError::not_found("block", id))?;
        self.store.delete_block(id).await?;
        tracing::info!(block_id = id, page_id = block.page_id, "block deleted");
        self.publish(
            ChangeEvent::new(ChangeKind::BlockDeleted)
                .page_id(block.page_id)
                .entity(id),
        );
        Ok(())
    }

    pub async fn reorder_blocks(&self, page_id: i64, input: &ReorderBlocks) -> MutationResult<OrderChange> {
        require_page_id(page_id)?;
        if input.orders.is_empty() {
            return Err(MutationError::Validation("orders must not be empty".to_string()));
        }
        let mut seen = HashSet::with_capacity(input.orders.len());
        if let Some(dup) = input.orders.iter().find(|o| !seen.insert(o.id)) {
            return Err(MutationError::Validation(format!("block {} listed twice", dup.id)));
        }

        let changed = self.store.set_block_orders(page_id, &input.orders).await?;
        self.publish(ChangeEvent::new(ChangeKind::BlocksReordered).page_id(page_id));
        Ok(OrderChange { page_id, changed })
    }

    /// Reassign orders `0..n` following the current display order. Only
    /// blocks whose order actually moves are written.
    pub async fn normalize_block_orders(&self, page_id: i64) -> MutationResult<OrderChange> {
        require_page_id(page_id)?;

        let blocks = self.store.blocks_by_page(page_id).await?;
        let moves: Vec<BlockOrder> = blocks
            .iter()
            .zip(0..)
            .filter(|(block, index)| block.order != *index)
            .map(|(block, index)| BlockOrder { id: block.id, order: index })
            .collect();

        if moves.is_empty() {
            return Ok(OrderChange { page_id, changed: 0 });
        }

        let changed = self.store.set_block_orders(page_id, &moves).await?;
        tracing::info!(page_id, changed, "block orders normalized");
        self.publish(ChangeEvent::new(ChangeKind::BlocksReordered).page_id(page_id));
        Ok(OrderChange { page_id, changed })
    }

    pub async fn list_versions(&self, block_id: i64) -> MutationResult<Vec<BlockVersion>> {
        let versions = self.store.list_versions(block_id).await?;
        if versions.is_empty() && self.store.block(block_id).await?.is_none() {
            return Err(StoreError::not_found("block", block_id).into());
        }
        Ok(versions)
    }

    pub async fn restore_version(&self, version_id: i64, actor: Option<&str>) -> MutationResult<PageBlock> {
        let block = self.store.restore_version(version_id).await.map_err(|err| {
            tracing::warn!(version_id, error = %err, "restore failed");
            err
        })?;
        tracing::info!(block_id = block.id, version_id, "block restored");
        self.publish(
            ChangeEvent::new(ChangeKind::BlockRestored)
                .page_id(block.page_id)
                .entity(block.id)
                .actor(actor),
        );
        Ok(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryContentStore;

    fn executor() -> (MutationExecutor, EventBus) {
        let bus = EventBus::new(32);
        (MutationExecutor::new(Arc::new(MemoryContentStore::new()), bus.clone()), bus)
    }

    fn text_block(page_id: i64, content: &str, order: i32) -> NewPageBlock {
        NewPageBlock {
            page_id,
            block_type: "text".to_string(),
            content: content.to_string(),
            settings: "{}".to_string(),
            visibility: "{}".to_string(),
            animation: "{}".to_string(),
            order,
        }
    }

    #[tokio::test]
    async fn save_publishes_block_saved_with_version() {
        let (exec, bus) = executor();
        let block = exec.create_block(&text_block(1, "A", 0)).await.unwrap();
        let mut rx = bus.subscribe();

        let update = BlockUpdate {
            content: Some("B".to_string()),
            ..BlockUpdate::default()
        };
        let (saved, version) = exec.save_block(block.id, &update, Some("editor")).await.unwrap();
        assert_eq!(saved.content, "B");
        assert_eq!(version.version_number, 1);
        assert_eq!(version.content, "A");

        match rx.recv().await.unwrap() {
            ContentEvent::Change(change) => {
                assert_eq!(change.kind, ChangeKind::BlockSaved);
                assert_eq!(change.entity_id, Some(block.id));
                assert_eq!(change.version_number, Some(1));
                assert_eq!(change.actor.as_deref(), Some("editor"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_unknown_block_type_without_writing() {
        let (exec, _bus) = executor();
        let mut input = text_block(1, "A", 0);
        input.block_type = "carousel".to_string();

        let err = exec.create_block(&input).await.unwrap_err();
        assert!(matches!(err, MutationError::Validation(_)));
        assert!(exec.store().blocks_by_page(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn normalize_reassigns_contiguous_orders() {
        let (exec, _bus) = executor();
        exec.create_block(&text_block(2, "a", 0)).await.unwrap();
        exec.create_block(&text_block(2, "b", 5)).await.unwrap();
        exec.create_block(&text_block(2, "c", 9)).await.unwrap();

        let change = exec.normalize_block_orders(2).await.unwrap();
        assert_eq!(change, OrderChange { page_id: 2, changed: 2 });

        let orders: Vec<(String, i32)> = exec
            .store()
            .blocks_by_page(2)
            .await
            .unwrap()
            .into_iter()
            .map(|b| (b.content, b.order))
            .collect();
        assert_eq!(
            orders,
            vec![("a".to_string(), 0), ("b".to_string(), 1), ("c".to_string(), 2)]
        );

        assert_eq!(exec.normalize_block_orders(2).await.unwrap().changed, 0);
    }

    #[tokio::test]
    async fn reorder_rejects_duplicates() {
        let (exec, _bus) = executor();
        let input = ReorderBlocks {
            orders: vec![BlockOrder { id: 1, order: 0 }, BlockOrder { id: 1, order: 1 }],
        };
        assert!(matches!(
            exec.reorder_blocks(1, &input).await,
            Err(MutationError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn restore_missing_version_is_not_found() {
        let (exec, _bus) = executor();
        let block = exec.create_block(&text_block(1, "A", 0)).await.unwrap();

        let err = exec.restore_version(999, None).await.unwrap_err();
        assert!(matches!(err, MutationError::Store(ref e) if e.is_not_found()));
        assert_eq!(exec.store().block(block.id).await.unwrap().unwrap().content, "A");
    }

    #[tokio::test]
    async fn delete_keeps_history() {
        let (exec, _bus) = executor();
        let block = exec.create_block(&text_block(1, "A", 0)).await.unwrap();
        let update = BlockUpdate {
            content: Some("B".to_string()),
            ..BlockUpdate::default()
        };
        exec.save_block(block.id, &update, None).await.unwrap();
        exec.delete_block(block.id).await.unwrap();

        assert_eq!(exec.list_versions(block.id).await.unwrap().len(), 1);
        assert!(exec.delete_block(block.id).await.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn content_requires_page_and_key() {
        let (exec, _bus) = executor();
        let input = UpsertContent {
            page: "home".to_string(),
            section: String::new(),
            content_key: " ".to_string(),
            content_value: "x".to_string(),
        };
        assert!(matches!(
            exec.upsert_content(&input).await,
            Err(MutationError::Validation(_))
        ));
    }
}
