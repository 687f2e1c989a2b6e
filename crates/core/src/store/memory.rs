//! In-process [`ContentStore`] used by tests and local previews.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{ContentStore, StoreError, StoreResult};
use crate::block::model::sort_blocks;
use crate::block::{BlockOrder, BlockUpdate, NewPageBlock, PageBlock};
use crate::content::{ContentEntry, TextStyleRow, UpsertContent, UpsertTextStyle};
use crate::section::model::sort_sections;
use crate::section::{NewPageSection, PageSection, UpdatePageSection};
use crate::version::{next_version_number, BlockVersion};

#[derive(Debug, Clone)]
struct StoredStyle {
    content_id: i64,
    is_bold: bool,
    is_italic: bool,
    is_underline: bool,
    font_size: Option<String>,
    font_color: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    next_id: i64,
    content: Vec<ContentEntry>,
    styles: Vec<StoredStyle>,
    sections: Vec<PageSection>,
    blocks: Vec<PageBlock>,
    versions: Vec<BlockVersion>,
}

impl State {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn block_mut(&mut self, id: i64) -> StoreResult<&mut PageBlock> {
        self.blocks
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| StoreError::not_found("block", id))
    }
}

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call fail with [`StoreError::Unavailable`], to exercise
    /// fail-soft paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl ContentStore for MemoryContentStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    async fn content_by_page(&self, page: &str) -> StoreResult<Vec<ContentEntry>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.content.iter().filter(|c| c.page == page).cloned().collect())
    }

    async fn text_styles_by_page(&self, page: &str) -> StoreResult<Vec<TextStyleRow>> {
        self.check()?;
        let state = self.state.read().await;
        let rows = state
            .styles
            .iter()
            .filter_map(|style| {
                let entry = state
                    .content
                    .iter()
                    .find(|c| c.id == style.content_id && c.page == page)?;
                Some(TextStyleRow {
                    content_id: style.content_id,
                    section: entry.section.clone(),
                    content_key: entry.content_key.clone(),
                    is_bold: style.is_bold,
                    is_italic: style.is_italic,
                    is_underline: style.is_underline,
                    font_size: style.font_size.clone(),
                    font_color: style.font_color.clone(),
                })
            })
            .collect();
        Ok(rows)
    }

    async fn upsert_content(&self, input: &UpsertContent) -> StoreResult<ContentEntry> {
        self.check()?;
        let mut state = self.state.write().await;
        let now = Utc::now();
        if let Some(entry) = state.content.iter_mut().find(|c| {
            c.page == input.page && c.section == input.section && c.content_key == input.content_key
        }) {
            entry.content_value = input.content_value.clone();
            entry.updated_at = now;
            return Ok(entry.clone());
        }
        let entry = ContentEntry {
            id: state.allocate_id(),
            page: input.page.clone(),
            section: input.section.clone(),
            content_key: input.content_key.clone(),
            content_value: input.content_value.clone(),
            updated_at: now,
        };
        state.content.push(entry.clone());
        Ok(entry)
    }

    async fn upsert_text_style(&self, input: &UpsertTextStyle) -> StoreResult<TextStyleRow> {
        self.check()?;
        let mut state = self.state.write().await;
        let content_id = state
            .content
            .iter()
            .find(|c| {
                c.page == input.page
                    && c.section == input.section
                    && c.content_key == input.content_key
            })
            .map(|c| c.id)
            .ok_or_else(|| {
                StoreError::not_found(
                    "content",
                    format!("{}/{}.{}", input.page, input.section, input.content_key),
                )
            })?;
        let style = StoredStyle {
            content_id,
            is_bold: input.is_bold,
            is_italic: input.is_italic,
            is_underline: input.is_underline,
            font_size: input.font_size.clone(),
            font_color: input.font_color.clone(),
        };
        match state.styles.iter().position(|s| s.content_id == content_id) {
            Some(index) => state.styles[index] = style,
            None => state.styles.push(style),
        }
        Ok(TextStyleRow {
            content_id,
            section: input.section.clone(),
            content_key: input.content_key.clone(),
            is_bold: input.is_bold,
            is_italic: input.is_italic,
            is_underline: input.is_underline,
            font_size: input.font_size.clone(),
            font_color: input.font_color.clone(),
        })
    }

    async fn sections_by_page(&self, page_id: i64) -> StoreResult<Vec<PageSection>> {
        self.check()?;
        let state = self.state.read().await;
        let mut sections: Vec<PageSection> = state
            .sections
            .iter()
            .filter(|s| s.page_id == page_id)
            .cloned()
            .collect();
        sort_sections(&mut sections);
        Ok(sections)
    }

    async fn create_section(&self, input: &NewPageSection) -> StoreResult<PageSection> {
        self.check()?;
        let mut state = self.state.write().await;
        let now = Utc::now();
        let section = PageSection {
            id: state.allocate_id(),
            page_id: input.page_id,
            section_type: input.section_type.clone(),
            section_order: input.section_order,
            title: input.title.clone(),
            content: input.content.clone(),
            required_fields: input.required_fields.clone(),
            is_visible: input.is_visible,
            created_at: now,
            updated_at: now,
        };
        state.sections.push(section.clone());
        Ok(section)
    }

    async fn update_section(&self, id: i64, input: &UpdatePageSection) -> StoreResult<PageSection> {
        self.check()?;
        let mut state = self.state.write().await;
        let section = state
            .sections
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("section", id))?;
        section.section_order = input.section_order;
        section.title = input.title.clone();
        section.content = input.content.clone();
        section.required_fields = input.required_fields.clone();
        section.is_visible = input.is_visible;
        section.updated_at = Utc::now();
        Ok(section.clone())
    }

    async fn delete_section(&self, id: i64) -> StoreResult<()> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.sections.len();
        state.sections.retain(|s| s.id != id);
        if state.sections.len() == before {
            return Err(StoreError::not_found("section", id));
        }
        Ok(())
    }

    async fn blocks_by_page(&self, page_id: i64) -> StoreResult<Vec<PageBlock>> {
        self.check()?;
        let state = self.state.read().await;
        let mut blocks: Vec<PageBlock> = state
            .blocks
            .iter()
            .filter(|b| b.page_id == page_id)
            .cloned()
            .collect();
        sort_blocks(&mut blocks);
        Ok(blocks)
    }

    async fn block(&self, id: i64) -> StoreResult<Option<PageBlock>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.blocks.iter().find(|b| b.id == id).cloned())
    }

    async fn create_block(&self, input: &NewPageBlock) -> StoreResult<PageBlock> {
        self.check()?;
        let mut state = self.state.write().await;
        let now = Utc::now();
        let block = PageBlock {
            id: state.allocate_id(),
            page_id: input.page_id,
            block_type: input.block_type.clone(),
            content: input.content.clone(),
            settings: input.settings.clone(),
            visibility: input.visibility.clone(),
            animation: input.animation.clone(),
            order: input.order,
            created_at: now,
            updated_at: now,
        };
        state.blocks.push(block.clone());
        Ok(block)
    }

    async fn save_block(
        &self,
        id: i64,
        update: &BlockUpdate,
        created_by: Option<&str>,
    ) -> StoreResult<(PageBlock, BlockVersion)> {
        self.check()?;
        let mut state = self.state.write().await;
        let current = state.block_mut(id)?.clone();

        let existing: Vec<BlockVersion> = state
            .versions
            .iter()
            .filter(|v| v.block_id == id)
            .cloned()
            .collect();
        let mut version = BlockVersion::snapshot(&current, next_version_number(&existing), created_by);
        version.id = state.allocate_id();
        state.versions.push(version.clone());

        let block = state.block_mut(id)?;
        update.apply_to(block);
        block.updated_at = Utc::now();
        Ok((block.clone(), version))
    }

    async fn delete_block(&self, id: i64) -> StoreResult<()> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.blocks.len();
        state.blocks.retain(|b| b.id != id);
        if state.blocks.len() == before {
            return Err(StoreError::not_found("block", id));
        }
        Ok(())
    }

    async fn set_block_orders(&self, page_id: i64, orders: &[BlockOrder]) -> StoreResult<u64> {
        self.check()?;
        let mut state = self.state.write().await;
        let now = Utc::now();
        let mut changed = 0;
        for entry in orders {
            if let Some(block) = state
                .blocks
                .iter_mut()
                .find(|b| b.id == entry.id && b.page_id == page_id)
            {
                block.order = entry.order;
                block.updated_at = now;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn list_versions(&self, block_id: i64) -> StoreResult<Vec<BlockVersion>> {
        self.check()?;
        let state = self.state.read().await;
        let mut versions: Vec<BlockVersion> = state
            .versions
            .iter()
            .filter(|v| v.block_id == block_id)
            .cloned()
            .collect();
        versions.sort_by_key(|v| v.version_number);
        Ok(versions)
    }

    async fn restore_version(&self, version_id: i64) -> StoreResult<PageBlock> {
        self.check()?;
        let mut state = self.state.write().await;
        let version = state
            .versions
            .iter()
            .find(|v| v.id == version_id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("version", version_id))?;
        let block = state.block_mut(version.block_id)?;
        block.content = version.content;
        block.settings = version.settings;
        block.updated_at = Utc::now();
        Ok(block.clone())
    }
}
