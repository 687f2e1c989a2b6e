//! PostgreSQL-backed [`ContentStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ContentStore, StoreError, StoreResult};
use crate::block::{BlockOrder, BlockUpdate, NewPageBlock, PageBlock};
use crate::content::{ContentEntry, TextStyleRow, UpsertContent, UpsertTextStyle};
use crate::section::{NewPageSection, PageSection, UpdatePageSection};
use crate::version::BlockVersion;

#[derive(Debug, Clone)]
pub struct PgContentStore {
    pool: PgPool,
}

impl PgContentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ContentStore for PgContentStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn content_by_page(&self, page: &str) -> StoreResult<Vec<ContentEntry>> {
        let rows = sqlx::query_as::<_, ContentEntry>(
            r#"
            SELECT id, page, section, content_key, content_value, updated_at
            FROM site_content
            WHERE page = $1
            ORDER BY id
            "#,
        )
        .bind(page)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn text_styles_by_page(&self, page: &str) -> StoreResult<Vec<TextStyleRow>> {
        let rows = sqlx::query_as::<_, TextStyleRow>(
            r#"
            SELECT s.content_id, c.section, c.content_key,
                   s.is_bold, s.is_italic, s.is_underline, s.font_size, s.font_color
            FROM content_text_styles s
            JOIN site_content c ON c.id = s.content_id
            WHERE c.page = $1
            ORDER BY s.id
            "#,
        )
        .bind(page)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn upsert_content(&self, input: &UpsertContent) -> StoreResult<ContentEntry> {
        let entry = sqlx::query_as::<_, ContentEntry>(
            r#"
            INSERT INTO site_content (page, section, content_key, content_value)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (page, section, content_key)
            DO UPDATE SET content_value = EXCLUDED.content_value, updated_at = now()
            RETURNING id, page, section, content_key, content_value, updated_at
            "#,
        )
        .bind(&input.page)
        .bind(&input.section)
        .bind(&input.content_key)
        .bind(&input.content_value)
        .fetch_one(&self.pool)
        .await?;
        Ok(entry)
    }

    async fn upsert_text_style(&self, input: &UpsertTextStyle) -> StoreResult<TextStyleRow> {
        let mut tx = self.pool.begin().await?;
        let content_id: i64 = sqlx::query_scalar(
            "SELECT id FROM site_content WHERE page = $1 AND section = $2 AND content_key = $3",
        )
        .bind(&input.page)
        .bind(&input.section)
        .bind(&input.content_key)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| {
            StoreError::not_found(
                "content",
                format!("{}/{}.{}", input.page, input.section, input.content_key),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO content_text_styles
                (content_id, is_bold, is_italic, is_underline, font_size, font_color)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (content_id) DO UPDATE SET
                is_bold = EXCLUDED.is_bold,
                is_italic = EXCLUDED.is_italic,
                is_underline = EXCLUDED.is_underline,
                font_size = EXCLUDED.font_size,
                font_color = EXCLUDED.font_color,
                updated_at = now()
            "#,
        )
        .bind(content_id)
        .bind(input.is_bold)
        .bind(input.is_italic)
        .bind(input.is_underline)
        .bind(&input.font_size)
        .bind(&input.font_color)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

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
        let rows = sqlx::query_as::<_, PageSection>(
            r#"
            SELECT id, page_id, section_type, section_order, title, content,
                   required_fields, is_visible, created_at, updated_at
            FROM page_sections
            WHERE page_id = $1
            ORDER BY section_order, id
            "#,
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn create_section(&self, input: &NewPageSection) -> StoreResult<PageSection> {
        let section = sqlx::query_as::<_, PageSection>(
            r#"
            INSERT INTO page_sections
                (page_id, section_type, section_order, title, content, required_fields, is_visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, page_id, section_type, section_order, title, content,
                      required_fields, is_visible, created_at, updated_at
            "#,
        )
        .bind(input.page_id)
        .bind(&input.section_type)
        .bind(input.section_order)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.required_fields)
        .bind(input.is_visible)
        .fetch_one(&self.pool)
        .await?;
        Ok(section)
    }

    async fn update_section(&self, id: i64, input: &UpdatePageSection) -> StoreResult<PageSection> {
        sqlx::query_as::<_, PageSection>(
            r#"
            UPDATE page_sections SET
                section_order = $2,
                title = $3,
                content = $4,
                required_fields = $5,
                is_visible = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING id, page_id, section_type, section_order, title, content,
                      required_fields, is_visible, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(input.section_order)
        .bind(&input.title)
        .bind(&input.content)
        .bind(&input.required_fields)
        .bind(input.is_visible)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("section", id))
    }

    async fn delete_section(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM page_sections WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("section", id));
        }
        Ok(())
    }

    async fn blocks_by_page(&self, page_id: i64) -> StoreResult<Vec<PageBlock>> {
        let rows = sqlx::query_as::<_, PageBlock>(
            r#"
            SELECT id, page_id, block_type, content, settings, visibility, animation,
                   block_order, created_at, updated_at
            FROM page_blocks
            WHERE page_id = $1
            ORDER BY block_order, id
            "#,
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn block(&self, id: i64) -> StoreResult<Option<PageBlock>> {
        let row = sqlx::query_as::<_, PageBlock>(
            r#"
            SELECT id, page_id, block_type, content, settings, visibility, animation,
                   block_order, created_at, updated_at
            FROM page_blocks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn create_block(&self, input: &NewPageBlock) -> StoreResult<PageBlock> {
        let block = sqlx::query_as::<_, PageBlock>(
            r#"
            INSERT INTO page_blocks
                (page_id, block_type, content, settings, visibility, animation, block_order)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, page_id, block_type, content, settings, visibility, animation,
                      block_order, created_at, updated_at
            "#,
        )
        .bind(input.page_id)
        .bind(&input.block_type)
        .bind(&input.content)
        .bind(&input.settings)
        .bind(&input.visibility)
        .bind(&input.animation)
        .bind(input.order)
        .fetch_one(&self.pool)
        .await?;
        Ok(block)
    }

    async fn save_block(
        &self,
        id: i64,
        update: &BlockUpdate,
        created_by: Option<&str>,
    ) -> StoreResult<(PageBlock, BlockVersion)> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, PageBlock>(
            r#"
            SELECT id, page_id, block_type, content, settings, visibility, animation,
                   block_order, created_at, updated_at
            FROM page_blocks
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("block", id))?;

        let version = sqlx::query_as::<_, BlockVersion>(
            r#"
            INSERT INTO block_versions
                (block_id, page_id, block_type, version_number, content, settings, block_order, created_by)
            VALUES (
                $1, $2, $3,
                (SELECT COALESCE(MAX(version_number), 0) + 1 FROM block_versions WHERE block_id = $1),
                $4, $5, $6, $7
            )
            RETURNING id, block_id, page_id, block_type, version_number, content, settings,
                      block_order, created_at, created_by
            "#,
        )
        .bind(current.id)
        .bind(current.page_id)
        .bind(&current.block_type)
        .bind(&current.content)
        .bind(&current.settings)
        .bind(current.order)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        let block = sqlx::query_as::<_, PageBlock>(
            r#"
            UPDATE page_blocks SET
                content = COALESCE($2, content),
                settings = COALESCE($3, settings),
                visibility = COALESCE($4, visibility),
                animation = COALESCE($5, animation),
                block_order = COALESCE($6, block_order),
                updated_at = now()
            WHERE id = $1
            RETURNING id, page_id, block_type, content, settings, visibility, animation,
                      block_order, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&update.content)
        .bind(&update.settings)
        .bind(&update.visibility)
        .bind(&update.animation)
        .bind(update.order)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((block, version))
    }

    async fn delete_block(&self, id: i64) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM page_blocks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("block", id));
        }
        Ok(())
    }

    async fn set_block_orders(&self, page_id: i64, orders: &[BlockOrder]) -> StoreResult<u64> {
        let mut tx = self.pool.begin().await?;
        let mut changed = 0;
        for entry in orders {
            let result = sqlx::query(
                "UPDATE page_blocks SET block_order = $1, updated_at = now() WHERE id = $2 AND page_id = $3",
            )
            .bind(entry.order)
            .bind(entry.id)
            .bind(page_id)
            .execute(&mut *tx)
            .await?;
            changed += result.rows_affected();
        }
        tx.commit().await?;
        Ok(changed)
    }

    async fn list_versions(&self, block_id: i64) -> StoreResult<Vec<BlockVersion>> {
        let rows = sqlx::query_as::<_, BlockVersion>(
            r#"
            SELECT id, block_id, page_id, block_type, version_number, content, settings,
                   block_order, created_at, created_by
            FROM block_versions
            WHERE block_id = $1
            ORDER BY version_number
            "#,
        )
        .bind(block_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn restore_version(&self, version_id: i64) -> StoreResult<PageBlock> {
        let mut tx = self.pool.begin().await?;

        let version = sqlx::query_as::<_, BlockVersion>(
            r#"
            SELECT id, block_id, page_id, block_type, version_number, content, settings,
                   block_order, created_at, created_by
            FROM block_versions
            WHERE id = $1
            "#,
        )
        .bind(version_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("version", version_id))?;

        let block = sqlx::query_as::<_, PageBlock>(
            r#"
            UPDATE page_blocks SET content = $2, settings = $3, updated_at = now()
            WHERE id = $1
            RETURNING id, page_id, block_type, content, settings, visibility, animation,
                      block_order, created_at, updated_at
            "#,
        )
        .bind(version.block_id)
        .bind(&version.content)
        .bind(&version.settings)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| StoreError::not_found("block", version.block_id))?;

        tx.commit().await?;
        Ok(block)
    }
}
