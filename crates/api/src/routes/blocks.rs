use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use brand_cms_core::block::html::page_html;
use brand_cms_core::block::{render_page, BlockUpdate, NewPageBlock, PageBlock, RenderContext};
use brand_cms_core::mutation::{OrderChange, ReorderBlocks};
use brand_cms_core::version::{latest_version_number, BlockVersion};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::state::AppState;

/// Viewport assumed when the caller does not send one.
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pages/{page_id}/blocks", get(rendered_blocks))
        .route("/v1/admin/pages/{page_id}/blocks", post(create_block))
        .route("/v1/admin/pages/{page_id}/blocks/reorder", post(reorder_blocks))
        .route("/v1/admin/pages/{page_id}/blocks/normalize", post(normalize_blocks))
        .route("/v1/admin/blocks/{id}", put(save_block).delete(delete_block))
        .route("/v1/admin/blocks/{id}/versions", get(list_versions))
        .route("/v1/admin/versions/{id}/restore", post(restore_version))
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Html,
}

#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub width: Option<u32>,
    #[serde(default)]
    pub format: Format,
}

/// Render a page's visible blocks. A store failure serves an empty page.
async fn rendered_blocks(
    State(state): State<AppState>,
    Path(page_id): Path<i64>,
    Query(query): Query<RenderQuery>,
) -> Response {
    let blocks = match state.store().blocks_by_page(page_id).await {
        Ok(blocks) => blocks,
        Err(err) => {
            tracing::warn!(page_id, error = %err, "blocks unavailable, rendering empty page");
            Vec::new()
        }
    };

    let ctx = RenderContext::new(query.width.unwrap_or(DEFAULT_VIEWPORT_WIDTH), Utc::now());
    let rendered = render_page(&blocks, &ctx, state.media());

    let no_store = [(header::CACHE_CONTROL, "no-store")];
    match query.format {
        Format::Json => (no_store, Json(rendered)).into_response(),
        Format::Html => (no_store, Html(page_html(&rendered))).into_response(),
    }
}

async fn create_block(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(page_id): Path<i64>,
    Json(mut input): Json<NewPageBlock>,
) -> ApiResult<(StatusCode, Json<PageBlock>)> {
    input.page_id = page_id;
    let block = state.mutations().create_block(&input).await?;
    Ok((StatusCode::CREATED, Json(block)))
}

async fn reorder_blocks(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(page_id): Path<i64>,
    Json(input): Json<ReorderBlocks>,
) -> ApiResult<Json<OrderChange>> {
    Ok(Json(state.mutations().reorder_blocks(page_id, &input).await?))
}

async fn normalize_blocks(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(page_id): Path<i64>,
) -> ApiResult<Json<OrderChange>> {
    Ok(Json(state.mutations().normalize_block_orders(page_id).await?))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SavedBlock {
    block: PageBlock,
    version: BlockVersion,
}

async fn save_block(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
    Json(update): Json<BlockUpdate>,
) -> ApiResult<Json<SavedBlock>> {
    let (block, version) = state
        .mutations()
        .save_block(id, &update, Some(&admin.subject))
        .await?;
    Ok(Json(SavedBlock { block, version }))
}

async fn delete_block(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.mutations().delete_block(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VersionList {
    block_id: i64,
    latest: Option<i32>,
    versions: Vec<BlockVersion>,
}

async fn list_versions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<VersionList>> {
    let versions = state.mutations().list_versions(id).await?;
    Ok(Json(VersionList {
        block_id: id,
        latest: latest_version_number(&versions),
        versions,
    }))
}

async fn restore_version(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<PageBlock>> {
    let block = state
        .mutations()
        .restore_version(id, Some(&admin.subject))
        .await?;
    Ok(Json(block))
}
