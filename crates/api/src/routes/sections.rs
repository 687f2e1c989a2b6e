use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use brand_cms_core::section::{NewPageSection, PageCompleteness, PageSection, UpdatePageSection};

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pages/{page_id}/sections", get(visible_sections))
        .route("/v1/admin/pages/{page_id}/sections", post(create_section))
        .route(
            "/v1/admin/pages/{page_id}/sections/completeness",
            get(completeness),
        )
        .route(
            "/v1/admin/sections/{id}",
            put(update_section).delete(delete_section),
        )
}

/// Visible sections in display order; empty when the store is unreachable.
async fn visible_sections(State(state): State<AppState>, Path(page_id): Path<i64>) -> Json<Vec<PageSection>> {
    match state.store().sections_by_page(page_id).await {
        Ok(sections) => Json(sections.into_iter().filter(|s| s.is_visible).collect()),
        Err(err) => {
            tracing::warn!(page_id, error = %err, "sections unavailable, serving none");
            Json(Vec::new())
        }
    }
}

async fn create_section(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(page_id): Path<i64>,
    Json(mut input): Json<NewPageSection>,
) -> ApiResult<(StatusCode, Json<PageSection>)> {
    input.page_id = page_id;
    let section = state.mutations().create_section(&input).await?;
    Ok((StatusCode::CREATED, Json(section)))
}

async fn completeness(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(page_id): Path<i64>,
) -> ApiResult<Json<PageCompleteness>> {
    let sections = state.store().sections_by_page(page_id).await?;
    Ok(Json(PageCompleteness::of(page_id, &sections)))
}

async fn update_section(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
    Json(input): Json<UpdatePageSection>,
) -> ApiResult<Json<PageSection>> {
    let section = state.mutations().update_section(id, &input).await?;
    Ok(Json(section))
}

async fn delete_section(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.mutations().delete_section(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
