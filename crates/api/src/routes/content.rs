use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};
use brand_cms_core::content::{ContentEntry, ContentSet, TextStyleRow, UpsertContent, UpsertTextStyle};

use crate::auth::AdminUser;
use crate::error::ApiResult;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pages/{page}/content", get(page_content))
        .route("/v1/admin/content", put(upsert_content))
        .route("/v1/admin/content/style", put(upsert_style))
}

/// Resolved fields for one page. Never fails: an unreachable store yields
/// an empty page and every field falls back to its default.
async fn page_content(State(state): State<AppState>, Path(page): Path<String>) -> impl IntoResponse {
    let set = ContentSet::load(state.store(), &page).await;
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(set.resolve()),
    )
}

async fn upsert_content(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(input): Json<UpsertContent>,
) -> ApiResult<Json<ContentEntry>> {
    tracing::debug!(admin = %admin.subject, page = %input.page, "upsert content");
    let entry = state.mutations().upsert_content(&input).await?;
    Ok(Json(entry))
}

async fn upsert_style(
    State(state): State<AppState>,
    _admin: AdminUser,
    Json(input): Json<UpsertTextStyle>,
) -> ApiResult<Json<TextStyleRow>> {
    let style = state.mutations().upsert_text_style(&input).await?;
    Ok(Json(style))
}
