use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::entities::tag;
use crate::db::services::tag_service;
use crate::error::AppResult;
use crate::middleware::auth::AdminSession;
use crate::state::AppState;
use crate::types::TagInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags_handler).post(create_tag_handler))
        .route("/{id}", get(get_tag_handler).put(update_tag_handler).delete(delete_tag_handler))
}

/// All tags as `[{id, name}]`, ordered by name.
async fn list_tags_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<tag::Model>>> {
    let tags = tag_service::list_tags(&state.db).await?;
    Ok(Json(tags))
}

async fn get_tag_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<tag::Model>> {
    Ok(Json(tag_service::get_tag(&state.db, id).await?))
}

async fn create_tag_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<TagInput>,
) -> AppResult<(StatusCode, Json<tag::Model>)> {
    let tag = tag_service::create_tag(&state.db, &payload).await?;
    state.metrics.inc_created();
    Ok((StatusCode::CREATED, Json(tag)))
}

async fn update_tag_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<TagInput>,
) -> AppResult<Json<tag::Model>> {
    let tag = tag_service::update_tag(&state.db, id, &payload).await?;
    state.metrics.inc_updated();
    Ok(Json(tag))
}

async fn delete_tag_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    tag_service::delete_tag(&state.db, id).await?;
    state.metrics.inc_deleted();
    Ok(StatusCode::NO_CONTENT)
}
