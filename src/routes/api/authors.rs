use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::entities::author;
use crate::db::services::author_service;
use crate::error::AppResult;
use crate::middleware::auth::AdminSession;
use crate::state::AppState;
use crate::types::AuthorInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_authors_handler).post(create_author_handler))
        .route("/{id}", get(get_author_handler).put(update_author_handler).delete(delete_author_handler))
}

async fn list_authors_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<author::Model>>> {
    Ok(Json(author_service::list_authors(&state.db).await?))
}

async fn get_author_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<author::Model>> {
    Ok(Json(author_service::get_author(&state.db, id).await?))
}

async fn create_author_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<AuthorInput>,
) -> AppResult<(StatusCode, Json<author::Model>)> {
    let author = author_service::create_author(&state.db, &payload).await?;
    state.metrics.inc_created();
    Ok((StatusCode::CREATED, Json(author)))
}

async fn update_author_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<AuthorInput>,
) -> AppResult<Json<author::Model>> {
    let author = author_service::update_author(&state.db, id, &payload).await?;
    state.metrics.inc_updated();
    Ok(Json(author))
}

// 409 while the author still owns posts
async fn delete_author_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    author_service::delete_author(&state.db, id).await?;
    state.metrics.inc_deleted();
    Ok(StatusCode::NO_CONTENT)
}
