use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::db::services::post_service::{self, PostQuery};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminSession;
use crate::state::AppState;
use crate::types::{PostInput, PostView};

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all_posts_handler).post(create_post_handler))
        .route("/{id}", get(get_post_handler).put(update_post_handler).delete(delete_post_handler))
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_published_posts_handler))
        .route("/{slug}", get(get_published_post_handler))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

const MAX_PAGE_SIZE: u64 = 100;

impl ListParams {
    fn query(&self, published_only: bool) -> AppResult<PostQuery> {
        if self.offset.is_some_and(|offset| offset > post_service::MAX_OFFSET) {
            return Err(AppError::ValidationError {
                field: "offset".to_string(),
                message: format!("offset must be at most {}", post_service::MAX_OFFSET),
            });
        }
        Ok(PostQuery {
            published_only,
            category_id: None,
            limit: Some(self.limit.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)),
            offset: self.offset,
        })
    }
}

/// Drafts included, newest first.
async fn list_all_posts_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<PostView>>> {
    Ok(Json(post_service::list_posts(&state.db, params.query(false)?).await?))
}

async fn get_post_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PostView>> {
    Ok(Json(post_service::get_post(&state.db, id).await?))
}

async fn create_post_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<PostInput>,
) -> AppResult<(StatusCode, Json<PostView>)> {
    let post = post_service::create_post(&state.db, &payload).await?;
    state.metrics.inc_created();
    Ok((StatusCode::CREATED, Json(post)))
}

async fn update_post_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<PostInput>,
) -> AppResult<Json<PostView>> {
    let post = post_service::update_post(&state.db, id, &payload).await?;
    state.metrics.inc_updated();
    Ok(Json(post))
}

async fn delete_post_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    post_service::delete_post(&state.db, id).await?;
    state.metrics.inc_deleted();
    Ok(StatusCode::NO_CONTENT)
}

async fn list_published_posts_handler(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<PostView>>> {
    Ok(Json(post_service::list_posts(&state.db, params.query(true)?).await?))
}

async fn get_published_post_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<PostView>> {
    Ok(Json(post_service::get_published_post_by_slug(&state.db, &slug).await?))
}
