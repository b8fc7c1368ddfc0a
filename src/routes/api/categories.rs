use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::db::entities::category;
use crate::db::services::category_service;
use crate::error::AppResult;
use crate::middleware::auth::AdminSession;
use crate::state::AppState;
use crate::types::CategoryInput;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories_handler).post(create_category_handler))
        .route(
            "/{id}",
            get(get_category_handler).put(update_category_handler).delete(delete_category_handler),
        )
}

async fn list_categories_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<category::Model>>> {
    Ok(Json(category_service::list_categories(&state.db).await?))
}

async fn get_category_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<category::Model>> {
    Ok(Json(category_service::get_category(&state.db, id).await?))
}

async fn create_category_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(payload): Json<CategoryInput>,
) -> AppResult<(StatusCode, Json<category::Model>)> {
    let category = category_service::create_category(&state.db, &payload).await?;
    state.metrics.inc_created();
    Ok((StatusCode::CREATED, Json(category)))
}

async fn update_category_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<CategoryInput>,
) -> AppResult<Json<category::Model>> {
    let category = category_service::update_category(&state.db, id, &payload).await?;
    state.metrics.inc_updated();
    Ok(Json(category))
}

async fn delete_category_handler(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    category_service::delete_category(&state.db, id).await?;
    state.metrics.inc_deleted();
    Ok(StatusCode::NO_CONTENT)
}
