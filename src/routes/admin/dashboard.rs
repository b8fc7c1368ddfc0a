use axum::{extract::State, response::Html};
use tera::Context;

use crate::db::services::post_service::{self, PostQuery};
use crate::error::AppResult;
use crate::middleware::auth::AdminPage;
use crate::state::AppState;

const RECENT_POSTS: u64 = 5;

pub async fn dashboard_page(AdminPage(session): AdminPage, State(state): State<AppState>) -> AppResult<Html<String>> {
    let counts = post_service::content_counts(&state.db).await?;
    let recent =
        post_service::list_posts(&state.db, PostQuery { limit: Some(RECENT_POSTS), ..Default::default() }).await?;

    let mut ctx = Context::new();
    ctx.insert("counts", &counts);
    ctx.insert("recent", &recent);
    super::render(&state, &session, "/admin", "Dashboard", "admin/dashboard.html", ctx)
}
