//! JSON API.
//!
//! `/api/admin/*` requires an ADMIN session ([`AdminSession`]) and answers
//! `401 {"error": "Unauthorized"}` otherwise. `/api/posts` is public and only
//! ever exposes published posts.
//!
//! [`AdminSession`]: crate::middleware::auth::AdminSession

use axum::Router;

use crate::state::AppState;

pub mod auth;
pub mod authors;
pub mod categories;
pub mod posts;
pub mod tags;

pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/admin/tags", tags::router())
        .nest("/admin/authors", authors::router())
        .nest("/admin/categories", categories::router())
        .nest("/admin/posts", posts::admin_router())
        .nest("/posts", posts::public_router())
}
