//! Public site: home, blog, static pages and the 404 page.

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tera::Context;

use crate::db::services::{category_service, post_service, PostQuery};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::{verify_admin, CurrentSession, LOGIN_PATH};
use crate::session::Session;
use crate::state::AppState;
use crate::views::{Frame, Layout};

const HOME_POSTS: u64 = 5;

fn render(
    state: &AppState,
    session: &Option<Session>,
    path: &str,
    title: &str,
    template: &str,
    ctx: Context,
) -> AppResult<Html<String>> {
    state.metrics.inc_page_view();
    let user = session.as_ref().map(|s| &s.user);
    state.views.page(template, ctx, Frame { path, title, user })
}

fn not_found_page(state: &AppState, session: &Option<Session>, path: &str, message: Option<&str>) -> AppResult<Response> {
    let mut ctx = Context::new();
    if let Some(message) = message {
        ctx.insert("message", message);
    }
    let page = render(state, session, path, "Not found", "pages/not_found.html", ctx)?;
    Ok((StatusCode::NOT_FOUND, page).into_response())
}

pub async fn home(State(state): State<AppState>, CurrentSession(session): CurrentSession) -> AppResult<Html<String>> {
    let posts = post_service::list_posts(
        &state.db,
        PostQuery { published_only: true, limit: Some(HOME_POSTS), ..Default::default() },
    )
    .await?;
    let mut ctx = Context::new();
    ctx.insert("posts", &posts);
    let title = state.config.site.name.clone();
    render(&state, &session, "/", &title, "pages/home.html", ctx)
}

#[derive(Debug, Default, Deserialize)]
pub struct BlogParams {
    pub page: Option<u64>,
    pub category: Option<String>,
}

pub async fn blog_index(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(params): Query<BlogParams>,
) -> AppResult<Response> {
    let category = match params.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(slug) => match category_service::find_category_by_slug(&state.db, slug).await? {
            Some(c) => Some(c),
            None => return not_found_page(&state, &session, "/blog", Some("There is no such category.")),
        },
        None => None,
    };

    let per_page = state.config.site.posts_per_page;
    let filter = PostQuery { published_only: true, category_id: category.as_ref().map(|c| c.id), ..Default::default() };
    let total = post_service::count_matching(&state.db, filter).await?;
    let total_pages = total.div_ceil(per_page).max(1);
    // past the end shows the last page
    let page = params.page.unwrap_or(1).clamp(1, total_pages);
    let offset = (page - 1).saturating_mul(per_page).min(post_service::MAX_OFFSET);
    let posts =
        post_service::list_posts(&state.db, PostQuery { limit: Some(per_page), offset: Some(offset), ..filter }).await?;
    let categories = category_service::list_categories(&state.db).await?;

    let mut ctx = Context::new();
    ctx.insert("posts", &posts);
    ctx.insert("categories", &categories);
    ctx.insert("category", &category);
    ctx.insert("category_query", &category.as_ref().map(|c| format!("&category={}", c.slug)).unwrap_or_default());
    ctx.insert("page", &page);
    ctx.insert("total_pages", &total_pages);
    let title = category.as_ref().map(|c| c.name.clone()).unwrap_or_else(|| "Blog".to_string());
    Ok(render(&state, &session, "/blog", &title, "pages/blog_index.html", ctx)?.into_response())
}

pub async fn blog_post(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(slug): Path<String>,
) -> AppResult<Response> {
    let path = format!("/blog/{}", slug);
    match post_service::get_published_post_by_slug(&state.db, &slug).await {
        Ok(post) => {
            let mut ctx = Context::new();
            ctx.insert("post", &post);
            Ok(render(&state, &session, &path, &post.post.title, "pages/blog_post.html", ctx)?.into_response())
        }
        Err(AppError::NotFound(_)) => not_found_page(&state, &session, &path, Some("This post does not exist.")),
        Err(e) => Err(e),
    }
}

pub async fn about(State(state): State<AppState>, CurrentSession(session): CurrentSession) -> AppResult<Html<String>> {
    render(&state, &session, "/about", "About", "pages/about.html", Context::new())
}

pub async fn contact(State(state): State<AppState>, CurrentSession(session): CurrentSession) -> AppResult<Html<String>> {
    render(&state, &session, "/contact", "Contact", "pages/contact.html", Context::new())
}

/// Unknown API paths get a JSON 404, unknown admin paths need a current admin first,
/// everything else gets the public 404 page.
pub async fn fallback(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    uri: Uri,
) -> AppResult<Response> {
    let path = uri.path();
    if path.starts_with("/api/") {
        return Err(AppError::NotFound(format!("No route for {}", path)));
    }
    if Layout::for_path(path) != Layout::Public {
        let admin = match session {
            Some(session) => verify_admin(&state, session).await,
            None => Err(AppError::Unauthorized),
        };
        return match admin {
            Ok(admin) => not_found_page(&state, &Some(admin), path, None),
            Err(AppError::Unauthorized) => {
                state.metrics.inc_unauthorized();
                Ok(Redirect::to(LOGIN_PATH).into_response())
            }
            Err(e) => Err(e),
        };
    }
    not_found_page(&state, &session, "/404", None)
}
