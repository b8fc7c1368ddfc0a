use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tera::Context;

use super::{form_context, form_failure, list_context, render, FormError};
use crate::db::services::{author_service, category_service, post_service, tag_service, PostQuery};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AdminPage;
use crate::session::Session;
use crate::state::AppState;
use crate::types::{ListNotice, PostForm, PostInput};

pub async fn list_page(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Query(notice): Query<ListNotice>,
) -> AppResult<Html<String>> {
    let posts = post_service::list_posts(&state.db, PostQuery::default()).await?;
    let mut ctx = list_context(notice.created.is_some());
    ctx.insert("posts", &posts);
    render(&state, &session, "/admin/posts", "Posts", "admin/posts.html", ctx)
}

async fn editor(
    state: &AppState,
    session: &Session,
    form: &PostForm,
    error: Option<&FormError>,
) -> AppResult<Html<String>> {
    let mut ctx: Context = form_context(form, error);
    ctx.insert("authors", &author_service::list_authors(&state.db).await?);
    ctx.insert("categories", &category_service::list_categories(&state.db).await?);
    render(state, session, "/admin/posts/new", "New post", "admin/post_form.html", ctx)
}

pub async fn new_page(AdminPage(session): AdminPage, State(state): State<AppState>) -> AppResult<Html<String>> {
    editor(&state, &session, &PostForm::default(), None).await
}

fn parse_id(raw: &str, field: &str, message: &str) -> AppResult<Option<i32>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| AppError::ValidationError { field: field.to_string(), message: message.to_string() })
}

/// Turns the submitted form into a [`PostInput`], creating unknown tags on the way.
async fn to_input(state: &AppState, form: &PostForm) -> AppResult<PostInput> {
    let author_id = parse_id(&form.author_id, "author_id", "Choose an author")?.ok_or_else(|| {
        AppError::ValidationError { field: "author_id".to_string(), message: "Choose an author".to_string() }
    })?;
    let category_id = parse_id(&form.category_id, "category_id", "Unknown category")?;
    let tags = tag_service::ensure_tags_by_name(&state.db, &form.tag_names()).await?;

    Ok(PostInput {
        title: form.title.clone(),
        slug: Some(form.slug.clone()),
        excerpt: Some(form.excerpt.clone()),
        content: form.content.clone(),
        published: form.is_published(),
        author_id,
        category_id,
        tag_ids: tags.into_iter().map(|t| t.id).collect(),
    })
}

pub async fn create(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Form(form): Form<PostForm>,
) -> AppResult<Response> {
    let saved = match to_input(&state, &form).await {
        Ok(input) => post_service::create_post(&state.db, &input).await,
        Err(e) => Err(e),
    };
    match saved {
        Ok(post) => {
            state.metrics.inc_created();
            tracing::info!(post_id = post.post.id, by = session.user.id, "Post created from admin form");
            Ok(Redirect::to("/admin/posts?created=1").into_response())
        }
        Err(e) => {
            let (status, error) = form_failure(e, "slug")?;
            let page = editor(&state, &session, &form, Some(&error)).await?;
            Ok((status, page).into_response())
        }
    }
}
