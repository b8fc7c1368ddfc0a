use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{form_context, form_failure, list_context, render};
use crate::db::services::author_service;
use crate::error::AppResult;
use crate::middleware::auth::AdminPage;
use crate::state::AppState;
use crate::types::{AuthorForm, AuthorInput, ListNotice};

pub async fn list_page(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Query(notice): Query<ListNotice>,
) -> AppResult<Html<String>> {
    let authors = author_service::list_authors(&state.db).await?;
    let mut ctx = list_context(notice.created.is_some());
    ctx.insert("authors", &authors);
    render(&state, &session, "/admin/authors", "Authors", "admin/authors.html", ctx)
}

pub async fn new_page(AdminPage(session): AdminPage, State(state): State<AppState>) -> AppResult<Html<String>> {
    let ctx = form_context(&AuthorForm::default(), None);
    render(&state, &session, "/admin/authors/new", "New author", "admin/author_form.html", ctx)
}

pub async fn create(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Response> {
    match author_service::create_author(&state.db, &AuthorInput::from(&form)).await {
        Ok(author) => {
            state.metrics.inc_created();
            tracing::info!(author_id = author.id, by = session.user.id, "Author created from admin form");
            Ok(Redirect::to("/admin/authors?created=1").into_response())
        }
        Err(e) => {
            let (status, error) = form_failure(e, "email")?;
            let ctx = form_context(&form, Some(&error));
            let page = render(&state, &session, "/admin/authors/new", "New author", "admin/author_form.html", ctx)?;
            Ok((status, page).into_response())
        }
    }
}
