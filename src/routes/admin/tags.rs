use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{form_context, form_failure, list_context, render};
use crate::db::services::tag_service;
use crate::error::AppResult;
use crate::middleware::auth::AdminPage;
use crate::state::AppState;
use crate::types::{ListNotice, TagForm, TagInput};

pub async fn list_page(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Query(notice): Query<ListNotice>,
) -> AppResult<Html<String>> {
    let tags = tag_service::list_tags(&state.db).await?;
    let mut ctx = list_context(notice.created.is_some());
    ctx.insert("tags", &tags);
    render(&state, &session, "/admin/tags", "Tags", "admin/tags.html", ctx)
}

pub async fn new_page(AdminPage(session): AdminPage, State(state): State<AppState>) -> AppResult<Html<String>> {
    let ctx = form_context(&TagForm::default(), None);
    render(&state, &session, "/admin/tags/new", "New tag", "admin/tag_form.html", ctx)
}

pub async fn create(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Form(form): Form<TagForm>,
) -> AppResult<Response> {
    match tag_service::create_tag(&state.db, &TagInput { name: form.name.clone() }).await {
        Ok(_) => {
            state.metrics.inc_created();
            Ok(Redirect::to("/admin/tags?created=1").into_response())
        }
        Err(e) => {
            let (status, error) = form_failure(e, "name")?;
            let ctx = form_context(&form, Some(&error));
            let page = render(&state, &session, "/admin/tags/new", "New tag", "admin/tag_form.html", ctx)?;
            Ok((status, page).into_response())
        }
    }
}
