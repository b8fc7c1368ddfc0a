use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};

use super::{form_context, form_failure, list_context, render};
use crate::db::services::category_service;
use crate::error::AppResult;
use crate::middleware::auth::AdminPage;
use crate::state::AppState;
use crate::types::{CategoryForm, CategoryInput, ListNotice};

pub async fn list_page(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Query(notice): Query<ListNotice>,
) -> AppResult<Html<String>> {
    let categories = category_service::list_categories(&state.db).await?;
    let mut ctx = list_context(notice.created.is_some());
    ctx.insert("categories", &categories);
    render(&state, &session, "/admin/categories", "Categories", "admin/categories.html", ctx)
}

pub async fn new_page(AdminPage(session): AdminPage, State(state): State<AppState>) -> AppResult<Html<String>> {
    let ctx = form_context(&CategoryForm::default(), None);
    render(&state, &session, "/admin/categories/new", "New category", "admin/category_form.html", ctx)
}

pub async fn create(
    AdminPage(session): AdminPage,
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> AppResult<Response> {
    match category_service::create_category(&state.db, &CategoryInput::from(&form)).await {
        Ok(category) => {
            state.metrics.inc_created();
            tracing::info!(category_id = category.id, slug = %category.slug, "Category created from admin form");
            Ok(Redirect::to("/admin/categories?created=1").into_response())
        }
        Err(e) => {
            let (status, error) = form_failure(e, "name")?;
            let ctx = form_context(&form, Some(&error));
            let page =
                render(&state, &session, "/admin/categories/new", "New category", "admin/category_form.html", ctx)?;
            Ok((status, page).into_response())
        }
    }
}
