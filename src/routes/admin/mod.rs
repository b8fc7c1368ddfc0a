//! Server-rendered admin panel.
//!
//! Every page except `/admin/login` takes an `AdminPage` guard, so a visitor
//! without an ADMIN session is sent to the login form with a 303. Create forms
//! POST back to their own URL; success redirects to the list with
//! `?created=1`, failure re-renders the form with the submitted values.

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tera::Context;

use crate::error::{AppError, AppResult};
use crate::session::Session;
use crate::state::AppState;
use crate::views::Frame;

pub mod authors;
pub mod categories;
pub mod dashboard;
pub mod login;
pub mod posts;
pub mod tags;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard_page))
        .route("/login", get(login::login_page).post(login::login_submit))
        .route("/logout", post(login::logout))
        .route("/authors", get(authors::list_page))
        .route("/authors/new", get(authors::new_page).post(authors::create))
        .route("/categories", get(categories::list_page))
        .route("/categories/new", get(categories::new_page).post(categories::create))
        .route("/tags", get(tags::list_page))
        .route("/tags/new", get(tags::new_page).post(tags::create))
        .route("/posts", get(posts::list_page))
        .route("/posts/new", get(posts::new_page).post(posts::create))
}

/// A message attached to one form field.
#[derive(Debug, Clone, Serialize)]
pub struct FormError {
    pub field: String,
    pub message: String,
}

/// Splits a save failure into something the form can show and everything else.
///
/// Validation errors become 422, unique violations 409 reported on
/// `conflict_field`. Other errors are passed through.
pub fn form_failure(err: AppError, conflict_field: &str) -> AppResult<(StatusCode, FormError)> {
    match err {
        AppError::ValidationError { field, message } => {
            Ok((StatusCode::UNPROCESSABLE_ENTITY, FormError { field, message }))
        }
        AppError::Conflict(_) => Ok((
            StatusCode::CONFLICT,
            FormError { field: conflict_field.to_string(), message: "This value is already taken".to_string() },
        )),
        other => Err(other),
    }
}

fn render(
    state: &AppState,
    session: &Session,
    path: &str,
    title: &str,
    template: &str,
    ctx: Context,
) -> AppResult<axum::response::Html<String>> {
    state.views.page(template, ctx, Frame { path, title, user: Some(&session.user) })
}

/// Context for a list page: `created` drives the success notice.
fn list_context(created: bool) -> Context {
    let mut ctx = Context::new();
    ctx.insert("created", &created);
    ctx
}

/// Context for a form page. `error` is always present so templates can test it.
fn form_context<T: Serialize>(form: &T, error: Option<&FormError>) -> Context {
    let mut ctx = Context::new();
    ctx.insert("form", form);
    ctx.insert("error", &error);
    ctx
}

