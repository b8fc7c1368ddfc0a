use axum::{
    extract::{Form, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tera::Context;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{CurrentSession, LOGIN_PATH};
use crate::middleware::ip::MaybeRemoteAddr;
use crate::routes::api::auth::sign_in;
use crate::session;
use crate::state::AppState;
use crate::types::LoginRequest;
use crate::views::Frame;

fn login_form(state: &AppState, email: &str, error: Option<&str>) -> AppResult<axum::response::Html<String>> {
    let mut ctx = Context::new();
    ctx.insert("email", email);
    ctx.insert("error", &error);
    state.views.page("admin/login.html", ctx, Frame { path: LOGIN_PATH, title: "Sign in", user: None })
}

pub async fn login_page(State(state): State<AppState>, CurrentSession(session): CurrentSession) -> AppResult<Response> {
    if session.is_some_and(|s| s.is_admin()) {
        return Ok(Redirect::to("/admin").into_response());
    }
    Ok(login_form(&state, "", None)?.into_response())
}

pub async fn login_submit(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    jar: CookieJar,
    Form(form): Form<LoginRequest>,
) -> AppResult<Response> {
    match sign_in(&state, LOGIN_PATH, remote, &headers, &form).await {
        Ok(signed) => {
            let jar = jar.add(session::session_cookie(&state.config.auth, signed.token));
            Ok((jar, Redirect::to("/admin")).into_response())
        }
        Err(AppError::InvalidCredentials) => {
            let page = login_form(&state, &form.email, Some("Invalid email or password"))?;
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(AppError::RateLimited { retry_after_seconds }) => {
            let message = format!("Too many attempts. Try again in {} seconds.", retry_after_seconds);
            let page = login_form(&state, &form.email, Some(&message))?;
            Ok((StatusCode::TOO_MANY_REQUESTS, page).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    (session::clear_session(jar, &state.config.auth), Redirect::to(LOGIN_PATH))
}
