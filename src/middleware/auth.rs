//! Session extractors.
//!
//! - [`CurrentSession`]: optional session, never rejects (public pages).
//! - [`AdminSession`]: JSON API guard, rejects with `401 {"error": "Unauthorized"}`.
//! - [`AdminPage`]: admin page guard, redirects to `/admin/login`.
//!
//! Both admin guards re-read the user row so a deleted or demoted account loses
//! access before its token expires.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::db::enums::Role;
use crate::db::services::user_service;
use crate::error::{AppError, AppResult};
use crate::session::{self, Session};
use crate::state::AppState;

pub const LOGIN_PATH: &str = "/admin/login";

fn session_from_parts(parts: &Parts, state: &AppState) -> Option<Session> {
    let auth = &state.config.auth;
    let token = session::token_from_headers(&parts.headers, &auth.cookie_name)?;
    session::decode_token(&token, &auth.session_secret)
}

/// Resolves the request's session to a current ADMIN, or `Unauthorized`.
async fn require_admin(parts: &Parts, state: &AppState) -> AppResult<Session> {
    match session_from_parts(parts, state) {
        Some(session) => verify_admin(state, session).await,
        None => Err(AppError::Unauthorized),
    }
}

/// Checks a decoded session against the users table: the account must still
/// exist and still be an ADMIN. Refreshes the session user from the row.
pub async fn verify_admin(state: &AppState, mut session: Session) -> AppResult<Session> {
    if !session.is_admin() {
        return Err(AppError::Unauthorized);
    }
    let user = user_service::find_user_by_id(&state.db, session.user.id).await?;
    match user {
        Some(u) if u.role == Role::Admin.as_str() => {
            session.user = user_service::session_user(&u)?;
            Ok(session)
        }
        _ => Err(AppError::Unauthorized),
    }
}

#[derive(Debug, Clone)]
pub struct CurrentSession(pub Option<Session>);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(CurrentSession(session_from_parts(parts, state)))
    }
}

#[derive(Debug, Clone)]
pub struct AdminSession(pub Session);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match require_admin(parts, state).await {
            Ok(session) => Ok(AdminSession(session)),
            Err(AppError::Unauthorized) => {
                state.metrics.inc_unauthorized();
                tracing::debug!(path = %parts.uri.path(), "Rejected non-admin API request");
                Err(AppError::Unauthorized)
            }
            Err(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminPage(pub Session);

impl FromRequestParts<AppState> for AdminPage {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match require_admin(parts, state).await {
            Ok(session) => Ok(AdminPage(session)),
            Err(AppError::Unauthorized) => {
                state.metrics.inc_unauthorized();
                Err(Redirect::to(LOGIN_PATH).into_response())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}
