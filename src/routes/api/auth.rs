use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};

use crate::db::services::user_service;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentSession;
use crate::middleware::ip::MaybeRemoteAddr;
use crate::middleware::validation::sanitize_for_logging;
use crate::session;
use crate::state::AppState;
use crate::types::{LoginRequest, SessionResponse, SessionUser};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/session", get(session_handler))
}

/// A verified login: the user and a freshly signed token.
pub struct SignedIn {
    pub user: SessionUser,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Rate limits by client and `endpoint`, checks the credentials and signs a token.
///
/// Shared by the JSON login and the admin login form.
pub async fn sign_in(
    state: &AppState,
    endpoint: &str,
    remote: MaybeRemoteAddr,
    headers: &HeaderMap,
    credentials: &LoginRequest,
) -> AppResult<SignedIn> {
    let ip = remote.client_ip(headers, state.config.server.trust_proxy);
    state.rate_limiter.check_endpoint_limit(endpoint, ip).await?;

    match user_service::authenticate(&state.db, &credentials.email, &credentials.password).await {
        Ok(user) => {
            let (token, expires_at) = session::issue_token(&user, &state.config.auth)?;
            state.metrics.inc_login_succeeded();
            tracing::info!(user_id = user.id, role = %user.role, %ip, "User signed in");
            Ok(SignedIn { user, token, expires_at })
        }
        Err(AppError::InvalidCredentials) => {
            state.metrics.inc_login_failed();
            tracing::warn!(email = %sanitize_for_logging(&credentials.email), %ip, "Failed login attempt");
            Err(AppError::InvalidCredentials)
        }
        Err(e) => Err(e),
    }
}

async fn login_handler(
    State(state): State<AppState>,
    remote: MaybeRemoteAddr,
    headers: HeaderMap,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> AppResult<(CookieJar, Json<SessionResponse>)> {
    let signed = sign_in(&state, "/api/auth/login", remote, &headers, &payload).await?;
    let jar = jar.add(session::session_cookie(&state.config.auth, signed.token));
    Ok((jar, Json(SessionResponse { user: signed.user, expires_at: signed.expires_at.to_rfc3339() })))
}

async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (session::clear_session(jar, &state.config.auth), StatusCode::NO_CONTENT)
}

async fn session_handler(CurrentSession(session): CurrentSession) -> AppResult<Json<SessionResponse>> {
    let session = session.ok_or(AppError::Unauthorized)?;
    Ok(Json(SessionResponse { user: session.user, expires_at: session.expires_at.to_rfc3339() }))
}
