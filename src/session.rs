//! Signed session tokens.
//!
//! A session is an HS256 JWT carrying the user's id, email, name and role. It
//! travels in an HttpOnly cookie for browser pages and may also be sent as an
//! `Authorization: Bearer` header by API clients.

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::db::enums::Role;
use crate::error::{AppError, AppResult};
use crate::types::SessionUser;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// A decoded, unexpired session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: SessionUser,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

/// Signs a token for `user` valid for `auth.session_ttl_hours`.
pub fn issue_token(user: &SessionUser, auth: &AuthConfig) -> AppResult<(String, DateTime<Utc>)> {
    let now = Utc::now();
    let expires_at = Duration::try_hours(auth.session_ttl_hours)
        .and_then(|ttl| now.checked_add_signed(ttl))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("session ttl out of range: {}h", auth.session_ttl_hours)))?;
    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
        iat: now.timestamp(),
        exp: expires_at.timestamp(),
    };
    let token = encode(&Header::default(), &claims, &EncodingKey::from_secret(auth.session_secret.as_bytes()))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to sign session token: {}", e)))?;
    Ok((token, expires_at))
}

/// Verifies signature and expiry. Any failure yields `None`.
pub fn decode_token(token: &str, secret: &str) -> Option<Session> {
    let mut validation = Validation::default();
    validation.leeway = 0;
    match decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation) {
        Ok(data) => {
            let c = data.claims;
            let expires_at = Utc.timestamp_opt(c.exp, 0).single()?;
            Some(Session {
                user: SessionUser { id: c.sub, email: c.email, name: c.name, role: c.role },
                expires_at,
            })
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Rejected session token");
            None
        }
    }
}

/// Bearer header first, then the session cookie.
pub fn token_from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    })
}

pub fn session_cookie(auth: &AuthConfig, token: String) -> Cookie<'static> {
    Cookie::build((auth.cookie_name.clone(), token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(auth.cookie_secure)
        .build()
}

pub fn clear_session(jar: CookieJar, auth: &AuthConfig) -> CookieJar {
    jar.remove(Cookie::build((auth.cookie_name.clone(), "")).path("/"))
}
