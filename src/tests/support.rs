use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use crate::config::AppConfig;
use crate::db::{self, enums::Role, services::user_service};
use crate::session;
use crate::state::AppState;

pub const ADMIN_EMAIL: &str = "ada@quantumhive.test";
pub const USER_EMAIL: &str = "rita@quantumhive.test";
pub const PASSWORD: &str = "correct-horse-battery";

pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".to_string();
    cfg.auth.session_secret = "quantumhive-test-secret-0123456789".to_string();
    cfg.auth.bcrypt_cost = 4;
    cfg
}

/// The full router over a fresh in-memory database holding one ADMIN and one USER.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin_token: String,
    pub user_token: String,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(cfg: AppConfig) -> Self {
        let pool = db::connect(&cfg.database.url, cfg.database.max_connections).await.unwrap();
        db::init_db(&pool).await.unwrap();
        let conn = db::orm(pool);

        let admin = user_service::create_user(&conn, ADMIN_EMAIL, "Ada Admin", PASSWORD, Role::Admin, 4)
            .await
            .unwrap();
        let user = user_service::create_user(&conn, USER_EMAIL, "Rita Reader", PASSWORD, Role::User, 4)
            .await
            .unwrap();
        let (admin_token, _) = session::issue_token(&user_service::session_user(&admin).unwrap(), &cfg.auth).unwrap();
        let (user_token, _) = session::issue_token(&user_service::session_user(&user).unwrap(), &cfg.auth).unwrap();

        let state = AppState::new(conn, cfg).unwrap();
        let router = crate::routes::router(state.clone());
        TestApp { router, state, admin_token, user_token }
    }

    pub fn cookie(&self, token: &str) -> String {
        format!("{}={}", self.state.config.auth.cookie_name, token)
    }

    pub fn admin_cookie(&self) -> String {
        self.cookie(&self.admin_token)
    }

    pub fn user_cookie(&self) -> String {
        self.cookie(&self.user_token)
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn json(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    resp.into_body().collect().await.unwrap().to_bytes().to_vec()
}

pub async fn body_json(resp: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

pub async fn body_text(resp: Response<Body>) -> String {
    String::from_utf8(body_bytes(resp).await).unwrap()
}

pub fn location(resp: &Response<Body>) -> String {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).unwrap_or_default().to_string()
}
