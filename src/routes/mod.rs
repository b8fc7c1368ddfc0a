//! HTTP route handlers for QuantumHive.
//!
//! - `admin`: server-rendered admin panel under `/admin`
//! - `api`: JSON API under `/api`
//! - `assets`: the embedded stylesheet
//! - `health`: health, readiness, metrics and version endpoints
//! - `pages`: the public site

use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::middleware;
use crate::state::AppState;

pub mod admin;
pub mod api;
pub mod assets;
pub mod health;
pub mod pages;

/// The complete application: routes plus the middleware stack.
pub fn router(state: AppState) -> Router {
    let cfg_arc = state.config.clone();

    let app = Router::new()
        .route("/healthz", get(health::healthz))
        .route("/readyz", get(health::readyz))
        .route("/metrics", get(health::metrics))
        .route("/metrics/prometheus", get(health::metrics_prometheus))
        .route("/version", get(health::version))
        .route("/static/site.css", get(assets::site_css))
        .route("/", get(pages::home))
        .route("/blog", get(pages::blog_index))
        .route("/blog/{slug}", get(pages::blog_post))
        .route("/about", get(pages::about))
        .route("/contact", get(pages::contact))
        .nest("/admin", admin::router())
        .nest("/api", api::router())
        .fallback(pages::fallback)
        .with_state(state)
        .layer(DefaultBodyLimit::max(middleware::validation::max_body_size()))
        .layer(from_fn(middleware::validation::validate_request_middleware))
        .layer(from_fn_with_state(cfg_arc.clone(), middleware::rate_limit::rate_limit_middleware))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(from_fn_with_state(cfg_arc, middleware::security_headers::security_headers_middleware));

    // CORS: permissive in debug builds for local front-end work, same-origin in release
    if cfg!(debug_assertions) {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}
