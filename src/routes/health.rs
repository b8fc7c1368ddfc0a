use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Health check endpoint - lightweight, no database access
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Readiness probe: pings the database with timeout protection
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    match tokio::time::timeout(std::time::Duration::from_secs(5), state.db.ping()).await {
        Ok(Ok(())) => (StatusCode::OK, "ready").into_response(),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (StatusCode::SERVICE_UNAVAILABLE, "not ready: database unavailable").into_response()
        }
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "not ready: timeout").into_response(),
    }
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.get_snapshot())
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP quantumhive_logins_succeeded Successful logins\n# TYPE quantumhive_logins_succeeded counter\nquantumhive_logins_succeeded {}\n\
# HELP quantumhive_logins_failed Failed logins\n# TYPE quantumhive_logins_failed counter\nquantumhive_logins_failed {}\n\
# HELP quantumhive_unauthorized_requests Requests refused for lack of an admin session\n# TYPE quantumhive_unauthorized_requests counter\nquantumhive_unauthorized_requests {}\n\
# HELP quantumhive_content_created Content records created\n# TYPE quantumhive_content_created counter\nquantumhive_content_created {}\n\
# HELP quantumhive_content_updated Content records updated\n# TYPE quantumhive_content_updated counter\nquantumhive_content_updated {}\n\
# HELP quantumhive_content_deleted Content records deleted\n# TYPE quantumhive_content_deleted counter\nquantumhive_content_deleted {}\n\
# HELP quantumhive_page_views Public page views\n# TYPE quantumhive_page_views counter\nquantumhive_page_views {}\n\
# HELP quantumhive_uptime_seconds Uptime seconds\n# TYPE quantumhive_uptime_seconds gauge\nquantumhive_uptime_seconds {}\n",
        m.logins_succeeded,
        m.logins_failed,
        m.unauthorized_requests,
        m.content_created,
        m.content_updated,
        m.content_deleted,
        m.page_views,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
