#[cfg(test)]
mod tests {
    use axum::http::{header, StatusCode};
    use tower::ServiceExt;

    use crate::db;
    use crate::state::AppState;
    use crate::tests::support::{body_json, body_text, get, test_config, TestApp};

    #[tokio::test]
    async fn test_healthz_endpoint() {
        let app = TestApp::new().await;
        let response = app.send(get("/healthz", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_version_endpoint() {
        let app = TestApp::new().await;
        let response = app.send(get("/version", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let v = body_json(response).await;
        assert_eq!(v["name"], "quantumhive");
        assert!(!v["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_readyz_endpoint_ok() {
        let app = TestApp::new().await;
        let response = app.send(get("/readyz", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ready");
    }

    #[tokio::test]
    async fn test_readyz_endpoint_db_error() {
        let cfg = test_config();
        let pool = db::connect(&cfg.database.url, 1).await.unwrap();
        pool.close().await;
        let state = AppState::new(db::orm(pool), cfg).unwrap();

        let response = crate::routes::router(state).oneshot(get("/readyz", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(body_text(response).await.contains("not ready"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        let app = TestApp::new().await;
        app.send(get("/about", None)).await;

        let v = body_json(app.send(get("/metrics", None)).await).await;
        assert_eq!(v["logins_succeeded"], 0);
        assert_eq!(v["content_created"], 0);
        assert_eq!(v["page_views"], 1);
        assert!(v["uptime_seconds"].is_u64());
    }

    #[tokio::test]
    async fn test_metrics_prometheus_endpoint() {
        let app = TestApp::new().await;
        let response = app.send(get("/metrics/prometheus", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("quantumhive_logins_failed 0"));
        assert!(body.contains("quantumhive_page_views 0"));
        assert!(body.contains("# TYPE quantumhive_uptime_seconds gauge"));
    }

    #[tokio::test]
    async fn security_headers_are_present() {
        let app = TestApp::new().await;
        let response = app.send(get("/about", None)).await;
        let headers = response.headers();
        assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(headers.get("x-frame-options").unwrap(), "SAMEORIGIN");
        assert_eq!(headers.get("referrer-policy").unwrap(), "same-origin");
        assert!(headers.get("permissions-policy").is_some());
        assert!(headers.get(header::CACHE_CONTROL).is_none());
    }

    #[tokio::test]
    async fn admin_and_json_responses_are_not_cached() {
        let app = TestApp::new().await;

        let admin = app.send(get("/admin", Some(&app.admin_cookie()))).await;
        assert_eq!(admin.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");

        let api = app.send(get("/api/posts", None)).await;
        assert_eq!(api.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
        assert_eq!(api.headers().get(header::PRAGMA).unwrap(), "no-cache");
    }

    #[tokio::test]
    async fn path_traversal_is_rejected() {
        let app = TestApp::new().await;
        let response = app.send(get("/static/%2e%2e/Cargo.toml", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }
}
