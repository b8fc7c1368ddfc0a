#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use sea_orm::ConnectionTrait;
    use serde_json::{json, Value};

    use crate::config::AuthConfig;
    use crate::db::enums::Role;
    use crate::db::services::tag_service;
    use crate::session;
    use crate::tests::support::{body_json, get, json as json_req, TestApp};
    use crate::types::{SessionUser, TagInput};

    async fn seed_tags(app: &TestApp, names: &[&str]) {
        for name in names {
            tag_service::create_tag(&app.state.db, &TagInput { name: name.to_string() }).await.unwrap();
        }
    }

    #[tokio::test]
    async fn list_without_session_is_unauthorized() {
        let app = TestApp::new().await;

        let resp = app.send(get("/api/admin/tags", None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn list_with_user_role_is_unauthorized() {
        let app = TestApp::new().await;

        let resp = app.send(get("/api/admin/tags", Some(&app.user_cookie()))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(resp).await["error"], "Unauthorized");
    }

    #[tokio::test]
    async fn list_with_forged_or_garbage_token_is_unauthorized() {
        let app = TestApp::new().await;

        let resp = app.send(get("/api/admin/tags", Some(&app.cookie("not-a-jwt")))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        // correct claims, wrong key
        let other_key = AuthConfig {
            session_secret: "some-other-secret-of-enough-length".to_string(),
            ..app.state.config.auth.clone()
        };
        let forged_user =
            SessionUser { id: 1, email: "ada@quantumhive.test".to_string(), name: "Ada".to_string(), role: Role::Admin };
        let (forged, _) = session::issue_token(&forged_user, &other_key).unwrap();
        let resp = app.send(get("/api/admin/tags", Some(&app.cookie(&forged)))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn demoted_admin_token_stops_working() {
        let app = TestApp::new().await;
        app.state
            .db
            .execute_unprepared("UPDATE users SET role = 'USER' WHERE email = 'ada@quantumhive.test'")
            .await
            .unwrap();

        let resp = app.send(get("/api/admin/tags", Some(&app.admin_cookie()))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_with_admin_session_is_sorted_by_name() {
        let app = TestApp::new().await;
        seed_tags(&app, &["zeta", "Rust", "axum", "databases", "Zig"]).await;

        let resp = app.send(get("/api/admin/tags", Some(&app.admin_cookie()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        let items = body.as_array().unwrap();
        assert_eq!(items.len(), 5);
        for item in items {
            let obj = item.as_object().unwrap();
            assert_eq!(obj.len(), 2);
            assert!(obj["id"].is_i64());
            assert!(obj["name"].is_string());
        }
        let names: Vec<&str> = items.iter().map(|t| t["name"].as_str().unwrap()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[tokio::test]
    async fn bearer_header_is_accepted() {
        let app = TestApp::new().await;
        seed_tags(&app, &["rust"]).await;

        let req = Request::builder()
            .uri("/api/admin/tags")
            .header(header::AUTHORIZATION, format!("Bearer {}", app.admin_token))
            .body(Body::empty())
            .unwrap();
        let resp = app.send(req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, json!([{ "id": 1, "name": "rust" }]));
    }

    #[tokio::test]
    async fn query_failure_is_a_generic_500() {
        let app = TestApp::new().await;
        app.state.db.execute_unprepared("DROP TABLE post_tags").await.unwrap();
        app.state.db.execute_unprepared("DROP TABLE tags").await.unwrap();

        let resp = app.send(get("/api/admin/tags", Some(&app.admin_cookie()))).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "A database error occurred");
        assert!(body["details"]["error_id"].is_string());
        assert!(!body.to_string().contains("no such table"));
    }

    #[tokio::test]
    async fn closed_pool_is_a_generic_500() {
        let app = TestApp::new().await;
        app.state.db.clone().close().await.unwrap();

        for resp in [
            app.send(get("/api/admin/tags", Some(&app.admin_cookie()))).await,
            app.send(get("/api/posts", None)).await,
        ] {
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body = body_json(resp).await;
            assert_eq!(body["error"], "A database error occurred");
            assert_eq!(body["code"], "DATABASE_ERROR");
            assert!(body["details"]["error_id"].is_string());
            assert!(!body.to_string().to_lowercase().contains("closed"));
        }
    }

    #[tokio::test]
    async fn create_update_delete_tag() {
        let app = TestApp::new().await;
        let cookie = app.admin_cookie();

        let resp = app.send(json_req(Method::POST, "/api/admin/tags", Some(&cookie), Some(json!({"name": "  wasm "})))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = body_json(resp).await;
        assert_eq!(created["name"], "wasm");
        let id = created["id"].as_i64().unwrap();

        let resp = app.send(json_req(Method::POST, "/api/admin/tags", Some(&cookie), Some(json!({"name": "wasm"})))).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let uri = format!("/api/admin/tags/{}", id);
        let resp = app.send(json_req(Method::PUT, &uri, Some(&cookie), Some(json!({"name": "webassembly"})))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["name"], "webassembly");

        let resp = app.send(json_req(Method::DELETE, &uri, Some(&cookie), None)).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let resp = app.send(json_req(Method::DELETE, &uri, Some(&cookie), None)).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_tag_name_is_rejected() {
        let app = TestApp::new().await;
        let resp = app
            .send(json_req(Method::POST, "/api/admin/tags", Some(&app.admin_cookie()), Some(json!({"name": "   "}))))
            .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["details"]["field"], "name");
    }

    #[tokio::test]
    async fn writes_need_admin_too() {
        let app = TestApp::new().await;
        let resp = app
            .send(json_req(Method::POST, "/api/admin/tags", Some(&app.user_cookie()), Some(json!({"name": "x"}))))
            .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app.state.metrics.get_snapshot().unauthorized_requests, 1);
    }
}
