#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::json;

    use crate::tests::support::{body_json, get, json as json_req, test_config, TestApp, ADMIN_EMAIL, PASSWORD, USER_EMAIL};

    fn login(email: &str, password: &str) -> Request<Body> {
        json_req(Method::POST, "/api/auth/login", None, Some(json!({ "email": email, "password": password })))
    }

    #[tokio::test]
    async fn admin_login_returns_session_and_cookie() {
        let app = TestApp::new().await;
        let resp = app.send(login(ADMIN_EMAIL, PASSWORD)).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
        assert!(cookie.starts_with("qh_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));

        let body = body_json(resp).await;
        assert_eq!(body["user"]["email"], ADMIN_EMAIL);
        assert_eq!(body["user"]["name"], "Ada Admin");
        assert_eq!(body["user"]["role"], "ADMIN");
        assert!(body["expires_at"].as_str().is_some());
        assert!(body["user"].get("password_hash").is_none());
        assert_eq!(app.state.metrics.get_snapshot().logins_succeeded, 1);
    }

    #[tokio::test]
    async fn email_is_matched_case_insensitively() {
        let app = TestApp::new().await;
        let resp = app.send(login(&ADMIN_EMAIL.to_uppercase(), PASSWORD)).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn user_role_can_sign_in_but_not_administer() {
        let app = TestApp::new().await;
        let resp = app.send(login(USER_EMAIL, PASSWORD)).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap().to_string();
        let pair = cookie.split(';').next().unwrap().to_string();
        assert_eq!(body_json(resp).await["user"]["role"], "USER");

        let resp = app.send(get("/api/admin/tags", Some(&pair))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let app = TestApp::new().await;

        let wrong = app.send(login(ADMIN_EMAIL, "not-the-password")).await;
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        assert!(wrong.headers().get(header::SET_COOKIE).is_none());
        let wrong = body_json(wrong).await;

        let unknown = app.send(login("ghost@quantumhive.test", PASSWORD)).await;
        assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
        let unknown = body_json(unknown).await;

        assert_eq!(wrong["error"], "Invalid credentials");
        assert_eq!(wrong["error"], unknown["error"]);
        assert_eq!(wrong["code"], unknown["code"]);
        assert_eq!(app.state.metrics.get_snapshot().logins_failed, 2);
    }

    #[tokio::test]
    async fn malformed_login_body_is_rejected() {
        let app = TestApp::new().await;
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"email\":"))
            .unwrap();
        let resp = app.send(req).await;
        assert!(resp.status().is_client_error());
    }

    #[tokio::test]
    async fn session_reflects_the_cookie() {
        let app = TestApp::new().await;

        let resp = app.send(get("/api/auth/session", None)).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = app.send(get("/api/auth/session", Some(&app.admin_cookie()))).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["user"]["email"], ADMIN_EMAIL);
        assert_eq!(body["user"]["role"], "ADMIN");
    }

    #[tokio::test]
    async fn session_with_forged_cookie_is_unauthorized() {
        let app = TestApp::new().await;
        let resp = app.send(get("/api/auth/session", Some(&app.cookie("forged.token.value")))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let app = TestApp::new().await;
        let resp = app.send(json_req(Method::POST, "/api/auth/logout", Some(&app.admin_cookie()), None)).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        let cookie = resp.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
        assert!(cookie.starts_with("qh_session=;") || cookie.starts_with("qh_session=\"\""));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn repeated_logins_are_rate_limited() {
        let app = TestApp::new().await;
        for _ in 0..10 {
            let resp = app.send(login(ADMIN_EMAIL, "not-the-password")).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
        let resp = app.send(login(ADMIN_EMAIL, PASSWORD)).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = body_json(resp).await;
        assert_eq!(body["code"], "RATE_LIMITED");
        assert!(body["details"]["retry_after_seconds"].as_u64().is_some());
    }

    fn failed_login_from(ip: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", ip)
            .header("x-real-ip", ip)
            .body(Body::from(json!({ "email": ADMIN_EMAIL, "password": "nope-nope" }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn login_limits_are_per_client_behind_trusted_proxy() {
        let mut cfg = test_config();
        cfg.server.trust_proxy = true;
        let app = TestApp::with_config(cfg).await;
        for _ in 0..10 {
            app.send(failed_login_from("198.51.100.1")).await;
        }
        assert_eq!(app.send(failed_login_from("198.51.100.1")).await.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(app.send(failed_login_from("198.51.100.2")).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rotating_forwarded_for_does_not_reset_login_limit() {
        let app = TestApp::new().await;
        for i in 1..=10 {
            let resp = app.send(failed_login_from(&format!("203.0.113.{}", i))).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        }
        let resp = app.send(failed_login_from("203.0.113.11")).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
