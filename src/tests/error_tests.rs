#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use sea_orm::{ConnAcquireErr, DbErr};

    use crate::error::{validation, AppError, AppResult, OptionExt};
    use crate::tests::support::body_json;

    #[test]
    fn test_app_error_display() {
        let error = AppError::BadRequest("Invalid input".to_string());
        assert_eq!(format!("{}", error), "Bad request: Invalid input");

        let error = AppError::NotFound("Post not found".to_string());
        assert_eq!(format!("{}", error), "Not found: Post not found");

        let error = AppError::RateLimited { retry_after_seconds: 60 };
        assert_eq!(format!("{}", error), "Rate limited. Retry after 60 seconds");
    }

    #[test]
    fn test_app_error_into_response() {
        let cases = [
            (AppError::BadRequest("x".to_string()), StatusCode::BAD_REQUEST),
            (AppError::NotFound("x".to_string()), StatusCode::NOT_FOUND),
            (AppError::Conflict("x".to_string()), StatusCode::CONFLICT),
            (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AppError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AppError::RateLimited { retry_after_seconds: 30 }, StatusCode::TOO_MANY_REQUESTS),
            (
                AppError::ValidationError { field: "name".to_string(), message: "name is required".to_string() },
                StatusCode::BAD_REQUEST,
            ),
            (AppError::Database("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::Render("boom".to_string()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[tokio::test]
    async fn unauthorized_body_is_generic() {
        let body = body_json(AppError::Unauthorized.into_response()).await;
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["code"], "UNAUTHORIZED");
        assert_eq!(body["status"], 401);
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn internal_errors_hide_the_cause() {
        let body = body_json(AppError::Internal(anyhow::anyhow!("secret path /var/db")).into_response()).await;
        assert_eq!(body["error"], "An internal server error occurred");
        assert!(!body.to_string().contains("/var/db"));
        assert!(body["details"]["error_id"].is_string());
    }

    #[tokio::test]
    async fn validation_error_names_the_field() {
        let error = AppError::ValidationError { field: "slug".to_string(), message: "bad".to_string() };
        let body = body_json(error.into_response()).await;
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"]["field"], "slug");
        assert_eq!(body["details"]["message"], "bad");
    }

    #[test]
    fn test_from_db_error() {
        let error: AppError = DbErr::RecordNotFound("Tag".to_string()).into();
        assert!(matches!(error, AppError::NotFound(_)));

        let error: AppError = DbErr::Custom("odd".to_string()).into();
        assert!(matches!(error, AppError::Database(_)));

        let error: AppError = DbErr::ConnectionAcquire(ConnAcquireErr::ConnectionClosed).into();
        assert!(matches!(error, AppError::Database(_)));
    }

    #[tokio::test]
    async fn closed_pool_body_is_generic() {
        let error: AppError = DbErr::ConnectionAcquire(ConnAcquireErr::Timeout).into();
        let resp = error.into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(resp).await;
        assert_eq!(body["error"], "A database error occurred");
        assert_eq!(body["code"], "DATABASE_ERROR");
        assert!(body["details"]["error_id"].is_string());
    }

    #[test]
    fn test_option_ext() {
        let some_value: Option<i32> = Some(42);
        let result: AppResult<i32> = some_value.ok_or_not_found("Author");
        assert_eq!(result.unwrap(), 42);

        let none_value: Option<i32> = None;
        match none_value.ok_or_not_found("Author") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Author not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_required_text() {
        assert_eq!(validation::required_text("  hi  ", "name", 10).unwrap(), "hi");
        assert!(validation::required_text("   ", "name", 10).is_err());
        assert!(validation::required_text("a\0b", "name", 10).is_err());
        assert!(validation::required_text("ééééé", "name", 5).is_ok());
        assert!(validation::required_text("abcdef", "name", 5).is_err());
    }

    #[test]
    fn test_optional_helpers() {
        assert_eq!(validation::optional_text(None, "bio", 10).unwrap(), None);
        assert_eq!(validation::optional_text(Some("  "), "bio", 10).unwrap(), None);

        assert_eq!(
            validation::optional_email(Some(" Ada@Example.COM "), "email").unwrap(),
            Some("ada@example.com".to_string())
        );
        for bad in ["ada", "@example.com", "ada@example", "ada@.com", "a b@example.com", "a@b@c.com"] {
            assert!(validation::optional_email(Some(bad), "email").is_err(), "{}", bad);
        }

        assert!(validation::optional_url(Some("https://example.com/a.png"), "avatar_url").unwrap().is_some());
        assert!(validation::optional_url(Some("javascript:alert(1)"), "avatar_url").is_err());
        assert_eq!(validation::optional_url(Some(""), "avatar_url").unwrap(), None);
    }

    #[test]
    fn test_slug_or_derive() {
        assert_eq!(validation::slug_or_derive(None, "Hello, World!", "slug").unwrap(), "hello-world");
        assert_eq!(validation::slug_or_derive(Some(""), "Fallback Title", "slug").unwrap(), "fallback-title");
        assert_eq!(validation::slug_or_derive(Some("Custom Slug"), "ignored", "slug").unwrap(), "custom-slug");
        assert!(validation::slug_or_derive(None, "!!!", "slug").is_err());
    }

    #[test]
    fn test_validate_positive_id() {
        assert!(validation::validate_positive_id(1, "author_id").is_ok());
        assert!(validation::validate_positive_id(0, "author_id").is_err());
        assert!(validation::validate_positive_id(-5, "author_id").is_err());
    }
}
