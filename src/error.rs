use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

/// The primary error type for the application.
///
/// Every handler returns `AppResult<T>`; the `IntoResponse` impl below turns the
/// variant into a status code and a JSON body of the shape
/// `{"error": "...", "code": "...", "status": 401, "timestamp": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    /// For internal server errors that are not expected to be handled by the client.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
    /// For client errors due to invalid requests.
    #[error("Bad request: {0}")]
    BadRequest(String),
    /// For when a requested resource is not found.
    #[error("Not found: {0}")]
    NotFound(String),
    /// For when a request conflicts with the current state of the server,
    /// e.g. a duplicate name or an author that still owns posts.
    #[error("Conflict: {0}")]
    Conflict(String),
    /// For errors related to database operations.
    #[error("Database error: {0}")]
    Database(String),
    /// No session, a broken or expired token, or a role that may not access the resource.
    #[error("Unauthorized")]
    Unauthorized,
    /// Login attempt with an unknown email or a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,
    /// For when a client has sent too many requests in a given amount of time.
    #[error("Rate limited. Retry after {retry_after_seconds} seconds")]
    RateLimited {
        /// The number of seconds to wait before retrying the request.
        retry_after_seconds: u64,
    },
    /// For when a specific field in a request fails validation.
    #[error("Validation error on field '{field}': {message}")]
    ValidationError {
        /// The name of the field that failed validation.
        field: String,
        /// A message describing the validation error.
        message: String,
    },
    /// Template rendering failed.
    #[error("Render error: {0}")]
    Render(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message, details) = match self {
            AppError::Internal(e) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg, None),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg, None),
            AppError::Database(msg) => {
                let error_id = uuid::Uuid::new_v4();
                tracing::error!(%error_id, "Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                    Some(json!({ "error_id": error_id.to_string() })),
                )
            }
            AppError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "Unauthorized".to_string(), None)
            }
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid credentials".to_string(),
                None,
            ),
            AppError::RateLimited { retry_after_seconds } => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                format!("Too many requests. Please retry after {} seconds", retry_after_seconds),
                Some(json!({ "retry_after_seconds": retry_after_seconds })),
            ),
            AppError::ValidationError { field, message } => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Validation failed for field '{}'", field),
                Some(json!({ "field": field, "message": message })),
            ),
            AppError::Render(msg) => {
                tracing::error!("Template render error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "RENDER_ERROR",
                    "An internal server error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": error_message,
            "code": error_code,
            "status": status.as_u16(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        if let Some(details) = details {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => {
                AppError::Conflict(format!("A record with the same unique value already exists ({})", msg))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => {
                AppError::Conflict(format!("Referenced record is missing or still in use ({})", msg))
            }
            _ => match err {
                DbErr::RecordNotFound(msg) => AppError::NotFound(msg),
                // pool exhaustion or shutdown included: logged with an error id, never echoed
                other => AppError::Database(other.to_string()),
            },
        }
    }
}

impl From<tera::Error> for AppError {
    fn from(err: tera::Error) -> Self {
        // tera nests the useful message in the source chain
        let mut msg = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(inner) = source {
            msg.push_str(": ");
            msg.push_str(&inner.to_string());
            source = inner.source();
        }
        AppError::Render(msg)
    }
}

/// A type alias for `Result<T, AppError>`, used throughout the application.
pub type AppResult<T> = Result<T, AppError>;

/// An extension trait for `Option` that provides a convenient way to convert
/// an `Option` to a `Result` with a `NotFound` error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, AppError>`.
    ///
    /// * `entity` - A string describing the entity that was not found.
    fn ok_or_not_found(self, entity: &str) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, entity: &str) -> AppResult<T> {
        self.ok_or_else(|| AppError::NotFound(format!("{} not found", entity)))
    }
}

/// Field validation helpers shared by the JSON API and the admin forms.
pub mod validation {
    use super::*;

    fn invalid(field: &str, message: impl Into<String>) -> AppError {
        AppError::ValidationError { field: field.to_string(), message: message.into() }
    }

    /// Trims `value` and checks it is non-empty and at most `max` characters long.
    pub fn required_text(value: &str, field: &str, max: usize) -> AppResult<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(invalid(field, format!("{} is required", field)));
        }
        if trimmed.contains('\0') {
            return Err(invalid(field, "Value contains null characters"));
        }
        if trimmed.chars().count() > max {
            return Err(invalid(field, format!("Must be at most {} characters", max)));
        }
        Ok(trimmed.to_string())
    }

    /// Like [`required_text`] but blank input becomes `None`.
    pub fn optional_text(value: Option<&str>, field: &str, max: usize) -> AppResult<Option<String>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(v) => required_text(v, field, max).map(Some),
        }
    }

    /// Minimal shape check: one `@`, non-empty local part, a dot in the domain.
    pub fn optional_email(value: Option<&str>, field: &str) -> AppResult<Option<String>> {
        let Some(email) = optional_text(value, field, 254)? else {
            return Ok(None);
        };
        let mut parts = email.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();
        let domain_ok = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
        if local.is_empty() || !domain_ok || domain.contains('@') || email.contains(char::is_whitespace) {
            return Err(invalid(field, "Not a valid email address"));
        }
        Ok(Some(email.to_lowercase()))
    }

    /// Absolute http(s) URL or `None`.
    pub fn optional_url(value: Option<&str>, field: &str) -> AppResult<Option<String>> {
        let Some(url) = optional_text(value, field, 2048)? else {
            return Ok(None);
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(invalid(field, "URL must start with http:// or https://"));
        }
        Ok(Some(url))
    }

    /// Uses the explicit slug when given, otherwise derives one from `source`.
    pub fn slug_or_derive(explicit: Option<&str>, source: &str, field: &str) -> AppResult<String> {
        let base = match explicit.map(str::trim) {
            Some(s) if !s.is_empty() => s,
            _ => source,
        };
        let slug = slug::slugify(base);
        if slug.is_empty() {
            return Err(invalid(field, "Slug cannot be derived from an empty value"));
        }
        if slug.len() > 200 {
            return Err(invalid(field, "Slug must be at most 200 characters"));
        }
        Ok(slug)
    }

    /// Validates that a number is positive.
    pub fn validate_positive_id(value: i32, field: &str) -> AppResult<()> {
        if value <= 0 {
            return Err(invalid(field, format!("Value must be positive, got {}", value)));
        }
        Ok(())
    }
}
