use axum::{
    extract::Request,
    http::{header, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;

/// Default ceiling for request bodies, matching the `DefaultBodyLimit` layer.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// Body limit in bytes, from `QUANTUMHIVE_MAX_BODY_SIZE`, clamped to 64 KiB..=16 MiB.
pub fn max_body_size() -> usize {
    std::env::var("QUANTUMHIVE_MAX_BODY_SIZE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(DEFAULT_MAX_BODY_SIZE)
        .clamp(64 * 1024, 16 * 1024 * 1024)
}

/// An Axum middleware that rejects obviously malformed requests early.
///
/// - Path traversal sequences in the URI (400)
/// - A declared `Content-Length` above [`max_body_size`] on POST/PUT (413)
/// - Scanner user agents are logged, not refused
pub async fn validate_request_middleware(req: Request, next: Next) -> Response {
    let uri_path = req.uri().path();
    if contains_path_traversal(uri_path) {
        tracing::warn!(path = %sanitize_for_logging(uri_path), "Path traversal attempt rejected");
        return AppError::BadRequest("Path traversal detected in request".to_string()).into_response();
    }

    if let Some(ua) = req.headers().get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        if is_suspicious_user_agent(ua) {
            tracing::warn!(user_agent = %sanitize_for_logging(ua), "Suspicious user agent detected");
        }
    }

    if matches!(req.method(), &Method::POST | &Method::PUT) {
        let declared = req
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<usize>().ok());
        if let Some(length) = declared {
            let limit = max_body_size();
            if length > limit {
                return payload_too_large(limit);
            }
        }
    }

    next.run(req).await
}

fn payload_too_large(limit: usize) -> Response {
    let body = serde_json::json!({
        "error": format!("Request body exceeds maximum size of {} bytes", limit),
        "code": "PAYLOAD_TOO_LARGE",
        "status": 413,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });
    (axum::http::StatusCode::PAYLOAD_TOO_LARGE, axum::Json(body)).into_response()
}

fn contains_path_traversal(path: &str) -> bool {
    let lower = path.to_lowercase();

    if path.contains("/..") || path.contains("\\..") || path.starts_with("..") {
        return true;
    }
    if path.contains("/./") || path.contains("\\.\\") || path.contains("....") {
        return true;
    }

    // single and double URL encoding
    let encoded_patterns = ["%2e%2e", "%252e%252e", "%2e/", "%252e%2f", "/%2e", "%2f%2e", "%5c%2e", "%00"];
    if encoded_patterns.iter().any(|p| lower.contains(p)) {
        return true;
    }

    path.contains('\0')
}

fn is_suspicious_user_agent(ua: &str) -> bool {
    let ua_lower = ua.to_lowercase();
    ua_lower.contains("scanner")
        || (ua_lower.contains("crawler") && !ua_lower.contains("googlebot") && !ua_lower.contains("bingbot"))
        || ua_lower.contains("nikto")
        || ua_lower.contains("sqlmap")
        || ua_lower.contains("acunetix")
}

/// Strips control characters, caps the length at 200 and escapes quotes.
pub fn sanitize_for_logging(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .take(200)
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\\'")
}
