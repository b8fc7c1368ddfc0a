use axum::{http::header, response::IntoResponse};

const SITE_CSS: &str = include_str!("../../static/site.css");

pub async fn site_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css; charset=utf-8")], SITE_CSS)
}
