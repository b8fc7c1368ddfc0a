//! Server-rendered pages.
//!
//! Every page is a Tera template rendered on its own and then wrapped in one
//! of three layouts chosen from the request path (see [`Layout::for_path`]).
//! Templates are compiled into the binary.

use std::collections::HashMap;

use axum::response::Html;
use chrono::{DateTime, Datelike};
use pulldown_cmark::{html, Options, Parser};
use tera::{Context, Tera, Value};

use crate::config::SiteConfig;
use crate::error::AppResult;
use crate::types::SessionUser;

/// Page chrome selected by route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Public header and footer around the page.
    Public,
    /// Admin sidebar and header around the page.
    Admin,
    /// The page body alone. Used by the unauthenticated admin pages.
    Bare,
}

impl Layout {
    pub fn for_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path == "/admin/login" {
            Layout::Bare
        } else if path == "/admin" || path.starts_with("/admin/") {
            Layout::Admin
        } else {
            Layout::Public
        }
    }

    fn template(self) -> &'static str {
        match self {
            Layout::Public => "layouts/public.html",
            Layout::Admin => "layouts/admin.html",
            Layout::Bare => "layouts/bare.html",
        }
    }
}

/// Per-request values every layout needs.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub path: &'a str,
    pub title: &'a str,
    pub user: Option<&'a SessionUser>,
}

const TEMPLATES: &[(&str, &str)] = &[
    ("layouts/public.html", include_str!("../templates/layouts/public.html")),
    ("layouts/admin.html", include_str!("../templates/layouts/admin.html")),
    ("layouts/bare.html", include_str!("../templates/layouts/bare.html")),
    ("macros.html", include_str!("../templates/macros.html")),
    ("pages/home.html", include_str!("../templates/pages/home.html")),
    ("pages/blog_index.html", include_str!("../templates/pages/blog_index.html")),
    ("pages/blog_post.html", include_str!("../templates/pages/blog_post.html")),
    ("pages/about.html", include_str!("../templates/pages/about.html")),
    ("pages/contact.html", include_str!("../templates/pages/contact.html")),
    ("pages/not_found.html", include_str!("../templates/pages/not_found.html")),
    ("admin/login.html", include_str!("../templates/admin/login.html")),
    ("admin/dashboard.html", include_str!("../templates/admin/dashboard.html")),
    ("admin/authors.html", include_str!("../templates/admin/authors.html")),
    ("admin/author_form.html", include_str!("../templates/admin/author_form.html")),
    ("admin/categories.html", include_str!("../templates/admin/categories.html")),
    ("admin/category_form.html", include_str!("../templates/admin/category_form.html")),
    ("admin/tags.html", include_str!("../templates/admin/tags.html")),
    ("admin/tag_form.html", include_str!("../templates/admin/tag_form.html")),
    ("admin/posts.html", include_str!("../templates/admin/posts.html")),
    ("admin/post_form.html", include_str!("../templates/admin/post_form.html")),
];

pub struct Views {
    tera: Tera,
    site: SiteConfig,
}

impl Views {
    pub fn new(site: SiteConfig) -> anyhow::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.to_vec())?;
        tera.register_filter("markdown", markdown_filter);
        tera.register_filter("date_format", date_format_filter);
        Ok(Self { tera, site })
    }

    /// Renders `template` and wraps it in the layout for `frame.path`.
    pub fn page(&self, template: &str, mut ctx: Context, frame: Frame<'_>) -> AppResult<Html<String>> {
        let layout = Layout::for_path(frame.path);
        ctx.insert("site", &self.site);
        ctx.insert("path", frame.path);
        ctx.insert("title", frame.title);
        ctx.insert("user", &frame.user);
        ctx.insert("year", &chrono::Utc::now().year());

        let body = self.tera.render(template, &ctx)?;
        ctx.insert("content", &body);
        Ok(Html(self.tera.render(layout.template(), &ctx)?))
    }
}

/// CommonMark plus tables, footnotes, strikethrough and task lists.
pub fn markdown_to_html(src: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);

    let parser = Parser::new_ext(src, options);
    let mut out = String::with_capacity(src.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

fn markdown_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    match value.as_str() {
        Some(text) => Ok(Value::String(markdown_to_html(text))),
        None => Ok(value.clone()),
    }
}

fn date_format_filter(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let Some(date) = value.as_str().and_then(|s| DateTime::parse_from_rfc3339(s).ok()) else {
        return Ok(value.clone());
    };
    let format = args.get("format").and_then(|f| f.as_str()).unwrap_or("%B %-d, %Y");
    Ok(Value::String(date.format(format).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_follows_route_group() {
        assert_eq!(Layout::for_path("/admin/login"), Layout::Bare);
        assert_eq!(Layout::for_path("/admin/login/"), Layout::Bare);
        assert_eq!(Layout::for_path("/admin"), Layout::Admin);
        assert_eq!(Layout::for_path("/admin/authors/new"), Layout::Admin);
        assert_eq!(Layout::for_path("/"), Layout::Public);
        assert_eq!(Layout::for_path("/about"), Layout::Public);
        assert_eq!(Layout::for_path("/administrator"), Layout::Public);
    }

    #[test]
    fn markdown_renders_headings_and_tables() {
        let html = markdown_to_html("# Hi\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<h1>Hi</h1>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn date_filter_formats_rfc3339() {
        let mut args = HashMap::new();
        args.insert("format".to_string(), Value::String("%Y-%m-%d".to_string()));
        let out = date_format_filter(&Value::String("2024-03-05T10:00:00Z".to_string()), &args).unwrap();
        assert_eq!(out, Value::String("2024-03-05".to_string()));
    }

    #[test]
    fn all_templates_compile() {
        let views = Views::new(crate::config::AppConfig::default().site).unwrap();
        assert!(views.tera.get_template_names().count() >= TEMPLATES.len());
    }
}
