use serde::{Deserialize, Serialize};

use crate::db::entities::{author, category, post, tag};
use crate::db::enums::Role;

// --- Request payloads (JSON API and admin forms share these) ---

#[derive(Debug, Clone, Deserialize)]
pub struct TagInput {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorInput {
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    #[serde(default)]
    pub published: bool,
    pub author_id: i32,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub tag_ids: Vec<i32>,
}

/// Admin form for authors. Browsers send every field, blank when unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthorForm {
    pub name: String,
    pub email: String,
    pub bio: String,
    pub avatar_url: String,
}

impl From<&AuthorForm> for AuthorInput {
    fn from(form: &AuthorForm) -> Self {
        AuthorInput {
            name: form.name.clone(),
            email: Some(form.email.clone()),
            bio: Some(form.bio.clone()),
            avatar_url: Some(form.avatar_url.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryForm {
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl From<&CategoryForm> for CategoryInput {
    fn from(form: &CategoryForm) -> Self {
        CategoryInput {
            name: form.name.clone(),
            slug: Some(form.slug.clone()),
            description: Some(form.description.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct TagForm {
    pub name: String,
}

/// The post editor form. Selects arrive as strings, an unchecked checkbox is
/// omitted, and tags are typed as a comma separated list of names.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub published: Option<String>,
    pub author_id: String,
    pub category_id: String,
    pub tags: String,
}

impl PostForm {
    pub fn is_published(&self) -> bool {
        matches!(self.published.as_deref(), Some("on" | "true" | "1"))
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotice {
    pub created: Option<String>,
}

// --- Response DTOs ---

/// The user as carried in the session token and returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionResponse {
    pub user: SessionUser,
    pub expires_at: String,
}

/// A post together with the rows it references.
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: post::Model,
    pub author: Option<author::Model>,
    pub category: Option<category::Model>,
    pub tags: Vec<tag::Model>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ContentCounts {
    pub posts: u64,
    pub published_posts: u64,
    pub authors: u64,
    pub categories: u64,
    pub tags: u64,
}
