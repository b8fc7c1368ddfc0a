//! Integration and unit tests for QuantumHive.
//!
//! Router-level tests drive `routes::router` with `tower::ServiceExt::oneshot`
//! against an in-memory SQLite database seeded by [`support::TestApp`].
//!
//! - **support**: shared fixtures and request builders
//! - **tags_api_tests**: `/api/admin/tags` authorization and ordering
//! - **content_api_tests**: authors, categories, posts and the public post API
//! - **auth_api_tests**: JSON login, logout, session and login throttling
//! - **admin_pages_tests**: admin forms, redirects and notices
//! - **layout_tests**: which chrome each route group renders
//! - **health_api_tests**: operational endpoints and response headers
//! - **db_tests**: schema bootstrap and service invariants
//! - **config_tests**: configuration defaults and validation
//! - **error_tests**: error mapping and validation helpers

pub mod support;

pub mod auth_api_tests;
pub mod error_tests;
pub mod health_api_tests;
pub mod tags_api_tests;
