//! # QuantumHive
//!
//! A small content management system: a public blog and an admin panel for
//! posts, authors, categories and tags.
//!
//! ## Architecture
//!
//! - **Axum**: HTTP server, routing and extractors
//! - **SeaORM** over an **SQLx** SQLite pool: entities, relations and queries
//! - **Tera**: server-rendered pages with route-group layouts
//! - **jsonwebtoken** / **bcrypt**: password login and signed session cookies
//!
//! ## Core Components
//!
//! - [`config`]: layered configuration (embedded defaults, files, environment)
//! - [`db`]: connection setup, schema, entities and services
//! - [`error`]: `AppError` and its JSON response mapping
//! - [`metrics`]: login, content and page counters
//! - [`middleware`]: session guards, rate limiting, security headers, request validation
//! - [`routes`]: public pages, admin pages, the JSON API and operational endpoints
//! - [`session`]: session tokens and cookies
//! - [`state`]: shared application state
//! - [`types`]: request and response payloads
//! - [`views`]: templates and layout selection

pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod types;
pub mod views;

#[cfg(test)]
mod tests;
