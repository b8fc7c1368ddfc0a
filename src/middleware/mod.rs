//! HTTP middleware and request extractors.
//!
//! - `auth`: session extractors guarding the admin API and pages
//! - `ip`: client address resolution behind proxies
//! - `rate_limit`: global and per-endpoint sliding-window limiters
//! - `security_headers`: response hardening and cache policy
//! - `validation`: early rejection of malformed requests

pub mod auth;
pub mod ip;
pub mod rate_limit;
pub mod security_headers;
pub mod validation;

pub use rate_limit::EndpointRateLimiter;
