use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::metrics::Metrics;
use crate::middleware::EndpointRateLimiter;
use crate::views::Views;

/// The shared application state.
///
/// Cloned into every handler by axum; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    /// The ORM connection (wraps the SQLite pool).
    pub db: DatabaseConnection,
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// Request and content counters.
    pub metrics: Metrics,
    /// The per-endpoint rate limiter.
    pub rate_limiter: EndpointRateLimiter,
    /// Compiled page templates.
    pub views: Arc<Views>,
}

impl AppState {
    /// Creates a new `AppState`.
    ///
    /// Endpoint limits on top of the global limiter:
    ///   - 10 login attempts per minute (API and form)
    pub fn new(db: DatabaseConnection, config: AppConfig) -> anyhow::Result<Self> {
        let rate_limiter = EndpointRateLimiter::new().with_limits(vec![
            ("/api/auth/login", 10, 60),
            ("/admin/login", 10, 60),
        ]);

        let views = Views::new(config.site.clone())?;

        Ok(Self {
            db,
            config: Arc::new(config),
            metrics: Metrics::new(),
            rate_limiter,
            views: Arc::new(views),
        })
    }
}
