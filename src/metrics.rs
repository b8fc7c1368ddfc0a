use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Process-wide counters exposed on `/metrics`.
#[derive(Clone)]
pub struct Metrics {
    pub logins_succeeded: Arc<AtomicU64>,
    pub logins_failed: Arc<AtomicU64>,
    pub unauthorized_requests: Arc<AtomicU64>,
    pub content_created: Arc<AtomicU64>,
    pub content_updated: Arc<AtomicU64>,
    pub content_deleted: Arc<AtomicU64>,
    pub page_views: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            logins_succeeded: Arc::new(AtomicU64::new(0)),
            logins_failed: Arc::new(AtomicU64::new(0)),
            unauthorized_requests: Arc::new(AtomicU64::new(0)),
            content_created: Arc::new(AtomicU64::new(0)),
            content_updated: Arc::new(AtomicU64::new(0)),
            content_deleted: Arc::new(AtomicU64::new(0)),
            page_views: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_login_succeeded(&self) {
        self.logins_succeeded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_login_failed(&self) {
        self.logins_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unauthorized(&self) {
        self.unauthorized_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_created(&self) {
        self.content_created.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_updated(&self) {
        self.content_updated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_deleted(&self) {
        self.content_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_page_view(&self) {
        self.page_views.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            logins_succeeded: self.logins_succeeded.load(Ordering::Relaxed),
            logins_failed: self.logins_failed.load(Ordering::Relaxed),
            unauthorized_requests: self.unauthorized_requests.load(Ordering::Relaxed),
            content_created: self.content_created.load(Ordering::Relaxed),
            content_updated: self.content_updated.load(Ordering::Relaxed),
            content_deleted: self.content_deleted.load(Ordering::Relaxed),
            page_views: self.page_views.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub logins_succeeded: u64,
    pub logins_failed: u64,
    pub unauthorized_requests: u64,
    pub content_created: u64,
    pub content_updated: u64,
    pub content_deleted: u64,
    pub page_views: u64,
    pub uptime_seconds: u64,
}
