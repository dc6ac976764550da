//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Repository (cache hits, remote refreshes, stale fallbacks)
//! - Cache writes
//! - Remote catalog requests

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Repository
// =============================================================================

/// Repository fetch outcomes by resource.
pub static REPOSITORY_OUTCOMES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelcache_repository_outcomes_total",
            "Repository fetches by resource and outcome",
        ),
        &["resource", "outcome"], // outcome: "cache_hit", "remote", "stale_fallback", "unavailable"
    )
    .unwrap()
});

/// Cache writes that failed after a successful remote fetch.
pub static CACHE_WRITE_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "reelcache_cache_write_failures_total",
            "Failed cache writes by resource",
        ),
        &["resource"],
    )
    .unwrap()
});

// =============================================================================
// Remote catalog
// =============================================================================

/// Remote request duration in seconds.
pub static REMOTE_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "reelcache_remote_request_duration_seconds",
            "Duration of remote catalog requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint", "outcome"], // outcome: "ok", "http_status", "decode", "transport", "invalid"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(REPOSITORY_OUTCOMES.clone()),
        Box::new(CACHE_WRITE_FAILURES.clone()),
        Box::new(REMOTE_REQUEST_DURATION.clone()),
    ]
}
