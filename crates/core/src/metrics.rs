//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Response cache (hits, misses, bypasses per slot)
//! - Catalog queries (outcome and latency per operation)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts};

// =============================================================================
// Response Cache Metrics
// =============================================================================

/// Cache lookups by slot and result.
pub static CACHE_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cartelera_cache_requests_total",
            "Total response cache lookups",
        ),
        &["slot", "result"], // result: "hit", "miss", "bypass"
    )
    .unwrap()
});

// =============================================================================
// Catalog Query Metrics
// =============================================================================

/// Catalog queries by operation and outcome.
pub static CATALOG_QUERIES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "cartelera_catalog_queries_total",
            "Total catalog queries",
        ),
        &["operation", "result"], // result: "ok", "not_found", "timeout", "error"
    )
    .unwrap()
});

/// Catalog query latency in seconds.
pub static CATALOG_QUERY_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cartelera_catalog_query_duration_seconds",
            "Duration of catalog queries",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 10.0]),
        &["operation"],
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(CACHE_REQUESTS.clone()),
        Box::new(CATALOG_QUERIES.clone()),
        Box::new(CATALOG_QUERY_DURATION.clone()),
    ]
}
