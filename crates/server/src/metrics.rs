//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the Cartelera server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog size and cached views (collected dynamically)
//! - Core cache and catalog query metrics (registered from `cartelera_core`)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::warn;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "cartelera_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("cartelera_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cartelera_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Movies in the catalog.
pub static CATALOG_MOVIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("cartelera_catalog_movies", "Number of movies in the catalog").unwrap()
});

/// Page views currently held by the response cache.
pub static CACHED_VIEWS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "cartelera_cached_views",
        "Number of page views held by the response cache",
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Catalog
    registry
        .register(Box::new(CATALOG_MOVIES.clone()))
        .unwrap();
    registry.register(Box::new(CACHED_VIEWS.clone())).unwrap();

    // Core metrics (response cache, catalog queries)
    for metric in cartelera_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        warn!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the catalog and cache as they
/// are right now.
pub async fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(stats) = state.site().engine().stats().await {
        CATALOG_MOVIES.set(stats.total_movies as i64);
    }
    CACHED_VIEWS.set(state.site().cached_views() as i64);
}

static MOVIE_PATH: Lazy<regex_lite::Regex> =
    Lazy::new(|| regex_lite::Regex::new(r"^/movies/(reproductor/)?[^/]+/?$").unwrap());

static BROWSE_FILTER_PATH: Lazy<regex_lite::Regex> =
    Lazy::new(|| regex_lite::Regex::new(r"^/browse-movies/[^?]+$").unwrap());

/// Normalize a path for metric labels (replace slugs and facets with placeholders).
pub fn normalize_path(path: &str) -> String {
    if let Some(captures) = MOVIE_PATH.captures(path) {
        return match captures.get(1) {
            Some(_) => "/movies/reproductor/{id}".to_string(),
            None => "/movies/{id}".to_string(),
        };
    }
    if BROWSE_FILTER_PATH.is_match(path) {
        return "/browse-movies/{filters}".to_string();
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_movie() {
        assert_eq!(normalize_path("/movies/the-matrix-1999"), "/movies/{id}");
    }

    #[test]
    fn test_normalize_path_reproductor() {
        assert_eq!(
            normalize_path("/movies/reproductor/the-matrix-1999"),
            "/movies/reproductor/{id}"
        );
    }

    #[test]
    fn test_normalize_path_browse_filters() {
        assert_eq!(
            normalize_path("/browse-movies/matrix/1080p/Action/7/rating/1999/en"),
            "/browse-movies/{filters}"
        );
        assert_eq!(normalize_path("/browse-movies"), "/browse-movies");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        // Access metrics to ensure they're initialized
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("cartelera_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        cartelera_core::metrics::CACHE_REQUESTS
            .with_label_values(&["index", "miss"])
            .inc();
        cartelera_core::metrics::CATALOG_QUERIES
            .with_label_values(&["search", "ok"])
            .inc();
        CATALOG_MOVIES.set(0);
        CACHED_VIEWS.set(0);

        let output = encode_metrics();
        assert!(output.contains("cartelera_cache_requests_total"));
        assert!(output.contains("cartelera_catalog_queries_total"));
        assert!(output.contains("cartelera_catalog_movies"));
        assert!(output.contains("cartelera_cached_views"));
    }
}
