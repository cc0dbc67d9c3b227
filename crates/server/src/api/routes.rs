use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::{handlers, middleware::metrics_middleware, movies, search};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config().server.static_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Catalog
        .route("/catalog/stats", get(handlers::catalog_stats));

    // Site pages
    let site_routes = Router::new()
        .route("/", get(movies::home))
        .route("/trending-movies", get(movies::trending))
        .route("/browse-movies", get(movies::browse))
        .route(
            "/browse-movies/{title}/{quality}/{genre}/{rating}/{order_by}/{year}/{language}",
            get(movies::browse_filtered),
        )
        .route("/movies/{movie_id}", get(movies::movie_detail))
        .route("/movies/reproductor/{movie_id}", get(movies::movie_detail))
        .route("/ajax/search", get(search::ajax_search))
        .route("/metrics", get(handlers::get_metrics));

    Router::new()
        .merge(site_routes)
        .nest("/api/v1", api_routes)
        .with_state(state)
        .fallback_service(ServeDir::new(static_dir))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
