//! In-process tests for the site pages and JSON endpoints.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use cartelera_core::CatalogError;
use common::{fixtures, TestConfig, TestFixture};

fn card_count(html: &str) -> usize {
    html.matches("browse-movie-wrap").count()
}

#[tokio::test]
async fn test_home_renders_movie_rows() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("Agregadas recientemente"));
    assert!(response.text.contains("Acción"));
    assert!(response.text.contains("Comedia"));
    assert!(card_count(&response.text) > 0);
    assert!(response.text.contains("Palm Springs"));
}

#[tokio::test]
async fn test_home_is_served_from_cache() {
    let fixture = TestFixture::new().await;

    let first = fixture.get("/").await;
    let second = fixture.get("/").await;

    assert_status!(second, StatusCode::OK);
    assert_eq!(first.text, second.text);
    assert_eq!(fixture.catalog.call_count("home_page_sets"), 1);
}

#[tokio::test]
async fn test_home_without_cache_queries_every_time() {
    let fixture =
        TestFixture::with_config(fixtures::sample_catalog(), TestConfig::without_cache()).await;

    fixture.get("/").await;
    fixture.get("/").await;

    assert_eq!(fixture.catalog.call_count("home_page_sets"), 2);
}

#[tokio::test]
async fn test_trending_is_cached() {
    let fixture = TestFixture::new().await;

    let first = fixture.get("/trending-movies").await;
    let second = fixture.get("/trending-movies").await;

    assert_status!(first, StatusCode::OK);
    assert!(first.text.contains("Películas en tendencia"));
    assert_eq!(card_count(&first.text), fixtures::sample_catalog().len());
    assert_eq!(first.text, second.text);
    assert_eq!(fixture.catalog.call_count("sample_random"), 1);
}

#[tokio::test]
async fn test_browse_lists_catalog() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/browse-movies").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("12 películas encontradas"));
    assert_eq!(card_count(&response.text), 12);
    // A single page has no pagination bar
    assert!(!response.text.contains("tsc_pagination"));
}

#[tokio::test]
async fn test_browse_malformed_page_falls_back_to_first() {
    let fixture = TestFixture::with_movies(fixtures::numbered_movies(45)).await;

    let response = fixture.get("/browse-movies?page=abc").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(card_count(&response.text), 20);
    assert!(response.text.contains(r#"<a class="current">1</a>"#));
}

#[tokio::test]
async fn test_browse_repeated_page_uses_first_value() {
    let fixture = TestFixture::with_movies(fixtures::numbered_movies(45)).await;

    let response = fixture.get("/browse-movies?page=2&page=3").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains(r#"<a class="current">2</a>"#));

    let response = fixture
        .get("/browse-movies/0/all/all/all/latest/all/all?page=abc&page=3")
        .await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains(r#"<a class="current">1</a>"#));
}

#[tokio::test]
async fn test_browse_title_query_redirects_to_filtered_path() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/browse-movies?title=blade+runner").await;

    assert_status!(response, StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers["location"],
        "/browse-movies/blade%20runner/all/all/all/latest/all/all"
    );

    let followed = fixture
        .get("/browse-movies/blade%20runner/all/all/all/latest/all/all")
        .await;
    assert_status!(followed, StatusCode::OK);
    assert!(followed.text.contains("1 películas encontradas"));

    // Blank text stays on the listing
    let response = fixture.get("/browse-movies?title=+").await;
    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("12 películas encontradas"));
}

#[tokio::test]
async fn test_browse_last_page_is_partial() {
    let fixture = TestFixture::with_movies(fixtures::numbered_movies(45)).await;

    let response = fixture.get("/browse-movies?page=3").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("45 películas encontradas"));
    assert_eq!(card_count(&response.text), 5);
    assert!(response.text.contains(r#"<a class="current">3</a>"#));
    assert!(response.text.contains("/browse-movies?page=2"));
}

#[tokio::test]
async fn test_browse_page_past_the_end_is_empty() {
    let fixture = TestFixture::with_movies(fixtures::numbered_movies(45)).await;

    let response = fixture.get("/browse-movies?page=9").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(card_count(&response.text), 0);
    assert!(response.text.contains("45 películas encontradas"));
}

#[tokio::test]
async fn test_filtered_route_with_sentinels_matches_everything() {
    let fixture = TestFixture::with_movies(fixtures::numbered_movies(45)).await;

    let response = fixture
        .get("/browse-movies/0/all/all/all/latest/all/all?page=2")
        .await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("45 películas encontradas"));
    assert_eq!(card_count(&response.text), 20);
    // Pagination links stay on the filtered path
    assert!(response
        .text
        .contains("/browse-movies/0/all/all/all/latest/all/all?page=3"));
}

#[tokio::test]
async fn test_filtered_route_applies_facets() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get("/browse-movies/0/2160p/Action/all/rating/2019-2020/en")
        .await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("2 películas encontradas"));
    let first = response.text.find("1917").expect("1917 listed");
    let second = response.text.find("Tenet").expect("Tenet listed");
    assert!(first < second);
}

#[tokio::test]
async fn test_filtered_route_is_never_cached() {
    let fixture = TestFixture::new().await;

    fixture.get("/browse-movies/0/all/all/all/latest/all/all").await;
    fixture.get("/browse-movies/0/all/all/all/latest/all/all").await;

    assert_eq!(fixture.catalog.call_count("search"), 2);
}

#[tokio::test]
async fn test_title_search_is_echoed_escaped() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get("/browse-movies/%3Cb%3E/all/all/all/latest/all/all")
        .await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains(r#"value="&lt;b&gt;""#));
    assert!(response.text.contains("0 películas encontradas"));

    let response = fixture
        .get("/browse-movies/matrix/all/all/all/latest/all/all")
        .await;
    assert!(response.text.contains(r#"value="matrix""#));
    assert!(response.text.contains("1 películas encontradas"));
}

#[tokio::test]
async fn test_invalid_facet_is_rejected() {
    let fixture = TestFixture::new().await;

    let response = fixture
        .get("/browse-movies/0/all/all/eleven/latest/all/all")
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert!(response.text.contains("rating"));
    assert_eq!(fixture.catalog.call_count("search"), 0);
}

#[tokio::test]
async fn test_movie_detail_and_player_share_a_page() {
    let mut movies = fixtures::sample_catalog();
    movies.push(fixtures::detailed_movie());
    let fixture = TestFixture::with_movies(movies).await;

    let detail = fixture.get("/movies/dune-part-two-2024").await;
    let player = fixture.get("/movies/reproductor/dune-part-two-2024").await;

    assert_status!(detail, StatusCode::OK);
    assert!(detail.text.contains("Dune: Part Two"));
    assert!(detail.text.contains("2160p"));
    assert_eq!(detail.text, player.text);
    // Detail pages bypass the cache
    assert_eq!(fixture.catalog.call_count("find_by_url"), 2);
}

#[tokio::test]
async fn test_unknown_movie_is_not_found() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/movies/no-such-movie-1900").await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert!(response.text.contains("No se encontró la película."));
}

#[tokio::test]
async fn test_store_failure_renders_server_error() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_next_error(CatalogError::Database("disk I/O error".into()));

    let response = fixture.get("/").await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text.contains("Error en el servidor."));
    assert!(!response.text.contains("disk I/O error"));

    // The failure was not cached
    let response = fixture.get("/").await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_ajax_search_requires_query() {
    let fixture = TestFixture::new().await;

    for path in ["/ajax/search", "/ajax/search?query=", "/ajax/search?query=%20%20"] {
        let response = fixture.get(path).await;

        assert_status!(response, StatusCode::BAD_REQUEST);
        assert_json_path!(response.body, "status", json!("error"));
        assert_json_path!(
            response.body,
            "message",
            json!("Debe proporcionar un parámetro de búsqueda (query).")
        );
    }
    assert_eq!(fixture.catalog.call_count("suggestions"), 0);
}

#[tokio::test]
async fn test_ajax_search_repeated_query_uses_first_value() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/ajax/search?query=matrix&query=dune").await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "status", json!("ok"));
    assert_json_path!(response.body["data"][0], "title", json!("The Matrix"));

    let response = fixture.get("/ajax/search?query=&query=dune").await;
    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "status", json!("error"));
}

#[tokio::test]
async fn test_ajax_search_returns_suggestions() {
    let fixture = TestFixture::with_movies(fixtures::numbered_movies(30)).await;

    let response = fixture.get("/ajax/search?query=movie").await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "status", json!("ok"));
    assert_json_path!(
        response.body,
        "message",
        json!("Resultados de búsqueda encontrados.")
    );

    let data = response.body["data"].as_array().expect("data array");
    assert_eq!(data.len(), 5);
    for item in data {
        let keys: Vec<&str> = item
            .as_object()
            .expect("suggestion object")
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 4);
        for key in ["url", "img", "title", "year"] {
            assert!(keys.contains(&key), "missing {key}");
        }
    }
}

#[tokio::test]
async fn test_ajax_search_without_matches_is_ok() {
    let fixture = TestFixture::new().await;

    let response = fixture.get("/ajax/search?query=zzzz").await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "data", json!([]));
}

#[tokio::test]
async fn test_ajax_search_store_failure() {
    let fixture = TestFixture::new().await;
    fixture
        .catalog
        .set_next_error(CatalogError::Database("locked".into()));

    let response = fixture.get("/ajax/search?query=matrix").await;

    assert_status!(response, StatusCode::INTERNAL_SERVER_ERROR);
    assert_json_path!(response.body, "status", json!("error"));
    assert_json_path!(response.body, "message", json!("Error interno del servidor"));
}

#[tokio::test]
async fn test_health_and_stats() {
    let fixture = TestFixture::new().await;

    let health = fixture.get("/api/v1/health").await;
    assert_status!(health, StatusCode::OK);
    assert_json_path!(health.body, "status", json!("ok"));

    let stats = fixture.get("/api/v1/catalog/stats").await;
    assert_status!(stats, StatusCode::OK);
    assert_json_path!(stats.body, "total_movies", json!(12));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new().await;

    fixture.get("/").await;
    let response = fixture.get("/metrics").await;

    assert_status!(response, StatusCode::OK);
    assert!(response.text.contains("cartelera_http_requests_total"));
    assert!(response.text.contains("cartelera_catalog_movies"));
}

#[tokio::test]
async fn test_static_files_are_served() {
    let fixture = TestFixture::new().await;
    fixture.write_static("robots.txt", "User-agent: *");

    let response = fixture.get("/robots.txt").await;

    assert_status!(response, StatusCode::OK);
    assert_eq!(response.text, "User-agent: *");

    let missing = fixture.get("/css/missing.css").await;
    assert_status!(missing, StatusCode::NOT_FOUND);
}
