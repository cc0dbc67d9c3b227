//! Site lifecycle integration tests.
//!
//! These tests run the site service over a real SQLite catalog:
//! - Seeding from a JSON file
//! - Cached default views vs. uncached filtered browsing
//! - Detail lookups and not-found handling

use std::io::Write;
use std::sync::Arc;

use tempfile::TempDir;

use cartelera_core::{
    catalog::MovieCatalog,
    load_config_from_str,
    query::BrowseParams,
    site::BROWSE_PATH,
    testing::fixtures,
    BrowseRequest, CatalogSite, Config, SiteError, SqliteCatalog,
};

/// Test helper holding a seeded catalog and the site over it.
struct TestHarness {
    site: CatalogSite,
    catalog: Arc<SqliteCatalog>,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        Self::with_config(Config::default())
    }

    fn with_config(config: Config) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("catalog.db");
        let seed_path = temp_dir.path().join("movies.json");

        let mut movies = fixtures::sample_catalog();
        movies.extend(fixtures::numbered_movies(30));
        let mut seed = std::fs::File::create(&seed_path).expect("Failed to create seed file");
        seed.write_all(serde_json::to_string(&movies).unwrap().as_bytes())
            .expect("Failed to write seed file");

        let catalog = Arc::new(SqliteCatalog::new(&db_path).expect("Failed to open catalog"));
        let added = catalog.import_json(&seed_path).expect("Failed to seed catalog");
        assert_eq!(added as usize, movies.len());

        let site = CatalogSite::from_config(catalog.clone(), &config);
        Self {
            site,
            catalog,
            _temp_dir: temp_dir,
        }
    }
}

fn params(segments: [&str; 7]) -> BrowseParams {
    let [title, quality, genre, rating, order_by, year, language] = segments;
    BrowseParams {
        title: title.to_string(),
        quality: quality.to_string(),
        genre: genre.to_string(),
        rating: rating.to_string(),
        order_by: order_by.to_string(),
        year: year.to_string(),
        language: language.to_string(),
    }
}

#[tokio::test]
async fn test_default_pages_are_cached() {
    let harness = TestHarness::new();

    let home = harness.site.render_home().await.unwrap();
    let again = harness.site.render_home().await.unwrap();
    assert!(Arc::ptr_eq(&home, &again));

    harness.site.render_trending().await.unwrap();
    harness.site.render_browse(&BrowseRequest::listing(1)).await.unwrap();
    assert_eq!(harness.site.cached_views(), 3);

    harness.site.clear_cache();
    assert_eq!(harness.site.cached_views(), 0);
}

#[tokio::test]
async fn test_browse_pagination_over_sqlite() {
    let harness = TestHarness::new();
    let total = harness.catalog.stats().unwrap().total_movies;

    let first = harness
        .site
        .render_browse(&BrowseRequest::listing(1))
        .await
        .unwrap();
    assert_eq!(first.total_matches, total);
    assert_eq!(first.total_pages, 3); // 42 movies, 20 per page
    assert!(first.pagination_html.contains(&format!("{}?page=2", BROWSE_PATH)));

    let last = harness
        .site
        .render_browse(&BrowseRequest::listing(3))
        .await
        .unwrap();
    assert_eq!(last.results_html.matches("browse-movie-wrap").count(), 2);
}

#[tokio::test]
async fn test_filtered_browse_over_sqlite() {
    let harness = TestHarness::new();
    let path = "/browse-movies/0/2160p/Action/all/rating/2019-2020/en";

    let request = BrowseRequest::filtered(
        path,
        &params(["0", "2160p", "Action", "all", "rating", "2019-2020", "en"]),
        1,
    )
    .unwrap();
    let view = harness.site.render_browse(&request).await.unwrap();

    // 1917 (8.2) before Tenet (7.3)
    assert_eq!(view.total_matches, 2);
    let first = view.results_html.find("1917").unwrap();
    let second = view.results_html.find("Tenet").unwrap();
    assert!(first < second);
}

#[tokio::test]
async fn test_movie_detail_over_sqlite() {
    let harness = TestHarness::new();

    let view = harness.site.render_movie("amélie-2001").await.unwrap();
    assert_eq!(view.categories, "Comedy / Romance");

    let err = harness.site.render_movie("nonexistent-id").await.unwrap_err();
    assert!(matches!(err, SiteError::NotFound(_)));
}

#[tokio::test]
async fn test_cache_disabled_by_config() {
    let config = load_config_from_str("[cache]\nenabled = false\n").unwrap();
    let harness = TestHarness::with_config(config);

    let home = harness.site.render_home().await.unwrap();
    let again = harness.site.render_home().await.unwrap();
    assert!(!Arc::ptr_eq(&home, &again));
    assert_eq!(harness.site.cached_views(), 0);
}
