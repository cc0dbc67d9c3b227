//! Common test utilities for in-process route testing.
//!
//! Builds the full router over a `MockCatalog` so tests can drive every
//! page and endpoint without a database or a listening socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use cartelera_core::testing::MockCatalog;
use cartelera_core::{Config, Movie};
use cartelera_server::api::create_router;
use cartelera_server::state::AppState;

/// Re-export fixtures for test convenience
pub use cartelera_core::testing::fixtures;

/// Test fixture for route testing with a mock catalog.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_home() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.get("/").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - inspect calls, inject errors
    pub catalog: Arc<MockCatalog>,
    /// Temporary directory used as the static file root
    pub temp_dir: TempDir,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, `Null` when the body is not JSON
    pub body: Value,
    /// Raw body text
    pub text: String,
}

impl TestFixture {
    /// Create a fixture over the sample catalog.
    pub async fn new() -> Self {
        Self::with_movies(fixtures::sample_catalog()).await
    }

    /// Create a fixture over the given movies with default settings.
    pub async fn with_movies(movies: Vec<Movie>) -> Self {
        Self::with_config(movies, TestConfig::default()).await
    }

    /// Create a fixture with custom configuration.
    pub async fn with_config(movies: Vec<Movie>, test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config::default();
        config.server.static_dir = temp_dir.path().to_path_buf();
        config.database.path = temp_dir.path().join("unused.db");
        config.cache.enabled = !test_config.disable_cache;

        let catalog = Arc::new(MockCatalog::with_movies(movies));
        let state = Arc::new(AppState::from_catalog(config, catalog.clone()));
        let router = create_router(state);

        Self {
            router,
            catalog,
            temp_dir,
        }
    }

    /// Write a file under the static directory.
    pub fn write_static(&self, name: &str, contents: &str) {
        std::fs::write(self.temp_dir.path().join(name), contents)
            .expect("Failed to write static file");
    }

    /// Send a GET request.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };
        let text = String::from_utf8_lossy(&body_bytes).into_owned();

        TestResponse {
            status,
            headers,
            body,
            text,
        }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Send every request to the catalog
    pub disable_cache: bool,
}

impl TestConfig {
    /// Create config with the response cache turned off.
    pub fn without_cache() -> Self {
        Self {
            disable_cache: true,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status, $response.status, $response.text
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
