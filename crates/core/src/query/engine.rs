//! The catalog query engine.
//!
//! Stateless: holds the store and a timeout, nothing else. Every store call
//! runs on the blocking pool so a slow database never stalls the executor,
//! and is abandoned with [`QueryError::Timeout`] once the timeout elapses.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use super::CatalogQuery;
use crate::catalog::{
    CatalogError, CatalogStats, HomePageSets, Movie, MovieCatalog, MovieSuggestion, SearchPage,
};
use crate::metrics::{CATALOG_QUERIES, CATALOG_QUERY_DURATION};

/// Errors raised while querying the catalog.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Catalog query '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

/// Runs catalog queries with a bounded wait.
#[derive(Clone)]
pub struct QueryEngine {
    catalog: Arc<dyn MovieCatalog>,
    timeout: Duration,
}

impl QueryEngine {
    pub fn new(catalog: Arc<dyn MovieCatalog>, timeout: Duration) -> Self {
        Self { catalog, timeout }
    }

    pub fn catalog(&self) -> &Arc<dyn MovieCatalog> {
        &self.catalog
    }

    /// Paginated browse/search.
    pub async fn search(&self, query: CatalogQuery) -> Result<SearchPage, QueryError> {
        debug!(
            text = query.text.as_deref().unwrap_or(""),
            page = query.page,
            order_by = %query.effective_order(),
            "Searching catalog"
        );
        self.run("search", move |catalog| catalog.search(&query))
            .await
    }

    /// Autocomplete path: a fixed number of title matches, projected.
    pub async fn suggestions(
        &self,
        text: &str,
        limit: u32,
    ) -> Result<Vec<MovieSuggestion>, QueryError> {
        let text = text.to_string();
        self.run("suggestions", move |catalog| catalog.suggestions(&text, limit))
            .await
    }

    pub async fn sample_random(&self, count: u32) -> Result<Vec<Movie>, QueryError> {
        self.run("sample_random", move |catalog| catalog.sample_random(count))
            .await
    }

    /// Point lookup; a missing movie is `QueryError::Catalog(CatalogError::NotFound)`.
    pub async fn find_by_url(&self, url: &str) -> Result<Movie, QueryError> {
        let url = url.to_string();
        self.run("find_by_url", move |catalog| catalog.find_by_url(&url))
            .await
    }

    pub async fn home_page_sets(&self, per_category_limit: u32) -> Result<HomePageSets, QueryError> {
        self.run("home_page_sets", move |catalog| {
            catalog.home_page_sets(per_category_limit)
        })
        .await
    }

    pub async fn stats(&self) -> Result<CatalogStats, QueryError> {
        self.run("stats", |catalog| catalog.stats()).await
    }

    async fn run<T, F>(&self, operation: &'static str, f: F) -> Result<T, QueryError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn MovieCatalog) -> Result<T, CatalogError> + Send + 'static,
    {
        let catalog = Arc::clone(&self.catalog);
        let start = Instant::now();
        let task = tokio::task::spawn_blocking(move || f(catalog.as_ref()));

        let result = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result.map_err(QueryError::from),
            Ok(Err(join_error)) => Err(QueryError::Catalog(CatalogError::Internal(format!(
                "catalog task failed: {}",
                join_error
            )))),
            Err(_) => {
                warn!(operation, timeout = ?self.timeout, "Catalog query timed out");
                Err(QueryError::Timeout {
                    operation,
                    after: self.timeout,
                })
            }
        };

        let outcome = match &result {
            Ok(_) => "ok",
            Err(QueryError::Catalog(CatalogError::NotFound(_))) => "not_found",
            Err(QueryError::Timeout { .. }) => "timeout",
            Err(_) => "error",
        };
        CATALOG_QUERIES
            .with_label_values(&[operation, outcome])
            .inc();
        CATALOG_QUERY_DURATION
            .with_label_values(&[operation])
            .observe(start.elapsed().as_secs_f64());

        result
    }
}
