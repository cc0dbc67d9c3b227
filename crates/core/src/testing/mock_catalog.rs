//! Mock movie catalog for testing.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::catalog::{
    CatalogError, CatalogStats, HomePageSets, Movie, MovieCatalog, MovieSuggestion, SearchPage,
    ACTION_GENRE, COMEDY_GENRE,
};
use crate::query::facets::title_matches;
use crate::query::pagination::{offset, paginate};
use crate::query::{CatalogQuery, OrderBy};

/// In-memory implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Serve a fixed list of movies with the same filter semantics as the real store
/// - Count calls per operation for cache assertions
/// - Simulate failures and slow queries
///
/// # Example
///
/// ```rust,ignore
/// use cartelera_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::with_movies(fixtures::sample_catalog());
/// catalog.set_next_error(CatalogError::Database("down".into()));
///
/// assert!(catalog.stats().is_err());
/// assert!(catalog.stats().is_ok());
/// assert_eq!(catalog.call_count("stats"), 2);
/// ```
#[derive(Default)]
pub struct MockCatalog {
    /// Movies in insertion order.
    movies: Mutex<Vec<Movie>>,
    /// Calls per operation name.
    calls: Mutex<HashMap<&'static str, usize>>,
    /// If set, the next call fails with this error.
    next_error: Mutex<Option<CatalogError>>,
    /// If set, every call sleeps this long before answering.
    delay: Mutex<Option<Duration>>,
}

impl std::fmt::Debug for MockCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockCatalog")
            .field("movies", &"<movies>")
            .field("calls", &"<calls>")
            .finish()
    }
}

/// Lock a mock field, ignoring poisoning from a panicked test thread.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockCatalog {
    /// Create an empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock catalog holding the given movies.
    pub fn with_movies(movies: Vec<Movie>) -> Self {
        let catalog = Self::new();
        *lock(&catalog.movies) = movies;
        catalog
    }

    /// Replace the catalog contents.
    pub fn set_movies(&self, movies: Vec<Movie>) {
        *lock(&self.movies) = movies;
    }

    /// Make the next call fail with the given error.
    pub fn set_next_error(&self, error: CatalogError) {
        *lock(&self.next_error) = Some(error);
    }

    /// Make every call block for `delay` before answering.
    pub fn set_delay(&self, delay: Duration) {
        *lock(&self.delay) = Some(delay);
    }

    /// Number of calls made to an operation, by trait method name.
    pub fn call_count(&self, operation: &str) -> usize {
        lock(&self.calls).get(operation).copied().unwrap_or(0)
    }

    /// Total calls across all operations.
    pub fn total_calls(&self) -> usize {
        lock(&self.calls).values().sum()
    }

    /// Clear call counters.
    pub fn reset_calls(&self) {
        lock(&self.calls).clear();
    }

    /// Record a call, apply the configured delay and return a pending error.
    fn enter(&self, operation: &'static str) -> Result<(), CatalogError> {
        *lock(&self.calls).entry(operation).or_insert(0) += 1;

        let delay = *lock(&self.delay);
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }

        match lock(&self.next_error).take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Movies sorted by `order`, ties broken by insertion recency.
    fn ordered(&self, order: OrderBy) -> Vec<Movie> {
        let mut indexed: Vec<(usize, Movie)> =
            lock(&self.movies).iter().cloned().enumerate().collect();

        indexed.sort_by(|(ia, a), (ib, b)| {
            let latest = b.added_at.cmp(&a.added_at).then(ib.cmp(ia));
            match order {
                OrderBy::Latest => latest,
                OrderBy::Oldest => latest.reverse(),
                OrderBy::Year => b.year.cmp(&a.year).then(latest),
                OrderBy::Rating => b.rating.total_cmp(&a.rating).then(latest),
                OrderBy::Alphabetical => a
                    .title
                    .to_lowercase()
                    .cmp(&b.title.to_lowercase())
                    .then(latest),
            }
        });

        indexed.into_iter().map(|(_, movie)| movie).collect()
    }

    fn in_genre(&self, genre: &str, limit: u32) -> Vec<Movie> {
        self.ordered(OrderBy::Latest)
            .into_iter()
            .filter(|m| m.genres.iter().any(|g| g.eq_ignore_ascii_case(genre)))
            .take(limit as usize)
            .collect()
    }
}

impl MovieCatalog for MockCatalog {
    fn home_page_sets(&self, per_category_limit: u32) -> Result<HomePageSets, CatalogError> {
        self.enter("home_page_sets")?;

        Ok(HomePageSets {
            recent: self
                .ordered(OrderBy::Latest)
                .into_iter()
                .take(per_category_limit as usize)
                .collect(),
            action: self.in_genre(ACTION_GENRE, per_category_limit),
            comedy: self.in_genre(COMEDY_GENRE, per_category_limit),
        })
    }

    fn find_by_url(&self, url: &str) -> Result<Movie, CatalogError> {
        self.enter("find_by_url")?;

        lock(&self.movies)
            .iter()
            .find(|m| m.url == url)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(url.to_string()))
    }

    fn search(&self, query: &CatalogQuery) -> Result<SearchPage, CatalogError> {
        self.enter("search")?;

        let matching: Vec<Movie> = self
            .ordered(query.effective_order())
            .into_iter()
            .filter(|m| {
                query
                    .text
                    .as_deref()
                    .is_none_or(|text| title_matches(&m.title, text))
            })
            .filter(|m| query.filters.matches(m))
            .collect();

        let total_matches = matching.len() as u64;
        let window = paginate(total_matches, query.page_size, i64::from(query.page));
        let skip = usize::try_from(offset(window.page, query.page_size)).unwrap_or(usize::MAX);

        Ok(SearchPage {
            results: matching
                .into_iter()
                .skip(skip)
                .take(query.page_size.get() as usize)
                .collect(),
            total_matches,
            total_pages: window.total_pages,
            page: window.page,
        })
    }

    fn suggestions(&self, text: &str, limit: u32) -> Result<Vec<MovieSuggestion>, CatalogError> {
        self.enter("suggestions")?;

        let text = text.trim();
        Ok(self
            .ordered(OrderBy::Latest)
            .iter()
            .filter(|m| title_matches(&m.title, text))
            .take(limit as usize)
            .map(MovieSuggestion::from)
            .collect())
    }

    fn sample_random(&self, count: u32) -> Result<Vec<Movie>, CatalogError> {
        self.enter("sample_random")?;

        // Deterministic "random": rotate by the current call count.
        let movies = lock(&self.movies).clone();
        if movies.is_empty() {
            return Ok(Vec::new());
        }
        let start = self.call_count("sample_random") % movies.len();
        Ok(movies
            .iter()
            .cycle()
            .skip(start)
            .take(movies.len().min(count as usize))
            .cloned()
            .collect())
    }

    fn stats(&self) -> Result<CatalogStats, CatalogError> {
        self.enter("stats")?;

        let movies = lock(&self.movies);
        let mut genres: Vec<String> = movies
            .iter()
            .flat_map(|m| m.genres.iter().map(|g| g.to_lowercase()))
            .collect();
        genres.sort();
        genres.dedup();

        Ok(CatalogStats {
            total_movies: movies.len() as u64,
            unique_genres: genres.len() as u32,
            oldest_year: movies.iter().map(|m| m.year).min(),
            newest_year: movies.iter().map(|m| m.year).max(),
        })
    }
}
