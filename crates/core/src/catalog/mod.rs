//! Movie catalog - the read-only store behind the site.
//!
//! The catalog is populated out of band; the site only reads from it.

mod sqlite;
mod types;

pub use sqlite::SqliteCatalog;
pub use types::*;

use crate::query::CatalogQuery;

/// Genre feeding the "action" row of the home page.
pub const ACTION_GENRE: &str = "Action";
/// Genre feeding the "comedy" row of the home page.
pub const COMEDY_GENRE: &str = "Comedy";

/// Trait for movie catalog storage.
///
/// Implementations may block on I/O; callers run them off the async
/// executor (see [`crate::query::QueryEngine`]).
pub trait MovieCatalog: Send + Sync {
    /// Fetch the home page rows, at most `per_category_limit` movies each.
    fn home_page_sets(&self, per_category_limit: u32) -> Result<HomePageSets, CatalogError>;

    /// Get a movie by its url slug.
    ///
    /// Returns `CatalogError::NotFound` when no movie has that url.
    fn find_by_url(&self, url: &str) -> Result<Movie, CatalogError>;

    /// Run a filtered, ordered, paginated search.
    fn search(&self, query: &CatalogQuery) -> Result<SearchPage, CatalogError>;

    /// Autocomplete: up to `limit` title matches, reduced projection only.
    fn suggestions(&self, text: &str, limit: u32) -> Result<Vec<MovieSuggestion>, CatalogError>;

    /// A random sample of up to `count` movies.
    fn sample_random(&self, count: u32) -> Result<Vec<Movie>, CatalogError>;

    /// Get catalog statistics.
    fn stats(&self) -> Result<CatalogStats, CatalogError>;
}
