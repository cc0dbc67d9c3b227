//! Types for the movie catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A movie as stored in the catalog.
///
/// Immutable from the site's point of view: only the store creates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Unique slug used in `/movies/{url}`.
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub year: u16,
    /// Genres in display order.
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    /// Available qualities (e.g. "720p", "1080p").
    #[serde(default)]
    pub qualities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    /// Principal cast.
    #[serde(default)]
    pub cast: Vec<String>,
    /// Similar movies shown on the detail page.
    #[serde(default)]
    pub related: Vec<RelatedMovie>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    /// YouTube embed URL for the trailer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailer_embed: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// When the movie entered the catalog. Assigned by the store.
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}

/// A reference to another movie in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedMovie {
    pub url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
}

/// Reduced projection returned by the autocomplete search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSuggestion {
    pub url: String,
    pub img: Option<String>,
    pub title: String,
    pub year: u16,
}

impl From<&Movie> for MovieSuggestion {
    fn from(movie: &Movie) -> Self {
        Self {
            url: movie.url.clone(),
            img: movie.poster.clone(),
            title: movie.title.clone(),
            year: movie.year,
        }
    }
}

/// The three movie rows shown on the home page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomePageSets {
    pub recent: Vec<Movie>,
    pub action: Vec<Movie>,
    pub comedy: Vec<Movie>,
}

/// One page of search results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    /// Never longer than the requested page size.
    pub results: Vec<Movie>,
    /// Movies matching the query across all pages.
    pub total_matches: u64,
    /// Pages available; at least 1 even for an empty result.
    pub total_pages: u32,
    /// The page these results belong to.
    pub page: u32,
}

impl SearchPage {
    pub fn empty(page: u32) -> Self {
        Self {
            results: Vec::new(),
            total_matches: 0,
            total_pages: 1,
            page,
        }
    }
}

/// Catalog statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Total movies.
    pub total_movies: u64,
    /// Distinct genres across the catalog.
    pub unique_genres: u32,
    /// Oldest release year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest_year: Option<u16>,
    /// Newest release year.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest_year: Option<u16>,
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
