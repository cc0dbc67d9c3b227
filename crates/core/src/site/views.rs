//! View models handed to page templates.

use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Movie, RelatedMovie};

/// Home page: three pre-rendered movie rows.
#[derive(Debug, Clone, Serialize)]
pub struct HomeView {
    pub recent_html: String,
    pub action_html: String,
    pub comedy_html: String,
}

/// Trending page: a random sample of movies.
#[derive(Debug, Clone, Serialize)]
pub struct TrendingView {
    pub movies: Vec<Movie>,
    pub movies_html: String,
}

/// One page of browse results.
#[derive(Debug, Clone, Serialize)]
pub struct BrowseView {
    pub results_html: String,
    pub pagination_html: String,
    /// Title search echoed back into the search box; empty when none.
    pub title_search: String,
    pub page: u32,
    pub total_pages: u32,
    pub total_matches: u64,
}

/// Movie detail page.
#[derive(Debug, Clone, Serialize)]
pub struct MovieView {
    pub url: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub year: u16,
    /// Genres joined with " / ".
    pub categories: String,
    pub genres: Vec<String>,
    pub rating: f32,
    pub related: Vec<RelatedMovie>,
    pub director: Option<String>,
    pub cast: Vec<String>,
    pub qualities: Vec<String>,
    pub background: Option<String>,
    pub poster: Option<String>,
    pub screenshots: Vec<String>,
    pub trailer_embed: Option<String>,
    pub tags: Vec<String>,
    pub country: Option<String>,
}

impl From<Movie> for MovieView {
    fn from(movie: Movie) -> Self {
        Self {
            categories: movie.genres.join(" / "),
            url: movie.url,
            title: movie.title,
            subtitle: movie.subtitle,
            year: movie.year,
            genres: movie.genres,
            rating: movie.rating,
            related: movie.related,
            director: movie.director,
            cast: movie.cast,
            qualities: movie.qualities,
            background: movie.background,
            poster: movie.poster,
            screenshots: movie.screenshots,
            trailer_embed: movie.trailer_embed,
            tags: movie.tags,
            country: movie.country,
        }
    }
}

/// What the response cache stores: one variant per cacheable page.
#[derive(Debug, Clone)]
pub enum CachedView {
    Home(Arc<HomeView>),
    Trending(Arc<TrendingView>),
    Browse(Arc<BrowseView>),
}
