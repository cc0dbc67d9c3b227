//! The site service: composes cache, query engine and renderer into the
//! page views the HTTP layer serves.
//!
//! Only the default view of each cacheable page goes through the response
//! cache. Browse requests with text, facets, an explicit order or a page
//! other than 1 always query the catalog.

mod views;

pub use views::{BrowseView, CachedView, HomeView, MovieView, TrendingView};

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::cache::{self, CacheOutcome, CacheSlot, ResponseCache};
use crate::catalog::{CatalogError, MovieCatalog, MovieSuggestion};
use crate::config::{CatalogConfig, Config};
use crate::query::facets::{search_text, ALL};
use crate::query::{
    BrowseFacets, BrowseParams, CatalogQuery, FacetError, QueryEngine, QueryError,
};
use crate::view::{HtmlRenderer, MovieRenderer};

/// Path of the unfiltered browse listing.
pub const BROWSE_PATH: &str = "/browse-movies";

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("Movie not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(CatalogError),

    #[error("Catalog query '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}

impl From<QueryError> for SiteError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::Catalog(CatalogError::NotFound(url)) => SiteError::NotFound(url),
            QueryError::Catalog(e) => SiteError::Store(e),
            QueryError::Timeout { operation, after } => SiteError::Timeout { operation, after },
        }
    }
}

impl From<FacetError> for SiteError {
    fn from(err: FacetError) -> Self {
        SiteError::Validation(err.to_string())
    }
}

/// Sizes and limits applied to every page.
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub page_size: NonZeroU32,
    pub suggestion_limit: u32,
    pub home_per_category: u32,
    pub home_display_limit: usize,
    pub trending_count: u32,
}

impl From<&CatalogConfig> for SiteSettings {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            page_size: config.page_size(),
            suggestion_limit: config.suggestion_limit,
            home_per_category: config.home_per_category,
            home_display_limit: config.home_display_limit,
            trending_count: config.trending_count,
        }
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self::from(&CatalogConfig::default())
    }
}

/// A browse request after the URL has been taken apart.
#[derive(Debug, Clone)]
pub struct BrowseRequest {
    /// Path the pagination links point back to.
    pub base_path: String,
    pub facets: BrowseFacets,
    pub page: u32,
    filtered_route: bool,
}

impl BrowseRequest {
    /// `/browse-movies?page=N`
    pub fn listing(page: u32) -> Self {
        Self {
            base_path: BROWSE_PATH.to_string(),
            facets: BrowseFacets::default(),
            page: page.max(1),
            filtered_route: false,
        }
    }

    /// `/browse-movies/{title}/{quality}/...?page=N`
    pub fn filtered(
        base_path: impl Into<String>,
        params: &BrowseParams,
        page: u32,
    ) -> Result<Self, FacetError> {
        Ok(Self {
            base_path: base_path.into(),
            facets: params.parse()?,
            page: page.max(1),
            filtered_route: true,
        })
    }

    /// Filtered browse path searching `title` with every other facet open,
    /// or `None` for blank text.
    pub fn title_search_path(title: &str) -> Option<String> {
        let text = search_text(title)?;
        Some(format!(
            "{}/{}/{all}/{all}/{all}/latest/{all}/{all}",
            BROWSE_PATH,
            urlencoding::encode(&text),
            all = ALL,
        ))
    }

    fn query(&self, page_size: NonZeroU32) -> CatalogQuery {
        CatalogQuery::new(page_size)
            .with_facets(self.facets.clone())
            .with_page(self.page)
    }
}

/// Serves page views from the catalog, memoizing the default views.
pub struct CatalogSite {
    engine: QueryEngine,
    cache: ResponseCache<CachedView>,
    renderer: Arc<dyn MovieRenderer>,
    settings: SiteSettings,
}

impl CatalogSite {
    pub fn new(
        engine: QueryEngine,
        cache: ResponseCache<CachedView>,
        renderer: Arc<dyn MovieRenderer>,
        settings: SiteSettings,
    ) -> Self {
        Self {
            engine,
            cache,
            renderer,
            settings,
        }
    }

    /// Wire a site over `catalog` with the HTML renderer and settings from `config`.
    pub fn from_config(catalog: Arc<dyn MovieCatalog>, config: &Config) -> Self {
        Self::new(
            QueryEngine::new(catalog, config.catalog.query_timeout()),
            ResponseCache::from_config(&config.cache),
            Arc::new(HtmlRenderer::new()),
            SiteSettings::from(&config.catalog),
        )
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    /// Number of cached views currently held.
    pub fn cached_views(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Home page: recent, action and comedy rows.
    pub async fn render_home(&self) -> Result<Arc<HomeView>, SiteError> {
        let (view, outcome) = self
            .cache
            .get_or_try_insert_with(CacheSlot::Index, || async {
                let sets = self
                    .engine
                    .home_page_sets(self.settings.home_per_category)
                    .await?;
                let limit = Some(self.settings.home_display_limit);
                Ok::<_, SiteError>(CachedView::Home(Arc::new(HomeView {
                    recent_html: self.renderer.movie_grid(&sets.recent, limit),
                    action_html: self.renderer.movie_grid(&sets.action, limit),
                    comedy_html: self.renderer.movie_grid(&sets.comedy, limit),
                })))
            })
            .await?;
        debug!(slot = %CacheSlot::Index, outcome = outcome.as_str(), "Rendered home");

        match view {
            CachedView::Home(home) => Ok(home),
            other => Err(slot_mismatch(CacheSlot::Index, &other)),
        }
    }

    /// Trending page: a random sample of the catalog.
    pub async fn render_trending(&self) -> Result<Arc<TrendingView>, SiteError> {
        let (view, outcome) = self
            .cache
            .get_or_try_insert_with(CacheSlot::TrendingMovies, || async {
                let movies = self
                    .engine
                    .sample_random(self.settings.trending_count)
                    .await?;
                let movies_html = self.renderer.movie_grid(&movies, None);
                Ok::<_, SiteError>(CachedView::Trending(Arc::new(TrendingView {
                    movies,
                    movies_html,
                })))
            })
            .await?;
        debug!(slot = %CacheSlot::TrendingMovies, outcome = outcome.as_str(), "Rendered trending");

        match view {
            CachedView::Trending(trending) => Ok(trending),
            other => Err(slot_mismatch(CacheSlot::TrendingMovies, &other)),
        }
    }

    /// Browse page, filtered or not.
    pub async fn render_browse(&self, request: &BrowseRequest) -> Result<Arc<BrowseView>, SiteError> {
        let query = request.query(self.settings.page_size);

        if request.filtered_route || !query.is_default_view() {
            cache::record(CacheSlot::BrowseMovies, CacheOutcome::Bypass);
            let view = self.build_browse(request, query).await?;
            return Ok(Arc::new(view));
        }

        let (view, outcome) = self
            .cache
            .get_or_try_insert_with(CacheSlot::BrowseMovies, || async {
                let view = self.build_browse(request, query).await?;
                Ok::<_, SiteError>(CachedView::Browse(Arc::new(view)))
            })
            .await?;
        debug!(slot = %CacheSlot::BrowseMovies, outcome = outcome.as_str(), "Rendered browse");

        match view {
            CachedView::Browse(browse) => Ok(browse),
            other => Err(slot_mismatch(CacheSlot::BrowseMovies, &other)),
        }
    }

    async fn build_browse(
        &self,
        request: &BrowseRequest,
        query: CatalogQuery,
    ) -> Result<BrowseView, SiteError> {
        let title_search = query.text.clone().unwrap_or_default();
        let page = self.engine.search(query).await?;

        Ok(BrowseView {
            results_html: self.renderer.movie_grid(&page.results, None),
            pagination_html: self
                .renderer
                .pagination(&request.base_path, page.total_pages, page.page),
            title_search,
            page: page.page,
            total_pages: page.total_pages,
            total_matches: page.total_matches,
        })
    }

    /// Movie detail page. Never cached.
    pub async fn render_movie(&self, movie_id: &str) -> Result<MovieView, SiteError> {
        let movie = self.engine.find_by_url(movie_id).await?;
        Ok(MovieView::from(movie))
    }

    /// Autocomplete suggestions for a non-blank search text.
    pub async fn search_suggestions(
        &self,
        text: Option<&str>,
    ) -> Result<Vec<MovieSuggestion>, SiteError> {
        let text = text.and_then(search_text).ok_or_else(|| {
            SiteError::Validation("Debe proporcionar un parámetro de búsqueda (query).".to_string())
        })?;

        Ok(self
            .engine
            .suggestions(&text, self.settings.suggestion_limit)
            .await?)
    }
}

fn slot_mismatch(slot: CacheSlot, found: &CachedView) -> SiteError {
    warn!(slot = %slot, found = ?std::mem::discriminant(found), "Cache slot held an unexpected view");
    SiteError::Store(CatalogError::Internal(format!(
        "cache slot {} held an unexpected view",
        slot
    )))
}
