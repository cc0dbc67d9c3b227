//! Catalog queries: facets, pagination and the query engine.

mod engine;
pub mod facets;
pub mod pagination;

pub use engine::{QueryEngine, QueryError};
pub use facets::{
    BrowseFacets, BrowseParams, FacetError, MovieFilters, OrderBy, RatingFilter, YearFilter,
};
pub use pagination::{PageWindow, paginate, parse_page};

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// A bounded, paginated catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Title search; `None` matches every title.
    pub text: Option<String>,
    pub filters: MovieFilters,
    /// `None` uses the store's default order (most recently added first).
    pub order_by: Option<OrderBy>,
    /// 1-based page number.
    pub page: u32,
    pub page_size: NonZeroU32,
}

impl CatalogQuery {
    /// First page of the unfiltered catalog.
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            text: None,
            filters: MovieFilters::default(),
            order_by: None,
            page: 1,
            page_size,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = facets::search_text(&text.into());
        self
    }

    pub fn with_filters(mut self, filters: MovieFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_order(mut self, order_by: Option<OrderBy>) -> Self {
        self.order_by = order_by;
        self
    }

    /// Set the page, clamping anything below 1.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_facets(self, facets: BrowseFacets) -> Self {
        let mut query = self.with_filters(facets.filters).with_order(facets.order_by);
        query.text = facets.text;
        query
    }

    /// The order actually applied.
    pub fn effective_order(&self) -> OrderBy {
        self.order_by.unwrap_or_default()
    }

    /// True for the unfiltered first page: the only browse variant that may
    /// be served from the response cache.
    pub fn is_default_view(&self) -> bool {
        self.text.is_none() && self.filters.is_empty() && self.order_by.is_none() && self.page == 1
    }
}
