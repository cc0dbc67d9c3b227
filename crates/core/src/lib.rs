pub mod cache;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod query;
pub mod site;
pub mod testing;
pub mod view;

pub use cache::{CacheOutcome, CacheSlot, ResponseCache};
pub use catalog::{
    CatalogError, CatalogStats, HomePageSets, Movie, MovieCatalog, MovieSuggestion, SearchPage,
    SqliteCatalog,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CacheConfig, CatalogConfig, Config,
    ConfigError,
};
pub use query::{BrowseParams, CatalogQuery, QueryEngine, QueryError};
pub use site::{BrowseRequest, CatalogSite, SiteError, SiteSettings};
pub use view::{HtmlRenderer, MovieRenderer};
