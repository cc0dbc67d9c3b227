use std::sync::Arc;

use cartelera_core::{CatalogSite, Config, MovieCatalog};

/// Shared application state
pub struct AppState {
    config: Config,
    site: CatalogSite,
}

impl AppState {
    pub fn new(config: Config, site: CatalogSite) -> Self {
        Self { config, site }
    }

    /// Build the site over `catalog` using `config`.
    pub fn from_catalog(config: Config, catalog: Arc<dyn MovieCatalog>) -> Self {
        let site = CatalogSite::from_config(catalog, &config);
        Self::new(config, site)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn site(&self) -> &CatalogSite {
        &self.site
    }
}
