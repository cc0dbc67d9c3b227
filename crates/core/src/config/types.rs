use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for anything no route matches (css, js, images).
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("public")
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    /// JSON file with an array of movies, imported when the catalog is empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_file: Option<PathBuf>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            seed_file: None,
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("cartelera.db")
}

/// Longest accepted cache lifetime (30 days).
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Response cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// When false every request goes to the catalog.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Lifetime of a cached page in seconds (default: 3600)
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Maximum number of cached pages
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: default_ttl_secs(),
            max_entries: default_max_entries(),
        }
    }
}

impl CacheConfig {
    /// Configured lifetime, capped at [`MAX_CACHE_TTL_SECS`].
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs.min(MAX_CACHE_TTL_SECS))
    }
}

fn default_true() -> bool {
    true
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_max_entries() -> usize {
    64
}

/// Catalog query configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Movies per browse page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Results returned by the autocomplete endpoint
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u32,
    /// Movies fetched per home page category
    #[serde(default = "default_home_per_category")]
    pub home_per_category: u32,
    /// Movies displayed per home page category
    #[serde(default = "default_home_display_limit")]
    pub home_display_limit: usize,
    /// Movies sampled for the trending page
    #[serde(default = "default_trending_count")]
    pub trending_count: u32,
    /// Upper bound for a single catalog query in seconds
    #[serde(default = "default_query_timeout_secs")]
    pub query_timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            suggestion_limit: default_suggestion_limit(),
            home_per_category: default_home_per_category(),
            home_display_limit: default_home_display_limit(),
            trending_count: default_trending_count(),
            query_timeout_secs: default_query_timeout_secs(),
        }
    }
}

impl CatalogConfig {
    /// Page size as a non-zero value; zero falls back to the default.
    pub fn page_size(&self) -> NonZeroU32 {
        NonZeroU32::new(self.page_size)
            .or_else(|| NonZeroU32::new(default_page_size()))
            .unwrap_or(NonZeroU32::MIN)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }
}

fn default_page_size() -> u32 {
    20
}

fn default_suggestion_limit() -> u32 {
    5
}

fn default_home_per_category() -> u32 {
    8
}

fn default_home_display_limit() -> usize {
    4
}

fn default_trending_count() -> u32 {
    20
}

fn default_query_timeout_secs() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.static_dir.to_str().unwrap(), "public");
        assert_eq!(config.database.path.to_str().unwrap(), "cartelera.db");
        assert!(config.database.seed_file.is_none());
        assert!(config.cache.enabled);
        assert_eq!(config.cache.ttl_secs, 3600);
        assert_eq!(config.catalog.page_size, 20);
        assert_eq!(config.catalog.suggestion_limit, 5);
        assert_eq!(config.catalog.home_per_category, 8);
        assert_eq!(config.catalog.home_display_limit, 4);
    }

    #[test]
    fn test_deserialize_server_section() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000
static_dir = "/srv/www"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
        assert_eq!(config.server.static_dir.to_str().unwrap(), "/srv/www");
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[database]
path = "/data/movies.sqlite"
seed_file = "/data/movies.json"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/movies.sqlite");
        assert_eq!(
            config.database.seed_file.as_ref().unwrap().to_str().unwrap(),
            "/data/movies.json"
        );
    }

    #[test]
    fn test_deserialize_cache_section() {
        let toml = r#"
[cache]
enabled = false
ttl_secs = 60
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
        assert_eq!(config.cache.max_entries, 64); // default
    }

    #[test]
    fn test_page_size_zero_falls_back() {
        let catalog = CatalogConfig {
            page_size: 0,
            ..Default::default()
        };
        assert_eq!(catalog.page_size().get(), 20);
    }

    #[test]
    fn test_config_serializes_without_seed_file() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(!json.contains("seed_file"));
        assert!(json.contains("ttl_secs"));
    }
}
