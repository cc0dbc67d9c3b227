use super::{types::Config, ConfigError, MAX_CACHE_TTL_SECS};

/// Validate configuration
///
/// Rejects values that would make the site unusable: a zero port, a cache
/// that can hold nothing or expires instantly, and zero-sized queries.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.cache.ttl_secs == 0 {
        return Err(invalid("cache.ttl_secs cannot be 0"));
    }
    if config.cache.ttl_secs > MAX_CACHE_TTL_SECS {
        return Err(invalid(&format!(
            "cache.ttl_secs cannot exceed {}",
            MAX_CACHE_TTL_SECS
        )));
    }
    if config.cache.max_entries == 0 {
        return Err(invalid("cache.max_entries cannot be 0"));
    }

    let catalog = &config.catalog;
    for (name, value) in [
        ("catalog.page_size", u64::from(catalog.page_size)),
        ("catalog.suggestion_limit", u64::from(catalog.suggestion_limit)),
        ("catalog.home_per_category", u64::from(catalog.home_per_category)),
        ("catalog.home_display_limit", catalog.home_display_limit as u64),
        ("catalog.trending_count", u64::from(catalog.trending_count)),
        ("catalog.query_timeout_secs", catalog.query_timeout_secs),
    ] {
        if value == 0 {
            return Err(invalid(&format!("{} cannot be 0", name)));
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
