//! Configuration validation
//!
//! Validates critical configuration values at startup to catch misconfigurations early.

use anyhow::Result;
use emotes_core::Config;
use std::time::Duration;

/// Validate critical configuration values
///
/// Hard errors for values that would break the service or expose it; warnings
/// for values that are legal but probably not intended.
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    // Validate CORS configuration in production
    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production - this is a security risk. \
            Please set specific allowed origins via CORS_ORIGINS environment variable."
        ));
    }

    if config.trusted_proxy_count() > 10 {
        tracing::warn!(
            trusted_proxy_count = config.trusted_proxy_count(),
            "TRUSTED_PROXY_COUNT is very high - ensure this matches your actual proxy setup"
        );
    }

    if config.cache_ttl() < Duration::from_secs(30) {
        tracing::warn!(
            cache_ttl_secs = config.cache_ttl().as_secs(),
            "CACHE_TTL_SECS is very low - every refresh validates the whole catalog upstream"
        );
    }

    if config.refresh_batch_delay().is_zero() {
        tracing::warn!("REFRESH_BATCH_DELAY_MS is 0 - refresh batches will not be paced");
    }

    // A submission makes one upstream call inside the request timeout.
    if config.upstream_timeout() >= config.request_timeout() {
        tracing::warn!(
            upstream_timeout_secs = config.upstream_timeout().as_secs(),
            request_timeout_secs = config.request_timeout().as_secs(),
            "UPSTREAM_TIMEOUT_SECS is not below REQUEST_TIMEOUT_SECS - submissions may time out"
        );
    }

    if config.default_query_limit() <= 0 {
        tracing::warn!(
            default_query_limit = config.default_query_limit(),
            "DEFAULT_QUERY_LIMIT is not positive - unfiltered listings will be empty"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use emotes_core::CatalogConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&Config(Box::default())).is_ok());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut catalog = CatalogConfig::default();
        catalog.base.environment = "production".to_string();
        catalog.base.cors_origins = vec!["*".to_string()];
        assert!(validate_config(&Config(Box::new(catalog))).is_err());
    }

    #[test]
    fn test_explicit_cors_allowed_in_production() {
        let mut catalog = CatalogConfig::default();
        catalog.base.environment = "production".to_string();
        catalog.base.cors_origins = vec!["https://play.example.com".to_string()];
        assert!(validate_config(&Config(Box::new(catalog))).is_ok());
    }

    #[test]
    fn test_zero_rate_limit_rejected() {
        let mut catalog = CatalogConfig::default();
        catalog.base.http_rate_limit_per_minute = 0;
        assert!(validate_config(&Config(Box::new(catalog))).is_err());
    }
}
