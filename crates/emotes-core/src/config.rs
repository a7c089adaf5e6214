//! Configuration module
//!
//! This module provides configuration structures for the catalog API: server,
//! admission limiting, upstream marketplace and cache settings. Everything is read
//! from the environment (optionally seeded from a `.env` file).

use std::env;
use std::time::Duration;

// Common constants
const SERVER_PORT: u16 = 3000;
const HTTP_RATE_LIMIT_PER_MINUTE: u32 = 100;
const RATE_LIMIT_WINDOW_SECS: u64 = 60;
const RATE_LIMITER_SHARD_COUNT: usize = 16;
const RATE_LIMITER_SWEEP_INTERVAL_SECS: u64 = 300;
const TRUSTED_PROXY_COUNT: usize = 1;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;

/// Base configuration for the HTTP surface
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub http_rate_limit_per_minute: u32,
    pub rate_limit_window_secs: u64,
    pub rate_limiter_shard_count: usize,
    /// Interval between sweeps of expired admission windows. 0 = disabled.
    pub rate_limiter_sweep_interval_secs: u64,
    pub trusted_proxy_count: usize,
    pub request_timeout_secs: u64,
    pub http_concurrency_limit: usize,
    /// Emit logs as JSON lines (`LOG_FORMAT=json`) instead of compact text.
    pub log_json: bool,
}

/// Emote catalog configuration
#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub base: BaseConfig,
    // Upstream marketplace
    pub marketplace_api_url: String,
    pub upstream_timeout_secs: u64,
    // Asset cache and refresh engine
    pub cache_ttl_secs: u64,
    pub refresh_batch_size: usize,
    pub refresh_batch_delay_ms: u64,
    pub default_query_limit: i64,
    pub warm_cache_on_startup: bool,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<CatalogConfig>);

impl Config {
    fn as_catalog(&self) -> &CatalogConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_name(&self.as_catalog().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = CatalogConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_catalog().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_catalog().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_catalog().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_catalog().base.environment
    }

    pub fn http_rate_limit_per_minute(&self) -> u32 {
        self.as_catalog().base.http_rate_limit_per_minute
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.as_catalog().base.rate_limit_window_secs)
    }

    pub fn rate_limiter_shard_count(&self) -> usize {
        self.as_catalog().base.rate_limiter_shard_count
    }

    pub fn rate_limiter_sweep_interval_secs(&self) -> u64 {
        self.as_catalog().base.rate_limiter_sweep_interval_secs
    }

    pub fn trusted_proxy_count(&self) -> usize {
        self.as_catalog().base.trusted_proxy_count
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_catalog().base.http_concurrency_limit
    }

    pub fn log_json(&self) -> bool {
        self.as_catalog().base.log_json
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.as_catalog().base.request_timeout_secs)
    }

    pub fn marketplace_api_url(&self) -> &str {
        &self.as_catalog().marketplace_api_url
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.as_catalog().upstream_timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.as_catalog().cache_ttl_secs)
    }

    pub fn refresh_batch_size(&self) -> usize {
        self.as_catalog().refresh_batch_size
    }

    pub fn refresh_batch_delay(&self) -> Duration {
        Duration::from_millis(self.as_catalog().refresh_batch_delay_ms)
    }

    pub fn default_query_limit(&self) -> i64 {
        self.as_catalog().default_query_limit
    }

    pub fn warm_cache_on_startup(&self) -> bool {
        self.as_catalog().warm_cache_on_startup
    }
}

fn is_production_name(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

/// Boolean env flag: `true/1/yes/on` or `false/0/no/off`, case-insensitive.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base: BaseConfig {
                server_port: SERVER_PORT,
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
                http_rate_limit_per_minute: HTTP_RATE_LIMIT_PER_MINUTE,
                rate_limit_window_secs: RATE_LIMIT_WINDOW_SECS,
                rate_limiter_shard_count: RATE_LIMITER_SHARD_COUNT,
                rate_limiter_sweep_interval_secs: RATE_LIMITER_SWEEP_INTERVAL_SECS,
                trusted_proxy_count: TRUSTED_PROXY_COUNT,
                request_timeout_secs: REQUEST_TIMEOUT_SECS,
                http_concurrency_limit: HTTP_CONCURRENCY_LIMIT,
                log_json: false,
            },
            marketplace_api_url: "https://economy.roblox.com".to_string(),
            upstream_timeout_secs: 5,
            cache_ttl_secs: 300,
            refresh_batch_size: 5,
            refresh_batch_delay_ms: 1000,
            default_query_limit: 50,
            warm_cache_on_startup: true,
        }
    }
}

impl CatalogConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = CatalogConfig::default();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| defaults.base.environment.clone());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_name(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            http_rate_limit_per_minute: env_or(
                "HTTP_RATE_LIMIT_PER_MINUTE",
                HTTP_RATE_LIMIT_PER_MINUTE,
            ),
            rate_limit_window_secs: env_or("RATE_LIMIT_WINDOW_SECS", RATE_LIMIT_WINDOW_SECS),
            rate_limiter_shard_count: env_or("RATE_LIMITER_SHARD_COUNT", RATE_LIMITER_SHARD_COUNT)
                .max(1),
            rate_limiter_sweep_interval_secs: env_or(
                "RATE_LIMITER_SWEEP_INTERVAL_SECS",
                RATE_LIMITER_SWEEP_INTERVAL_SECS,
            ),
            trusted_proxy_count: env_or("TRUSTED_PROXY_COUNT", TRUSTED_PROXY_COUNT),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS).max(1),
            http_concurrency_limit: env_or("HTTP_CONCURRENCY_LIMIT", HTTP_CONCURRENCY_LIMIT).max(1),
            log_json: env::var("LOG_FORMAT")
                .map(|format| format.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        };

        let config = CatalogConfig {
            base,
            marketplace_api_url: env::var("MARKETPLACE_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.marketplace_api_url),
            upstream_timeout_secs: env_or("UPSTREAM_TIMEOUT_SECS", defaults.upstream_timeout_secs),
            cache_ttl_secs: env_or("CACHE_TTL_SECS", defaults.cache_ttl_secs),
            refresh_batch_size: env_or("REFRESH_BATCH_SIZE", defaults.refresh_batch_size),
            refresh_batch_delay_ms: env_or(
                "REFRESH_BATCH_DELAY_MS",
                defaults.refresh_batch_delay_ms,
            ),
            default_query_limit: env_or("DEFAULT_QUERY_LIMIT", defaults.default_query_limit),
            warm_cache_on_startup: env::var("WARM_CACHE_ON_STARTUP")
                .ok()
                .and_then(|value| parse_flag(&value))
                .unwrap_or(defaults.warm_cache_on_startup),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.refresh_batch_size == 0 {
            return Err(anyhow::anyhow!("REFRESH_BATCH_SIZE must be at least 1"));
        }
        if self.cache_ttl_secs == 0 {
            return Err(anyhow::anyhow!("CACHE_TTL_SECS must be at least 1"));
        }
        if self.upstream_timeout_secs == 0 {
            return Err(anyhow::anyhow!("UPSTREAM_TIMEOUT_SECS must be at least 1"));
        }
        if self.base.http_rate_limit_per_minute == 0 {
            return Err(anyhow::anyhow!("HTTP_RATE_LIMIT_PER_MINUTE cannot be 0"));
        }
        if self.base.rate_limit_window_secs == 0 {
            return Err(anyhow::anyhow!("RATE_LIMIT_WINDOW_SECS cannot be 0"));
        }
        if !self.marketplace_api_url.starts_with("http://")
            && !self.marketplace_api_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "MARKETPLACE_API_URL must be an http(s) URL, got '{}'",
                self.marketplace_api_url
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_catalog_contract() {
        let config = Config(Box::default());
        assert_eq!(config.server_port(), 3000);
        assert_eq!(config.http_rate_limit_per_minute(), 100);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.upstream_timeout(), Duration::from_secs(5));
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.refresh_batch_size(), 5);
        assert_eq!(config.refresh_batch_delay(), Duration::from_secs(1));
        assert_eq!(config.default_query_limit(), 50);
        assert!(!config.is_production());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_batch_size() {
        let mut catalog = CatalogConfig::default();
        catalog.refresh_batch_size = 0;
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_http_marketplace_url() {
        let mut catalog = CatalogConfig::default();
        catalog.marketplace_api_url = "economy.roblox.com".to_string();
        let err = catalog.validate().unwrap_err();
        assert!(err.to_string().contains("MARKETPLACE_API_URL"));
    }

    #[test]
    fn test_parse_flag_accepts_numeric_and_word_forms() {
        for value in ["true", "1", "YES", " on "] {
            assert_eq!(parse_flag(value), Some(true), "{}", value);
        }
        for value in ["false", "0", "No", "off"] {
            assert_eq!(parse_flag(value), Some(false), "{}", value);
        }
        assert_eq!(parse_flag("maybe"), None);
        assert_eq!(parse_flag(""), None);
    }

    #[test]
    fn test_production_detection() {
        let mut catalog = CatalogConfig::default();
        catalog.base.environment = "PROD".to_string();
        assert!(Config(Box::new(catalog)).is_production());
    }
}
