use crate::shared::errors::{AppError, AppResult};
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_API_ORIGIN: &str = "https://api.catalog.example";
const DEFAULT_PAGE_SIZE: u32 = 100;
const DEFAULT_MAX_PAGES: usize = 10_000;
const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
const DEFAULT_RETRY_DELAY_MS: u64 = 200;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Where documents end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Keeps everything in process memory; nothing survives the run
    Memory,
}

impl FromStr for StoreBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(AppError::ConfigError(format!(
                "Unsupported store backend '{}'; expected postgres or memory",
                other
            ))),
        }
    }
}

/// Runtime settings for one sync run, read from the environment.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub api_origin: String,
    pub page_size: u32,
    pub max_pages: usize,
    pub retry_attempts: u32,
    pub retry_initial_delay: Duration,
    pub http_timeout: Duration,
    pub store: StoreBackend,
    pub database_url: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_initial_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            store: StoreBackend::Postgres,
            database_url: None,
        }
    }
}

impl SyncConfig {
    /// Load configuration from `.env` (if present) and the process environment.
    pub fn from_env() -> AppResult<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();
        Self::from_vars(&std::env::vars().collect())
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> AppResult<Self> {
        let defaults = Self::default();

        let api_origin = vars
            .get("CATALOG_API_ORIGIN")
            .map(|origin| origin.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_origin);
        if !api_origin.starts_with("http://") && !api_origin.starts_with("https://") {
            return Err(AppError::ConfigError(format!(
                "CATALOG_API_ORIGIN must be an http(s) URL, got '{}'",
                api_origin
            )));
        }

        let page_size = parse_var(vars, "CATALOG_PAGE_SIZE", defaults.page_size)?;
        let max_pages = parse_var(vars, "CATALOG_MAX_PAGES", defaults.max_pages)?;
        let retry_attempts = parse_var(vars, "CATALOG_RETRY_ATTEMPTS", defaults.retry_attempts)?;
        let retry_delay_ms = parse_var(vars, "CATALOG_RETRY_DELAY_MS", DEFAULT_RETRY_DELAY_MS)?;
        let timeout_secs = parse_var(vars, "CATALOG_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;

        if page_size == 0 || max_pages == 0 {
            return Err(AppError::ConfigError(
                "CATALOG_PAGE_SIZE and CATALOG_MAX_PAGES must be positive".to_string(),
            ));
        }

        let store = match vars.get("CATALOG_STORE") {
            Some(value) => value.parse()?,
            None => defaults.store,
        };

        let database_url = match store {
            StoreBackend::Postgres => Some(validated_database_url(vars.get("DATABASE_URL"))?),
            StoreBackend::Memory => None,
        };

        Ok(Self {
            api_origin,
            page_size,
            max_pages,
            retry_attempts,
            retry_initial_delay: Duration::from_millis(retry_delay_ms),
            http_timeout: Duration::from_secs(timeout_secs),
            store,
            database_url,
        })
    }
}

fn parse_var<T>(vars: &HashMap<String, String>, name: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match vars.get(name) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            AppError::ConfigError(format!("{} has invalid value '{}': {}", name, raw, e))
        }),
        None => Ok(default),
    }
}

/// Validate the database URL without ever logging credentials
fn validated_database_url(raw: Option<&String>) -> AppResult<String> {
    let database_url = raw.ok_or_else(|| {
        AppError::ConfigError("DATABASE_URL environment variable not found".to_string())
    })?;

    if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
        return Err(AppError::ConfigError(
            "Invalid database URL format. Must start with postgres:// or postgresql://"
                .to_string(),
        ));
    }

    Ok(database_url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn memory_store_needs_no_database_url() {
        let config = SyncConfig::from_vars(&vars(&[("CATALOG_STORE", "memory")])).unwrap();
        assert_eq!(config.store, StoreBackend::Memory);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.retry_attempts, 5);
        assert_eq!(config.retry_initial_delay, Duration::from_millis(200));
        assert!(config.database_url.is_none());
    }

    #[test]
    fn postgres_store_requires_database_url() {
        let err = SyncConfig::from_vars(&vars(&[])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = SyncConfig::from_vars(&vars(&[("DATABASE_URL", "mysql://localhost/db")]))
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn origin_trailing_slash_is_trimmed() {
        let config = SyncConfig::from_vars(&vars(&[
            ("CATALOG_STORE", "memory"),
            ("CATALOG_API_ORIGIN", "https://books.test/"),
        ]))
        .unwrap();
        assert_eq!(config.api_origin, "https://books.test");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = SyncConfig::from_vars(&vars(&[
            ("CATALOG_STORE", "memory"),
            ("CATALOG_MAX_PAGES", "lots"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("CATALOG_MAX_PAGES"));
    }
}
