use crate::log_debug;
use crate::modules::catalog::application::ports::PageFetcher;
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::time::{Duration, Instant};

const USER_AGENT: &str = concat!("catalog-sync/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the catalog API
pub struct CatalogApiClient {
    client: Client,
}

impl CatalogApiClient {
    /// `timeout` bounds each request so a hung connection counts as a failed attempt
    pub fn new(timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                AppError::InternalError(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for CatalogApiClient {
    async fn fetch_json(&self, url: &str) -> AppResult<serde_json::Value> {
        let start = Instant::now();

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::ApiError(format!("GET {} returned {}", url, status)));
        }

        let body = response.json::<serde_json::Value>().await?;
        log_debug!(
            "API: GET {} {} in {}ms",
            url,
            status,
            start.elapsed().as_millis()
        );

        Ok(body)
    }
}
