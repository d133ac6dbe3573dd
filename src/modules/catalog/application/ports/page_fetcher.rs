use async_trait::async_trait;

use crate::shared::errors::AppResult;

/// Port for the remote catalog API.
/// `CatalogApiClient` implements it over HTTP; tests substitute scripted pages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url` and return the decoded JSON body
    async fn fetch_json(&self, url: &str) -> AppResult<serde_json::Value>;
}
