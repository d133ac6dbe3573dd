//! Cursor-following crawl over one catalog collection.

use super::dto::PageEnvelope;
use super::resource::CatalogResource;
use crate::log_info;
use crate::modules::catalog::application::ports::PageFetcher;
use crate::modules::catalog::infrastructure::http_client::BackoffPolicy;
use crate::shared::errors::{AbortReason, AppError, AppResult};
use reqwest::Url;

/// One fetched page, before its records are mapped.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPage {
    /// 1-based position within the crawl
    pub number: usize,
    pub url: String,
    pub objects: Vec<serde_json::Value>,
}

/// Why the paginator stopped handing out pages without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStop {
    /// The last page carried no `next` cursor
    CursorExhausted,
    /// An empty page ended a crawl that stops on empty pages
    EmptyPage,
}

pub struct Paginator<'a> {
    fetcher: &'a dyn PageFetcher,
    backoff: &'a BackoffPolicy,
    resource: CatalogResource,
    origin: Url,
    next_url: Option<String>,
    // Cursor of an already returned page that could not be resolved
    cursor_error: Option<AppError>,
    max_pages: usize,
    pages_fetched: usize,
    stop: Option<PageStop>,
}

impl<'a> Paginator<'a> {
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        backoff: &'a BackoffPolicy,
        resource: CatalogResource,
        api_origin: &str,
        page_size: u32,
        max_pages: usize,
    ) -> AppResult<Self> {
        let origin = Url::parse(api_origin).map_err(|e| {
            AppError::ConfigError(format!("Invalid API origin '{}': {}", api_origin, e))
        })?;

        Ok(Self {
            fetcher,
            backoff,
            resource,
            next_url: Some(resource.start_url(api_origin, page_size)),
            origin,
            cursor_error: None,
            max_pages,
            pages_fetched: 0,
            stop: None,
        })
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// Set once `next_page` has returned `Ok(None)`
    pub fn stop_reason(&self) -> Option<PageStop> {
        self.stop
    }

    /// Fetch the next page.
    ///
    /// `Ok(None)` means the crawl ended normally. An error ends the crawl too:
    /// the cursor is consumed before fetching, so later calls return `Ok(None)`.
    /// A page whose cursor cannot be resolved is still returned; the cursor
    /// error comes from the following call.
    pub async fn next_page(&mut self) -> AppResult<Option<RawPage>> {
        if let Some(error) = self.cursor_error.take() {
            return Err(error);
        }

        let url = match self.next_url.take() {
            Some(url) => url,
            None => {
                self.stop.get_or_insert(PageStop::CursorExhausted);
                return Ok(None);
            }
        };

        if self.pages_fetched >= self.max_pages {
            return Err(AppError::CrawlAborted {
                reason: AbortReason::PageLimitExceeded {
                    limit: self.max_pages,
                },
            });
        }

        let operation_name = format!("GET {} page {}", self.resource, self.pages_fetched + 1);
        let fetcher = self.fetcher;
        let body = self
            .backoff
            .execute(&operation_name, || fetcher.fetch_json(&url))
            .await?;
        self.pages_fetched += 1;

        let envelope: PageEnvelope = serde_json::from_value(body).map_err(|e| {
            AppError::malformed(self.resource.name(), format!("page envelope: {}", e))
        })?;

        if envelope.objects.is_empty() && self.resource.stops_on_empty_page() {
            if envelope.next_cursor().is_some() {
                log_info!(
                    "Sync: {} page {} is empty but still has a cursor; stopping",
                    self.resource,
                    self.pages_fetched
                );
            }
            self.stop = Some(PageStop::EmptyPage);
        } else if let Some(cursor) = envelope.next_cursor() {
            match self.resolve(cursor) {
                Ok(next_url) => self.next_url = Some(next_url),
                Err(e) => self.cursor_error = Some(e),
            }
        }

        Ok(Some(RawPage {
            number: self.pages_fetched,
            url,
            objects: envelope.objects,
        }))
    }

    /// Relative cursors are resolved against the API origin; absolute ones pass through
    fn resolve(&self, cursor: &str) -> AppResult<String> {
        self.origin
            .join(cursor.trim())
            .map(String::from)
            .map_err(|e| {
                AppError::malformed(
                    self.resource.name(),
                    format!("invalid cursor '{}': {}", cursor, e),
                )
            })
    }
}
