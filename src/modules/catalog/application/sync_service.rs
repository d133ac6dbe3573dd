use chrono::Utc;
use futures::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use super::catalog_sink::CatalogSink;
use super::ports::{PageFetcher, StoreConnector};
use super::sync_report::{PageOutcome, PipelineState, StageReport, StageTermination, SyncReport};
use crate::modules::catalog::domain::reconcile_authors;
use crate::modules::catalog::infrastructure::external::{
    BookMapper, CatalogResource, GenreMapper, PageStop, Paginator, RecordMapper, TagMapper,
};
use crate::modules::catalog::infrastructure::http_client::BackoffPolicy;
use crate::shared::config::SyncConfig;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_error, log_info, log_warn};

/// Crawl settings shared by every stage.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub api_origin: String,
    pub page_size: u32,
    pub max_pages: usize,
    pub backoff: BackoffPolicy,
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            api_origin: config.api_origin.clone(),
            page_size: config.page_size,
            max_pages: config.max_pages,
            backoff: BackoffPolicy::new(config.retry_attempts, config.retry_initial_delay),
        }
    }
}

/// Runs the genre, tag and book/author crawls against one store connection.
pub struct CatalogSyncService {
    fetcher: Arc<dyn PageFetcher>,
    connector: Arc<dyn StoreConnector>,
    options: SyncOptions,
    state: PipelineState,
    transitions: Vec<PipelineState>,
}

impl CatalogSyncService {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        connector: Arc<dyn StoreConnector>,
        options: SyncOptions,
    ) -> Self {
        Self {
            fetcher,
            connector,
            options,
            state: PipelineState::Disconnected,
            transitions: vec![PipelineState::Disconnected],
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Run the whole pipeline once.
    ///
    /// Stage failures are recorded in the report and never returned. The only
    /// error is a failed connection, in which case no stage runs. The store is
    /// disconnected before a stage panic is resumed.
    pub async fn run(&mut self) -> AppResult<SyncReport> {
        let timer = TimedOperation::new("catalog sync");
        let started_at = Utc::now();
        self.state = PipelineState::Disconnected;
        self.transitions = vec![PipelineState::Disconnected];

        let store = self.connector.connect().await.map_err(|e| {
            log_error!("Sync: could not connect to the document store: {}", e);
            e
        })?;
        self.advance(PipelineState::Connected);

        let sink = CatalogSink::new(Arc::clone(&store));
        let stages = AssertUnwindSafe(self.run_stages(&sink))
            .catch_unwind()
            .await;

        // Released even when a stage panicked
        if let Err(e) = store.disconnect().await {
            log_warn!("Sync: disconnecting from the document store failed: {}", e);
        }
        self.advance(PipelineState::Disconnected);

        let stages = match stages {
            Ok(stages) => stages,
            Err(payload) => {
                log_error!("Sync: a stage panicked; store connection released");
                panic::resume_unwind(payload);
            }
        };

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            transitions: self.transitions.clone(),
            stages,
        };

        log_info!("Sync: {}", report.summary_line());
        timer.finish_with_info(&format!("{} books", report.total_books()));

        Ok(report)
    }

    async fn run_stages(&mut self, sink: &CatalogSink) -> Vec<StageReport> {
        let mut stages = Vec::with_capacity(CatalogResource::ALL.len());
        for resource in CatalogResource::ALL {
            stages.push(self.crawl(resource, sink).await);
            self.advance(PipelineState::after(resource));
        }
        stages
    }

    fn advance(&mut self, next: PipelineState) {
        log_debug!("Sync: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.transitions.push(next);
    }

    /// Crawl one resource to its end. Never fails: errors end the crawl and
    /// are recorded in the returned report.
    async fn crawl(&self, resource: CatalogResource, sink: &CatalogSink) -> StageReport {
        log_info!("Sync: starting {} crawl", resource);
        let mut report = StageReport::start(resource);

        let mut paginator = match Paginator::new(
            self.fetcher.as_ref(),
            &self.options.backoff,
            resource,
            &self.options.api_origin,
            self.options.page_size,
            self.options.max_pages,
        ) {
            Ok(paginator) => paginator,
            Err(e) => {
                log_error!("Sync: cannot start {} crawl: {}", resource, e);
                return report.finish(StageTermination::from_fetch_error(&e), Some(&e));
            }
        };

        let (termination, error) = loop {
            let page = match paginator.next_page().await {
                Ok(Some(page)) => page,
                Ok(None) => {
                    let termination = match paginator.stop_reason() {
                        Some(PageStop::EmptyPage) => StageTermination::EmptyPage,
                        _ => StageTermination::CursorExhausted,
                    };
                    break (termination, None);
                }
                Err(e) => {
                    log_error!(
                        "Sync: {} crawl stopped after {} pages: {}",
                        resource,
                        paginator.pages_fetched(),
                        e
                    );
                    break (StageTermination::from_fetch_error(&e), Some(e));
                }
            };

            if page.objects.is_empty() {
                log_debug!("Sync: {} page {} is empty", resource, page.number);
                continue;
            }

            match self.persist_page(resource, sink, page.objects).await {
                Ok(outcome) => {
                    LogContext::page_saved(
                        resource.name(),
                        page.number,
                        outcome.records,
                        outcome.written,
                    );
                    report.absorb(outcome);
                }
                Err(e) => {
                    log_error!(
                        "Sync: saving {} page {} failed, ending crawl: {}",
                        resource,
                        page.number,
                        e
                    );
                    break (StageTermination::from_write_error(&e), Some(e));
                }
            }
        };

        report.pages = paginator.pages_fetched();
        let report = report.finish(termination, error.as_ref());
        log_info!(
            "Sync: {} crawl finished ({}) after {} pages in {}ms",
            resource,
            report.termination,
            report.pages,
            report.duration_ms()
        );
        report
    }

    async fn persist_page(
        &self,
        resource: CatalogResource,
        sink: &CatalogSink,
        objects: Vec<serde_json::Value>,
    ) -> AppResult<PageOutcome> {
        let records = objects.len();

        match resource {
            CatalogResource::Genres => {
                let genres = GenreMapper.map_page(objects)?;
                let summary = sink.insert_genres(&genres).await?;
                Ok(PageOutcome {
                    records,
                    written: summary.written,
                    duplicates: summary.duplicates,
                    ..Default::default()
                })
            }
            CatalogResource::Tags => {
                let tags = TagMapper.map_page(objects)?;
                let summary = sink.insert_tags(&tags).await?;
                Ok(PageOutcome {
                    records,
                    written: summary.written,
                    duplicates: summary.duplicates,
                    ..Default::default()
                })
            }
            CatalogResource::Books => {
                let aggregates = reconcile_authors(BookMapper.map_page(objects)?);
                let upserted = sink.upsert_authors(&aggregates).await?;
                Ok(PageOutcome {
                    records,
                    written: upserted,
                    authors_upserted: upserted,
                    books: aggregates.total_books(),
                    ..Default::default()
                })
            }
        }
    }
}
