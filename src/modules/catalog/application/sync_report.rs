use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::modules::catalog::infrastructure::external::CatalogResource;
use crate::shared::errors::{AbortReason, AppError};

/// States of the sync pipeline, visited in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PipelineState {
    Disconnected,
    Connected,
    GenresDone,
    TagsDone,
    BooksDone,
}

impl PipelineState {
    /// State reached once the crawl for `resource` has exited
    pub fn after(resource: CatalogResource) -> Self {
        match resource {
            CatalogResource::Genres => PipelineState::GenresDone,
            CatalogResource::Tags => PipelineState::TagsDone,
            CatalogResource::Books => PipelineState::BooksDone,
        }
    }
}

/// Why a resource crawl ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageTermination {
    /// The last page had no `next` cursor
    CursorExhausted,
    /// An empty book page ended the crawl
    EmptyPage,
    /// A page could not be fetched within the allowed attempts
    FetchFailed,
    /// A page envelope or record did not have the expected shape
    MalformedPage,
    /// The store rejected a write
    WriteFailed,
    Aborted { reason: AbortReason },
}

impl StageTermination {
    /// Normal endings; everything else means the collection may be partial
    pub fn is_complete(&self) -> bool {
        matches!(
            self,
            StageTermination::CursorExhausted | StageTermination::EmptyPage
        )
    }

    /// Classify an error raised while fetching or decoding a page
    pub fn from_fetch_error(error: &AppError) -> Self {
        match error {
            AppError::CrawlAborted { reason } => StageTermination::Aborted { reason: *reason },
            AppError::MalformedRecord { .. } => StageTermination::MalformedPage,
            _ => StageTermination::FetchFailed,
        }
    }

    /// Classify an error raised while mapping or persisting a page
    pub fn from_write_error(error: &AppError) -> Self {
        match error {
            AppError::MalformedRecord { .. } => StageTermination::MalformedPage,
            _ => StageTermination::WriteFailed,
        }
    }
}

impl fmt::Display for StageTermination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageTermination::CursorExhausted => f.write_str("cursor exhausted"),
            StageTermination::EmptyPage => f.write_str("empty page"),
            StageTermination::FetchFailed => f.write_str("fetch failed"),
            StageTermination::MalformedPage => f.write_str("malformed page"),
            StageTermination::WriteFailed => f.write_str("write failed"),
            StageTermination::Aborted { reason } => write!(f, "aborted: {}", reason),
        }
    }
}

/// What one persisted page contributed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageOutcome {
    pub records: usize,
    pub written: usize,
    pub duplicates: usize,
    pub authors_upserted: usize,
    pub books: usize,
}

/// Result of crawling one resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageReport {
    pub resource: CatalogResource,
    pub pages: usize,
    pub records: usize,
    pub written: usize,
    pub duplicates: usize,
    pub authors_upserted: usize,
    pub books: usize,
    pub termination: StageTermination,
    /// Message of the error that ended the crawl early
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl StageReport {
    pub fn start(resource: CatalogResource) -> Self {
        let now = Utc::now();
        Self {
            resource,
            pages: 0,
            records: 0,
            written: 0,
            duplicates: 0,
            authors_upserted: 0,
            books: 0,
            termination: StageTermination::CursorExhausted,
            error: None,
            started_at: now,
            finished_at: now,
        }
    }

    pub fn absorb(&mut self, outcome: PageOutcome) {
        self.records += outcome.records;
        self.written += outcome.written;
        self.duplicates += outcome.duplicates;
        self.authors_upserted += outcome.authors_upserted;
        self.books += outcome.books;
    }

    pub fn finish(mut self, termination: StageTermination, error: Option<&AppError>) -> Self {
        self.termination = termination;
        self.error = error.map(ToString::to_string);
        self.finished_at = Utc::now();
        self
    }

    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds()
    }
}

/// Summary of a whole pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Every state the pipeline entered, starting with `Disconnected`
    pub transitions: Vec<PipelineState>,
    pub stages: Vec<StageReport>,
}

impl SyncReport {
    pub fn stage(&self, resource: CatalogResource) -> Option<&StageReport> {
        self.stages.iter().find(|stage| stage.resource == resource)
    }

    /// Books processed by the book/author stage
    pub fn total_books(&self) -> usize {
        self.stages.iter().map(|stage| stage.books).sum()
    }

    /// True when every stage ran and ended normally
    pub fn is_complete(&self) -> bool {
        self.stages.len() == CatalogResource::ALL.len()
            && self.stages.iter().all(|stage| stage.termination.is_complete())
    }

    pub fn summary_line(&self) -> String {
        let stages = self
            .stages
            .iter()
            .map(|stage| {
                format!(
                    "{}: {} pages, {} written, {} duplicates ({})",
                    stage.resource, stage.pages, stage.written, stage.duplicates, stage.termination
                )
            })
            .collect::<Vec<_>>()
            .join("; ");

        format!(
            "{} books processed in {}ms [{}]",
            self.total_books(),
            (self.finished_at - self.started_at).num_milliseconds(),
            stages
        )
    }
}
