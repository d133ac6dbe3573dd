pub mod catalog_sink;
pub mod ports;
pub mod sync_report;
pub mod sync_service;

pub use catalog_sink::{CatalogSink, InsertSummary};
pub use sync_report::{PageOutcome, PipelineState, StageReport, StageTermination, SyncReport};
pub use sync_service::{CatalogSyncService, SyncOptions};
