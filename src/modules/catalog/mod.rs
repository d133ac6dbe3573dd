/// Catalog sync module
///
/// Mirrors the public catalog API (genres, tags, books) into the document store.
///
/// Architecture:
/// - Domain: Catalog entities and the per-page author reconciler
/// - Application: Ports, persistence sink and the sync pipeline
/// - Infrastructure: HTTP client, paginator, mappers and store adapters
pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::ports::{DocumentStore, PageFetcher, StoreConnector};
pub use application::{CatalogSyncService, StageTermination, SyncOptions, SyncReport};
pub use domain::{Author, Book, Collection, Genre, Tag};
