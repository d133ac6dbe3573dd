use async_trait::async_trait;
use std::sync::Arc;

use crate::modules::catalog::domain::{Collection, StoredDocument};
use crate::shared::errors::AppResult;

/// Outcome of a bulk insert that skips natural-key collisions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertManyResult {
    pub inserted: usize,
    /// Keys that were not written because a document with that key already existed
    /// (in the store or earlier in the same batch)
    pub duplicate_keys: Vec<i64>,
}

/// Port for the document store holding the catalog collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert every document whose key is not taken yet
    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<StoredDocument>,
    ) -> AppResult<InsertManyResult>;

    /// Replace the document stored under `document.key`, creating it if absent
    async fn upsert(&self, collection: Collection, document: StoredDocument) -> AppResult<()>;

    async fn find_by_key(
        &self,
        collection: Collection,
        key: i64,
    ) -> AppResult<Option<serde_json::Value>>;

    async fn count(&self, collection: Collection) -> AppResult<u64>;

    /// Release the connection; further calls fail
    async fn disconnect(&self) -> AppResult<()>;
}

/// Opens a connection to a document store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self) -> AppResult<Arc<dyn DocumentStore>>;
}
