use crate::log_info;
use crate::modules::catalog::application::ports::{
    DocumentStore, InsertManyResult, StoreConnector,
};
use crate::modules::catalog::domain::{Collection, StoredDocument};
use crate::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Document store kept in process memory, used for dry runs and tests.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: DashMap<(Collection, i64), serde_json::Value>,
    disconnected: AtomicBool,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_connected(&self) -> bool {
        !self.disconnected.load(Ordering::SeqCst)
    }

    /// Keys stored in `collection`, ascending
    pub fn keys(&self, collection: Collection) -> Vec<i64> {
        let mut keys: Vec<i64> = self
            .documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .map(|entry| entry.key().1)
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Stored document, readable after disconnect
    pub fn document(&self, collection: Collection, key: i64) -> Option<serde_json::Value> {
        self.documents
            .get(&(collection, key))
            .map(|entry| entry.value().clone())
    }

    fn ensure_connected(&self) -> AppResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(AppError::DatabaseError("Store is disconnected".to_string()))
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<StoredDocument>,
    ) -> AppResult<InsertManyResult> {
        self.ensure_connected()?;

        let mut result = InsertManyResult::default();
        for document in documents {
            match self.documents.entry((collection, document.key)) {
                Entry::Occupied(_) => result.duplicate_keys.push(document.key),
                Entry::Vacant(slot) => {
                    slot.insert(document.body);
                    result.inserted += 1;
                }
            }
        }
        Ok(result)
    }

    async fn upsert(&self, collection: Collection, document: StoredDocument) -> AppResult<()> {
        self.ensure_connected()?;
        self.documents
            .insert((collection, document.key), document.body);
        Ok(())
    }

    async fn find_by_key(
        &self,
        collection: Collection,
        key: i64,
    ) -> AppResult<Option<serde_json::Value>> {
        self.ensure_connected()?;
        Ok(self
            .documents
            .get(&(collection, key))
            .map(|entry| entry.value().clone()))
    }

    async fn count(&self, collection: Collection) -> AppResult<u64> {
        self.ensure_connected()?;
        Ok(self
            .documents
            .iter()
            .filter(|entry| entry.key().0 == collection)
            .count() as u64)
    }

    async fn disconnect(&self) -> AppResult<()> {
        self.disconnected.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// Hands out one shared in-memory store; reconnecting reopens it with its data intact.
#[derive(Debug, Default)]
pub struct InMemoryConnector {
    store: Arc<InMemoryDocumentStore>,
    connections: AtomicUsize,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> Arc<InMemoryDocumentStore> {
        Arc::clone(&self.store)
    }

    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnector for InMemoryConnector {
    async fn connect(&self) -> AppResult<Arc<dyn DocumentStore>> {
        self.store.disconnected.store(false, Ordering::SeqCst);
        let connections = self.connections.fetch_add(1, Ordering::SeqCst) + 1;
        log_info!("Connected to in-memory document store (connection #{})", connections);
        Ok(self.store.clone())
    }
}
