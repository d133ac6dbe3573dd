/// Test doubles and service builders for pipeline tests
use super::fixtures::{last_page, start_url, ORIGIN, PAGE_SIZE};
use async_trait::async_trait;
use catalog_sync_lib::modules::catalog::{
    application::{
        ports::{DocumentStore, InsertManyResult, PageFetcher, StoreConnector},
        CatalogSyncService, SyncOptions,
    },
    domain::{Collection, StoredDocument},
    infrastructure::{BackoffPolicy, CatalogResource, InMemoryConnector, InMemoryDocumentStore},
};
use catalog_sync_lib::shared::errors::{AppError, AppResult};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

pub const RETRY_ATTEMPTS: u32 = 2;

/// Serves canned responses per URL and records every request
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, Value>,
    failures: HashMap<String, AppError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    /// Every resource answers with a single empty last page
    pub fn empty_catalog() -> Self {
        let mut fetcher = Self::default();
        for resource in CatalogResource::ALL {
            fetcher = fetcher.page(&start_url(resource), last_page(vec![]));
        }
        fetcher
    }

    pub fn page(mut self, url: &str, body: Value) -> Self {
        self.pages.insert(url.to_string(), body);
        self
    }

    /// Every request to `url` fails with `error`
    pub fn failing(mut self, url: &str, error: AppError) -> Self {
        self.failures.insert(url.to_string(), error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|call| call.as_str() == url).count()
    }

    /// Requests whose URL contains `fragment`
    pub fn calls_matching(&self, fragment: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.contains(fragment))
            .count()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch_json(&self, url: &str) -> AppResult<Value> {
        self.calls.lock().unwrap().push(url.to_string());

        if let Some(error) = self.failures.get(url) {
            return Err(error.clone());
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| AppError::ApiError(format!("GET {} returned 404 Not Found", url)))
    }
}

/// In-memory store whose writes to one collection always fail
pub struct FailingStore {
    inner: Arc<InMemoryDocumentStore>,
    fail_on: Collection,
}

impl FailingStore {
    pub fn new(fail_on: Collection) -> Self {
        Self {
            inner: Arc::new(InMemoryDocumentStore::new()),
            fail_on,
        }
    }

    pub fn inner(&self) -> Arc<InMemoryDocumentStore> {
        Arc::clone(&self.inner)
    }

    fn check(&self, collection: Collection) -> AppResult<()> {
        if collection == self.fail_on {
            Err(AppError::DatabaseError(format!(
                "relation \"{}\" is read-only",
                collection
            )))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<StoredDocument>,
    ) -> AppResult<InsertManyResult> {
        self.check(collection)?;
        self.inner.insert_many(collection, documents).await
    }

    async fn upsert(&self, collection: Collection, document: StoredDocument) -> AppResult<()> {
        self.check(collection)?;
        self.inner.upsert(collection, document).await
    }

    async fn find_by_key(&self, collection: Collection, key: i64) -> AppResult<Option<Value>> {
        self.inner.find_by_key(collection, key).await
    }

    async fn count(&self, collection: Collection) -> AppResult<u64> {
        self.inner.count(collection).await
    }

    async fn disconnect(&self) -> AppResult<()> {
        self.inner.disconnect().await
    }
}

/// In-memory store that panics on its first insert
pub struct PanickingStore {
    inner: Arc<InMemoryDocumentStore>,
}

impl PanickingStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(InMemoryDocumentStore::new()),
        }
    }

    pub fn inner(&self) -> Arc<InMemoryDocumentStore> {
        Arc::clone(&self.inner)
    }
}

#[async_trait]
impl DocumentStore for PanickingStore {
    async fn insert_many(
        &self,
        collection: Collection,
        _documents: Vec<StoredDocument>,
    ) -> AppResult<InsertManyResult> {
        panic!("driver crashed while writing {}", collection);
    }

    async fn upsert(&self, collection: Collection, document: StoredDocument) -> AppResult<()> {
        self.inner.upsert(collection, document).await
    }

    async fn find_by_key(&self, collection: Collection, key: i64) -> AppResult<Option<Value>> {
        self.inner.find_by_key(collection, key).await
    }

    async fn count(&self, collection: Collection) -> AppResult<u64> {
        self.inner.count(collection).await
    }

    async fn disconnect(&self) -> AppResult<()> {
        self.inner.disconnect().await
    }
}

/// In-memory store whose upserts all wait on one barrier before writing
///
/// A page's upserts only get past the barrier when `parties` of them are in
/// flight at once, so sequential writes hang instead of passing.
pub struct BarrierStore {
    inner: Arc<InMemoryDocumentStore>,
    barrier: Barrier,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl BarrierStore {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: Arc::new(InMemoryDocumentStore::new()),
            barrier: Barrier::new(parties),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
        }
    }

    pub fn inner(&self) -> Arc<InMemoryDocumentStore> {
        Arc::clone(&self.inner)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for BarrierStore {
    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<StoredDocument>,
    ) -> AppResult<InsertManyResult> {
        self.inner.insert_many(collection, documents).await
    }

    async fn upsert(&self, collection: Collection, document: StoredDocument) -> AppResult<()> {
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        self.barrier.wait().await;
        let result = self.inner.upsert(collection, document).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
        result
    }

    async fn find_by_key(&self, collection: Collection, key: i64) -> AppResult<Option<Value>> {
        self.inner.find_by_key(collection, key).await
    }

    async fn count(&self, collection: Collection) -> AppResult<u64> {
        self.inner.count(collection).await
    }

    async fn disconnect(&self) -> AppResult<()> {
        self.inner.disconnect().await
    }
}

/// Scripted fetcher that notes how many upserts had completed at each request
pub struct UpsertWatchingFetcher {
    inner: ScriptedFetcher,
    store: Arc<BarrierStore>,
    seen: Mutex<Vec<(String, usize)>>,
}

impl UpsertWatchingFetcher {
    pub fn new(inner: ScriptedFetcher, store: Arc<BarrierStore>) -> Self {
        Self {
            inner,
            store,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Completed upserts when `url` was first requested
    pub fn completed_at(&self, url: &str) -> Option<usize> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .find(|(seen_url, _)| seen_url == url)
            .map(|(_, completed)| *completed)
    }
}

#[async_trait]
impl PageFetcher for UpsertWatchingFetcher {
    async fn fetch_json(&self, url: &str) -> AppResult<Value> {
        self.seen
            .lock()
            .unwrap()
            .push((url.to_string(), self.store.completed()));
        self.inner.fetch_json(url).await
    }
}

/// Hands out the same store on every connect
pub struct SharedConnector {
    store: Arc<dyn DocumentStore>,
}

impl SharedConnector {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StoreConnector for SharedConnector {
    async fn connect(&self) -> AppResult<Arc<dyn DocumentStore>> {
        Ok(Arc::clone(&self.store))
    }
}

pub fn test_options(max_pages: usize) -> SyncOptions {
    SyncOptions {
        api_origin: ORIGIN.to_string(),
        page_size: PAGE_SIZE,
        max_pages,
        backoff: BackoffPolicy::new(RETRY_ATTEMPTS, Duration::from_millis(1)),
    }
}

/// Service over an in-memory store; the connector is returned for inspection
pub fn build_memory_service(
    fetcher: Arc<ScriptedFetcher>,
) -> (CatalogSyncService, Arc<InMemoryConnector>) {
    let connector = Arc::new(InMemoryConnector::new());
    let service = CatalogSyncService::new(fetcher, connector.clone(), test_options(50));
    (service, connector)
}
