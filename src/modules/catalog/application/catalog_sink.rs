use futures::future::join_all;
use std::sync::Arc;

use crate::modules::catalog::application::ports::DocumentStore;
use crate::modules::catalog::domain::{AuthorAggregates, CatalogDocument, Collection, Genre, Tag};
use crate::shared::errors::AppResult;
use crate::{log_debug, log_warn};

/// Counts for one page written with insert-ignore semantics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertSummary {
    pub written: usize,
    pub duplicates: usize,
}

/// Writes mapped pages into the catalog collections.
///
/// Genres and tags are insert-only: a natural-key collision keeps the stored
/// document and is reported as a duplicate, not an error. Authors are upserted
/// so the latest page wins.
pub struct CatalogSink {
    store: Arc<dyn DocumentStore>,
}

impl CatalogSink {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn insert_genres(&self, genres: &[Genre]) -> AppResult<InsertSummary> {
        self.insert_ignoring_duplicates(genres).await
    }

    pub async fn insert_tags(&self, tags: &[Tag]) -> AppResult<InsertSummary> {
        self.insert_ignoring_duplicates(tags).await
    }

    /// Upsert every author of the page concurrently.
    ///
    /// All writes are awaited; the first failure (in page order) is returned.
    pub async fn upsert_authors(&self, aggregates: &AuthorAggregates) -> AppResult<usize> {
        let documents = aggregates
            .iter()
            .map(|author| author.to_stored())
            .collect::<AppResult<Vec<_>>>()?;

        let writes = documents.into_iter().map(|document| {
            let store = Arc::clone(&self.store);
            async move {
                let key = document.key;
                store
                    .upsert(Collection::Authors, document)
                    .await
                    .map_err(|e| {
                        log_warn!("Sync: upsert of author {} failed: {}", key, e);
                        e
                    })
            }
        });

        let results = join_all(writes).await;
        let written = results.len();
        results.into_iter().collect::<AppResult<Vec<()>>>()?;

        Ok(written)
    }

    async fn insert_ignoring_duplicates<D>(&self, records: &[D]) -> AppResult<InsertSummary>
    where
        D: CatalogDocument + Sync,
    {
        if records.is_empty() {
            return Ok(InsertSummary::default());
        }

        let documents = records
            .iter()
            .map(CatalogDocument::to_stored)
            .collect::<AppResult<Vec<_>>>()?;

        let result = self.store.insert_many(D::COLLECTION, documents).await?;

        if !result.duplicate_keys.is_empty() {
            log_debug!(
                "Sync: skipped {} existing {} keys: {:?}",
                result.duplicate_keys.len(),
                D::COLLECTION,
                result.duplicate_keys
            );
        }

        Ok(InsertSummary {
            written: result.inserted,
            duplicates: result.duplicate_keys.len(),
        })
    }
}
