/// Postgres-backed document store
///
/// Every collection is a table of `(id BIGINT PRIMARY KEY, document JSONB)`.
/// Diesel is synchronous, so each call runs on the blocking pool.
use super::models::{CountResult, DocumentRow, InsertedKey};
use crate::log_info;
use crate::modules::catalog::application::ports::{
    DocumentStore, InsertManyResult, StoreConnector,
};
use crate::modules::catalog::domain::{Collection, StoredDocument};
use crate::shared::database::Database;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_types::{Array, BigInt, Jsonb};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::task;

pub struct PostgresDocumentStore {
    // None once disconnected; dropping the last handle closes the pool
    db: Mutex<Option<Arc<Database>>>,
}

impl PostgresDocumentStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db: Mutex::new(Some(db)),
        }
    }

    fn database(&self) -> AppResult<Arc<Database>> {
        let guard = self
            .db
            .lock()
            .map_err(|_| AppError::InternalError("Store handle lock poisoned".to_string()))?;

        guard
            .as_ref()
            .map(Arc::clone)
            .ok_or_else(|| AppError::DatabaseError("Store is disconnected".to_string()))
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    async fn insert_many(
        &self,
        collection: Collection,
        documents: Vec<StoredDocument>,
    ) -> AppResult<InsertManyResult> {
        if documents.is_empty() {
            return Ok(InsertManyResult::default());
        }

        let db = self.database()?;
        let start = std::time::Instant::now();

        let (keys, bodies): (Vec<i64>, Vec<serde_json::Value>) = documents
            .into_iter()
            .map(|document| (document.key, document.body))
            .unzip();

        let result = task::spawn_blocking(move || -> AppResult<InsertManyResult> {
            let mut conn = db.get_connection()?;

            // ON CONFLICT DO NOTHING also skips repeats within the same batch
            let inserted: Vec<InsertedKey> = diesel::sql_query(format!(
                "INSERT INTO {} (id, document)
                 SELECT * FROM UNNEST($1::bigint[], $2::jsonb[])
                 ON CONFLICT (id) DO NOTHING
                 RETURNING id",
                collection.name()
            ))
            .bind::<Array<BigInt>, _>(keys.clone())
            .bind::<Array<Jsonb>, _>(bodies)
            .load(&mut conn)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to insert into {}: {}", collection, e))
            })?;

            let inserted_keys: Vec<i64> = inserted.into_iter().map(|row| row.id).collect();
            Ok(InsertManyResult {
                inserted: inserted_keys.len(),
                duplicate_keys: duplicate_keys(&keys, &inserted_keys),
            })
        })
        .await??;

        LogContext::db_operation(
            "insert_many",
            collection.name(),
            Some(start.elapsed().as_millis() as u64),
        );
        Ok(result)
    }

    async fn upsert(&self, collection: Collection, document: StoredDocument) -> AppResult<()> {
        let db = self.database()?;

        task::spawn_blocking(move || -> AppResult<()> {
            let mut conn = db.get_connection()?;

            diesel::sql_query(format!(
                "INSERT INTO {} (id, document) VALUES ($1, $2)
                 ON CONFLICT (id) DO UPDATE
                 SET document = EXCLUDED.document, updated_at = NOW()",
                collection.name()
            ))
            .bind::<BigInt, _>(document.key)
            .bind::<Jsonb, _>(document.body)
            .execute(&mut conn)
            .map_err(|e| {
                AppError::DatabaseError(format!(
                    "Failed to upsert {} {}: {}",
                    collection, document.key, e
                ))
            })?;

            Ok(())
        })
        .await?
    }

    async fn find_by_key(
        &self,
        collection: Collection,
        key: i64,
    ) -> AppResult<Option<serde_json::Value>> {
        let db = self.database()?;

        task::spawn_blocking(move || -> AppResult<Option<serde_json::Value>> {
            let mut conn = db.get_connection()?;

            let row: Option<DocumentRow> = diesel::sql_query(format!(
                "SELECT document FROM {} WHERE id = $1",
                collection.name()
            ))
            .bind::<BigInt, _>(key)
            .get_result(&mut conn)
            .optional()?;

            Ok(row.map(|row| row.document))
        })
        .await?
    }

    async fn count(&self, collection: Collection) -> AppResult<u64> {
        let db = self.database()?;

        task::spawn_blocking(move || -> AppResult<u64> {
            let mut conn = db.get_connection()?;

            let result: CountResult = diesel::sql_query(format!(
                "SELECT COUNT(*) AS count FROM {}",
                collection.name()
            ))
            .get_result(&mut conn)?;

            Ok(result.count.max(0) as u64)
        })
        .await?
    }

    async fn disconnect(&self) -> AppResult<()> {
        let released = self
            .db
            .lock()
            .map_err(|_| AppError::InternalError("Store handle lock poisoned".to_string()))?
            .take();

        if released.is_some() {
            log_info!("Disconnected from Postgres document store");
        }
        Ok(())
    }
}

/// Keys of `attempted` that were not inserted, counting repeats within the batch
fn duplicate_keys(attempted: &[i64], inserted: &[i64]) -> Vec<i64> {
    let mut remaining: HashMap<i64, usize> = HashMap::new();
    for key in inserted {
        *remaining.entry(*key).or_default() += 1;
    }

    attempted
        .iter()
        .filter(|key| match remaining.get_mut(key) {
            Some(count) if *count > 0 => {
                *count -= 1;
                false
            }
            _ => true,
        })
        .copied()
        .collect()
}

/// Connects by building the pool and applying the bootstrap migration
pub struct PostgresConnector {
    database_url: String,
}

impl PostgresConnector {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

#[async_trait]
impl StoreConnector for PostgresConnector {
    async fn connect(&self) -> AppResult<Arc<dyn DocumentStore>> {
        let database_url = self.database_url.clone();

        let db = task::spawn_blocking(move || -> AppResult<Database> {
            let db = Database::connect(&database_url)?;
            db.run_migrations()?;
            Ok(db)
        })
        .await??;

        Ok(Arc::new(PostgresDocumentStore::new(Arc::new(db))))
    }
}
