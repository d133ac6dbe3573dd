pub mod modules;
pub mod shared;

use modules::catalog::{
    application::{CatalogSyncService, SyncOptions, SyncReport},
    infrastructure::{CatalogApiClient, InMemoryConnector, PostgresConnector},
    PageFetcher, StoreConnector,
};
use shared::errors::{AppError, AppResult};
use shared::{StoreBackend, SyncConfig};
use std::sync::Arc;

/// Wire the HTTP client and the configured store, then run one full sync.
pub async fn run(config: SyncConfig) -> AppResult<SyncReport> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(CatalogApiClient::new(config.http_timeout)?);
    let connector = build_connector(&config)?;

    log_info!(
        "Syncing catalog from {} into {:?} store",
        config.api_origin,
        config.store
    );

    let mut service = CatalogSyncService::new(fetcher, connector, SyncOptions::from(&config));
    service.run().await
}

fn build_connector(config: &SyncConfig) -> AppResult<Arc<dyn StoreConnector>> {
    match config.store {
        StoreBackend::Postgres => {
            let database_url = config.database_url.as_deref().ok_or_else(|| {
                AppError::ConfigError("DATABASE_URL is required for the postgres store".to_string())
            })?;
            Ok(Arc::new(PostgresConnector::new(database_url)))
        }
        StoreBackend::Memory => Ok(Arc::new(InMemoryConnector::new())),
    }
}
