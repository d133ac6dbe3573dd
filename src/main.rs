use anyhow::Context;
use catalog_sync_lib::shared::utils::init_logger;
use catalog_sync_lib::shared::SyncConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = SyncConfig::from_env().context("Failed to load configuration")?;
    let report = catalog_sync_lib::run(config)
        .await
        .context("Catalog sync could not start")?;

    if !report.is_complete() {
        catalog_sync_lib::log_warn!("Sync finished with partial stages; re-run to fill the gaps");
    }

    Ok(())
}
