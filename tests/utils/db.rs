/// Database test utilities with singleton pattern
///
/// Provides serialized access to the test database named by TEST_DATABASE_URL
use catalog_sync_lib::modules::catalog::domain::Collection;
use catalog_sync_lib::shared::database::Database;
use diesel::RunQueryDsl;
use std::sync::{Arc, Mutex, OnceLock};

static DATABASE: OnceLock<Arc<Database>> = OnceLock::new();

/// Get or create the shared test database, with the catalog tables migrated
pub fn get_test_database() -> Arc<Database> {
    DATABASE
        .get_or_init(|| {
            dotenvy::dotenv().ok();
            let test_db_url = std::env::var("TEST_DATABASE_URL")
                .expect("TEST_DATABASE_URL must be set in .env for tests");

            let db = Database::connect(&test_db_url).expect("Failed to connect to test database");
            db.run_migrations()
                .expect("Failed to run migrations on test database");
            Arc::new(db)
        })
        .clone()
}

/// Clean all catalog tables - use at the start of each test
pub fn clean_test_db() {
    let db = get_test_database();
    let mut conn = db.get_connection().expect("Failed to get DB connection");

    let tables = Collection::ALL
        .iter()
        .map(Collection::name)
        .collect::<Vec<_>>()
        .join(", ");
    diesel::sql_query(format!("TRUNCATE TABLE {}", tables))
        .execute(&mut conn)
        .expect("Failed to clean catalog tables");
}

/// Global test mutex for serialization
static TEST_LOCK: Mutex<()> = Mutex::new(());

/// Acquire test lock to ensure tests run serially
/// Returns a guard that releases the lock when dropped
pub fn acquire_test_lock() -> std::sync::MutexGuard<'static, ()> {
    // Handle poisoned mutex by recovering from panic
    match TEST_LOCK.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
