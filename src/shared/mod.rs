// Shared kernel: concerns used by every module

pub mod config; // Environment-driven run settings
pub mod database; // Postgres pool + embedded migrations
pub mod domain; // Shared value objects
pub mod errors; // Shared error types
pub mod utils; // Logging helpers

pub use config::{StoreBackend, SyncConfig};
pub use database::Database;
