pub mod app_error;

pub use app_error::{AbortReason, AppError, AppResult};
