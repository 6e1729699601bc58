mod app_error;

pub use app_error::{AppError, is_foreign_key_violation, is_unique_violation};

pub type Result<T> = std::result::Result<T, AppError>;
