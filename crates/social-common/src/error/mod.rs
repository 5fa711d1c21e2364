//! Application error types

mod app_error;
mod field_error;

pub use app_error::{AppError, AppResult, ErrorResponse};
pub use field_error::FieldError;
