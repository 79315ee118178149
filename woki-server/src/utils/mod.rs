//! Utility Module — shared helpers and types
//!
//! - [`AppError`] / [`AppResult`] — HTTP-facing error type and alias
//! - [`logger`] — tracing setup
//! - [`time`] — business-timezone conversion

pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
