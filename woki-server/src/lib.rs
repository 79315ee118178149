//! Woki Server — seat allocation and booking engine for restaurants
//!
//! Given a party size, a duration and a date, the engine finds free gaps on
//! each table of a sector, enumerates single-table and joined-table seatings
//! on a 15-minute grid, ranks them deterministically and confirms the best
//! one exactly once, even under concurrent or replayed requests.

pub mod allocation;
pub mod api;
pub mod core;
pub mod db;
pub mod domain;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState, StorageKind, router};
pub use crate::utils::logger::{init_logger, init_logger_with_file};
pub use crate::utils::{AppError, AppResult};
