//! Core Module — configuration, shared state and server lifecycle

pub mod config;
pub mod server;
pub mod state;

pub use config::{Config, StorageKind};
pub use server::{Server, router};
pub use state::ServerState;
