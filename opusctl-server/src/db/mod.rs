//! Database layer - connection pool and repositories
//!
//! # Design Principles
//!
//! - Connection pool passed explicitly - no global connection
//! - Joins and aggregates run as a single statement (one snapshot)
//! - Set updates on `notable_works` are single UPDATEs, never read-modify-write
//! - Rely on DB constraints, handle conflicts - no check-then-insert

pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options};
pub use repos::*;

/// Embedded SQL migrations (`/migrations` at the workspace root).
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../migrations");
