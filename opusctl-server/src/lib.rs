//! opusctl-server: HTTP API for composers and their works
//!
//! Layers:
//! - `models`: request schemas validated into domain values
//! - `db`: PostgreSQL pool, migrations and repositories
//! - `http`: axum router, extractors and JSON errors

pub mod db;
pub mod http;
pub mod models;

pub use db::{create_pool, create_pool_with_options, DbError, MIGRATOR};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig, ServerError};
