//! Command implementations for opusctl CLI

use anyhow::{Context, Result};
use clap::Args;

pub mod migrate;
pub mod serve;

pub use migrate::run_migrate;
pub use serve::run_serve;

/// Database connection flags shared by every command that touches storage
#[derive(Args, Debug)]
pub struct DatabaseArgs {
    /// Database URL (overrides ./.env and ~/.opusctl/.env)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

impl DatabaseArgs {
    pub fn require_url(&self) -> Result<&str> {
        self.database_url.as_deref().context(
            "DATABASE_URL not set. Set via --database-url, DATABASE_URL env, or ~/.opusctl/.env",
        )
    }
}
