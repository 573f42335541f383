//! Apply the embedded migrations and exit

use anyhow::{Context, Result};
use clap::Parser;

use opusctl_server::db::{create_pool_with_options, MIGRATOR};

use super::DatabaseArgs;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(flatten)]
    pub database: DatabaseArgs,
}

pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let database_url = args.database.require_url()?;

    let pool = create_pool_with_options(database_url, 1)
        .await
        .context("Failed to connect to database")?;

    MIGRATOR
        .run(&pool)
        .await
        .context("Failed to apply migrations")?;

    let applied = MIGRATOR.iter().count();
    tracing::info!(migrations = applied, "database schema is up to date");
    pool.close().await;

    Ok(())
}
