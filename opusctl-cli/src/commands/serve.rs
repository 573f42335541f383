//! HTTP server command
//!
//! Applies pending migrations, then runs the composers & works API.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;

use opusctl_server::db::{create_pool_with_options, pool::DEFAULT_MAX_CONNECTIONS, MIGRATOR};
use opusctl_server::http::{run_server, ServerConfig};

use super::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', default_value = "127.0.0.1:3030")]
    pub bind: SocketAddr,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Maximum database connections in the pool
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Skip applying migrations at start-up
    #[arg(long)]
    pub no_migrate: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let database_url = args.database.require_url()?;

    tracing::info!("Starting opusctl server on {}", args.bind);

    let pool = create_pool_with_options(database_url, args.max_connections)
        .await
        .context("Failed to create database pool")?;

    if !args.no_migrate {
        MIGRATOR
            .run(&pool)
            .await
            .context("Failed to apply migrations")?;
    }

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
    };

    // Blocks until shutdown
    run_server(pool, config).await.context("Server error")?;

    Ok(())
}
