//! HTTP server command for the business/review API

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use bizrev_server::db::{migrations, MemoryStore, PgStore, RecordStore};
use bizrev_server::http::{run_server, ServerConfig};

use crate::config::DatabaseArgs;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Interface to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, short = 'p', env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds before a request is abandoned with 408
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Keep records in process memory instead of PostgreSQL
    #[arg(long, conflicts_with = "skip_migrations")]
    pub in_memory: bool,

    /// Do not create tables on startup
    #[arg(long)]
    pub skip_migrations: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,
}

impl ServeArgs {
    fn server_config(&self) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            cors_permissive: self.cors_permissive,
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

async fn open_store(args: &ServeArgs) -> Result<Arc<dyn RecordStore>> {
    if args.in_memory {
        tracing::warn!("Using in-memory store - records are lost on exit");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let pool = args.database.connect().await?;
    if args.skip_migrations {
        tracing::info!("Skipping migrations");
    } else {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }
    Ok(Arc::new(PgStore::new(pool)))
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = args.server_config();
    tracing::info!("Starting bizrev server on {}", config.bind_addr);

    let store = open_store(&args).await?;

    // Run server (blocks until shutdown)
    run_server(store, config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        serve: ServeArgs,
    }

    #[test]
    fn flags_map_onto_server_config() {
        let harness = Harness::parse_from([
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--request-timeout-secs",
            "5",
            "--cors-permissive",
        ]);
        let config = harness.serve.server_config();
        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.cors_permissive);
    }

    #[test]
    fn in_memory_rejects_skip_migrations() {
        let parsed = Harness::try_parse_from(["serve", "--in-memory", "--skip-migrations"]);
        assert!(parsed.is_err());
    }
}
