//! swrkv command-line entry point.
//!
//! Inspects and maintains a SQLite-backed cache file. Results go to stdout as JSON;
//! logging goes to stderr.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use swrkv_core::config::CONFIG_FILE_ENV;
use swrkv_core::{AppConfig, CacheDb};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::Context;

#[derive(Debug, Parser)]
#[command(name = "swrkv", version, about = "Inspect and maintain a stale-while-revalidate cache database")]
pub struct Cli {
    /// TOML config file. Defaults to $SWRKV_CONFIG_FILE.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SQLite database path, overriding the configured one.
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Namespace to operate on, overriding the configured one.
    #[arg(long, global = true)]
    namespace: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show a stored record and whether it is still fresh.
    Inspect {
        id: String,
        /// Treat the id as an integer identifier.
        #[arg(long)]
        numeric: bool,
    },
    /// Drop one record, or every record in the namespace when no id is given.
    Revalidate {
        id: Option<String>,
        /// Treat the id as an integer identifier.
        #[arg(long, requires = "id")]
        numeric: bool,
    },
    /// Delete stale and malformed records.
    Purge,
    /// Show the record count and keys in the namespace.
    Stats,
}

impl Cli {
    /// Load configuration and apply command-line overrides.
    fn config(&self) -> Result<AppConfig> {
        let config_file = self
            .config
            .clone()
            .or_else(|| std::env::var_os(CONFIG_FILE_ENV).map(PathBuf::from));
        let mut config = AppConfig::load_with_file(config_file.as_deref()).context("failed to load configuration")?;

        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(namespace) = &self.namespace {
            config.namespace = namespace.clone();
        }
        config.validate().context("invalid command-line overrides")?;

        Ok(config)
    }
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = cli.config()?;
    tracing::debug!(db_path = %config.db_path.display(), namespace = %config.namespace, "opening cache database");

    let db = CacheDb::from_config(&config)
        .await
        .with_context(|| format!("failed to open cache database at {}", config.db_path.display()))?;
    let ctx = Context::new(db.clone(), config.namespace);

    let output = commands::execute(&ctx, &cli.command).await?;
    println!("{output}");

    db.close().await.context("failed to close cache database")?;

    Ok(())
}
