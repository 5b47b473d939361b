//! todo - REST API server for todo items
//!
//! Items live in PostgreSQL when `DB_HOST` is set. Without it the server
//! still starts, but every item request fails with a 500.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use todo_server::{run_server, select_store, DatabaseConfig, ServerConfig};

mod tracing_setup;

#[derive(Parser, Debug)]
#[command(name = "todo", author, version, about = "REST API server for todo items")]
struct Cli {
    /// Address to bind to
    #[arg(long, short = 'b', env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Directory of static assets served for unmatched paths
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(flatten)]
    db: DbArgs,
}

/// Database connection arguments
#[derive(clap::Args, Debug)]
struct DbArgs {
    /// Database host; when unset no database is used
    #[arg(long = "db-host", env = "DB_HOST")]
    host: Option<String>,

    /// Database port
    #[arg(long = "db-port", env = "DB_PORT")]
    port: Option<u16>,

    /// Database user
    #[arg(long = "db-user", env = "DB_USER")]
    user: Option<String>,

    /// Database password
    #[arg(long = "db-password", env = "DB_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database name
    #[arg(long = "db-name", env = "DB_NAME")]
    name: Option<String>,
}

impl From<DbArgs> for DatabaseConfig {
    fn from(args: DbArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            user: args.user,
            password: args.password,
            database: args.name,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Real environment wins over .env
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    let store = select_store(&DatabaseConfig::from(cli.db));
    let config = ServerConfig {
        bind_addr: cli.bind,
        static_dir: cli.static_dir,
    };

    // anyhow prints the error chain to stderr and exits nonzero
    run_server(store, config).await.context("server failed")
}
