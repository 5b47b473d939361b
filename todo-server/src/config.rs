//! Server and database configuration
//!
//! The library never reads the process environment itself; the binary
//! parses `DB_*` variables and flags and hands these structs in.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default PostgreSQL port
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Database connection settings
#[derive(Debug, Clone, Default)]
pub struct DatabaseConfig {
    /// Database host. `None` (or empty) selects the stand-in store.
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub database: Option<String>,
}

impl DatabaseConfig {
    /// The configured host, treating an empty string as unset.
    pub fn host(&self) -> Option<&str> {
        self.host
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_DB_PORT)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Directory served for any path no route matches
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            static_dir: PathBuf::from("static"),
        }
    }
}
