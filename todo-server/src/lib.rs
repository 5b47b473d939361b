//! todo-server: HTTP API for todo items
//!
//! Exposes list/create/update/delete over HTTP and keeps the items in
//! PostgreSQL when a database host is configured.

pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod persistence;

pub use config::{DatabaseConfig, ServerConfig};
pub use error::StoreError;
pub use http::{build_router, run_server, ServerError};
pub use models::TodoItem;
pub use persistence::{select_store, NullStore, PostgresStore, TodoStore};
