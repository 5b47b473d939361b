//! Persistence layer - store trait and implementations
//!
//! - [`PostgresStore`]: real store over a shared `PgPool`
//! - [`NullStore`]: stand-in used when no database host is configured
//!
//! [`select_store`] picks one at startup; the result is shared by all
//! handlers for the life of the process.

mod null;
mod postgres;

#[cfg(test)]
pub(crate) mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::models::{TodoItem, UpdateItemRequest};

pub use null::NullStore;
pub use postgres::PostgresStore;

/// Storage for todo items.
///
/// All statements are parameterized. Update and remove do not report
/// whether a row matched.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Connect and ensure the `todo_items` table exists.
    async fn init(&self) -> Result<(), StoreError>;

    /// Release the connection pool. Safe to call without `init`.
    async fn teardown(&self) -> Result<(), StoreError>;

    async fn get_items(&self) -> Result<Vec<TodoItem>, StoreError>;

    /// `Ok(None)` when no row has this id.
    async fn get_item(&self, id: &str) -> Result<Option<TodoItem>, StoreError>;

    /// Insert without checking for an existing id.
    async fn store_item(&self, item: &TodoItem) -> Result<(), StoreError>;

    async fn update_item(&self, id: &str, update: &UpdateItemRequest) -> Result<(), StoreError>;

    async fn remove_item(&self, id: &str) -> Result<(), StoreError>;
}

/// Choose the store for this process.
///
/// A configured host yields a [`PostgresStore`]; otherwise a
/// [`NullStore`] whose data operations all fail.
pub fn select_store(config: &DatabaseConfig) -> Arc<dyn TodoStore> {
    match config.host() {
        Some(host) => {
            tracing::debug!(host, "database host configured; using Postgres store");
            Arc::new(PostgresStore::new(config))
        }
        None => {
            tracing::info!("DB_HOST not set; no database configured");
            Arc::new(NullStore)
        }
    }
}
