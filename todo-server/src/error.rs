//! Persistence error types

/// Errors raised by a [`TodoStore`](crate::persistence::TodoStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Could not open a connection to the database during startup.
    #[error("failed to connect to database: {0}")]
    Connection(#[source] sqlx::Error),

    /// Could not create the `todo_items` table during startup.
    #[error("failed to initialize schema: {0}")]
    Schema(#[source] sqlx::Error),

    /// A statement failed while serving a request.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// The stand-in store was asked to touch data.
    #[error("no database configured; cannot {operation}")]
    NotConfigured { operation: &'static str },
}
