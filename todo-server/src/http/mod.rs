//! HTTP server layer
//!
//! Axum server with:
//! - Request tracing
//! - Static file fallback
//! - Store teardown on SIGINT/SIGTERM/SIGUSR2
//! - JSON error responses

pub mod error;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, serve_until, AppState, ServerError};
