//! HTTP API for the Space membership registry
//!
//! Exposes the registry over JSON with axum, plus health and Prometheus
//! endpoints for operators.

pub mod api;
pub mod error;
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

pub use api::build_router;
pub use error::{ApiError, ApiResult};
pub use server::{start_server, ApiServer};
pub use state::AppState;
