//! HTTP serving shell for habitability predictions
//!
//! Exposes the prediction core over a small JSON API together with health
//! and Prometheus endpoints.

pub mod api;
pub mod config;

pub use api::{create_router, serve, AppState};
pub use config::ServerConfig;
