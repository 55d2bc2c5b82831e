//! bizrev-server: REST API for businesses and their reviews
//!
//! Layers, leaf first:
//! - [`db`]: schema-driven record store (PostgreSQL or in-memory)
//! - [`models`]: entities, payloads and validation
//! - [`crud`]: one generic resource handler for every entity
//! - [`http`]: axum routes, extractors and error mapping

pub mod crud;
pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use crud::{Crud, CrudError};
pub use http::{build_router, run_server, ApiError, ServerConfig, ServerError};
pub use state::AppState;
