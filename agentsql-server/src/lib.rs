//! agentsql-server: webhook HTTP surface and SQL execution
//!
//! Owns the connection pool (built once at startup, injected through
//! [`AppState`]), the static and vector-search query executors, and the
//! axum router serving `POST /webhook` and `GET /health`.

pub mod db;
pub mod error;
pub mod query;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig};
pub use state::AppState;
