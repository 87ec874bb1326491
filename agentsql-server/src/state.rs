//! Application state shared across handlers

use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state.
///
/// Holds the one connection pool for the process; cloning is cheap and every
/// clone refers to the same pool.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pool }),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }
}
