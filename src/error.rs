//! Error types for the settings store.

use thiserror::Error;

/// Errors surfaced by the settings store.
///
/// Read handlers mask these behind default values; write handlers map
/// `NotConfigured` to 503 and everything else to 500.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No `DATABASE_URL` was provided at startup.
    #[error("Database not configured")]
    NotConfigured,

    /// Query or connection failure from the pool.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
