//! Backend for the Terapias Complementarias brochure site.
//!
//! A small HTTP service that persists site configuration (the floating
//! WhatsApp button and four social-media links) as key/value rows in a
//! Postgres `site_settings` table, and serves the built frontend bundle
//! with an SPA fallback. When `DATABASE_URL` is absent the service still
//! starts and serves hardcoded defaults in a read-only degraded mode.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Store error types
//! - [`settings`]: Defaults, snapshot shape, and patch normalization
//! - [`store`]: Postgres-backed settings store
//! - [`api`]: HTTP routes and handlers
//! - [`utils`]: Utility functions

pub mod api;
pub mod config;
pub mod error;
pub mod settings;
pub mod store;
pub mod utils;

pub use config::Config;
pub use error::StoreError;
