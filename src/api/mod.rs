//! HTTP API module: settings, health, and diagnostic endpoints plus the
//! static SPA fallback.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
