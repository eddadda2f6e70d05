//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Postgres connection string. Absent means the service runs in
    /// defaults-only mode: reads serve hardcoded values, writes return 503.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Production mode. Relaxes TLS certificate validation on the database
    /// connection (managed hosts commonly present self-signed chains).
    #[serde(default)]
    pub production: bool,

    /// HTTP listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built frontend bundle.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "dist".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err("DATABASE_URL must be a postgres:// connection string".to_string());
            }
        }

        if self.static_dir.is_empty() {
            return Err("STATIC_DIR must not be empty".to_string());
        }

        Ok(())
    }

    /// Check if a database connection string is present.
    pub fn database_configured(&self) -> bool {
        self.database_url.is_some()
    }
}
