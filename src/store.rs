//! Postgres-backed settings store.
//!
//! Owns the `site_settings` key-value table: creates it on demand, seeds the
//! default rows once, and performs all reads and writes. Constructed once in
//! `main` and handed to the handlers through shared state; no module-level
//! pool singleton.
//!
//! Connections come from a lazy `sqlx::PgPool`, so startup never fails on an
//! unreachable database. Without a `DATABASE_URL` every method returns
//! [`StoreError::NotConfigured`] and callers fall back to defaults.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, QueryBuilder, Row};

use crate::config::Config;
use crate::error::StoreError;
use crate::settings;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS site_settings (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)";

/// Settings store over an optional connection pool.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    pool: Option<PgPool>,
}

impl SettingsStore {
    /// Build a store from configuration. Pool connections are established
    /// lazily; a missing `DATABASE_URL` yields a disconnected store rather
    /// than an error.
    pub fn connect(config: &Config) -> Result<Self, StoreError> {
        let Some(url) = &config.database_url else {
            return Ok(Self::disconnected());
        };

        let mut options = PgConnectOptions::from_str(url)?;
        if config.production {
            // Managed Postgres hosts terminate TLS with self-signed chains;
            // require encryption without verifying the certificate.
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy_with(options);

        Ok(Self { pool: Some(pool) })
    }

    /// A store with no database behind it (defaults-only mode).
    pub fn disconnected() -> Self {
        Self { pool: None }
    }

    /// Whether a database is configured.
    pub fn is_configured(&self) -> bool {
        self.pool.is_some()
    }

    fn pool(&self) -> Result<&PgPool, StoreError> {
        self.pool.as_ref().ok_or(StoreError::NotConfigured)
    }

    /// Create the table if absent and seed the default rows.
    ///
    /// Seeding triggers on the absence of the `whatsapp_number` sentinel row,
    /// not on table emptiness: deleting only that row re-seeds every key on
    /// the next request. Idempotent, safe to run per request.
    pub async fn ensure_table(&self) -> Result<(), StoreError> {
        let pool = self.pool()?;

        sqlx::query(CREATE_TABLE_SQL).execute(pool).await?;

        let sentinel: Option<String> =
            sqlx::query_scalar("SELECT value FROM site_settings WHERE key = $1")
                .bind(settings::WHATSAPP_NUMBER_KEY)
                .fetch_optional(pool)
                .await?;

        if sentinel.is_none() {
            let mut insert = QueryBuilder::new("INSERT INTO site_settings (key, value) ");
            insert.push_values(settings::default_rows(), |mut row, (key, value)| {
                row.push_bind(key).push_bind(value);
            });
            insert.push(" ON CONFLICT (key) DO NOTHING");
            insert.build().execute(pool).await?;
        }

        Ok(())
    }

    /// Read every row as a key → value map.
    pub async fn read_all(&self) -> Result<HashMap<String, String>, StoreError> {
        let rows = sqlx::query("SELECT key, value FROM site_settings")
            .fetch_all(self.pool()?)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("key"), row.get("value")))
            .collect())
    }

    /// Insert a row or overwrite the existing value for that key.
    pub async fn upsert(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO site_settings (key, value) VALUES ($1, $2)
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(key)
        .bind(value)
        .execute(self.pool()?)
        .await?;

        Ok(())
    }

    /// Round-trip a trivial query, acquiring and releasing one connection.
    pub async fn ping(&self) -> Result<i32, StoreError> {
        let ok: i32 = sqlx::query_scalar("SELECT 1 AS ok")
            .fetch_one(self.pool()?)
            .await?;
        Ok(ok)
    }

    /// List public base table names, ordered. Handy for checking the schema
    /// from a browser.
    pub async fn list_tables(&self) -> Result<Vec<String>, StoreError> {
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT table_name::text FROM information_schema.tables
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE'
             ORDER BY table_name",
        )
        .fetch_all(self.pool()?)
        .await?;
        Ok(names)
    }
}
