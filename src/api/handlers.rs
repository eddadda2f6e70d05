//! HTTP API handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use tracing::{error, warn};

use crate::error::StoreError;
use crate::settings::{SettingsPatch, SettingsSnapshot};
use crate::store::SettingsStore;

/// Application state shared with handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Settings store, injected once at startup.
    pub store: Arc<SettingsStore>,
}

impl AppState {
    /// Create new app state around a store.
    pub fn new(store: SettingsStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Database state: "connected" or "not_configured".
    pub database: &'static str,
    /// Round-trip value when connected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping: Option<i32>,
}

/// Health check failure response.
#[derive(Debug, Serialize)]
pub struct HealthErrorResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub message: String,
}

/// Generic error payload for write and diagnostic endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Health handler: pings the database when one is configured. A missing
/// database is not an error state here, only on write paths.
pub async fn health(State(state): State<AppState>) -> Response {
    if !state.store.is_configured() {
        return Json(HealthResponse {
            status: "ok",
            database: "not_configured",
            ping: None,
        })
        .into_response();
    }

    match state.store.ping().await {
        Ok(ping) => Json(HealthResponse {
            status: "ok",
            database: "connected",
            ping: Some(ping),
        })
        .into_response(),
        Err(err) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthErrorResponse {
                status: "error",
                database: "error",
                message: err.to_string(),
            }),
        )
            .into_response(),
    }
}

/// `GET /api/settings`: never fails observably. Any store failure is masked
/// behind the default snapshot so a broken database cannot break the page.
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsSnapshot> {
    let snapshot = match refreshed_snapshot(&state.store).await {
        Ok(snapshot) => snapshot,
        Err(StoreError::NotConfigured) => SettingsSnapshot::defaults(),
        Err(err) => {
            warn!("settings read failed, serving defaults: {err}");
            SettingsSnapshot::defaults()
        }
    };
    Json(snapshot)
}

/// `PATCH /api/settings`: applies the normalized updates, then returns the
/// refreshed snapshot. Unlike reads, failures are surfaced: 503 without a
/// database, 500 on anything else.
pub async fn patch_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Response {
    match apply_patch(&state.store, &patch).await {
        Ok(snapshot) => Json(snapshot).into_response(),
        Err(err @ StoreError::NotConfigured) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!("settings update failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: err.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// `GET /api/tables`: list public base tables.
pub async fn list_tables(State(state): State<AppState>) -> Response {
    match state.store.list_tables().await {
        Ok(names) => Json(names).into_response(),
        Err(err @ StoreError::NotConfigured) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: err.to_string(),
            }),
        )
            .into_response(),
    }
}

/// JSON 404 for unmatched `/api/*` paths. Keeps the SPA fallback from
/// answering API typos with index.html.
pub async fn api_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: "not found".to_string(),
        }),
    )
        .into_response()
}

async fn refreshed_snapshot(store: &SettingsStore) -> Result<SettingsSnapshot, StoreError> {
    store.ensure_table().await?;
    let rows = store.read_all().await?;
    Ok(SettingsSnapshot::from_rows(&rows))
}

async fn apply_patch(
    store: &SettingsStore,
    patch: &SettingsPatch,
) -> Result<SettingsSnapshot, StoreError> {
    store.ensure_table().await?;
    for (key, value) in patch.updates() {
        store.upsert(key, &value).await?;
    }
    let rows = store.read_all().await?;
    Ok(SettingsSnapshot::from_rows(&rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn apply_patch_without_database_is_not_configured() {
        let store = SettingsStore::disconnected();
        let result = apply_patch(&store, &SettingsPatch::default()).await;
        assert!(matches!(result, Err(StoreError::NotConfigured)));
    }

    #[tokio::test]
    async fn get_settings_masks_missing_database() {
        let state = AppState::new(SettingsStore::disconnected());
        let Json(snapshot) = get_settings(State(state)).await;
        assert_eq!(snapshot, SettingsSnapshot::defaults());
    }
}
