//! HTTP route definitions and static asset serving.

use std::path::Path;

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::{
    api_not_found, get_settings, health, list_tables, patch_settings, AppState,
};

/// Create the full router: API routes plus the static SPA fallback.
///
/// Any path outside `/api` serves the built frontend; unknown files fall back
/// to `index.html` so client-side routes resolve. Unknown `/api` paths get a
/// JSON 404 instead.
pub fn create_router(state: AppState, static_dir: &Path) -> Router {
    let spa = ServeDir::new(static_dir)
        .fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/health", get(health))
        .route("/api/settings", get(get_settings).patch(patch_settings))
        .route("/api/tables", get(list_tables))
        .route("/api/*rest", any(api_not_found))
        .fallback_service(spa)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::settings::{DEFAULT_WHATSAPP_NUMBER, DEFAULT_WHATSAPP_TOOLTIP};
    use crate::store::SettingsStore;

    fn app_without_database() -> Router {
        let state = AppState::new(SettingsStore::disconnected());
        create_router(state, Path::new("dist"))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_not_configured_without_database() {
        let response = app_without_database()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "not_configured");
        assert!(json.get("ping").is_none());
    }

    #[tokio::test]
    async fn get_settings_serves_defaults_without_database() {
        let response = app_without_database()
            .oneshot(Request::builder().uri("/api/settings").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["whatsappNumber"], DEFAULT_WHATSAPP_NUMBER);
        assert_eq!(json["whatsappTooltip"], DEFAULT_WHATSAPP_TOOLTIP);
        assert_eq!(json["social"]["instagram"]["label"], "Instagram");
    }

    #[tokio::test]
    async fn patch_settings_returns_503_without_database() {
        let request = Request::builder()
            .method("PATCH")
            .uri("/api/settings")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"whatsappNumber": "123"}"#))
            .unwrap();

        let response = app_without_database().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"], "Database not configured");
    }

    #[tokio::test]
    async fn tables_returns_503_without_database() {
        let response = app_without_database()
            .oneshot(Request::builder().uri("/api/tables").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn unknown_api_path_is_json_404() {
        let response = app_without_database()
            .oneshot(Request::builder().uri("/api/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "not found");
    }

    #[tokio::test]
    async fn spa_fallback_serves_index_for_client_routes() {
        let dir = std::env::temp_dir().join(format!("terapias-site-static-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("index.html"), "<html>spa</html>").unwrap();

        let state = AppState::new(SettingsStore::disconnected());
        let app = create_router(state, &dir);

        let response = app
            .oneshot(Request::builder().uri("/agenda").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"<html>spa</html>");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
