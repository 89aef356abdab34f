//! Router construction and HTTP middleware.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api_doc::ApiDoc;
use crate::handlers::{self, files, upload};
use crate::state::AppState;
use utoipa::OpenApi;

pub fn create_router(state: Arc<AppState>) -> Router {
    // The transport cap bounds the whole multipart body; per-file size policy
    // is the coordinator's.
    let body_limit = (state.config.max_file_size_bytes as usize).saturating_mul(16);

    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/v0/files",
            post(upload::upload_files).get(files::list_files),
        )
        .route(
            "/api/v0/files/{id}",
            get(files::get_file)
                .patch(files::rename_file)
                .delete(files::delete_file),
        )
        .route("/api/v0/files/{id}/share", post(files::share_file))
        .route(
            "/api/v0/files/{id}/share/{email}",
            delete(files::unshare_file),
        )
        .route(
            "/api/v0/files/{id}/download-url",
            get(files::download_url),
        )
        .route("/api/v0/uploads/pending", get(upload::pending_uploads))
        .route(
            "/api/v0/uploads/pending/{task_id}",
            delete(upload::dismiss_upload),
        )
        .route("/api-doc/openapi.json", get(openapi_json))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse::<HeaderValue>().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
