//! Multipart batch upload endpoint.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use carton_core::constants::DEFAULT_ACCOUNT_ID;
use carton_core::AppError;
use carton_engine::{LocalFile, PendingTask, UploadOutcome};

use crate::auth::CallerIdentity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadQuery {
    /// Account to attribute the uploads to; defaults to the caller's
    /// primary account.
    #[serde(default)]
    pub account_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    pub outcomes: Vec<UploadOutcome>,
}

/// Upload a batch of files.
///
/// Every `files` field in the multipart body becomes one upload task. The
/// response reports a terminal per-file outcome; the request as a whole does
/// not fail when individual files are rejected or their store call fails.
#[utoipa::path(
    post,
    path = "/api/v0/files",
    tag = "files",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Batch resolved; see per-file outcomes", body = UploadResponse),
        (status = 400, description = "No files in request", body = ErrorResponse),
        (status = 401, description = "Missing caller identity", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller, multipart), fields(caller = %caller.email))]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let mut files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read multipart: {}", e)))?
    {
        if field.name() != Some("files") {
            continue;
        }

        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Failed to read file data: {}", e)))?;

        files.push(LocalFile::new(filename, data));
    }

    if files.is_empty() {
        return Err(HttpAppError(AppError::InvalidInput(
            "No files provided; send one or more 'files' fields".to_string(),
        )));
    }

    let account_id = query.account_id.unwrap_or(DEFAULT_ACCOUNT_ID);

    tracing::info!(batch_size = files.len(), "Submitting upload batch");

    let outcomes = state
        .coordinator
        .submit(files, &caller.email, account_id)
        .await;

    Ok((StatusCode::OK, Json(UploadResponse { outcomes })))
}

/// List tasks still outstanding in the coordinator's pending batch.
#[utoipa::path(
    get,
    path = "/api/v0/uploads/pending",
    tag = "files",
    responses(
        (status = 200, description = "Outstanding upload tasks", body = [PendingTask])
    )
)]
pub async fn pending_uploads(
    State(state): State<Arc<AppState>>,
    _caller: CallerIdentity,
) -> Json<Vec<PendingTask>> {
    Json(state.coordinator.pending().snapshot())
}

/// Dismiss a still-pending upload task from the visible batch. The in-flight
/// store call, if any, is not aborted; its result is discarded.
#[utoipa::path(
    delete,
    path = "/api/v0/uploads/pending/{task_id}",
    tag = "files",
    params(("task_id" = Uuid, Path, description = "Upload task ID")),
    responses(
        (status = 204, description = "Task dismissed"),
        (status = 404, description = "No such pending task", body = ErrorResponse)
    )
)]
pub async fn dismiss_upload(
    State(state): State<Arc<AppState>>,
    _caller: CallerIdentity,
    axum::extract::Path(task_id): axum::extract::Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    if state.coordinator.dismiss(task_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(HttpAppError(AppError::NotFound(format!(
            "No pending upload task {}",
            task_id
        ))))
    }
}
