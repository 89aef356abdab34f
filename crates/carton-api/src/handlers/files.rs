//! File action endpoints: listing, details, rename, share, delete, and
//! download-URL handoff.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use carton_core::FileRecord;

use crate::auth::CallerIdentity;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RenameRequest {
    /// Candidate display name, without extension; the file's immutable
    /// extension is re-appended.
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ShareRequest {
    /// Raw comma-separated email list; duplicates are absorbed.
    #[validate(length(min = 1, message = "Emails must not be empty"))]
    pub emails: String,
    /// Grant the admin role instead of standard access. Owner only.
    #[serde(default)]
    pub grant_admin: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadUrlResponse {
    pub url: String,
}

/// List files visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v0/files",
    tag = "files",
    responses(
        (status = 200, description = "Visible files", body = [FileRecord]),
        (status = 401, description = "Missing caller identity", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller), fields(caller = %caller.email))]
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
) -> Result<impl IntoResponse, HttpAppError> {
    let records = state.engine.list_for(&caller.email).await?;
    Ok(Json(records))
}

/// File details. Permitted to any caller the record is shared with.
#[utoipa::path(
    get,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "File details", body = FileRecord),
        (status = 403, description = "Not shared with caller", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller), fields(caller = %caller.email, file_id = %id))]
pub async fn get_file(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state.engine.details(id, &caller.email).await?;
    Ok(Json(record))
}

/// Rename a file. Owner or admin collaborator only.
#[utoipa::path(
    patch,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    request_body = RenameRequest,
    responses(
        (status = 200, description = "Renamed record", body = FileRecord),
        (status = 400, description = "Invalid name", body = ErrorResponse),
        (status = 403, description = "Caller lacks rights", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller, request), fields(caller = %caller.email, file_id = %id))]
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let record = state.engine.rename(id, &caller.email, &request.name).await?;
    Ok(Json(record))
}

/// Add collaborators. Owner or admin; granting admin is owner-only.
#[utoipa::path(
    post,
    path = "/api/v0/files/{id}/share",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    request_body = ShareRequest,
    responses(
        (status = 200, description = "Updated record", body = FileRecord),
        (status = 400, description = "No valid emails", body = ErrorResponse),
        (status = 403, description = "Caller lacks rights", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller, request), fields(caller = %caller.email, file_id = %id))]
pub async fn share_file(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<ShareRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    let record = state
        .engine
        .share_add(id, &caller.email, &request.emails, request.grant_admin)
        .await?;
    Ok(Json(record))
}

/// Remove one collaborator. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v0/files/{id}/share/{email}",
    tag = "files",
    params(
        ("id" = Uuid, Path, description = "File ID"),
        ("email" = String, Path, description = "Collaborator email to remove")
    ),
    responses(
        (status = 200, description = "Updated record", body = FileRecord),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 404, description = "File or collaborator not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller), fields(caller = %caller.email, file_id = %id))]
pub async fn unshare_file(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path((id, email)): Path<(Uuid, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let record = state
        .engine
        .share_remove(id, &caller.email, email.trim().to_lowercase().as_str())
        .await?;
    Ok(Json(record))
}

/// Delete a file and its blob. Owner or admin collaborator only.
/// Irreversible.
#[utoipa::path(
    delete,
    path = "/api/v0/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 204, description = "File deleted"),
        (status = 403, description = "Caller lacks rights", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller), fields(caller = %caller.email, file_id = %id))]
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, HttpAppError> {
    state.engine.delete(id, &caller.email).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Build a download URL for the blob and hand it off to the caller.
#[utoipa::path(
    get,
    path = "/api/v0/files/{id}/download-url",
    tag = "files",
    params(("id" = Uuid, Path, description = "File ID")),
    responses(
        (status = 200, description = "Download URL", body = DownloadUrlResponse),
        (status = 403, description = "Not shared with caller", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, caller), fields(caller = %caller.email, file_id = %id))]
pub async fn download_url(
    State(state): State<Arc<AppState>>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpAppError> {
    let url = state.engine.download_url(id, &caller.email).await?;
    Ok(Json(DownloadUrlResponse { url }))
}
