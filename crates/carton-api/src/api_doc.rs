//! OpenAPI document assembly.

use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::handlers::files::{DownloadUrlResponse, RenameRequest, ShareRequest};
use crate::handlers::upload::{UploadQuery, UploadResponse};
use carton_core::{FileKind, FileRecord};
use carton_engine::{PendingTask, RejectReason, TaskStatus, UploadOutcome};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::upload::upload_files,
        crate::handlers::upload::pending_uploads,
        crate::handlers::upload::dismiss_upload,
        crate::handlers::files::list_files,
        crate::handlers::files::get_file,
        crate::handlers::files::rename_file,
        crate::handlers::files::share_file,
        crate::handlers::files::unshare_file,
        crate::handlers::files::delete_file,
        crate::handlers::files::download_url,
    ),
    components(schemas(
        FileRecord,
        FileKind,
        UploadOutcome,
        TaskStatus,
        RejectReason,
        PendingTask,
        UploadQuery,
        UploadResponse,
        RenameRequest,
        ShareRequest,
        DownloadUrlResponse,
        ErrorResponse,
    )),
    tags(
        (name = "files", description = "File upload, sharing, and lifecycle operations")
    ),
    info(
        title = "carton API",
        description = "Browser-based file manager backend: concurrent batch uploads and per-file sharing"
    )
)]
pub struct ApiDoc;
