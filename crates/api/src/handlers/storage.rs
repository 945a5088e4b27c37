//! Upload pass-through to object storage.

use axum::extract::State;
use axum::Json;
use bazaar_core::validation::{present, require_fields};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::storage::{decode_file_data, object_path, StoredObject};

/// Content type used when the client does not send one.
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBody {
    /// Base64 file contents, optionally as a `data:` URL.
    pub file_data: Option<String>,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub business_id: Option<String>,
}

/// POST /api/v1/storage/upload
///
/// Field checks run before storage is touched, so a rejected request never
/// reaches the bucket.
pub async fn upload(
    State(state): State<AppState>,
    Json(body): Json<UploadBody>,
) -> AppResult<Json<DataResponse<StoredObject>>> {
    require_fields(&[
        ("fileData", present(&body.file_data)),
        ("fileName", present(&body.file_name)),
        ("businessId", present(&body.business_id)),
    ])?;

    let storage = state
        .storage
        .as_ref()
        .ok_or(AppError::ServiceNotConfigured("Object storage"))?;

    let bytes = decode_file_data(body.file_data.as_deref().unwrap_or_default())
        .map_err(|e| AppError::BadRequest(format!("fileData is not valid base64: {e}")))?;

    let path = object_path(
        body.business_id.as_deref().unwrap_or_default(),
        body.file_name.as_deref().unwrap_or_default(),
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;
    let content_type = body
        .content_type
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(DEFAULT_CONTENT_TYPE);

    let stored = storage
        .upload(&path, bytes, content_type)
        .await
        .map_err(|e| AppError::Upstream {
            service: "storage",
            message: e.to_string(),
        })?;

    Ok(Json(DataResponse { data: stored }))
}
