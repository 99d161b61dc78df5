use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::state::AppState;
use crate::storage::transcript_key;

/// Largest transcript accepted by `POST /api/upload`.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

const FILE_FIELD: &str = "file";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub key: String,
}

/// POST /api/upload
///
/// Stores the multipart `file` field under `raw/` and returns its public URL, which
/// the client then passes to `create-case`.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let body = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("Could not read uploaded file: {e}")))?;
        if body.is_empty() {
            return Err(AppError::InvalidInput("Uploaded file is empty".to_string()));
        }

        let key = transcript_key(&file_name, Utc::now().timestamp_millis());
        let stored = state
            .objects
            .put(&key, body, &content_type)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        info!("Stored upload '{file_name}' as {}", stored.key);

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: stored.url,
                key: stored.key,
            }),
        ));
    }

    Err(AppError::InvalidInput("No file uploaded".to_string()))
}
