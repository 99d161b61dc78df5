use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::draft::model::DraftPayload;
use crate::draft::schema::Violation;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Each variant names the stage that failed so a caller can tell a cheap retry
/// (saving) from an expensive one (regenerating).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Draft content is invalid")]
    InvalidDraft(Vec<Violation>),

    #[error("{0}")]
    NotFound(String),

    #[error("Failed to download the transcript file: {0}")]
    SourceUnavailable(String),

    #[error("Completion service call failed: {0}")]
    Completion(String),

    #[error("AI returned a response that is not valid JSON: {0}")]
    UpstreamFormat(String),

    #[error("AI returned invalid data format.")]
    Validation(Vec<Violation>),

    /// Generation (if any) succeeded but the write did not. Carries the draft so
    /// the caller can retry the save alone.
    #[error("Failed to save the draft: {message}")]
    Persistence {
        message: String,
        draft: Option<Box<DraftPayload>>,
    },

    #[error("Failed to store the uploaded file: {0}")]
    Storage(String),

    #[error("Failed to generate PDF document: {0}")]
    RenderSubmission(String),

    #[error("Failed to download the generated PDF: {0}")]
    RenderDownload(String),

    #[error("An unexpected error occurred: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::InvalidDraft(_) => "INVALID_DRAFT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::SourceUnavailable(_) => "SOURCE_UNAVAILABLE",
            AppError::Completion(_) => "COMPLETION_ERROR",
            AppError::UpstreamFormat(_) => "UPSTREAM_FORMAT_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Persistence { .. } => "PERSISTENCE_ERROR",
            AppError::Storage(_) => "STORAGE_ERROR",
            AppError::RenderSubmission(_) => "RENDER_SUBMISSION_ERROR",
            AppError::RenderDownload(_) => "RENDER_DOWNLOAD_ERROR",
            AppError::Unexpected(_) => "UNEXPECTED",
        }
    }

    /// Input errors are the caller's to fix (400); everything else is 500.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::InvalidDraft(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::InvalidDraft(violations) | AppError::Validation(violations) => {
                Some(json!(violations))
            }
            AppError::Persistence {
                draft: Some(draft), ..
            } => Some(json!({ "draftContent": draft })),
            _ => None,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();
        let message = self.to_string();

        if status.is_server_error() {
            match &self {
                AppError::Validation(violations) => {
                    tracing::error!("{code}: {message} {violations:?}")
                }
                AppError::Unexpected(e) => tracing::error!("{code}: {e:?}"),
                _ => tracing::error!("{code}: {message}"),
            }
        } else {
            tracing::warn!("{code}: {message}");
        }

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = self.details() {
            body["details"] = details;
        }

        (status, Json(body)).into_response()
    }
}
