//! Axum route handler for PDF export.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::draft::model::DraftPayload;
use crate::errors::AppError;
use crate::export::export_pdf;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportRequest {
    pub case_id: Option<String>,
    pub draft_content: Option<Value>,
}

/// POST /api/export-pdf
///
/// Renders the (possibly edited) draft and streams the PDF back as an attachment.
pub async fn handle_export_pdf(
    State(state): State<AppState>,
    payload: Result<Json<ExportRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(request) = payload?;

    let raw = request
        .draft_content
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::InvalidInput("Missing draft content.".to_string()))?;
    let draft = DraftPayload::from_value(&raw).map_err(AppError::InvalidDraft)?;

    let document = export_pdf(state.renderer.as_ref(), &draft).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        attachment_name(request.case_id.as_deref())
    );
    Ok((
        [
            (header::CONTENT_TYPE, document.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        document.bytes,
    )
        .into_response())
}

/// `case-study-{caseId}.pdf`, or `case-study.pdf` when the id is absent or unsafe
/// to place in a header.
fn attachment_name(case_id: Option<&str>) -> String {
    match case_id.map(str::trim) {
        Some(id)
            if !id.is_empty()
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') =>
        {
            format!("case-study-{id}.pdf")
        }
        _ => "case-study.pdf".to_string(),
    }
}
