use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::cases::{load_case, validate_transcript_url};
use crate::draft::edit::{apply_edits, EditError, FieldEdit};
use crate::draft::generator::save_draft;
use crate::draft::handlers::{parse_case_id, DraftResponse};
use crate::draft::model::DraftPayload;
use crate::errors::AppError;
use crate::models::case::Case;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCaseRequest {
    pub raw_text_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCaseResponse {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDraftRequest {
    pub draft_content: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct EditDraftRequest {
    pub edits: Option<Vec<FieldEdit>>,
}

/// POST /api/create-case
pub async fn handle_create_case(
    State(state): State<AppState>,
    payload: Result<Json<CreateCaseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateCaseResponse>), AppError> {
    let Json(request) = payload?;
    let url = validate_transcript_url(request.raw_text_url.as_deref().unwrap_or_default())?;

    let id = state
        .cases
        .create(&url)
        .await
        .map_err(|e| AppError::Persistence {
            message: e.to_string(),
            draft: None,
        })?;
    info!("Case {id} created for {url}");

    Ok((StatusCode::CREATED, Json(CreateCaseResponse { id })))
}

/// GET /api/cases/:id
pub async fn handle_get_case(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Case>, AppError> {
    let id = parse_case_id(&id)?;
    Ok(Json(load_case(state.cases.as_ref(), id).await?))
}

/// PUT /api/cases/:id/draft
///
/// Replaces the stored draft with a client-supplied one. Also the way to retry a
/// save that failed after generation.
pub async fn handle_save_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<SaveDraftRequest>, JsonRejection>,
) -> Result<Json<DraftResponse>, AppError> {
    let id = parse_case_id(&id)?;
    let Json(request) = payload?;

    let raw = request
        .draft_content
        .filter(|v| !v.is_null())
        .ok_or_else(|| AppError::InvalidInput("Missing draftContent".to_string()))?;
    let draft = DraftPayload::from_value(&raw).map_err(AppError::InvalidDraft)?;

    load_case(state.cases.as_ref(), id).await?;
    let saved = save_draft(state.cases.as_ref(), id, draft).await?;
    Ok(Json(saved.into()))
}

/// PATCH /api/cases/:id/draft
///
/// Applies field edits to the stored draft. Either every edit lands or none do.
pub async fn handle_edit_draft(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EditDraftRequest>, JsonRejection>,
) -> Result<Json<DraftResponse>, AppError> {
    let id = parse_case_id(&id)?;
    let Json(request) = payload?;

    let edits = request
        .edits
        .filter(|edits| !edits.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Missing edits".to_string()))?;

    let case = load_case(state.cases.as_ref(), id).await?;
    let current = case
        .draft
        .ok_or_else(|| AppError::InvalidInput(format!("Case {id} has no draft to edit")))?;

    let edited = apply_edits(&current, &edits).map_err(|e| match e {
        EditError::Invalid(violations) => AppError::InvalidDraft(violations),
        other => AppError::InvalidInput(other.to_string()),
    })?;
    info!("Applied {} edit(s) to case {id}", edits.len());

    let saved = save_draft(state.cases.as_ref(), id, edited).await?;
    Ok(Json(saved.into()))
}
