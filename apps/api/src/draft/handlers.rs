//! Axum route handler for draft generation.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::draft::generator::DraftGenerator;
use crate::draft::model::DraftPayload;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDraftRequest {
    pub case_id: Option<String>,
    pub template_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub success: bool,
    pub draft_content: DraftPayload,
}

impl From<DraftPayload> for DraftResponse {
    fn from(draft_content: DraftPayload) -> Self {
        Self {
            success: true,
            draft_content,
        }
    }
}

/// Parses a case id from client input. Malformed ids are input errors.
pub fn parse_case_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidInput(format!("Invalid caseId '{raw}'")))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-draft
///
/// Runs the generation pipeline for an existing case and returns the validated draft.
/// `templateId` is required but does not alter the draft content.
pub async fn handle_generate_draft(
    State(state): State<AppState>,
    payload: Result<Json<GenerateDraftRequest>, JsonRejection>,
) -> Result<Json<DraftResponse>, AppError> {
    let Json(request) = payload?;

    let (case_id, template_id) = match (
        non_empty(request.case_id),
        non_empty(request.template_id),
    ) {
        (Some(case_id), Some(template_id)) => (case_id, template_id),
        _ => {
            return Err(AppError::InvalidInput(
                "Missing caseId or templateId".to_string(),
            ))
        }
    };
    let case_id = parse_case_id(&case_id)?;
    info!("Generating draft for case {case_id} (template {template_id})");

    let generator = DraftGenerator {
        cases: state.cases.as_ref(),
        transcripts: state.transcripts.as_ref(),
        completion: state.completion.as_ref(),
    };
    let draft = generator.generate(case_id).await?;

    Ok(Json(draft.into()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
