//! Draft Generation: orchestrates transcript → structured case-study draft.
//!
//! Flow: load case → fetch transcript → completion call (JSON mode) →
//!       parse → schema validation → persist → return.
//!
//! No internal retries. Every failure maps to a distinct `AppError` variant so the
//! caller can tell whether the expensive completion step must be repeated.

use tracing::{info, warn};
use uuid::Uuid;

use crate::cases::load_case;
use crate::draft::model::DraftPayload;
use crate::draft::prompts::{draft_system_prompt, draft_user_prompt};
use crate::draft::transcript::TranscriptSource;
use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, CompletionRequest, CompletionService, LlmError};
use crate::store::CaseStore;

/// The injected collaborators the generator needs.
pub struct DraftGenerator<'a> {
    pub cases: &'a dyn CaseStore,
    pub transcripts: &'a dyn TranscriptSource,
    pub completion: &'a dyn CompletionService,
}

impl DraftGenerator<'_> {
    /// Runs the full generation pipeline for one case.
    ///
    /// Steps:
    /// 1. Load the case (NotFound if absent or the store is unreachable)
    /// 2. Fetch transcript text (SourceUnavailable)
    /// 3. Call the completion service with schema prompt + transcript (Completion)
    /// 4. Parse JSON (UpstreamFormat)
    /// 5. Validate against DRAFT_SCHEMA (Validation)
    /// 6. Overwrite the stored draft (Persistence, carrying the draft)
    pub async fn generate(&self, case_id: Uuid) -> Result<DraftPayload, AppError> {
        // Step 1: Load case
        let case = load_case(self.cases, case_id).await?;

        // Step 2: Fetch transcript
        let transcript = self
            .transcripts
            .fetch_text(&case.raw_text_url)
            .await
            .map_err(|e| AppError::SourceUnavailable(e.to_string()))?;
        info!(
            "Fetched transcript for case {case_id}: {} chars",
            transcript.chars().count()
        );

        // Step 3: Completion call
        let request = CompletionRequest {
            system: draft_system_prompt(),
            user: draft_user_prompt(&transcript),
        };
        let content = self
            .completion
            .complete_json(&request)
            .await
            .map_err(|e| match e {
                LlmError::EmptyContent => {
                    AppError::UpstreamFormat("completion returned an empty response".to_string())
                }
                LlmError::Envelope(message) => AppError::UpstreamFormat(format!(
                    "completion response could not be parsed: {message}"
                )),
                other => AppError::Completion(other.to_string()),
            })?;

        // Step 4: Parse
        let value: serde_json::Value = serde_json::from_str(strip_json_fences(&content))
            .map_err(|e| AppError::UpstreamFormat(e.to_string()))?;

        // Step 5: Validate
        let draft = DraftPayload::from_value(&value).map_err(|violations| {
            warn!(
                "Draft for case {case_id} failed validation with {} violation(s)",
                violations.len()
            );
            AppError::Validation(violations)
        })?;

        // Step 6: Persist
        save_draft(self.cases, case_id, draft).await
    }
}

/// Overwrites the stored draft for `case_id`. The draft must already be validated.
///
/// On failure the draft travels back inside `AppError::Persistence`.
pub async fn save_draft(
    cases: &dyn CaseStore,
    case_id: Uuid,
    draft: DraftPayload,
) -> Result<DraftPayload, AppError> {
    let persisted = match cases.update_draft(case_id, &draft).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(format!("case {case_id} no longer exists")),
        Err(e) => Err(e.to_string()),
    };

    match persisted {
        Ok(()) => {
            info!(
                "Saved draft for case {case_id} with {} result(s)",
                draft.results.len()
            );
            Ok(draft)
        }
        Err(message) => Err(AppError::Persistence {
            message,
            draft: Some(Box::new(draft)),
        }),
    }
}
