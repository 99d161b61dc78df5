// Case intake and draft maintenance: creating cases, reading them back, and
// replacing or editing their stored draft.

pub mod handlers;

use reqwest::Url;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::case::Case;
use crate::store::CaseStore;

/// Accepts only absolute `http`/`https` URLs; the generator fetches from here later.
pub fn validate_transcript_url(raw: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("Missing raw_text_url".to_string()));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| AppError::InvalidInput(format!("raw_text_url is not a valid URL: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(AppError::InvalidInput(format!(
            "raw_text_url must use http or https, got '{other}'"
        ))),
    }
}

/// Loads a case for a handler. Absence and store failures are both `NotFound`.
pub async fn load_case(cases: &dyn CaseStore, id: Uuid) -> Result<Case, AppError> {
    cases
        .get(id)
        .await
        .map_err(|e| AppError::NotFound(format!("Case {id} could not be fetched. Store error: {e}")))?
        .ok_or_else(|| AppError::NotFound(format!("Case {id} not found")))
}
