use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::draft::model::DraftPayload;

/// Advisory lifecycle label. Only `Drafting` is ever written by this service;
/// the store may carry the others and they are read back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Drafting,
    Drafted,
    Exported,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Drafting => "drafting",
            CaseStatus::Drafted => "drafted",
            CaseStatus::Exported => "exported",
        }
    }

    /// Unknown labels fall back to `Drafting` rather than failing the read.
    pub fn parse(s: &str) -> Self {
        match s {
            "drafted" => CaseStatus::Drafted,
            "exported" => CaseStatus::Exported,
            _ => CaseStatus::Drafting,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CaseRow {
    pub id: Uuid,
    pub raw_text_url: String,
    pub status: String,
    pub draft_content: Option<Json<DraftPayload>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A case as the rest of the service sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Case {
    pub id: Uuid,
    pub raw_text_url: String,
    pub status: CaseStatus,
    #[serde(rename = "draftContent")]
    pub draft: Option<DraftPayload>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CaseRow> for Case {
    fn from(row: CaseRow) -> Self {
        Case {
            id: row.id,
            raw_text_url: row.raw_text_url,
            status: CaseStatus::parse(&row.status),
            draft: row.draft_content.map(|Json(draft)| draft),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::model::fixtures::draft_with_results;

    #[test]
    fn test_status_labels_round_trip() {
        for status in [CaseStatus::Drafting, CaseStatus::Drafted, CaseStatus::Exported] {
            assert_eq!(CaseStatus::parse(status.as_str()), status);
        }
        assert_eq!(CaseStatus::parse("archived"), CaseStatus::Drafting);
    }

    #[test]
    fn test_row_conversion_unwraps_draft() {
        let now = Utc::now();
        let row = CaseRow {
            id: Uuid::new_v4(),
            raw_text_url: "https://storage.test/raw/1.txt".to_string(),
            status: "drafting".to_string(),
            draft_content: Some(Json(draft_with_results(2))),
            created_at: now,
            updated_at: now,
        };
        let case = Case::from(row);
        assert_eq!(case.status, CaseStatus::Drafting);
        assert_eq!(case.draft.unwrap().results.len(), 2);
    }

    #[test]
    fn test_case_serializes_draft_as_draft_content() {
        let now = Utc::now();
        let case = Case {
            id: Uuid::new_v4(),
            raw_text_url: "https://storage.test/raw/1.txt".to_string(),
            status: CaseStatus::Drafting,
            draft: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&case).unwrap();
        assert!(json["draftContent"].is_null());
        assert_eq!(json["status"], "drafting");
    }
}
