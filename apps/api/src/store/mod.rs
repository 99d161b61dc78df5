//! Case Record Store: the `cases` table behind a trait so handlers and the
//! generator can be exercised against an in-memory fake.

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::draft::model::DraftPayload;
use crate::models::case::{Case, CaseRow, CaseStatus};

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Raised by the in-memory store when simulating an outage.
    #[cfg_attr(not(test), allow(dead_code))]
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Inserts a new case in `drafting` status and returns its id.
    async fn create(&self, raw_text_url: &str) -> Result<Uuid, StoreError>;

    /// Returns `Ok(None)` when no case has this id.
    async fn get(&self, id: Uuid) -> Result<Option<Case>, StoreError>;

    /// Replaces the case's draft wholesale. Returns `false` if no row matched.
    async fn update_draft(&self, id: Uuid, draft: &DraftPayload) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgCaseStore {
    pool: PgPool,
}

impl PgCaseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CaseStore for PgCaseStore {
    async fn create(&self, raw_text_url: &str) -> Result<Uuid, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO cases (raw_text_url, status) VALUES ($1, $2) RETURNING id",
        )
        .bind(raw_text_url)
        .bind(CaseStatus::Drafting.as_str())
        .fetch_one(&self.pool)
        .await?;

        info!("Created case {id}");
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Case>, StoreError> {
        let row = sqlx::query_as::<_, CaseRow>(
            r#"
            SELECT id, raw_text_url, status, draft_content, created_at, updated_at
            FROM cases
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Case::from))
    }

    async fn update_draft(&self, id: Uuid, draft: &DraftPayload) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE cases SET draft_content = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(Json(draft))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
