use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{CaseStore, StoreError};
use crate::draft::model::DraftPayload;
use crate::models::case::{Case, CaseStatus};

/// In-memory `CaseStore` with switches to simulate an unreachable database.
#[derive(Default)]
pub struct MemoryCaseStore {
    cases: Mutex<HashMap<Uuid, Case>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryCaseStore {
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Reads a case directly, bypassing the failure switches.
    pub fn snapshot(&self, id: Uuid) -> Option<Case> {
        self.cases.lock().unwrap().get(&id).cloned()
    }

    pub fn remove(&self, id: Uuid) {
        self.cases.lock().unwrap().remove(&id);
    }
}

#[async_trait]
impl CaseStore for MemoryCaseStore {
    async fn create(&self, raw_text_url: &str) -> Result<Uuid, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let now = Utc::now();
        let case = Case {
            id: Uuid::new_v4(),
            raw_text_url: raw_text_url.to_string(),
            status: CaseStatus::Drafting,
            draft: None,
            created_at: now,
            updated_at: now,
        };
        let id = case.id;
        self.cases.lock().unwrap().insert(id, case);
        Ok(id)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Case>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads disabled".to_string()));
        }
        Ok(self.snapshot(id))
    }

    async fn update_draft(&self, id: Uuid, draft: &DraftPayload) -> Result<bool, StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let mut cases = self.cases.lock().unwrap();
        match cases.get_mut(&id) {
            Some(case) => {
                case.draft = Some(draft.clone());
                case.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
