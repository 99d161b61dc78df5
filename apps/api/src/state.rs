use std::sync::Arc;

use crate::draft::transcript::TranscriptSource;
use crate::export::renderer::DocumentRenderer;
use crate::llm_client::CompletionService;
use crate::storage::ObjectStore;
use crate::store::CaseStore;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Every external service sits behind a trait object; `main` wires the real clients
/// and tests wire in-memory fakes.
#[derive(Clone)]
pub struct AppState {
    pub cases: Arc<dyn CaseStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub completion: Arc<dyn CompletionService>,
    pub renderer: Arc<dyn DocumentRenderer>,
}
