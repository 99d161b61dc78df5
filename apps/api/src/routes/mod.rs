pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::cases::handlers as cases;
use crate::draft::handlers as draft;
use crate::export::handlers as export;
use crate::state::AppState;
use crate::storage::handlers as storage;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Intake
        .route(
            "/api/upload",
            post(storage::handle_upload).layer(DefaultBodyLimit::max(storage::MAX_UPLOAD_BYTES)),
        )
        .route("/api/create-case", post(cases::handle_create_case))
        // Generation
        .route("/api/generate-draft", post(draft::handle_generate_draft))
        // Editing
        .route("/api/cases/:id", get(cases::handle_get_case))
        .route(
            "/api/cases/:id/draft",
            put(cases::handle_save_draft).patch(cases::handle_edit_draft),
        )
        // Export
        .route("/api/export-pdf", post(export::handle_export_pdf))
        .with_state(state)
}
