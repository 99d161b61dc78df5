// PDF export: draft → fixed HTML layout → rendering service → PDF bytes.

pub mod handlers;
pub mod renderer;
pub mod template;

use bytes::Bytes;
use tracing::info;

use crate::draft::model::DraftPayload;
use crate::errors::AppError;
use crate::export::renderer::{DocumentRenderer, RenderError};
use crate::export::template::render_case_study;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered document ready to stream back to the caller.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub bytes: Bytes,
    pub content_type: &'static str,
}

/// Renders a validated draft to PDF.
pub async fn export_pdf(
    renderer: &dyn DocumentRenderer,
    draft: &DraftPayload,
) -> Result<PdfDocument, AppError> {
    let html = render_case_study(draft);
    info!(
        "Rendering case study for '{}' ({} result(s), {} bytes of HTML)",
        draft.customer.name,
        draft.results.len(),
        html.len()
    );

    let bytes = renderer.render_pdf(&html).await.map_err(|e| match e {
        RenderError::Submission(msg) => AppError::RenderSubmission(msg),
        RenderError::Download(msg) => AppError::RenderDownload(msg),
    })?;

    Ok(PdfDocument {
        bytes,
        content_type: PDF_CONTENT_TYPE,
    })
}
