//! Document-rendering service client (PDFMonkey-compatible API).

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0}")]
    Submission(String),

    #[error("{0}")]
    Download(String),
}

#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Renders `html` to a PDF and returns the binary.
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError>;
}

/// Page setup sent with every document: A4, zero margins, backgrounds printed.
#[derive(Debug, Clone, Serialize)]
pub struct PdfOptions {
    pub print_background: bool,
    pub format: &'static str,
    pub margin: Margins,
}

#[derive(Debug, Clone, Serialize)]
pub struct Margins {
    pub top: &'static str,
    pub bottom: &'static str,
    pub left: &'static str,
    pub right: &'static str,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            print_background: true,
            format: "A4",
            margin: Margins {
                top: "0cm",
                bottom: "0cm",
                left: "0cm",
                right: "0cm",
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct DocumentEnvelope {
    document: DocumentHandle,
}

#[derive(Debug, Deserialize)]
struct DocumentHandle {
    id: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    download_url: Option<String>,
}

impl DocumentHandle {
    fn failed(&self) -> bool {
        matches!(self.status.as_deref(), Some("failure") | Some("failed"))
    }
}

#[derive(Clone)]
pub struct PdfMonkeyRenderer {
    client: Client,
    api_url: String,
    api_key: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl PdfMonkeyRenderer {
    pub fn new(
        api_url: String,
        api_key: String,
        timeout: Duration,
        poll_interval: Duration,
        max_polls: u32,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_url,
            api_key,
            poll_interval,
            max_polls,
        })
    }

    async fn submit(&self, html: &str) -> Result<DocumentHandle, RenderError> {
        let body = json!({
            "document": {
                "document_template_id": null,
                "status": "pending",
                "html": html,
                "_options": { "pdf_options": PdfOptions::default() }
            }
        });

        let response = self
            .client
            .post(format!("{}/documents", self.api_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| RenderError::Submission(format!("submission request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RenderError::Submission(format!(
                "rendering service returned {status}: {body}"
            )));
        }

        let envelope: DocumentEnvelope = response.json().await.map_err(|e| {
            RenderError::Submission(format!("unreadable submission response: {e}"))
        })?;
        info!("Submitted document {} for rendering", envelope.document.id);
        Ok(envelope.document)
    }

    async fn fetch_handle(&self, id: &str) -> Result<DocumentHandle, RenderError> {
        let response = self
            .client
            .get(format!("{}/documents/{}", self.api_url, id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| RenderError::Download(format!("status request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Download(format!(
                "document {id} status returned {status}"
            )));
        }

        let envelope: DocumentEnvelope = response
            .json()
            .await
            .map_err(|e| RenderError::Download(format!("unreadable status response: {e}")))?;
        Ok(envelope.document)
    }

    /// Follows the document handle until it exposes a download URL.
    async fn await_download_url(&self, mut handle: DocumentHandle) -> Result<String, RenderError> {
        let mut polls = 0;
        loop {
            if handle.failed() {
                return Err(RenderError::Submission(format!(
                    "rendering service reported failure for document {}",
                    handle.id
                )));
            }
            if let Some(url) = handle.download_url.take().filter(|u| !u.is_empty()) {
                return Ok(url);
            }
            if polls >= self.max_polls {
                return Err(RenderError::Download(format!(
                    "document {} had no download URL after {} polls",
                    handle.id, polls
                )));
            }

            tokio::time::sleep(self.poll_interval).await;
            polls += 1;
            debug!("Polling document {} (attempt {})", handle.id, polls);
            handle = self.fetch_handle(&handle.id).await?;
        }
    }

    async fn download(&self, url: &str) -> Result<Bytes, RenderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RenderError::Download(format!("download request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Download(format!(
                "download returned {status}"
            )));
        }

        response
            .bytes()
            .await
            .map_err(|e| RenderError::Download(format!("download interrupted: {e}")))
    }
}

#[async_trait]
impl DocumentRenderer for PdfMonkeyRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
        let handle = self.submit(html).await?;
        let url = self.await_download_url(handle).await?;
        let pdf = self.download(&url).await?;
        info!("Downloaded rendered PDF: {} bytes", pdf.len());
        Ok(pdf)
    }
}
