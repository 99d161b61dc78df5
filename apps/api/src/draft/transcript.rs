//! Transcript retrieval from the URL stored on a case.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

const PDF_MAGIC: &[u8] = b"%PDF";

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("transcript request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcript host returned status {0}")]
    Status(u16),

    #[error("could not extract text from PDF transcript: {0}")]
    Pdf(String),

    #[error("transcript is empty")]
    Empty,
}

#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetches the transcript at `url` and returns its text.
    async fn fetch_text(&self, url: &str) -> Result<String, SourceError>;
}

#[derive(Clone)]
pub struct HttpTranscriptSource {
    client: Client,
}

impl HttpTranscriptSource {
    pub fn new(timeout: Duration) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }
}

#[async_trait]
impl TranscriptSource for HttpTranscriptSource {
    async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        debug!("Fetched transcript: {} bytes", body.len());
        decode_transcript(body).await
    }
}

/// Turns raw transcript bytes into text. PDF bodies are text-extracted on the
/// blocking pool; anything else is read as UTF-8, replacing invalid sequences.
pub async fn decode_transcript(body: Bytes) -> Result<String, SourceError> {
    let text = if body.starts_with(PDF_MAGIC) {
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&body))
            .await
            .map_err(|e| SourceError::Pdf(e.to_string()))?
            .map_err(|e| SourceError::Pdf(e.to_string()))?
    } else {
        String::from_utf8_lossy(&body).into_owned()
    };

    if text.trim().is_empty() {
        return Err(SourceError::Empty);
    }
    Ok(text)
}
