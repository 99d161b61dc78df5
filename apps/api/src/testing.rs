//! In-memory fakes for the injected services, shared by unit and router tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;

use crate::draft::transcript::{SourceError, TranscriptSource};
use crate::export::renderer::{DocumentRenderer, RenderError};
use crate::llm_client::{CompletionRequest, CompletionService, LlmError};
use crate::state::AppState;
use crate::storage::{ObjectStore, StorageError, StoredObject};
use crate::store::memory::MemoryCaseStore;

pub const FAKE_PDF: &[u8] = b"%PDF-1.4 fake";

// ────────────────────────────────────────────────────────────────────────────
// Completion
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Reply {
    Content(String),
    Empty,
    Api { status: u16, message: String },
    Envelope(String),
}

impl Reply {
    fn from_error(error: LlmError) -> Self {
        match error {
            LlmError::EmptyContent => Reply::Empty,
            LlmError::Api { status, message } => Reply::Api { status, message },
            LlmError::Envelope(message) => Reply::Envelope(message),
            LlmError::Http(e) => Reply::Envelope(e.to_string()),
        }
    }

    fn into_result(self) -> Result<String, LlmError> {
        match self {
            Reply::Content(content) => Ok(content),
            Reply::Empty => Err(LlmError::EmptyContent),
            Reply::Api { status, message } => Err(LlmError::Api { status, message }),
            Reply::Envelope(message) => Err(LlmError::Envelope(message)),
        }
    }
}

/// Scripted completion service. Replies are served in order; the last one repeats.
#[derive(Default)]
pub struct FakeCompletion {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn replying(content: impl Into<String>) -> Self {
        Self::scripted(vec![Reply::Content(content.into())])
    }

    pub fn replying_in_order(contents: Vec<String>) -> Self {
        Self::scripted(contents.into_iter().map(Reply::Content).collect())
    }

    pub fn failing(error: LlmError) -> Self {
        Self::scripted(vec![Reply::from_error(error)])
    }

    fn scripted(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionService for FakeCompletion {
    async fn complete_json(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        let mut replies = self.replies.lock().unwrap();
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or(Reply::Empty).into_result()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Transcripts
// ────────────────────────────────────────────────────────────────────────────

/// Serves fixed transcript text per URL. Unknown URLs behave like a 404.
#[derive(Default)]
pub struct FakeTranscripts {
    texts: HashMap<String, String>,
}

impl FakeTranscripts {
    pub fn with(url: &str, text: &str) -> Self {
        let mut texts = HashMap::new();
        texts.insert(url.to_string(), text.to_string());
        Self { texts }
    }
}

#[async_trait]
impl TranscriptSource for FakeTranscripts {
    async fn fetch_text(&self, url: &str) -> Result<String, SourceError> {
        self.texts.get(url).cloned().ok_or(SourceError::Status(404))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Renderer
// ────────────────────────────────────────────────────────────────────────────

pub struct FakeRenderer {
    failure: Option<RenderError>,
    html: Mutex<Option<String>>,
}

impl Default for FakeRenderer {
    fn default() -> Self {
        Self {
            failure: None,
            html: Mutex::new(None),
        }
    }
}

impl FakeRenderer {
    pub fn failing(error: RenderError) -> Self {
        Self {
            failure: Some(error),
            html: Mutex::new(None),
        }
    }

    pub fn last_html(&self) -> Option<String> {
        self.html.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentRenderer for FakeRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Bytes, RenderError> {
        *self.html.lock().unwrap() = Some(html.to_string());
        match &self.failure {
            Some(RenderError::Submission(msg)) => Err(RenderError::Submission(msg.clone())),
            Some(RenderError::Download(msg)) => Err(RenderError::Download(msg.clone())),
            None => Ok(Bytes::from_static(FAKE_PDF)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Object store
// ────────────────────────────────────────────────────────────────────────────

pub const FAKE_BUCKET_URL: &str = "https://storage.test";

/// Records uploads in memory and serves URLs under `FAKE_BUCKET_URL`.
#[derive(Default)]
pub struct FakeObjectStore {
    objects: Mutex<HashMap<String, (Bytes, String)>>,
    fail: AtomicBool,
    puts: AtomicUsize,
}

impl FakeObjectStore {
    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// Returns the stored body and content type for `key`.
    pub fn object(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<StoredObject, StorageError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StorageError::S3("bucket unreachable".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(StoredObject {
            key: key.to_string(),
            url: format!("{FAKE_BUCKET_URL}/{key}"),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Application state
// ────────────────────────────────────────────────────────────────────────────

/// Handles on the fakes behind an `AppState`, so router tests can arrange and inspect them.
pub struct TestServices {
    pub cases: Arc<MemoryCaseStore>,
    pub objects: Arc<FakeObjectStore>,
    pub completion: Arc<FakeCompletion>,
    pub renderer: Arc<FakeRenderer>,
}

/// Builds an `AppState` wired to fakes. `transcripts` decides which URLs resolve.
pub fn test_state(
    transcripts: FakeTranscripts,
    completion: FakeCompletion,
) -> (AppState, TestServices) {
    let services = TestServices {
        cases: Arc::new(MemoryCaseStore::default()),
        objects: Arc::new(FakeObjectStore::default()),
        completion: Arc::new(completion),
        renderer: Arc::new(FakeRenderer::default()),
    };
    let state = AppState {
        cases: services.cases.clone(),
        objects: services.objects.clone(),
        transcripts: Arc::new(transcripts),
        completion: services.completion.clone(),
        renderer: services.renderer.clone(),
    };
    (state, services)
}
