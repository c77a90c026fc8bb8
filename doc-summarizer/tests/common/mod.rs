// Shared test backends and helpers for the workflow tests
#![allow(dead_code)]

use async_trait::async_trait;
use doc_summarizer::{
    Document, Result, StorageBackend, SummaryBackend, SummaryLength, UploadResult, WorkflowError,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Tracks how many backend calls are running at the same moment
#[derive(Default)]
pub struct Overlap {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl Overlap {
    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub enum UploadScript {
    Succeed,
    Refuse,
    NoUrl,
    Fail(&'static str),
}

pub struct CountingStorage {
    script: UploadScript,
    delay_ms: u64,
    calls: AtomicUsize,
    overlap: Arc<Overlap>,
}

impl CountingStorage {
    pub fn new(script: UploadScript, overlap: Arc<Overlap>) -> Self {
        Self {
            script,
            delay_ms: 0,
            calls: AtomicUsize::new(0),
            overlap,
        }
    }

    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StorageBackend for CountingStorage {
    fn backend_name(&self) -> String {
        "counting storage".to_string()
    }

    async fn upload(&self, document: &Document) -> Result<UploadResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.overlap.enter();
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.overlap.leave();

        match self.script {
            UploadScript::Succeed => Ok(UploadResult {
                success: true,
                url: format!("https://files.test/{}", document.name),
            }),
            UploadScript::Refuse => Ok(UploadResult {
                success: false,
                url: String::new(),
            }),
            UploadScript::NoUrl => Ok(UploadResult {
                success: true,
                url: String::new(),
            }),
            UploadScript::Fail(reason) => Err(WorkflowError::General(reason.to_string())),
        }
    }
}

pub enum SummaryScript {
    Message(&'static str),
    Fail(&'static str),
}

pub struct CountingSummarizer {
    script: SummaryScript,
    calls: AtomicUsize,
    seen: Mutex<Vec<(String, SummaryLength)>>,
    overlap: Arc<Overlap>,
}

impl CountingSummarizer {
    pub fn new(script: SummaryScript, overlap: Arc<Overlap>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            overlap,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<(String, SummaryLength)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl SummaryBackend for CountingSummarizer {
    fn backend_name(&self) -> String {
        "counting summarizer".to_string()
    }

    async fn summarize(&self, document_url: &str, length: SummaryLength) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.overlap.enter();
        self.seen.lock().unwrap().push((document_url.to_string(), length));
        tokio::task::yield_now().await;
        self.overlap.leave();

        match self.script {
            SummaryScript::Message(message) => Ok(message.to_string()),
            SummaryScript::Fail(reason) => Err(WorkflowError::SummarizationFailed(reason.to_string())),
        }
    }
}

pub fn pdf(name: &str) -> Document {
    Document::new(name, "application/pdf", b"%PDF-1.4 test document".to_vec())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
