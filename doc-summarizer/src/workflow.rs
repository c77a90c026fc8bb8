use crate::config::WorkflowConfig;
use crate::parser::parse_summary;
use crate::summarizer::HttpSummaryBackend;
use crate::traits::{StorageBackend, SummaryBackend};
use crate::types::{
    ClipboardSink, Document, FileSelection, Notification, NotificationSink, PresentationAdapter, Result,
    RunReport, SelectionOutcome, SummaryLength, SummaryResult, WorkflowError, WorkflowState,
};
use crate::uploader::HttpStorageBackend;
use crate::validation::{validate_document, INVALID_FILE_DESCRIPTION, INVALID_FILE_TITLE};
use chrono::Utc;
use interfaces::empty::{EmptyClipboard, EmptyNotifier, EmptyPresenter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLockReadGuard};
use std::time::Instant;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const PROCESSING_ERROR_TITLE: &str = "Error";
pub const PROCESSING_ERROR_DESCRIPTION: &str = "An error occurred while processing your document";
pub const COPIED_TITLE: &str = "Copied!";
pub const COPIED_DESCRIPTION: &str = "Summary copied to clipboard";
pub const COPY_FAILED_TITLE: &str = "Error";
pub const COPY_FAILED_DESCRIPTION: &str = "Failed to copy to clipboard";
pub const CANCELLED_REASON: &str = "cancelled";

/// Drives one document at a time through validate, upload, summarize, parse.
///
/// Input is refused while a document is in flight: a selection arriving then
/// returns `SelectionOutcome::Busy` and touches nothing. Every stage failure
/// is turned into a notification plus a `Failed` state, never an error
/// returned to the host. A run whose future is dropped before it finishes
/// ends in `Failed("cancelled")`.
pub struct DocumentWorkflowController {
    storage: Arc<dyn StorageBackend>,
    summarizer: Arc<dyn SummaryBackend>,
    notifier: Arc<dyn NotificationSink>,
    presenter: Arc<dyn PresentationAdapter>,
    clipboard: Arc<dyn ClipboardSink>,
    state: std::sync::RwLock<WorkflowState>,
    summary_length: RwLock<SummaryLength>,
    in_flight: AtomicBool,
}

/// Owns the in-flight flag for one run or reset.
///
/// Dropped without `finish` means the caller abandoned the run midway; the
/// state is moved out of `Validating`/`Loading` before the flag is released.
struct InFlightGuard<'a> {
    controller: &'a DocumentWorkflowController,
    finished: bool,
}

impl InFlightGuard<'_> {
    fn finish(mut self) {
        self.finished = true;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.controller.abandon_run();
        }
        self.controller.in_flight.store(false, Ordering::Release);
    }
}

impl DocumentWorkflowController {
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Current presentation state
    pub async fn state(&self) -> WorkflowState {
        self.read_state().clone()
    }

    /// False while a document is being uploaded or summarized
    pub fn accepts_input(&self) -> bool {
        !self.in_flight.load(Ordering::Acquire)
    }

    pub async fn summary_length(&self) -> SummaryLength {
        *self.summary_length.read().await
    }

    pub async fn set_summary_length(&self, length: SummaryLength) {
        let mut current = self.summary_length.write().await;
        if *current != length {
            debug!("Summary length changed: {} -> {}", *current, length);
            *current = length;
        }
    }

    /// Handle a drop or file-dialog event.
    pub async fn handle_selection(&self, selection: FileSelection) -> SelectionOutcome {
        let source = selection.source();
        let Some(document) = selection.first() else {
            debug!("Empty {} selection ignored", source);
            return SelectionOutcome::NoFile;
        };

        let Some(guard) = self.try_begin() else {
            warn!("Ignoring {} of {}: another document is still being processed", source, document.name);
            return SelectionOutcome::Busy;
        };

        let outcome = self.run(document).await;
        guard.finish();
        outcome
    }

    /// Convenience for hosts that already hold a single document.
    pub async fn submit(&self, document: Document) -> SelectionOutcome {
        self.handle_selection(FileSelection::Dialog(vec![document])).await
    }

    async fn run(&self, document: Document) -> SelectionOutcome {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start_time = Instant::now();

        let previous = self.set_state(WorkflowState::Validating);

        if let Err(e) = validate_document(&document) {
            warn!("Rejected {}: {}", document.name, e);
            self.notifier.notify(Notification::destructive(INVALID_FILE_TITLE, INVALID_FILE_DESCRIPTION));
            self.set_state(previous);
            return SelectionOutcome::Rejected {
                mime_type: document.mime_type,
            };
        }

        let length = self.summary_length().await;
        self.set_state(WorkflowState::Loading);
        info!("Processing document {} (run {}, {} bytes)", document.name, run_id, document.len());

        let (final_state, error) = match self.process(&document, length).await {
            Ok(summary) => {
                info!("Run {} produced a summary with {} key points", run_id, summary.key_points.len());
                (WorkflowState::Succeeded(summary), None)
            }
            Err(e) => {
                error!("Run {} failed: {}", run_id, e);
                self.notifier.notify(Notification::destructive(PROCESSING_ERROR_TITLE, PROCESSING_ERROR_DESCRIPTION));
                (WorkflowState::Failed(e.to_string()), Some(e.to_string()))
            }
        };

        self.set_state(final_state.clone());

        let (body, key_points) = match final_state.summary() {
            Some(summary) => (Some(summary.body.clone()), summary.key_points.clone()),
            None => (None, Vec::new()),
        };

        SelectionOutcome::Completed(RunReport {
            run_id,
            file_name: document.name,
            mime_type: document.mime_type,
            summary_length: length.to_string(),
            outcome: final_state.name().to_string(),
            body,
            key_points,
            error,
            started_at,
            finished_at: Utc::now(),
            elapsed_ms: start_time.elapsed().as_millis() as u64,
            state: final_state,
        })
    }

    /// Upload, then summarize. Each call is made exactly once.
    async fn process(&self, document: &Document, length: SummaryLength) -> Result<SummaryResult> {
        let upload = self
            .storage
            .upload(document)
            .await
            .map_err(WorkflowError::into_upload_failure)?;

        if !upload.success {
            return Err(WorkflowError::UploadFailed("storage reported success=false".to_string()));
        }
        if upload.url.trim().is_empty() {
            return Err(WorkflowError::UploadFailed("storage returned no url".to_string()));
        }
        debug!("Stored {} at {}", document.name, upload.url);

        let message = self
            .summarizer
            .summarize(&upload.url, length)
            .await
            .map_err(WorkflowError::into_summarization_failure)?;

        if message.trim().is_empty() {
            return Err(WorkflowError::SummarizationFailed("empty response".to_string()));
        }

        Ok(parse_summary(&message))
    }

    /// Copy the current summary body to the clipboard.
    ///
    /// Returns `Ok(false)` when there is no summary to copy.
    pub async fn copy_summary(&self) -> Result<bool> {
        let body = {
            let state = self.read_state();
            match state.summary() {
                Some(summary) => summary.body.clone(),
                None => return Ok(false),
            }
        };

        match self.clipboard.write_text(&body).await {
            Ok(()) => {
                self.notifier.notify(Notification::info(COPIED_TITLE, COPIED_DESCRIPTION));
                Ok(true)
            }
            Err(e) => {
                warn!("Clipboard write failed: {}", e);
                self.notifier.notify(Notification::destructive(COPY_FAILED_TITLE, COPY_FAILED_DESCRIPTION));
                Err(WorkflowError::ClipboardWriteFailed(e.to_string()))
            }
        }
    }

    /// Back to `Idle`. Refused while a document is in flight.
    pub async fn reset(&self) -> bool {
        let Some(guard) = self.try_begin() else {
            return false;
        };
        self.set_state(WorkflowState::Idle);
        guard.finish();
        true
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                controller: self,
                finished: false,
            })
    }

    fn abandon_run(&self) {
        if self.read_state().is_idle_equivalent() {
            return;
        }
        warn!("Run dropped before it finished, marking it {}", CANCELLED_REASON);
        self.set_state(WorkflowState::Failed(CANCELLED_REASON.to_string()));
    }

    fn read_state(&self) -> RwLockReadGuard<'_, WorkflowState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the state, push it to the presenter and return the old one.
    fn set_state(&self, next: WorkflowState) -> WorkflowState {
        let previous = {
            let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *state, next.clone())
        };
        debug!("State {} -> {}", previous.name(), next.name());
        self.presenter.on_state_change(&next);
        previous
    }
}

/// Builder for wiring a controller to its backends and host collaborators
pub struct WorkflowBuilder {
    config: Option<WorkflowConfig>,
    storage: Option<Arc<dyn StorageBackend>>,
    summarizer: Option<Arc<dyn SummaryBackend>>,
    notifier: Option<Arc<dyn NotificationSink>>,
    presenter: Option<Arc<dyn PresentationAdapter>>,
    clipboard: Option<Arc<dyn ClipboardSink>>,
    summary_length: SummaryLength,
}

impl WorkflowBuilder {
    pub fn new() -> Self {
        Self {
            config: None,
            storage: None,
            summarizer: None,
            notifier: None,
            presenter: None,
            clipboard: None,
            summary_length: SummaryLength::default(),
        }
    }

    /// Used to create the HTTP backends for any backend not set explicitly
    pub fn config(mut self, config: WorkflowConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn storage(mut self, storage: Arc<dyn StorageBackend>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn summarizer(mut self, summarizer: Arc<dyn SummaryBackend>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn presenter(mut self, presenter: Arc<dyn PresentationAdapter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn clipboard(mut self, clipboard: Arc<dyn ClipboardSink>) -> Self {
        self.clipboard = Some(clipboard);
        self
    }

    pub fn summary_length(mut self, length: SummaryLength) -> Self {
        self.summary_length = length;
        self
    }

    pub fn build(self) -> Result<DocumentWorkflowController> {
        let config = self.config.as_ref();
        let storage = match self.storage {
            Some(storage) => storage,
            None => Arc::new(HttpStorageBackend::new(http_config(config)?)?) as Arc<dyn StorageBackend>,
        };
        let summarizer = match self.summarizer {
            Some(summarizer) => summarizer,
            None => Arc::new(HttpSummaryBackend::new(http_config(config)?)?) as Arc<dyn SummaryBackend>,
        };

        info!(
            "Workflow wired: storage = {}, summarizer = {}",
            storage.backend_name(),
            summarizer.backend_name()
        );

        Ok(DocumentWorkflowController {
            storage,
            summarizer,
            notifier: self.notifier.unwrap_or_else(|| Arc::new(EmptyNotifier)),
            presenter: self.presenter.unwrap_or_else(|| Arc::new(EmptyPresenter)),
            clipboard: self.clipboard.unwrap_or_else(|| Arc::new(EmptyClipboard)),
            state: std::sync::RwLock::new(WorkflowState::Idle),
            summary_length: RwLock::new(self.summary_length),
            in_flight: AtomicBool::new(false),
        })
    }
}

fn http_config(config: Option<&WorkflowConfig>) -> Result<&WorkflowConfig> {
    let config = config.ok_or_else(|| WorkflowError::Config("an HTTP backend needs a WorkflowConfig".to_string()))?;
    config.validate()?;
    config.require_credentials()?;
    Ok(config)
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}
