use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::defs::ClipboardSink;
use crate::defs::Notification;
use crate::defs::NotificationSink;
use crate::defs::PresentationAdapter;
use crate::defs::WorkflowState;

/// Keeps every notification it receives, in order.
#[derive(Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.received.lock().map(|received| received.clone()).unwrap_or_default()
    }

    pub fn count_titled(&self, title: &str) -> usize {
        self.notifications().iter().filter(|n| n.title == title).count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut received) = self.received.lock() {
            received.push(notification);
        }
    }
}

/// Keeps the full history of presentation states.
#[derive(Default)]
pub struct RecordingPresenter {
    history: Mutex<Vec<WorkflowState>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<WorkflowState> {
        self.history.lock().map(|history| history.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<WorkflowState> {
        self.history().pop()
    }
}

impl PresentationAdapter for RecordingPresenter {
    fn on_state_change(&self, state: &WorkflowState) {
        if let Ok(mut history) = self.history.lock() {
            history.push(state.clone());
        }
    }
}

/// Clipboard backed by a string in memory.
#[derive(Default)]
pub struct MemoryClipboard {
    contents: RwLock<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClipboardSink for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        let mut contents = self.contents.write().await;
        contents.clear();
        contents.push_str(text);
        Ok(())
    }

    async fn read_text(&self) -> Result<String> {
        Ok(self.contents.read().await.clone())
    }
}
