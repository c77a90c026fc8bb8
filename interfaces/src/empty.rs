use anyhow::Result;
use async_trait::async_trait;

use crate::defs::ClipboardSink;
use crate::defs::Notification;
use crate::defs::NotificationSink;
use crate::defs::PresentationAdapter;
use crate::defs::WorkflowState;

pub struct EmptyNotifier;

impl NotificationSink for EmptyNotifier {
    fn notify(&self, _notification: Notification) {}
}

pub struct EmptyPresenter;

impl PresentationAdapter for EmptyPresenter {
    fn on_state_change(&self, _state: &WorkflowState) {}
}

/// A host without a clipboard. Writes always fail, reads are empty.
pub struct EmptyClipboard;

#[async_trait]
impl ClipboardSink for EmptyClipboard {
    async fn write_text(&self, _text: &str) -> Result<()> {
        Err(anyhow::anyhow!("no clipboard available"))
    }

    async fn read_text(&self) -> Result<String> {
        Ok(String::new())
    }
}
