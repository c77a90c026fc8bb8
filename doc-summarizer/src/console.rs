use crate::types::{Notification, NotificationSink, PresentationAdapter, SummaryResult, WorkflowState};
use tracing::{info, warn};

/// Routes notifications to the log. Destructive ones are logged as warnings.
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_destructive() {
            warn!("{}: {}", notification.title, notification.description);
        } else {
            info!("{}: {}", notification.title, notification.description);
        }
    }
}

/// Logs state changes the way a view would show them
pub struct ConsolePresenter;

impl PresentationAdapter for ConsolePresenter {
    fn on_state_change(&self, state: &WorkflowState) {
        match state {
            WorkflowState::Idle => info!("Upload a document to see the summary"),
            WorkflowState::Validating => {}
            WorkflowState::Loading => info!("Analyzing your document..."),
            WorkflowState::Succeeded(summary) => info!("Summary ready ({} key points)", summary.key_points.len()),
            WorkflowState::Failed(reason) => warn!("Processing failed: {}", reason),
        }
    }
}

/// Plain-text rendering of a summary for the terminal
pub fn render_summary(summary: &SummaryResult) -> String {
    let mut out = String::new();
    out.push_str("Generated Summary\n\n");
    out.push_str(summary.body.trim_end());
    out.push_str("\n\nKey Points:\n");
    
    if summary.key_points.is_empty() {
        out.push_str("  (none)\n");
    } else {
        for point in &summary.key_points {
            out.push_str(&format!("  • {}\n", point));
        }
    }
    
    out
}
