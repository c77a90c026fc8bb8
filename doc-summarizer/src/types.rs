use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
// Use the interfaces crate for the host-facing types
pub use interfaces::defs::{Document, FileSelection, SummaryLength, UploadResult, SummaryResult, WorkflowState};
pub use interfaces::defs::{Notification, NotificationVariant, NotificationSink, PresentationAdapter, ClipboardSink};

/// JSON body returned by the storage upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
}

impl From<UploadResponse> for UploadResult {
    fn from(response: UploadResponse) -> Self {
        Self {
            success: response.success,
            url: response.url.unwrap_or_default(),
        }
    }
}

/// Request body for the AI endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub messages: Vec<AiMessage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiMessage {
    pub role: String,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

/// JSON body returned by the AI endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// What happened to one file selection
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// The selection held no file, nothing changed
    NoFile,
    /// Another document was still in flight, the selection was dropped
    Busy,
    /// The MIME type is not on the allow-list
    Rejected { mime_type: String },
    /// The workflow ran to a final state
    Completed(RunReport),
}

impl SelectionOutcome {
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            SelectionOutcome::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Record of a single workflow run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub summary_length: String,
    pub outcome: String,
    pub body: Option<String>,
    pub key_points: Vec<String>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[serde(skip)]
    pub state: WorkflowState,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.state, WorkflowState::Succeeded(_))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Invalid file type: {mime}")]
    InvalidFileType { mime: String },

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Summarization failed: {0}")]
    SummarizationFailed(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWriteFailed(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("General error: {0}")]
    General(String),
}

impl WorkflowError {
    /// Folds any error raised while uploading into `UploadFailed`.
    pub fn into_upload_failure(self) -> Self {
        match self {
            WorkflowError::UploadFailed(_) => self,
            other => WorkflowError::UploadFailed(other.to_string()),
        }
    }

    /// Folds any error raised while summarizing into `SummarizationFailed`.
    pub fn into_summarization_failure(self) -> Self {
        match self {
            WorkflowError::SummarizationFailed(_) => self,
            other => WorkflowError::SummarizationFailed(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ai_request_matches_wire_shape() {
        let request = AiRequest {
            messages: vec![AiMessage {
                role: "user".to_string(),
                content: vec![
                    ContentPart::Text { text: "hello".to_string() },
                    ContentPart::ImageUrl { image_url: ImageUrl { url: "https://files/doc.pdf".to_string() } },
                ],
            }],
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": "hello" },
                        { "type": "image_url", "image_url": { "url": "https://files/doc.pdf" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn upload_response_tolerates_missing_fields() {
        let response: UploadResponse = serde_json::from_str("{}").unwrap();
        let result = UploadResult::from(response);
        assert!(!result.success);
        assert!(result.url.is_empty());
    }

    #[test]
    fn errors_fold_into_stage_failures() {
        let err = WorkflowError::General("socket closed".to_string()).into_upload_failure();
        assert!(matches!(err, WorkflowError::UploadFailed(ref msg) if msg.contains("socket closed")));

        let err = WorkflowError::SummarizationFailed("empty".to_string()).into_summarization_failure();
        assert_eq!(err.to_string(), "Summarization failed: empty");
    }

    #[test]
    fn run_report_json_leaves_out_internal_state() {
        let now = Utc::now();
        let report = RunReport {
            run_id: Uuid::new_v4(),
            file_name: "a.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            summary_length: "short".to_string(),
            outcome: "failed".to_string(),
            body: None,
            key_points: Vec::new(),
            error: Some("Upload failed: boom".to_string()),
            started_at: now,
            finished_at: now,
            elapsed_ms: 3,
            state: WorkflowState::Failed("boom".to_string()),
        };

        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["file_name"], "a.pdf");
        assert_eq!(value["error"], "Upload failed: boom");
        assert!(value.get("state").is_none());
    }
}
