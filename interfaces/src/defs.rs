use std::fmt;
use std::io;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;

/// A user-supplied file held in memory for the duration of one workflow run.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk. The MIME type is guessed from the extension,
    /// the same way a browser fills in `File.type`; unknown extensions become
    /// `application/octet-stream`.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, format!("not a file path: {}", path.display())))?;

        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_guess::from_path(path).first_or_octet_stream().essence_str().to_string();

        Ok(Self::new(name, mime_type, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Bytes are left out on purpose, documents can be large.
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Where a selection came from. Only the first file of either is used.
#[derive(Debug, Clone)]
pub enum FileSelection {
    Dropped(Vec<Document>),
    Dialog(Vec<Document>),
}

impl FileSelection {
    pub fn first(self) -> Option<Document> {
        match self {
            FileSelection::Dropped(files) | FileSelection::Dialog(files) => files.into_iter().next(),
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            FileSelection::Dropped(_) => "drop",
            FileSelection::Dialog(_) => "dialog",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SummaryLength {
    #[default]
    Short,
    Medium,
    Long,
}

impl SummaryLength {
    pub const ALL: [SummaryLength; 3] = [SummaryLength::Short, SummaryLength::Medium, SummaryLength::Long];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Medium => "medium",
            SummaryLength::Long => "long",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "medium" => Ok(SummaryLength::Medium),
            "long" => Ok(SummaryLength::Long),
            other => Err(anyhow::anyhow!("unknown summary length '{}', expected short, medium or long", other)),
        }
    }
}

/// Pointer to a stored document as returned by the storage endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub url: String,
}

/// Summary text plus the dash-prefixed lines pulled out of it.
///
/// `body` is always the full response text, key points are a second view
/// over the same lines and are not removed from it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SummaryResult {
    pub body: String,
    pub key_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Validating,
    Loading,
    Succeeded(SummaryResult),
    Failed(String),
}

impl WorkflowState {
    pub fn is_loading(&self) -> bool {
        matches!(self, WorkflowState::Loading)
    }

    /// States with no run in progress: nothing is being validated, uploaded
    /// or summarized.
    pub fn is_idle_equivalent(&self) -> bool {
        matches!(self, WorkflowState::Idle | WorkflowState::Succeeded(_) | WorkflowState::Failed(_))
    }

    pub fn summary(&self) -> Option<&SummaryResult> {
        match self {
            WorkflowState::Succeeded(summary) => Some(summary),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::Validating => "validating",
            WorkflowState::Loading => "loading",
            WorkflowState::Succeeded(_) => "succeeded",
            WorkflowState::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub variant: NotificationVariant,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NotificationVariant::Destructive,
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

// Object style note:
// The collaborators below are owned by the host (a view layer, a CLI, a test).
// The workflow only ever talks to them through these traits, so the same
// controller can drive a terminal, a desktop shell or a recording harness.

/// Displays a toast-like message. Fire and forget.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Receives every presentation state change of a workflow.
pub trait PresentationAdapter: Send + Sync {
    fn on_state_change(&self, state: &WorkflowState);
}

/// System clipboard access.
#[async_trait]
pub trait ClipboardSink: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<()>;
    async fn read_text(&self) -> Result<String>;
}
