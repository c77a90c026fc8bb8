use crate::types::{Document, Result, SummaryLength, UploadResult};
use async_trait::async_trait;

/// Trait for storing a document somewhere the AI endpoint can reach it
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for this backend
    fn backend_name(&self) -> String;
    
    /// Upload the document once and report what the store answered.
    /// A `success: false` answer is returned as-is, not as an error.
    async fn upload(&self, document: &Document) -> Result<UploadResult>;
}

/// Trait for turning a stored document into free-text summary output
#[async_trait]
pub trait SummaryBackend: Send + Sync {
    /// Human-readable name for this backend
    fn backend_name(&self) -> String;
    
    /// Ask for a summary of the document at `document_url`.
    /// Returns the raw message text, empty when the response carried none.
    async fn summarize(&self, document_url: &str, length: SummaryLength) -> Result<String>;
}
