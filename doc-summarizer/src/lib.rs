pub mod types;
pub mod config;
pub mod traits;
pub mod acquisition;
pub mod validation;
pub mod uploader;
pub mod summarizer;
pub mod parser;
pub mod workflow;
pub mod console;

pub use types::*;
pub use config::WorkflowConfig;
pub use traits::{StorageBackend, SummaryBackend};
pub use uploader::{HttpStorageBackend, SimulatedStorageBackend};
pub use summarizer::{HttpSummaryBackend, SimulatedSummaryBackend};
pub use parser::parse_summary;
pub use validation::validate_document;
pub use workflow::{DocumentWorkflowController, WorkflowBuilder};
