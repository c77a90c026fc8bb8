use crate::types::{Document, FileSelection, Result};
use std::path::Path;
use tracing::debug;

/// Read a file from disk into a `Document`.
///
/// Unknown extensions become `application/octet-stream` and are rejected
/// later by validation.
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let document = Document::from_path(path).await?;
    debug!("Loaded {} ({} bytes, {})", document.name, document.len(), document.mime_type);
    Ok(document)
}

/// Selection produced by a file dialog. `None` means the dialog was cancelled.
pub async fn dialog_selection(path: Option<&Path>) -> Result<FileSelection> {
    let files = match path {
        Some(path) => vec![load_document(path).await?],
        None => Vec::new(),
    };
    Ok(FileSelection::Dialog(files))
}

/// Selection produced by dropping one or more files.
///
/// Only the first path is read; the rest are never opened.
pub async fn drop_selection<P: AsRef<Path>>(paths: &[P]) -> Result<FileSelection> {
    let files = match paths.first() {
        Some(path) => vec![load_document(path).await?],
        None => Vec::new(),
    };
    if paths.len() > 1 {
        debug!("Ignoring {} extra dropped files", paths.len() - 1);
    }
    Ok(FileSelection::Dropped(files))
}
