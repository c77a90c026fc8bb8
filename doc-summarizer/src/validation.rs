use crate::types::{Document, Result, WorkflowError};

/// MIME types the workflow will upload
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["application/pdf", "image/jpeg", "image/png"];

/// Extensions offered by the file picker
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];

pub const INVALID_FILE_TITLE: &str = "Invalid file type";
pub const INVALID_FILE_DESCRIPTION: &str = "Please upload a PDF or image file (JPG, PNG)";

/// Checks a declared MIME type against the allow-list.
/// Case and parameters (`; charset=...`) are ignored.
pub fn is_supported_mime(mime_type: &str) -> bool {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    ACCEPTED_MIME_TYPES.contains(&essence.as_str())
}

pub fn validate_document(document: &Document) -> Result<()> {
    if is_supported_mime(&document.mime_type) {
        Ok(())
    } else {
        Err(WorkflowError::InvalidFileType {
            mime: document.mime_type.clone(),
        })
    }
}

/// Filter string for a file dialog, e.g. `.pdf,.jpg,.jpeg,.png`
pub fn accept_filter() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|ext| format!(".{}", ext))
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_allow_listed_types() {
        for mime in ACCEPTED_MIME_TYPES {
            assert!(is_supported_mime(mime), "{} should be accepted", mime);
        }
        assert!(is_supported_mime("Application/PDF"));
        assert!(is_supported_mime("image/png; charset=binary"));
    }

    #[test]
    fn rejects_everything_else() {
        for mime in ["text/plain", "image/gif", "application/msword", "", "application/pdfx", "image/jpg"] {
            assert!(!is_supported_mime(mime), "{} should be rejected", mime);
        }
    }

    #[test]
    fn invalid_document_names_its_type() {
        let doc = Document::new("notes.txt", "text/plain", b"hi".to_vec());
        match validate_document(&doc) {
            Err(WorkflowError::InvalidFileType { mime }) => assert_eq!(mime, "text/plain"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn picker_filter() {
        assert_eq!(accept_filter(), ".pdf,.jpg,.jpeg,.png");
    }
}
