//! Client-side preconditions. A failure here means no request is ever issued.
use thiserror::Error;

use crate::StreamKey;

/// MIME types accepted for upload: PDF, DOC, DOCX, TXT, PNG and JPEG.
pub const ALLOWED_UPLOAD_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "text/plain",
    "image/png",
    "image/jpeg",
    "image/jpg",
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a file to upload.")]
    NoFileSelected,
    #[error("Invalid file type ({mime}). Please upload a PDF, DOC, DOCX, TXT, PNG or JPEG file.")]
    UnsupportedFileType { mime: String },
    #[error("Please enter a valid question.")]
    BlankQuestion,
    #[error("Please provide a valid claim to fact-check.")]
    BlankClaim,
    #[error("Document is not uploaded or processed. Please upload a document first.")]
    NoCurrentDocument,
    #[error("There is no answer to fact-check yet.")]
    NoAnswerToVerify,
    #[error("A {0} request is already in progress.")]
    AlreadyInFlight(StreamKey),
}

/// Checks an upload selection; `None` means the user picked nothing.
pub fn upload(mime: Option<&str>) -> Result<(), ValidationError> {
    let mime = mime.ok_or(ValidationError::NoFileSelected)?;
    let essence = mime_essence(mime);
    if ALLOWED_UPLOAD_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
    {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedFileType {
            mime: mime.to_string(),
        })
    }
}

pub fn question(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::BlankQuestion)
    } else {
        Ok(())
    }
}

pub fn claim(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        Err(ValidationError::BlankClaim)
    } else {
        Ok(())
    }
}

pub fn document_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        Err(ValidationError::NoCurrentDocument)
    } else {
        Ok(())
    }
}

fn mime_essence(mime: &str) -> &str {
    mime.split(';').next().unwrap_or(mime).trim()
}
