use bytes::Bytes;
use docdesk_core::ValidationError;
use thiserror::Error;

/// Result of one gateway call.
pub type Outcome<T> = Result<T, RequestError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A precondition failed; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    /// A 2xx response that lacks a field the contract requires.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// The response arrived after a newer request on the same stream; it was
    /// dropped without touching any state.
    #[error("superseded by a newer request")]
    Superseded,
}

impl RequestError {
    /// Text suitable for a transcript entry or an error slot.
    pub fn user_message(&self) -> String {
        match self {
            RequestError::Validation(err) => err.to_string(),
            other => format!("Error: {other}"),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, RequestError::Validation(_))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url: {0}")]
    BaseUrl(#[from] url::ParseError),
    #[error("base url cannot carry paths: {0}")]
    NotABase(String),
    #[error("http client: {0}")]
    HttpClient(String),
}

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        content: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }
}
