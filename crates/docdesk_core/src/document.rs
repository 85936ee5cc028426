#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentStatus {
    #[default]
    Uploading,
    Ready,
    Failed,
}

/// A document ingested by the backend, together with the text it extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub file_name: String,
    pub extracted_text: String,
    pub status: DocumentStatus,
}

impl Document {
    pub fn ready(
        id: impl Into<String>,
        file_name: impl Into<String>,
        extracted_text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            extracted_text: extracted_text.into(),
            status: DocumentStatus::Ready,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == DocumentStatus::Ready
    }
}
