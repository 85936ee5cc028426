use crate::{DocumentStatus, Message, NewsArticle};

/// Snapshot of the session for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionView {
    pub document_id: Option<String>,
    pub document_name: Option<String>,
    pub upload_status: Option<DocumentStatus>,
    pub upload_error: Option<String>,
    pub uploading: bool,
    pub messages: Vec<Message>,
    pub can_ask: bool,
    pub can_verify: bool,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewsFeedView {
    pub articles: Vec<NewsArticle>,
    pub keywords: Vec<String>,
    pub error: Option<String>,
    pub loading: bool,
    pub dirty: bool,
}
