//! Request and response bodies of the backend HTTP contract.
//!
//! Required fields are plain types so that a 2xx payload without them fails to
//! decode and is classified as a malformed response.
use docdesk_core::{
    FactCheckReport, MessageContent, NewsArticle, SourceVerdict, VerdictStatus, VerdictSummary,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub document_id: String,
    pub content: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub question: String,
    pub document_id: String,
    pub document_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    #[serde(default)]
    pub question: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
}

impl AnswerResponse {
    pub fn into_content(self) -> MessageContent {
        MessageContent::Answer {
            answer: self.answer,
            source: self.source.filter(|source| !source.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub claim: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPayload {
    pub supports: u32,
    pub contradicts: u32,
    pub irrelevant: u32,
    pub errors: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictPayload {
    pub status: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub quote: Option<String>,
    pub source_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckResponse {
    pub claim: String,
    pub summary: SummaryPayload,
    pub results: Vec<VerdictPayload>,
}

impl From<FactCheckResponse> for FactCheckReport {
    fn from(response: FactCheckResponse) -> Self {
        let summary = response.summary;
        FactCheckReport {
            claim: response.claim,
            summary: VerdictSummary {
                supports: summary.supports,
                contradicts: summary.contradicts,
                irrelevant: summary.irrelevant,
                errors: summary.errors,
            },
            sources: response
                .results
                .into_iter()
                .map(|result| SourceVerdict {
                    status: VerdictStatus::from_label(&result.status),
                    reasoning: result.reasoning,
                    quote: result.quote.filter(|quote| !quote.trim().is_empty()),
                    source_url: result.source_url,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticlePayload {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub link: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl From<ArticlePayload> for NewsArticle {
    fn from(payload: ArticlePayload) -> Self {
        NewsArticle {
            title: payload.title,
            summary: payload.summary,
            link: payload.link,
            source: payload.source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsResponse {
    pub news: Vec<ArticlePayload>,
}

impl NewsResponse {
    pub fn into_articles(self) -> Vec<NewsArticle> {
        self.news.into_iter().map(NewsArticle::from).collect()
    }
}

/// Body of a 4xx/5xx response. FastAPI-style `detail` may be a string or a
/// structured validation report.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        let detail = self.detail.and_then(|detail| match detail {
            serde_json::Value::Null => None,
            serde_json::Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });
        detail
            .or(self.message)
            .filter(|message| !message.trim().is_empty())
    }
}
