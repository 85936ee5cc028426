#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Mutex, Once};

use docdesk_client::{
    AnswerResponse, ArticlePayload, Backend, ClaimRequest, FactCheckResponse, NewsResponse,
    Outcome, QuestionRequest, RequestError, SummaryPayload, UploadFile, UploadResponse,
    VerdictPayload,
};
use docdesk_core::KeywordSet;
use tokio::sync::{oneshot, watch};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

enum Next<Resp> {
    Ready(Outcome<Resp>),
    Wait(oneshot::Receiver<Outcome<Resp>>),
}

struct GateState<Req, Resp> {
    requests: Vec<Req>,
    preset: VecDeque<Outcome<Resp>>,
    waiters: Vec<Option<oneshot::Sender<Outcome<Resp>>>>,
}

/// One scripted endpoint. Calls either take the next preset outcome or park
/// until the test answers them with [`Gate::respond`], in any order.
pub struct Gate<Req, Resp> {
    state: Mutex<GateState<Req, Resp>>,
    calls: watch::Sender<usize>,
}

impl<Req: Clone, Resp> Default for Gate<Req, Resp> {
    fn default() -> Self {
        Self {
            state: Mutex::new(GateState {
                requests: Vec::new(),
                preset: VecDeque::new(),
                waiters: Vec::new(),
            }),
            calls: watch::channel(0).0,
        }
    }
}

impl<Req: Clone, Resp> Gate<Req, Resp> {
    pub fn preset(&self, outcome: Outcome<Resp>) {
        self.state.lock().unwrap().preset.push_back(outcome);
    }

    pub async fn wait_for_calls(&self, count: usize) {
        let mut calls = self.calls.subscribe();
        calls.wait_for(|seen| *seen >= count).await.unwrap();
    }

    /// Answers the `index`-th parked call.
    pub fn respond(&self, index: usize, outcome: Outcome<Resp>) {
        let sender = self.state.lock().unwrap().waiters[index]
            .take()
            .expect("call is parked and unanswered");
        let _ = sender.send(outcome);
    }

    pub fn requests(&self) -> Vec<Req> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn call_count(&self) -> usize {
        *self.calls.borrow()
    }

    async fn call(&self, request: Req) -> Outcome<Resp> {
        let next = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            match state.preset.pop_front() {
                Some(outcome) => {
                    state.waiters.push(None);
                    Next::Ready(outcome)
                }
                None => {
                    let (sender, receiver) = oneshot::channel();
                    state.waiters.push(Some(sender));
                    Next::Wait(receiver)
                }
            }
        };
        self.calls.send_modify(|count| *count += 1);
        match next {
            Next::Ready(outcome) => outcome,
            Next::Wait(receiver) => receiver
                .await
                .unwrap_or_else(|_| Err(RequestError::Network("gate dropped".to_string()))),
        }
    }
}

#[derive(Default)]
pub struct ScriptedBackend {
    pub uploads: Gate<UploadFile, UploadResponse>,
    pub questions: Gate<QuestionRequest, AnswerResponse>,
    pub claims: Gate<ClaimRequest, FactCheckResponse>,
    pub searches: Gate<KeywordSet, NewsResponse>,
}

impl ScriptedBackend {
    pub fn total_calls(&self) -> usize {
        self.uploads.call_count()
            + self.questions.call_count()
            + self.claims.call_count()
            + self.searches.call_count()
    }
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn upload(&self, file: &UploadFile) -> Outcome<UploadResponse> {
        self.uploads.call(file.clone()).await
    }

    async fn ask(&self, request: &QuestionRequest) -> Outcome<AnswerResponse> {
        self.questions.call(request.clone()).await
    }

    async fn fact_check(&self, request: &ClaimRequest) -> Outcome<FactCheckResponse> {
        self.claims.call(request.clone()).await
    }

    async fn news(&self, keywords: &KeywordSet) -> Outcome<NewsResponse> {
        self.searches.call(keywords.clone()).await
    }
}

pub fn pdf(name: &str) -> UploadFile {
    UploadFile::new(name, "application/pdf", b"%PDF-1.4 test".to_vec())
}

pub fn upload_ok(document_id: &str, content: &str) -> Outcome<UploadResponse> {
    Ok(UploadResponse {
        document_id: document_id.to_string(),
        content: content.to_string(),
        message: Some("Document uploaded successfully".to_string()),
    })
}

pub fn answer_ok(answer: &str, source: Option<&str>) -> Outcome<AnswerResponse> {
    Ok(AnswerResponse {
        question: None,
        answer: answer.to_string(),
        source: source.map(ToOwned::to_owned),
        document_id: None,
    })
}

pub fn news_ok(titles: &[&str]) -> Outcome<NewsResponse> {
    Ok(NewsResponse {
        news: titles
            .iter()
            .map(|title| ArticlePayload {
                title: title.to_string(),
                summary: format!("About {title}"),
                link: format!("https://news.example.com/{}", title.replace(' ', "-")),
                source: Some("Example News".to_string()),
            })
            .collect(),
    })
}

pub fn fact_check_ok(claim: &str, statuses: &[&str]) -> Outcome<FactCheckResponse> {
    let count = |label: &str| statuses.iter().filter(|status| **status == label).count() as u32;
    Ok(FactCheckResponse {
        claim: claim.to_string(),
        summary: SummaryPayload {
            supports: count("Supports"),
            contradicts: count("Contradicts"),
            irrelevant: count("Irrelevant"),
            errors: count("Error"),
        },
        results: statuses
            .iter()
            .enumerate()
            .map(|(index, status)| VerdictPayload {
                status: status.to_string(),
                reasoning: format!("reason {index}"),
                quote: None,
                source_url: format!("https://source.example.com/{index}"),
            })
            .collect(),
    })
}

pub fn server_error(status: u16, message: &str) -> RequestError {
    RequestError::Server {
        status,
        message: message.to_string(),
    }
}
