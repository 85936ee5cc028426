use std::fmt;
use std::future::Future;
use std::sync::Arc;

use client_logging::{client_debug, client_info, client_warn};
use docdesk_core::validate::{self, ValidationError};
use docdesk_core::KeywordSet;

use crate::wire::{
    AnswerResponse, ClaimRequest, FactCheckResponse, NewsResponse, QuestionRequest,
    UploadResponse,
};
use crate::{Backend, Outcome, UploadFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Ask,
    FactCheck,
    News,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Upload => write!(f, "upload"),
            Operation::Ask => write!(f, "qna"),
            Operation::FactCheck => write!(f, "fact-check"),
            Operation::News => write!(f, "news"),
        }
    }
}

/// Uniform wrapper around every outbound call: check preconditions, issue the
/// call, log the classified outcome. No retries.
#[derive(Clone)]
pub struct RequestGateway {
    backend: Arc<dyn Backend>,
}

impl RequestGateway {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Runs `call` only if `preconditions` hold. `call` is a lazy future, so a
    /// failed precondition means it is never polled and nothing is sent.
    pub async fn execute<T, F>(
        &self,
        operation: Operation,
        preconditions: Result<(), ValidationError>,
        call: F,
    ) -> Outcome<T>
    where
        F: Future<Output = Outcome<T>>,
    {
        if let Err(err) = preconditions {
            client_info!("{} rejected before sending: {}", operation, err);
            return Err(err.into());
        }

        client_debug!("{} request issued", operation);
        let outcome = call.await;
        match &outcome {
            Ok(_) => client_debug!("{} resolved", operation),
            Err(err) => client_warn!("{} failed: {}", operation, err),
        }
        outcome
    }

    pub async fn upload(&self, file: Option<&UploadFile>) -> Outcome<UploadResponse> {
        let preconditions = validate::upload(file.map(|file| file.mime_type.as_str()));
        self.execute(Operation::Upload, preconditions, async move {
            match file {
                Some(file) => self.backend.upload(file).await,
                None => Err(ValidationError::NoFileSelected.into()),
            }
        })
        .await
    }

    pub async fn ask(&self, request: &QuestionRequest) -> Outcome<AnswerResponse> {
        let preconditions = validate::question(&request.question)
            .and_then(|()| validate::document_id(&request.document_id));
        self.execute(Operation::Ask, preconditions, self.backend.ask(request))
            .await
    }

    pub async fn fact_check(&self, request: &ClaimRequest) -> Outcome<FactCheckResponse> {
        let preconditions = validate::claim(&request.claim);
        self.execute(
            Operation::FactCheck,
            preconditions,
            self.backend.fact_check(request),
        )
        .await
    }

    pub async fn news(&self, keywords: &KeywordSet) -> Outcome<NewsResponse> {
        self.execute(Operation::News, Ok(()), self.backend.news(keywords))
            .await
    }
}
