use std::time::Duration;

use docdesk_core::KeywordSet;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use url::Url;

use crate::wire::{
    AnswerResponse, ClaimRequest, ErrorBody, FactCheckResponse, NewsResponse, QuestionRequest,
    UploadResponse,
};
use crate::{ConfigError, Outcome, RequestError, UploadFile};

#[derive(Debug, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 5 * 1024 * 1024,
        }
    }
}

/// The remote service, one method per endpoint. Implementations classify every
/// result into an [`Outcome`]; they never retry.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn upload(&self, file: &UploadFile) -> Outcome<UploadResponse>;

    async fn ask(&self, request: &QuestionRequest) -> Outcome<AnswerResponse>;

    async fn fact_check(&self, request: &ClaimRequest) -> Outcome<FactCheckResponse>;

    async fn news(&self, keywords: &KeywordSet) -> Outcome<NewsResponse>;
}

#[derive(Debug, Clone)]
struct Endpoints {
    upload: Url,
    qna: Url,
    fact_check: Url,
    news: Url,
}

impl Endpoints {
    fn resolve(base: &Url) -> Result<Self, ConfigError> {
        Ok(Self {
            upload: base.join("upload/")?,
            qna: base.join("qna/")?,
            fact_check: base.join("fact-check/")?,
            news: base.join("news/")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
    max_response_bytes: u64,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, ConfigError> {
        let base = parse_base_url(&settings.base_url)?;
        let endpoints = Endpoints::resolve(&base)?;
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;

        Ok(Self {
            client,
            endpoints,
            max_response_bytes: settings.max_response_bytes,
        })
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Outcome<T> {
        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = read_body(response, self.max_response_bytes).await;

        if !status.is_success() {
            let message = body
                .ok()
                .and_then(|bytes| serde_json::from_slice::<ErrorBody>(&bytes).ok())
                .and_then(ErrorBody::into_message)
                .unwrap_or_else(|| reason_phrase(status));
            return Err(RequestError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let body = body?;
        serde_json::from_slice(&body)
            .map_err(|err| RequestError::MalformedResponse(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn upload(&self, file: &UploadFile) -> Outcome<UploadResponse> {
        let part = Part::stream_with_length(file.content.clone(), file.content.len() as u64)
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|_| docdesk_core::ValidationError::UnsupportedFileType {
                mime: file.mime_type.clone(),
            })?;
        let form = Form::new().part("file", part);
        self.send(
            self.client
                .post(self.endpoints.upload.clone())
                .multipart(form),
        )
        .await
    }

    async fn ask(&self, request: &QuestionRequest) -> Outcome<AnswerResponse> {
        self.send(self.client.post(self.endpoints.qna.clone()).json(request))
            .await
    }

    async fn fact_check(&self, request: &ClaimRequest) -> Outcome<FactCheckResponse> {
        self.send(
            self.client
                .post(self.endpoints.fact_check.clone())
                .json(request),
        )
        .await
    }

    async fn news(&self, keywords: &KeywordSet) -> Outcome<NewsResponse> {
        let mut url = self.endpoints.news.clone();
        if !keywords.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for keyword in keywords.as_slice() {
                pairs.append_pair("keywords[]", keyword);
            }
        }
        self.send(self.client.get(url)).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::NotABase(raw.to_string()));
    }
    // Without a trailing slash `join` would replace the last path segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn read_body(response: reqwest::Response, max_bytes: u64) -> Outcome<Vec<u8>> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(too_large(max_bytes, content_len));
        }
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = body.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(too_large(max_bytes, next_len));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn too_large(max_bytes: u64, actual: u64) -> RequestError {
    RequestError::MalformedResponse(format!(
        "response too large (max {max_bytes} bytes, got at least {actual})"
    ))
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| status.to_string())
}

fn map_reqwest_error(err: reqwest::Error) -> RequestError {
    if err.is_timeout() {
        return RequestError::Network(format!("timeout: {err}"));
    }
    RequestError::Network(err.to_string())
}
