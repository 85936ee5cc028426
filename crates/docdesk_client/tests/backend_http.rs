use std::time::Duration;

use docdesk_client::{
    Backend, BackendSettings, ClaimRequest, ClientConfig, ConfigError, DocDeskClient,
    QuestionRequest, RequestError, ReqwestBackend, UploadFile,
};
use docdesk_core::KeywordSet;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .unwrap()
}

#[tokio::test]
async fn upload_posts_multipart_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Document uploaded successfully",
            "document_id": "doc-1",
            "content": "Section 302 IPC ..."
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let file = UploadFile::new("act.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    let response = backend.upload(&file).await.expect("upload ok");
    assert_eq!(response.document_id, "doc-1");
    assert_eq!(response.content, "Section 302 IPC ...");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"act.pdf\""));
    assert!(body.contains("%PDF-1.4"));
}

#[tokio::test]
async fn upload_without_document_id_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "ok",
            "content": "text"
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let file = UploadFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let err = backend.upload(&file).await.unwrap_err();
    assert!(matches!(err, RequestError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn ask_sends_json_body_and_decodes_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/qna/"))
        .and(body_json(json!({
            "question": "What is the penalty?",
            "document_id": "doc-1",
            "document_text": "Section 302 ..."
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "question": "What is the penalty?",
            "answer": "Death or life imprisonment.",
            "source": "Section 302",
            "document_id": "doc-1"
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let request = QuestionRequest {
        question: "What is the penalty?".to_string(),
        document_id: "doc-1".to_string(),
        document_text: "Section 302 ...".to_string(),
    };
    let response = backend.ask(&request).await.expect("answer");
    assert_eq!(response.answer, "Death or life imprisonment.");
    assert_eq!(response.source.as_deref(), Some("Section 302"));
}

#[tokio::test]
async fn fact_check_omits_missing_document_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fact-check/"))
        .and(body_json(json!({ "claim": "X is legal" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "claim": "X is legal",
            "summary": { "supports": 0, "contradicts": 1, "irrelevant": 0, "errors": 0 },
            "results": [
                {
                    "status": "Contradicts",
                    "reasoning": "Banned in 2019.",
                    "source_url": "https://a.example"
                }
            ]
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let request = ClaimRequest {
        claim: "X is legal".to_string(),
        document_id: None,
    };
    let response = backend.fact_check(&request).await.expect("fact-check");
    assert_eq!(response.summary.contradicts, 1);
    assert_eq!(response.results[0].quote, None);
}

#[tokio::test]
async fn server_error_carries_detail_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/qna/"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "detail": "model unavailable" })),
        )
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let request = QuestionRequest {
        question: "Why?".to_string(),
        document_id: "doc-1".to_string(),
        document_text: String::new(),
    };
    let err = backend.ask(&request).await.unwrap_err();
    assert_eq!(
        err,
        RequestError::Server {
            status: 500,
            message: "model unavailable".to_string()
        }
    );
    assert_eq!(err.user_message(), "Error: server error 500: model unavailable");
}

#[tokio::test]
async fn server_error_without_body_uses_reason_phrase() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let err = backend.news(&KeywordSet::all()).await.unwrap_err();
    assert_eq!(
        err,
        RequestError::Server {
            status: 404,
            message: "Not Found".to_string()
        }
    );
}

#[tokio::test]
async fn news_repeats_keyword_query_pairs() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/"))
        .and(query_param("keywords[]", "bail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "news": [
                {
                    "title": "Bail reform",
                    "summary": "s",
                    "link": "https://n.example/1",
                    "source": "LiveLaw"
                }
            ]
        })))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    let keywords = KeywordSet::parse("IPC, bail");
    let response = backend.news(&keywords).await.expect("news");
    assert_eq!(response.news.len(), 1);
    assert_eq!(response.news[0].source.as_deref(), Some("LiveLaw"));

    let requests = server.received_requests().await.unwrap();
    let pairs: Vec<(String, String)> = requests[0]
        .url
        .query_pairs()
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("keywords[]".to_string(), "IPC".to_string()),
            ("keywords[]".to_string(), "bail".to_string())
        ]
    );
}

#[tokio::test]
async fn slow_response_is_a_network_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "news": [] })),
        )
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.news(&KeywordSet::all()).await.unwrap_err();
    match err {
        RequestError::Network(message) => assert!(message.starts_with("timeout"), "{message}"),
        other => panic!("expected network timeout, got {other:?}"),
    }
}

#[tokio::test]
async fn oversized_response_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        max_response_bytes: 16,
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.news(&KeywordSet::all()).await.unwrap_err();
    assert!(matches!(err, RequestError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn refused_connection_is_a_network_error() {
    let backend = ReqwestBackend::new(BackendSettings {
        base_url: "http://127.0.0.1:9/".to_string(),
        connect_timeout: Duration::from_millis(200),
        ..BackendSettings::default()
    })
    .unwrap();
    let err = backend.news(&KeywordSet::all()).await.unwrap_err();
    assert!(matches!(err, RequestError::Network(_)), "{err:?}");
}

#[test]
fn invalid_base_url_is_a_config_error() {
    let err = ReqwestBackend::new(BackendSettings {
        base_url: "::not a url::".to_string(),
        ..BackendSettings::default()
    })
    .unwrap_err();
    assert!(matches!(err, ConfigError::BaseUrl(_)), "{err:?}");
}

#[tokio::test]
async fn client_built_from_config_talks_to_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Document uploaded successfully",
            "document_id": "doc-7",
            "content": "Section 420 ..."
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/news/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "news": [
                { "title": "Cheating cases", "summary": "s", "link": "https://n.example/420" }
            ]
        })))
        .mount(&server)
        .await;

    let client = DocDeskClient::new(ClientConfig::default().with_base_url(server.uri())).unwrap();
    let file = UploadFile::new("ipc.txt", "text/plain", b"Section 420".to_vec());
    let document = client.uploads().upload(Some(file)).await.unwrap();
    client.news_search().search_all().await.unwrap();

    assert_eq!(document.id, "doc-7");
    let session = client.session_view();
    assert_eq!(session.document_id.as_deref(), Some("doc-7"));
    assert!(session.can_ask);
    assert_eq!(client.news_view().articles[0].title, "Cheating cases");
}

#[test]
fn client_with_invalid_base_url_is_not_built() {
    let result = DocDeskClient::new(ClientConfig::default().with_base_url("::not a url::"));
    assert!(matches!(result, Err(ConfigError::BaseUrl(_))));
}
