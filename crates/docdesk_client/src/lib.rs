//! DocDesk client: HTTP backend, request gateway and the coordinators that
//! drive a [`docdesk_core::Session`] and [`docdesk_core::NewsFeed`].
mod backend;
mod client;
mod config;
mod debounce;
mod fact_check;
mod gateway;
mod query;
mod search;
mod shared;
mod types;
mod upload;
mod wire;

pub use backend::{Backend, BackendSettings, ReqwestBackend};
pub use client::DocDeskClient;
pub use config::{ClientConfig, DEFAULT_SEARCH_DEBOUNCE};
pub use debounce::{DebounceError, Debouncer};
pub use fact_check::FactCheckCoordinator;
pub use gateway::{Operation, RequestGateway};
pub use query::QueryCoordinator;
pub use search::SearchDebouncer;
pub use shared::{lock, SharedNewsFeed, SharedSession};
pub use types::{ConfigError, Outcome, RequestError, UploadFile};
pub use upload::UploadCoordinator;
pub use wire::{
    AnswerResponse, ArticlePayload, ClaimRequest, FactCheckResponse, NewsResponse,
    QuestionRequest, SummaryPayload, UploadResponse, VerdictPayload,
};
