//! DocDesk core: pure session, transcript and news-feed state plus view-model helpers.
mod document;
mod generation;
mod news;
mod session;
mod transcript;
pub mod validate;
mod verification;
mod view_model;

pub use document::{Document, DocumentStatus};
pub use generation::{FlightLedger, Generation, GenerationGuard, StreamKey};
pub use news::{normalize_link_for_dedupe, KeywordSet, NewsArticle, NewsFeed, SearchQuery};
pub use session::{QueryTicket, Session, CANCELLED_TEXT};
pub use transcript::{
    Message, MessageContent, MessageStatus, Role, SequenceIndex, Transcript, THINKING_PLACEHOLDER,
};
pub use validate::ValidationError;
pub use verification::{FactCheckReport, SourceVerdict, VerdictStatus, VerdictSummary};
pub use view_model::{NewsFeedView, SessionView};
