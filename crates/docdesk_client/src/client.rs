use std::sync::{Arc, Mutex};

use client_logging::client_info;
use docdesk_core::{NewsFeed, NewsFeedView, Session, SessionView};

use crate::debounce::Debouncer;
use crate::fact_check::FactCheckCoordinator;
use crate::gateway::RequestGateway;
use crate::query::QueryCoordinator;
use crate::search::SearchDebouncer;
use crate::shared::{lock, SharedNewsFeed, SharedSession};
use crate::upload::UploadCoordinator;
use crate::{Backend, ClientConfig, ConfigError, ReqwestBackend};

/// One page visit: the session, the news feed and the coordinators that act on
/// them.
///
/// Create it inside a tokio runtime: debounced searches are spawned on the
/// runtime that was current at construction, which lets a UI thread feed
/// keystrokes without entering the runtime itself.
pub struct DocDeskClient {
    session: SharedSession,
    feed: SharedNewsFeed,
    uploads: UploadCoordinator,
    queries: QueryCoordinator,
    fact_checks: FactCheckCoordinator,
    news: SearchDebouncer,
}

impl DocDeskClient {
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let backend = ReqwestBackend::new(config.backend.clone())?;
        client_info!("docdesk client using {}", config.backend.base_url);
        Ok(Self::with_backend(Arc::new(backend), &config))
    }

    pub fn with_backend(backend: Arc<dyn Backend>, config: &ClientConfig) -> Self {
        let gateway = RequestGateway::new(backend);
        let session: SharedSession = Arc::new(Mutex::new(Session::create()));
        let feed: SharedNewsFeed = Arc::new(Mutex::new(NewsFeed::new()));

        Self {
            uploads: UploadCoordinator::new(gateway.clone(), session.clone()),
            queries: QueryCoordinator::new(gateway.clone(), session.clone()),
            fact_checks: FactCheckCoordinator::new(gateway.clone(), session.clone()),
            news: SearchDebouncer::new(
                gateway,
                feed.clone(),
                Debouncer::new(config.search_debounce),
            ),
            session,
            feed,
        }
    }

    pub fn uploads(&self) -> &UploadCoordinator {
        &self.uploads
    }

    pub fn queries(&self) -> &QueryCoordinator {
        &self.queries
    }

    pub fn fact_checks(&self) -> &FactCheckCoordinator {
        &self.fact_checks
    }

    pub fn news_search(&self) -> &SearchDebouncer {
        &self.news
    }

    pub fn session_view(&self) -> SessionView {
        lock(&self.session).view()
    }

    pub fn news_view(&self) -> NewsFeedView {
        lock(&self.feed).view()
    }

    /// Returns a fresh session view only if something changed since the last
    /// call.
    pub fn take_session_view_if_dirty(&self) -> Option<SessionView> {
        let mut session = lock(&self.session);
        let view = session.view();
        session.consume_dirty().then_some(view)
    }

    pub fn take_news_view_if_dirty(&self) -> Option<NewsFeedView> {
        let mut feed = lock(&self.feed);
        let view = feed.view();
        feed.consume_dirty().then_some(view)
    }

    /// Leaves the page: cancels the pending search and makes every outstanding
    /// response stale. Requests already sent are not aborted.
    pub fn teardown(&self) {
        self.news.teardown();
        lock(&self.session).teardown();
        client_info!("docdesk session torn down");
    }
}
