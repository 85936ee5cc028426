use client_logging::{client_debug, client_trace};
use docdesk_core::{KeywordSet, StreamKey};

use crate::debounce::{DebounceError, Debouncer};
use crate::gateway::RequestGateway;
use crate::shared::{lock, FlightGuard, SharedNewsFeed};
use crate::{Outcome, RequestError};

/// Drives the news list. Keystrokes are debounced; explicit submits search at
/// once. Only the most recently issued search may change what is shown.
pub struct SearchDebouncer {
    gateway: RequestGateway,
    feed: SharedNewsFeed,
    debouncer: Debouncer,
}

impl SearchDebouncer {
    pub fn new(gateway: RequestGateway, feed: SharedNewsFeed, debouncer: Debouncer) -> Self {
        Self {
            gateway,
            feed,
            debouncer,
        }
    }

    /// Records a change to the keyword box. The search runs once the input has
    /// been quiet for the debounce window. Callable from any thread; fails only
    /// when the client was built outside a tokio runtime.
    pub fn on_keywords_changed(&self, raw: &str) -> Result<(), DebounceError> {
        let keywords = KeywordSet::parse(raw);
        client_trace!("keywords changed: {:?}", keywords.as_slice());
        let gateway = self.gateway.clone();
        let feed = self.feed.clone();
        let raw = raw.to_string();
        self.debouncer.schedule(async move {
            // Failures already sit in the feed's error slot.
            let _ = run_search(&gateway, &feed, raw, keywords).await;
        })
    }

    /// Searches immediately, dropping any debounced search still waiting.
    pub async fn submit(&self, raw: &str) -> Outcome<()> {
        self.debouncer.cancel();
        run_search(&self.gateway, &self.feed, raw.to_string(), KeywordSet::parse(raw)).await
    }

    /// Fetches unfiltered news, as on first load.
    pub async fn search_all(&self) -> Outcome<()> {
        run_search(&self.gateway, &self.feed, String::new(), KeywordSet::all()).await
    }

    pub fn teardown(&self) {
        self.debouncer.cancel();
        lock(&self.feed).teardown();
    }
}

async fn run_search(
    gateway: &RequestGateway,
    feed: &SharedNewsFeed,
    raw: String,
    keywords: KeywordSet,
) -> Outcome<()> {
    let query = lock(feed).begin_search(raw, keywords);
    let _flight = FlightGuard::new(feed.clone(), StreamKey::Search, query.generation);
    let outcome = gateway.news(&query.keywords).await;

    let mut state = lock(feed);
    let (applied, result) = match outcome {
        Ok(response) => (state.apply_results(&query, response.into_articles()), Ok(())),
        Err(err) => (state.apply_failure(&query, err.user_message()), Err(err)),
    };
    if !applied {
        client_debug!(
            "news search {} for {:?} superseded",
            query.generation,
            query.raw_keywords
        );
        return Err(RequestError::Superseded);
    }
    result
}
