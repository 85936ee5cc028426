use std::collections::HashSet;

use url::Url;

use crate::view_model::NewsFeedView;
use crate::{FlightLedger, Generation, GenerationGuard, StreamKey};

/// Comma-separated search keywords after trimming, dropping empties and
/// case-insensitive duplicates. Empty means "all news".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordSet(Vec<String>);

impl KeywordSet {
    pub fn parse(raw: &str) -> Self {
        raw.split(',').collect()
    }

    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Each item is one keyword as is; commas inside an item are kept.
impl<S: AsRef<str>> FromIterator<S> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let mut keywords = Vec::new();
        for item in iter {
            let keyword = item.as_ref().trim();
            if !keyword.is_empty() && seen.insert(keyword.to_lowercase()) {
                keywords.push(keyword.to_owned());
            }
        }
        Self(keywords)
    }
}

/// One search intent, stamped with the generation that issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub generation: Generation,
    pub raw_keywords: String,
    pub keywords: KeywordSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsArticle {
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: Option<String>,
}

/// Visible state of the news page: the list currently shown, its error slot and
/// the generation bookkeeping that keeps stale responses out of it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewsFeed {
    articles: Vec<NewsArticle>,
    keywords: KeywordSet,
    error: Option<String>,
    in_flight: Option<Generation>,
    generations: GenerationGuard,
    dirty: bool,
}

impl NewsFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_search(
        &mut self,
        raw_keywords: impl Into<String>,
        keywords: KeywordSet,
    ) -> SearchQuery {
        let generation = self.generations.next_generation(StreamKey::Search);
        self.in_flight = Some(generation);
        self.dirty = true;
        SearchQuery {
            generation,
            raw_keywords: raw_keywords.into(),
            keywords,
        }
    }

    pub fn is_current(&self, query: &SearchQuery) -> bool {
        self.generations.is_current(StreamKey::Search, query.generation)
    }

    /// Replaces the visible list if `query` is still the latest search.
    pub fn apply_results(&mut self, query: &SearchQuery, articles: Vec<NewsArticle>) -> bool {
        if !self.is_current(query) {
            return false;
        }
        self.articles = dedupe_articles(articles);
        self.keywords = query.keywords.clone();
        self.error = None;
        self.in_flight = None;
        self.dirty = true;
        true
    }

    /// Fills the error slot if `query` is still the latest search. The
    /// previously shown list stays in place.
    pub fn apply_failure(&mut self, query: &SearchQuery, message: impl Into<String>) -> bool {
        if !self.is_current(query) {
            return false;
        }
        self.error = Some(message.into());
        self.in_flight = None;
        self.dirty = true;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn articles(&self) -> &[NewsArticle] {
        &self.articles
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Drops everything shown and supersedes any outstanding search.
    pub fn teardown(&mut self) {
        self.generations.invalidate(StreamKey::Search);
        self.articles.clear();
        self.keywords = KeywordSet::all();
        self.error = None;
        self.in_flight = None;
        self.dirty = true;
    }

    pub fn view(&self) -> NewsFeedView {
        NewsFeedView {
            articles: self.articles.clone(),
            keywords: self.keywords.as_slice().to_vec(),
            error: self.error.clone(),
            loading: self.is_loading(),
            dirty: self.dirty,
        }
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl FlightLedger for NewsFeed {
    fn end_flight(&mut self, stream: StreamKey, generation: Generation) {
        if stream == StreamKey::Search && self.in_flight == Some(generation) {
            self.in_flight = None;
            self.dirty = true;
        }
    }
}

/// Normalizes an article link so trivially different spellings compare equal.
pub fn normalize_link_for_dedupe(link: &str) -> String {
    let trimmed = link.trim();
    match Url::parse(trimmed) {
        Ok(mut url) => {
            url.set_fragment(None);
            let path = url.path().trim_end_matches('/').to_string();
            url.set_path(&path);
            let normalized = url.to_string();
            // Special schemes keep a "/" root path; only a bare root is trimmed.
            if url.path() == "/" && url.query().is_none() {
                normalized.trim_end_matches('/').to_string()
            } else {
                normalized
            }
        }
        Err(_) => trimmed.trim_end_matches('/').to_ascii_lowercase(),
    }
}

fn dedupe_articles(articles: Vec<NewsArticle>) -> Vec<NewsArticle> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|article| {
            let key = if article.link.trim().is_empty() {
                format!("title:{}", article.title.trim().to_lowercase())
            } else {
                normalize_link_for_dedupe(&article.link)
            };
            seen.insert(key)
        })
        .collect()
}
