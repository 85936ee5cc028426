use std::time::Duration;

use crate::BackendSettings;

/// How long the keyword box must be quiet before a search is issued.
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(800);

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend: BackendSettings,
    pub search_debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.backend.base_url = base_url.into();
        self
    }

    pub fn with_search_debounce(mut self, window: Duration) -> Self {
        self.search_debounce = window;
        self
    }
}
