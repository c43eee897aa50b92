//! Debounced search-as-you-type.
//!
//! Pipeline: Keystroke → Debounce (300 ms) → Length check → Backend → Snapshot
//!
//! Every keystroke bumps a generation counter. A response is applied only if
//! no keystroke happened since its request was issued.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use safepills_core::{Lang, SearchResult};
use tokio::sync::watch;

use crate::api::SearchBackend;
use crate::config::ClientConfig;
use crate::debounce::Debouncer;

/// What the widget displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchSnapshot {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub loading: bool,
    /// Query long enough, request settled, nothing found
    pub no_results: bool,
}

/// Search input with a suggestion list.
pub struct SearchWidget<B: SearchBackend> {
    backend: Arc<B>,
    lang: Lang,
    min_query_len: usize,
    debouncer: Debouncer,
    generation: Arc<AtomicU64>,
    state: Arc<watch::Sender<SearchSnapshot>>,
}

impl<B: SearchBackend> SearchWidget<B> {
    pub fn new(backend: Arc<B>, config: &ClientConfig) -> Self {
        Self::with_settings(backend, config.lang, config.search_delay, config.min_query_len)
    }

    pub fn with_settings(backend: Arc<B>, lang: Lang, delay: Duration, min_query_len: usize) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            backend,
            lang,
            min_query_len,
            debouncer: Debouncer::new(delay),
            generation: Arc::new(AtomicU64::new(0)),
            state: Arc::new(state),
        }
    }

    /// Handle a keystroke.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if query.trim().chars().count() < self.min_query_len {
            self.debouncer.cancel();
            self.state.send_modify(|s| {
                s.query = query;
                s.results.clear();
                s.loading = false;
                s.no_results = false;
            });
            return;
        }

        self.state.send_modify(|s| s.query = query.clone());

        let backend = self.backend.clone();
        let state = self.state.clone();
        let latest = self.generation.clone();
        let lang = self.lang;

        self.debouncer.schedule(async move {
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }
            state.send_modify(|s| s.loading = true);

            let outcome = backend.search(query.trim(), lang).await;

            if latest.load(Ordering::SeqCst) != generation {
                tracing::debug!(query = %query, "Discarding stale search response");
                return;
            }
            state.send_modify(|s| {
                s.loading = false;
                match outcome {
                    Ok(results) => {
                        tracing::debug!(query = %query, count = results.len(), "Search results");
                        s.no_results = results.is_empty();
                        s.results = results;
                    }
                    Err(e) => {
                        tracing::warn!(query = %query, error = %e, "Search failed");
                        s.results.clear();
                        s.no_results = true;
                    }
                }
            });
        });
    }

    /// Pick a suggestion. The widget resets and any response still in flight
    /// is ignored.
    pub fn select(&mut self, index: usize) -> Option<SearchResult> {
        let picked = self.state.borrow().results.get(index).cloned()?;
        self.reset();
        tracing::debug!(id = %picked.id, name = %picked.name, "Search result selected");
        Some(picked)
    }

    /// Clear query and results.
    pub fn reset(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.debouncer.cancel();
        self.state.send_replace(SearchSnapshot::default());
    }

    pub fn snapshot(&self) -> SearchSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver notified on every snapshot change.
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.state.subscribe()
    }

    pub fn lang(&self) -> Lang {
        self.lang
    }
}
