//! Debounced, last-issued-wins autocomplete.
//!
//! Every input change bumps a token. A lookup is only issued once the input
//! has been quiet for the debounce window, and its response is only applied
//! if no newer change has happened since. Superseded requests are not
//! aborted; their results are simply dropped on arrival.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::geocode::{Geocoder, Resolver, Suggestion};

use super::cursor::{SelectionCursor, Step};

/// Default idle window before a lookup is issued.
const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Configuration for the autocomplete pipeline.
#[derive(Debug, Clone)]
pub struct AutocompleteConfig {
    /// Quiet period after the last keystroke before querying.
    pub debounce: Duration,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Observable state of the suggestion box.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SuggestionView {
    pub input: String,
    pub suggestions: Vec<Suggestion>,
    pub highlighted: Option<usize>,
    pub enabled: bool,
}

#[derive(Debug, Default)]
struct PipelineState {
    input: String,
    suggestions: Vec<Suggestion>,
    cursor: SelectionCursor,
    /// Token of the most recent input change.
    latest: u64,
}

impl PipelineState {
    /// Register an input change and return its token.
    fn bump(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    fn replace_suggestions(&mut self, suggestions: Vec<Suggestion>) {
        self.suggestions = suggestions;
        self.cursor.reset();
    }

    /// Clear input, suggestions, and cursor, and orphan any pending lookup.
    fn clear(&mut self) {
        self.bump();
        self.input.clear();
        self.replace_suggestions(Vec::new());
    }
}

/// Autocomplete pipeline over a resolver's candidate-list mode.
///
/// Cheap to clone; clones share state.
pub struct Autocomplete<G> {
    resolver: Resolver<G>,
    state: Arc<RwLock<PipelineState>>,
    debounce: Duration,
    enabled: bool,
}

impl<G> Clone for Autocomplete<G> {
    fn clone(&self) -> Self {
        Self {
            resolver: self.resolver.clone(),
            state: Arc::clone(&self.state),
            debounce: self.debounce,
            enabled: self.enabled,
        }
    }
}

impl<G: Geocoder + 'static> Autocomplete<G> {
    /// Create a pipeline.
    ///
    /// If the geocoder has no credentials the pipeline is disabled: no
    /// lookups are made and confirmation accepts the raw input text.
    pub fn new(resolver: Resolver<G>, config: &AutocompleteConfig) -> Self {
        let enabled = resolver.geocoder().is_configured();
        if !enabled {
            debug!("Geocoder not configured, autocomplete disabled");
        }

        Self {
            resolver,
            state: Arc::new(RwLock::new(PipelineState::default())),
            debounce: config.debounce,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Handle a change of the input text.
    ///
    /// Blank input clears the suggestions immediately. Otherwise a lookup
    /// task is spawned which waits out the debounce window; the returned
    /// handle completes once that task has either applied its result or
    /// found itself superseded.
    pub async fn on_query_change(&self, text: &str) -> Option<JoinHandle<()>> {
        let token = {
            let mut state = self.state.write().await;
            let token = state.bump();
            state.input = text.to_string();

            if text.trim().is_empty() {
                state.replace_suggestions(Vec::new());
                return None;
            }
            if !self.enabled {
                return None;
            }
            token
        };

        let this = self.clone();
        let text = text.to_string();
        Some(tokio::spawn(async move { this.settle(token, text).await }))
    }

    async fn settle(&self, token: u64, text: String) {
        tokio::time::sleep(self.debounce).await;

        if self.state.read().await.latest != token {
            trace!(token, "Query superseded during debounce");
            return;
        }

        let suggestions = self.resolver.resolve_candidates(&text).await;

        // Compare and replace under one lock so no newer change can slip in.
        let mut state = self.state.write().await;
        if state.latest != token {
            debug!(token, latest = state.latest, "Discarding stale suggestions");
            return;
        }
        trace!(token, count = suggestions.len(), "Applying suggestions");
        state.replace_suggestions(suggestions);
    }

    /// Move the highlight one step.
    pub async fn step(&self, step: Step) {
        let mut state = self.state.write().await;
        let len = state.suggestions.len();
        state.cursor.step(step, len);
    }

    /// Confirm the suggestion at `index` (e.g. a click).
    ///
    /// Returns its canonical name and clears the input, suggestions, and
    /// cursor. Out-of-range indices are ignored.
    pub async fn confirm(&self, index: usize) -> Option<String> {
        let mut state = self.state.write().await;
        let name = state.suggestions.get(index)?.name.clone();
        state.clear();
        Some(name)
    }

    /// Confirm the highlighted suggestion, or the first one if none is.
    ///
    /// When the pipeline is disabled the trimmed input text itself is
    /// accepted instead.
    pub async fn confirm_highlighted(&self) -> Option<String> {
        let mut state = self.state.write().await;

        let name = if self.enabled {
            let index = state.cursor.confirm_index();
            state.suggestions.get(index)?.name.clone()
        } else {
            let text = state.input.trim();
            if text.is_empty() {
                return None;
            }
            text.to_string()
        };

        state.clear();
        Some(name)
    }

    pub async fn snapshot(&self) -> SuggestionView {
        let state = self.state.read().await;
        SuggestionView {
            input: state.input.clone(),
            suggestions: state.suggestions.clone(),
            highlighted: state.cursor.highlighted(),
            enabled: self.enabled,
        }
    }
}
