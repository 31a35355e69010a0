//! Autocomplete for the place input.
//!
//! Wraps the resolver's candidate-list mode with debouncing, stale-response
//! suppression, and a keyboard selection cursor.

mod cursor;
mod pipeline;

pub use cursor::{SelectionCursor, Step};
pub use pipeline::{Autocomplete, AutocompleteConfig, SuggestionView};
