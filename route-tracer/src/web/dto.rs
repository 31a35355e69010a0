//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::autocomplete::{Step, SuggestionView};
use crate::itinerary::ItinerarySnapshot;

/// Request to append a place by name.
#[derive(Debug, Deserialize)]
pub struct AddPlaceRequest {
    /// Place name as typed or confirmed
    pub name: String,
}

/// The place input changed.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Full current input text
    pub text: String,
}

/// Keyboard navigation through the suggestion list.
#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub step: Step,
}

/// Confirm a suggestion.
#[derive(Debug, Default, Deserialize)]
pub struct ConfirmRequest {
    /// Suggestion to confirm; the highlighted (or first) one when absent
    #[serde(default)]
    pub index: Option<usize>,
}

/// Change playback speed.
#[derive(Debug, Deserialize)]
pub struct SpeedRequest {
    /// One of 0.5, 1, 1.5, 2, 3
    pub multiplier: f64,
}

/// Everything a client needs to render.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub itinerary: ItinerarySnapshot,
    pub suggestions: SuggestionView,
}

/// Outcome of a command that may be refused in the current state.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Whether the command changed anything
    pub applied: bool,

    /// Itinerary state after the command
    pub itinerary: ItinerarySnapshot,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_index_is_optional() {
        let req: ConfirmRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.index, None);

        let req: ConfirmRequest = serde_json::from_str(r#"{"index": 2}"#).unwrap();
        assert_eq!(req.index, Some(2));
    }

    #[test]
    fn move_step_is_lowercase() {
        let req: MoveRequest = serde_json::from_str(r#"{"step": "down"}"#).unwrap();
        assert_eq!(req.step, Step::Down);
        assert!(serde_json::from_str::<MoveRequest>(r#"{"step": "Left"}"#).is_err());
    }
}
