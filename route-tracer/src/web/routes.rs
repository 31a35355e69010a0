//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use thiserror::Error;
use tracing::warn;

use crate::animation::MapSnapshot;
use crate::autocomplete::SuggestionView;
use crate::domain::SpeedMultiplier;
use crate::geocode::Geocoder;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router<G: Geocoder + 'static>(state: AppState<G>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/state", get(get_state::<G>))
        .route("/api/map", get(get_map::<G>))
        .route("/api/places", post(add_place::<G>))
        .route("/api/places/:index", delete(remove_place::<G>))
        .route("/api/query", post(query::<G>))
        .route("/api/suggestions/move", post(move_highlight::<G>))
        .route("/api/suggestions/confirm", post(confirm_suggestion::<G>))
        .route("/api/animation/start", post(start_animation::<G>))
        .route("/api/animation/pause", post(toggle_pause::<G>))
        .route("/api/animation/speed", put(set_speed::<G>))
        .route("/api/sound/toggle", post(toggle_sound::<G>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

async fn get_state<G: Geocoder + 'static>(State(state): State<AppState<G>>) -> Json<StateResponse> {
    let itinerary = state.itinerary.lock().await.snapshot();
    let suggestions = state.autocomplete.snapshot().await;
    Json(StateResponse {
        itinerary,
        suggestions,
    })
}

/// Current contents of the headless map.
async fn get_map<G: Geocoder + 'static>(State(state): State<AppState<G>>) -> Json<MapSnapshot> {
    Json(state.itinerary.lock().await.map().snapshot())
}

async fn add_place<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Json(req): Json<AddPlaceRequest>,
) -> Result<Response, AppError> {
    let (request, snapshot) = {
        let mut itinerary = state.itinerary.lock().await;
        let request = itinerary
            .add_place(&req.name)
            .ok_or_else(|| AppError::BadRequest {
                message: "Place name must not be blank".to_string(),
            })?;
        (request, itinerary.snapshot())
    };

    state.resolve_in_background(request).await;
    Ok((StatusCode::ACCEPTED, Json(snapshot)).into_response())
}

async fn remove_place<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Path(index): Path<usize>,
) -> Result<Response, AppError> {
    let (request, snapshot) = {
        let mut itinerary = state.itinerary.lock().await;
        let request = itinerary
            .remove_place(index)
            .ok_or_else(|| AppError::NotFound {
                message: format!("No place at index {index}"),
            })?;
        (request, itinerary.snapshot())
    };

    state.resolve_in_background(request).await;
    Ok((StatusCode::ACCEPTED, Json(snapshot)).into_response())
}

/// The place input changed; suggestions arrive after the debounce window.
async fn query<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Json(req): Json<QueryRequest>,
) -> Json<SuggestionView> {
    // The lookup runs detached; clients poll /api/state for the result.
    drop(state.autocomplete.on_query_change(&req.text).await);
    Json(state.autocomplete.snapshot().await)
}

async fn move_highlight<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Json(req): Json<MoveRequest>,
) -> Json<SuggestionView> {
    state.autocomplete.step(req.step).await;
    Json(state.autocomplete.snapshot().await)
}

/// Confirm a suggestion and append it to the place list.
async fn confirm_suggestion<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    body: Option<Json<ConfirmRequest>>,
) -> Result<Response, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let name = match req.index {
        Some(index) => state.autocomplete.confirm(index).await,
        None => state.autocomplete.confirm_highlighted().await,
    }
    .ok_or_else(|| AppError::NotFound {
        message: "No suggestion to confirm".to_string(),
    })?;

    let request = state.itinerary.lock().await.add_place(&name);
    if let Some(request) = request {
        state.resolve_in_background(request).await;
    }

    let itinerary = state.itinerary.lock().await.snapshot();
    let suggestions = state.autocomplete.snapshot().await;
    Ok((
        StatusCode::ACCEPTED,
        Json(StateResponse {
            itinerary,
            suggestions,
        }),
    )
        .into_response())
}

async fn start_animation<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
) -> Json<CommandResponse> {
    let mut itinerary = state.itinerary.lock().await;
    let applied = itinerary.request_animation();
    Json(CommandResponse {
        applied,
        itinerary: itinerary.snapshot(),
    })
}

async fn toggle_pause<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
) -> Json<CommandResponse> {
    let mut itinerary = state.itinerary.lock().await;
    let applied = itinerary.toggle_pause(state.clock.now());
    Json(CommandResponse {
        applied,
        itinerary: itinerary.snapshot(),
    })
}

/// Change speed. Refused (not an error) while playback is active.
async fn set_speed<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
    Json(req): Json<SpeedRequest>,
) -> Result<Json<CommandResponse>, AppError> {
    let speed = SpeedMultiplier::try_from(req.multiplier).map_err(|e| {
        AppError::Unprocessable {
            message: e.to_string(),
        }
    })?;

    let mut itinerary = state.itinerary.lock().await;
    let applied = itinerary.set_speed(speed);
    Ok(Json(CommandResponse {
        applied,
        itinerary: itinerary.snapshot(),
    }))
}

async fn toggle_sound<G: Geocoder + 'static>(
    State(state): State<AppState<G>>,
) -> Json<CommandResponse> {
    let mut itinerary = state.itinerary.lock().await;
    itinerary.toggle_sound();
    Json(CommandResponse {
        applied: true,
        itinerary: itinerary.snapshot(),
    })
}

/// Application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Unprocessable { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        warn!(%status, error = %self, "Request failed");

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}
