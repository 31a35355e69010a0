//! Web layer for the route tracer.
//!
//! A JSON API over one shared itinerary drawn on a headless map, plus the
//! background frame loop that drives its playback.

mod dto;
mod frames;
mod routes;
mod state;

pub use dto::*;
pub use frames::{FRAME_PERIOD, FrameClock, spawn_frame_loop};
pub use routes::{AppError, create_router};
pub use state::{AppState, ServerItinerary, SharedItinerary};
