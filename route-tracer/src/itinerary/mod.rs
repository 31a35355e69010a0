//! The user's itinerary: confirmed places, their resolution, and playback.

mod resolution;
mod store;

pub use resolution::{Resolution, ResolutionRequest};
pub use store::{Itinerary, ItinerarySnapshot};
