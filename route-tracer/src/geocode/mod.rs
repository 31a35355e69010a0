//! Forward geocoding: place names to coordinates.
//!
//! The HTTP client talks to a Mapbox-style `/{query}.json` endpoint which
//! answers `{ "features": [{ "id", "place_name", "center": [lon, lat] }] }`.
//! Two request modes are used:
//! - best match (`autocomplete=false&limit=1`) to resolve confirmed places
//! - ranked candidates (`autocomplete=true`) to feed the suggestion list

mod client;
mod error;
mod mock;
mod resolver;
mod types;

pub use client::{GeocodeClient, GeocodeConfig};
pub use error::GeocodeError;
pub use mock::MockGeocoder;
pub use resolver::{Geocoder, Resolver};
pub use types::{Feature, FeatureCollection, QueryMode, Suggestion, parse_features};
