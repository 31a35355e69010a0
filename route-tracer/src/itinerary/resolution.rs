//! A single full-list geocoding pass.

use tracing::debug;

use crate::domain::Coordinate;
use crate::geocode::{Geocoder, Resolver};

/// A snapshot of the place list waiting to be resolved.
///
/// Produced by every place-list mutation. Running it needs no access to the
/// itinerary, so the caller can release any lock around the itinerary while
/// the network requests are in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolutionRequest {
    generation: u64,
    places: Vec<String>,
}

impl ResolutionRequest {
    pub(crate) fn new(generation: u64, places: Vec<String>) -> Self {
        Self { generation, places }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn places(&self) -> &[String] {
        &self.places
    }

    /// Resolve every place in order.
    pub async fn run<G: Geocoder>(self, resolver: &Resolver<G>) -> Resolution {
        let resolved = resolver.resolve_each(&self.places).await;
        debug!(
            generation = self.generation,
            places = self.places.len(),
            resolved = resolved.iter().flatten().count(),
            "Resolution pass finished"
        );
        Resolution {
            generation: self.generation,
            resolved,
        }
    }
}

/// Outcome of a [`ResolutionRequest`], one slot per place.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub generation: u64,
    pub resolved: Vec<Option<Coordinate>>,
}

impl Resolution {
    /// Resolved coordinates in list order, skipping unresolved places.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.resolved.iter().flatten().copied().collect()
    }
}
