//! Name → coordinate resolution on top of a forward geocoder.

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::Coordinate;

use super::error::GeocodeError;
use super::types::{Feature, QueryMode, Suggestion};

/// Trait for forward-geocoding providers.
///
/// This abstraction lets the resolver run against the HTTP client, a
/// caching wrapper, or in-memory fixtures.
pub trait Geocoder: Send + Sync {
    /// Look up features matching `query`, best match first.
    fn forward(
        &self,
        query: &str,
        mode: QueryMode,
    ) -> impl Future<Output = Result<Vec<Feature>, GeocodeError>> + Send;

    /// Whether the provider has the credentials it needs.
    ///
    /// An unconfigured provider is still usable, but every request fails
    /// with [`GeocodeError::NotConfigured`].
    fn is_configured(&self) -> bool {
        true
    }
}

/// Resolves place names to coordinates and text to suggestion lists.
///
/// Every failure is recovered locally: a failed lookup is `None` or an
/// empty list, never an error. There are no retries.
pub struct Resolver<G> {
    geocoder: Arc<G>,
}

impl<G> Clone for Resolver<G> {
    fn clone(&self) -> Self {
        Self {
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

impl<G: Geocoder> Resolver<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
        }
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve a single name to the top-ranked result's coordinate.
    ///
    /// Returns `None` if the provider has no match or the request fails.
    pub async fn resolve_one(&self, name: &str) -> Option<Coordinate> {
        match self.geocoder.forward(name, QueryMode::BestMatch).await {
            Ok(features) => {
                let found = features.into_iter().next().map(|f| f.center);
                if found.is_none() {
                    debug!(place = name, "No geocoding match");
                }
                found
            }
            Err(e) => {
                warn!(place = name, error = %e, "Geocoding failed");
                None
            }
        }
    }

    /// Fetch the ranked candidate list for partially typed text.
    ///
    /// Returns an empty list on failure.
    pub async fn resolve_candidates(&self, text: &str) -> Vec<Suggestion> {
        match self.geocoder.forward(text, QueryMode::Autocomplete).await {
            Ok(features) => features.into_iter().map(Suggestion::from).collect(),
            Err(e) => {
                debug!(query = text, error = %e, "Autocomplete lookup failed");
                Vec::new()
            }
        }
    }

    /// Resolve each place in order, keeping one slot per place.
    ///
    /// Requests are issued sequentially, never concurrently, so the provider
    /// sees them in list order.
    pub async fn resolve_each<S: AsRef<str>>(&self, places: &[S]) -> Vec<Option<Coordinate>> {
        let mut resolved = Vec::with_capacity(places.len());
        for place in places {
            resolved.push(self.resolve_one(place.as_ref()).await);
        }
        resolved
    }

    /// Resolve each place in order, dropping the ones that fail.
    ///
    /// The result can be shorter than `places` and is then no longer
    /// index-aligned with it. Use [`Resolver::resolve_each`] to keep
    /// alignment.
    pub async fn resolve_all<S: AsRef<str>>(&self, places: &[S]) -> Vec<Coordinate> {
        self.resolve_each(places).await.into_iter().flatten().collect()
    }
}
