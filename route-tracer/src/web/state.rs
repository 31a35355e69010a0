//! Application state for the web layer.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::animation::{AnimationConfig, AnimationController, HeadlessMap, TracingCues};
use crate::autocomplete::{Autocomplete, AutocompleteConfig};
use crate::geocode::{Geocoder, Resolver};
use crate::geolocate::InitialView;
use crate::itinerary::{Itinerary, ResolutionRequest};

use super::frames::FrameClock;

/// The itinerary served over HTTP, drawn on an in-memory map.
pub type ServerItinerary = Itinerary<HeadlessMap, TracingCues>;

/// Shared handle to the served itinerary.
pub type SharedItinerary = Arc<Mutex<ServerItinerary>>;

/// The newest background resolution pass.
#[derive(Debug, Default)]
struct PendingResolution {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
pub struct AppState<G> {
    /// The single itinerary, locked for every command
    pub itinerary: SharedItinerary,

    /// Suggestion pipeline for the place input
    pub autocomplete: Autocomplete<G>,

    /// Resolver used for full-list passes
    pub resolver: Resolver<G>,

    /// Timestamps for frames and pause commands
    pub clock: FrameClock,

    pending: Arc<Mutex<PendingResolution>>,
}

impl<G> Clone for AppState<G> {
    fn clone(&self) -> Self {
        Self {
            itinerary: Arc::clone(&self.itinerary),
            autocomplete: self.autocomplete.clone(),
            resolver: self.resolver.clone(),
            clock: self.clock,
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<G: Geocoder + 'static> AppState<G> {
    /// Create a new app state with an empty itinerary.
    pub fn new(
        resolver: Resolver<G>,
        view: InitialView,
        animation: AnimationConfig,
        autocomplete: &AutocompleteConfig,
    ) -> Self {
        let map = HeadlessMap::new(view.center, view.zoom);
        let controller = AnimationController::new(map, TracingCues, animation);

        Self {
            itinerary: Arc::new(Mutex::new(Itinerary::new(controller))),
            autocomplete: Autocomplete::new(resolver.clone(), autocomplete),
            resolver,
            clock: FrameClock::start(),
            pending: Arc::new(Mutex::new(PendingResolution::default())),
        }
    }

    /// Run a resolution pass in the background and apply it when done.
    ///
    /// The itinerary lock is not held while the geocoder is queried. Starting
    /// a pass aborts the previous one; a request older than the pass already
    /// running is dropped without querying anything.
    pub async fn resolve_in_background(&self, request: ResolutionRequest) {
        let mut pending = self.pending.lock().await;
        let generation = request.generation();
        if generation <= pending.generation {
            debug!(generation, latest = pending.generation, "Skipping superseded resolution");
            return;
        }

        if let Some(previous) = pending.task.take() {
            debug!(generation = pending.generation, "Aborting superseded resolution");
            previous.abort();
        }

        let itinerary = Arc::clone(&self.itinerary);
        let resolver = self.resolver.clone();
        pending.generation = generation;
        pending.task = Some(tokio::spawn(async move {
            let resolution = request.run(&resolver).await;
            if !itinerary.lock().await.apply_resolution(resolution) {
                debug!(generation, "Resolution superseded by a newer place list");
            }
        }));
    }
}
