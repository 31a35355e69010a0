//! The place list and everything derived from it.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::animation::{AnimationController, AnimationState, CueSink, MapAdapter};
use crate::domain::{Coordinate, PlaceList, SpeedMultiplier};
use crate::estimate::RouteEstimate;

use super::resolution::{Resolution, ResolutionRequest};

/// Observable state of an [`Itinerary`].
#[derive(Debug, Clone, Serialize)]
pub struct ItinerarySnapshot {
    pub places: PlaceList,
    /// One slot per place; `None` for places that could not be resolved.
    pub resolved: Vec<Option<Coordinate>>,
    /// Resolved coordinates in order, as played back.
    pub coordinates: Vec<Coordinate>,
    /// Whether a resolution pass for the current list is outstanding.
    pub resolving: bool,
    pub distance_km: f64,
    pub eta_hours: f64,
    pub state: AnimationState,
    pub current_segment: Option<usize>,
    pub animating: bool,
    pub paused: bool,
    pub speed: SpeedMultiplier,
    pub muted: bool,
}

/// Place list, its resolution, the route estimate, and the playback
/// controller, kept consistent with each other.
///
/// Every list mutation stops playback on the spot and hands back a
/// [`ResolutionRequest`]. The caller runs it and feeds the result to
/// [`Itinerary::apply_resolution`]; results from superseded requests are
/// dropped there.
pub struct Itinerary<M, S> {
    places: PlaceList,
    resolved: Vec<Option<Coordinate>>,
    estimate: RouteEstimate,
    controller: AnimationController<M, S>,
    /// Generation of the most recent request handed out.
    generation: u64,
    /// Generation of the most recent resolution applied.
    applied: u64,
}

impl<M: MapAdapter, S: CueSink> Itinerary<M, S> {
    pub fn new(controller: AnimationController<M, S>) -> Self {
        Self {
            places: PlaceList::new(),
            resolved: Vec::new(),
            estimate: RouteEstimate::default(),
            controller,
            generation: 0,
            applied: 0,
        }
    }

    pub fn places(&self) -> &PlaceList {
        &self.places
    }

    pub fn estimate(&self) -> RouteEstimate {
        self.estimate
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        self.controller.coordinates()
    }

    pub fn controller(&self) -> &AnimationController<M, S> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut AnimationController<M, S> {
        &mut self.controller
    }

    pub fn map(&self) -> &M {
        self.controller.map()
    }

    pub fn map_mut(&mut self) -> &mut M {
        self.controller.map_mut()
    }

    /// Whether the latest list change is still waiting for its resolution.
    pub fn is_resolving(&self) -> bool {
        self.applied < self.generation
    }

    /// Append a place. Blank names are ignored.
    pub fn add_place(&mut self, name: &str) -> Option<ResolutionRequest> {
        if !self.places.push(name) {
            debug!(name, "Ignoring blank place");
            return None;
        }
        info!(name = name.trim(), places = self.places.len(), "Place added");
        Some(self.list_changed())
    }

    /// Remove the place at `index`. Out-of-range indices are ignored.
    pub fn remove_place(&mut self, index: usize) -> Option<ResolutionRequest> {
        let Some(name) = self.places.remove(index) else {
            debug!(index, places = self.places.len(), "Ignoring removal of unknown place");
            return None;
        };
        info!(%name, index, places = self.places.len(), "Place removed");
        Some(self.list_changed())
    }

    /// Drop everything derived from the old list in the same step as the
    /// mutation, so no caller sees stale coordinates next to the new list.
    fn list_changed(&mut self) -> ResolutionRequest {
        self.controller.set_coordinates(Vec::new());
        self.estimate = RouteEstimate::default();
        self.resolved = vec![None; self.places.len()];
        self.generation += 1;
        ResolutionRequest::new(self.generation, self.places.as_slice().to_vec())
    }

    /// Install a finished resolution pass.
    ///
    /// Returns `false` and changes nothing if a newer request has been handed
    /// out since this one.
    pub fn apply_resolution(&mut self, resolution: Resolution) -> bool {
        if resolution.generation != self.generation {
            debug!(
                generation = resolution.generation,
                latest = self.generation,
                "Discarding stale resolution"
            );
            return false;
        }

        let coords = resolution.coordinates();
        self.estimate = RouteEstimate::for_route(&coords);
        self.resolved = resolution.resolved;
        self.applied = resolution.generation;
        self.controller.set_coordinates(coords);

        info!(
            stops = self.coordinates().len(),
            places = self.places.len(),
            distance_km = self.estimate.distance_km,
            "Route updated"
        );
        true
    }

    /// Start playback. Refused while a resolution pass is outstanding.
    pub fn request_animation(&mut self) -> bool {
        if self.is_resolving() {
            debug!(generation = self.generation, "Ignoring start while resolving");
            return false;
        }
        self.controller.request()
    }

    /// Pause or resume at frame timestamp `now`, on the same clock as `tick`.
    pub fn toggle_pause(&mut self, now: Duration) -> bool {
        self.controller.toggle_pause(now)
    }

    pub fn set_speed(&mut self, speed: SpeedMultiplier) -> bool {
        self.controller.set_speed(speed)
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.controller.toggle_sound()
    }

    pub fn tick(&mut self, now: Duration) {
        self.controller.tick(now);
    }

    pub fn camera_settled(&mut self) {
        self.controller.camera_settled();
    }

    pub fn snapshot(&self) -> ItinerarySnapshot {
        let controller = &self.controller;
        ItinerarySnapshot {
            places: self.places.clone(),
            resolved: self.resolved.clone(),
            coordinates: controller.coordinates().to_vec(),
            resolving: self.is_resolving(),
            distance_km: self.estimate.distance_km,
            eta_hours: self.estimate.eta_hours,
            state: controller.state(),
            current_segment: controller.current_segment(),
            animating: controller.is_animating(),
            paused: controller.is_paused(),
            speed: controller.speed(),
            muted: controller.is_muted(),
        }
    }
}
