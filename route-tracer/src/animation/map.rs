//! The map surface the controller draws on.
//!
//! The controller never renders anything itself; it issues marker, route,
//! and camera commands through a [`MapAdapter`] that it owns.

use std::time::Duration;

use serde::Serialize;

use crate::domain::{Bounds, Coordinate};

/// Handle to a marker created through a [`MapAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MarkerId(pub u64);

/// Handle to a polyline layer created through a [`MapAdapter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RouteId(pub u64);

/// What a marker represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// The moving marker during playback.
    Traveller,
    /// A resolved stop, shown once playback completes.
    Stop,
}

/// How a route polyline is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteStyle {
    /// The route traced so far during playback.
    Progress,
    /// The full route shown after playback completes.
    Complete,
}

impl RouteStyle {
    /// Line dash pattern (dash, gap) in line widths; empty means solid.
    pub fn dash_pattern(self) -> &'static [f64] {
        match self {
            RouteStyle::Progress => &[],
            RouteStyle::Complete => &[2.0, 4.0],
        }
    }
}

/// Commands the controller issues to the rendering surface.
///
/// Camera transitions are asynchronous on a real map. The host must call
/// `AnimationController::camera_settled` when the surface reports that a
/// `fly_to` has finished.
pub trait MapAdapter {
    fn add_marker(&mut self, at: Coordinate, kind: MarkerKind) -> MarkerId;

    fn move_marker(&mut self, id: MarkerId, to: Coordinate);

    fn remove_marker(&mut self, id: MarkerId);

    fn add_route(&mut self, path: &[Coordinate], style: RouteStyle) -> RouteId;

    fn update_route(&mut self, id: RouteId, path: &[Coordinate]);

    fn remove_route(&mut self, id: RouteId);

    /// Animated camera flight; completion is signalled as camera-settled.
    fn fly_to(&mut self, center: Coordinate, zoom: f64);

    /// Camera move over `duration`; zero means an immediate jump.
    fn ease_to(&mut self, center: Coordinate, zoom: f64, duration: Duration);

    /// Frame `bounds` with `padding` pixels on every side.
    fn fit_bounds(&mut self, bounds: Bounds, padding: f64);
}
