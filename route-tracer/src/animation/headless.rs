//! In-memory map surface.
//!
//! Keeps the markers, routes, and camera the controller has asked for so
//! that a host without a real renderer (the HTTP shell, tests) can inspect
//! them. Camera flights settle on the next frame.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tracing::trace;

use crate::domain::{Bounds, Coordinate};

use super::map::{MapAdapter, MarkerId, MarkerKind, RouteId, RouteStyle};

/// A marker as currently drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerView {
    pub id: MarkerId,
    pub position: Coordinate,
    pub kind: MarkerKind,
}

/// A route polyline as currently drawn.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteView {
    pub id: RouteId,
    pub path: Vec<Coordinate>,
    pub style: RouteStyle,
    pub dash: &'static [f64],
}

/// Current camera position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraView {
    pub center: Coordinate,
    pub zoom: f64,
    /// Box framed by the last `fit_bounds`, until the next camera move.
    pub fitted: Option<Bounds>,
    /// Whether a flight is waiting to settle.
    pub in_flight: bool,
}

/// Serializable view of the whole surface.
#[derive(Debug, Clone, Serialize)]
pub struct MapSnapshot {
    pub markers: Vec<MarkerView>,
    pub routes: Vec<RouteView>,
    pub camera: CameraView,
    pub revision: u64,
}

/// Map surface that only records state.
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    next_id: u64,
    markers: BTreeMap<MarkerId, (Coordinate, MarkerKind)>,
    routes: BTreeMap<RouteId, (Vec<Coordinate>, RouteStyle)>,
    camera: CameraView,
    /// Bumped on every visible change.
    revision: u64,
}

impl HeadlessMap {
    /// Create an empty surface with the camera at `center`/`zoom`.
    pub fn new(center: Coordinate, zoom: f64) -> Self {
        Self {
            next_id: 0,
            markers: BTreeMap::new(),
            routes: BTreeMap::new(),
            camera: CameraView {
                center,
                zoom,
                fitted: None,
                in_flight: false,
            },
            revision: 0,
        }
    }

    /// Report (once) that a pending camera flight has finished.
    pub fn take_camera_settled(&mut self) -> bool {
        std::mem::replace(&mut self.camera.in_flight, false)
    }

    pub fn camera(&self) -> &CameraView {
        &self.camera
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn marker(&self, id: MarkerId) -> Option<Coordinate> {
        self.markers.get(&id).map(|(at, _)| *at)
    }

    /// Positions of all markers of one kind, in creation order.
    pub fn markers_of(&self, kind: MarkerKind) -> Vec<Coordinate> {
        self.markers
            .values()
            .filter(|(_, k)| *k == kind)
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn route(&self, id: RouteId) -> Option<&[Coordinate]> {
        self.routes.get(&id).map(|(path, _)| path.as_slice())
    }

    /// Paths of all routes of one style, in creation order.
    pub fn routes_of(&self, style: RouteStyle) -> Vec<&[Coordinate]> {
        self.routes
            .values()
            .filter(|(_, s)| *s == style)
            .map(|(path, _)| path.as_slice())
            .collect()
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            markers: self
                .markers
                .iter()
                .map(|(id, (position, kind))| MarkerView {
                    id: *id,
                    position: *position,
                    kind: *kind,
                })
                .collect(),
            routes: self
                .routes
                .iter()
                .map(|(id, (path, style))| RouteView {
                    id: *id,
                    path: path.clone(),
                    style: *style,
                    dash: style.dash_pattern(),
                })
                .collect(),
            camera: self.camera,
            revision: self.revision,
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn touch(&mut self) {
        self.revision += 1;
    }
}

impl MapAdapter for HeadlessMap {
    fn add_marker(&mut self, at: Coordinate, kind: MarkerKind) -> MarkerId {
        let id = MarkerId(self.next_id());
        self.markers.insert(id, (at, kind));
        self.touch();
        id
    }

    fn move_marker(&mut self, id: MarkerId, to: Coordinate) {
        if let Some((at, _)) = self.markers.get_mut(&id) {
            *at = to;
            self.touch();
        } else {
            trace!(?id, "Ignoring move of unknown marker");
        }
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.touch();
        }
    }

    fn add_route(&mut self, path: &[Coordinate], style: RouteStyle) -> RouteId {
        let id = RouteId(self.next_id());
        self.routes.insert(id, (path.to_vec(), style));
        self.touch();
        id
    }

    fn update_route(&mut self, id: RouteId, path: &[Coordinate]) {
        if let Some((current, _)) = self.routes.get_mut(&id) {
            current.clear();
            current.extend_from_slice(path);
            self.touch();
        } else {
            trace!(?id, "Ignoring update of unknown route");
        }
    }

    fn remove_route(&mut self, id: RouteId) {
        if self.routes.remove(&id).is_some() {
            self.touch();
        }
    }

    fn fly_to(&mut self, center: Coordinate, zoom: f64) {
        self.camera = CameraView {
            center,
            zoom,
            fitted: None,
            in_flight: true,
        };
        self.touch();
    }

    fn ease_to(&mut self, center: Coordinate, zoom: f64, _duration: Duration) {
        self.camera.center = center;
        self.camera.zoom = zoom;
        self.camera.fitted = None;
        self.touch();
    }

    fn fit_bounds(&mut self, bounds: Bounds, _padding: f64) {
        self.camera.center = bounds.south_west.lerp(&bounds.north_east, 0.5);
        self.camera.fitted = Some(bounds);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lon: f64, lat: f64) -> Coordinate {
        Coordinate::new(lon, lat).unwrap()
    }

    fn map() -> HeadlessMap {
        HeadlessMap::new(c(0.0, 20.0), 1.5)
    }

    #[test]
    fn markers_lifecycle() {
        let mut map = map();
        let id = map.add_marker(c(1.0, 1.0), MarkerKind::Stop);
        map.move_marker(id, c(2.0, 2.0));
        assert_eq!(map.marker(id), Some(c(2.0, 2.0)));

        map.remove_marker(id);
        assert_eq!(map.marker(id), None);
        assert_eq!(map.marker_count(), 0);
    }

    #[test]
    fn routes_lifecycle() {
        let mut map = map();
        let id = map.add_route(&[c(0.0, 0.0)], RouteStyle::Progress);
        map.update_route(id, &[c(0.0, 0.0), c(1.0, 1.0)]);
        assert_eq!(map.route(id).map(<[_]>::len), Some(2));

        map.remove_route(id);
        assert_eq!(map.route_count(), 0);
    }

    #[test]
    fn fly_to_settles_once() {
        let mut map = map();
        assert!(!map.take_camera_settled());

        map.fly_to(c(2.35, 48.85), 8.0);
        assert!(map.camera().in_flight);
        assert!(map.take_camera_settled());
        assert!(!map.take_camera_settled());
        assert_eq!(map.camera().zoom, 8.0);
    }

    #[test]
    fn fit_bounds_centres_on_box() {
        let mut map = map();
        let bounds = Bounds::enclosing(&[c(0.0, 0.0), c(10.0, 20.0)]).unwrap();
        map.fit_bounds(bounds, 80.0);

        assert_eq!(map.camera().center, c(5.0, 10.0));
        assert_eq!(map.camera().fitted, Some(bounds));
    }

    #[test]
    fn unknown_handles_do_not_change_revision() {
        let mut map = map();
        let before = map.revision();
        map.move_marker(MarkerId(42), c(0.0, 0.0));
        map.remove_route(RouteId(7));
        assert_eq!(map.revision(), before);
    }

    #[test]
    fn snapshot_includes_dash_pattern() {
        let mut map = map();
        map.add_route(&[c(0.0, 0.0), c(1.0, 1.0)], RouteStyle::Complete);
        let snapshot = map.snapshot();
        assert_eq!(snapshot.routes[0].dash, &[2.0, 4.0]);
        assert!(snapshot.markers.is_empty());
    }
}
