//! Route distance and travel-time estimation.
//!
//! The route is a straight polyline between resolved points, so distance
//! is the sum of great-circle legs and the ETA assumes a constant average
//! speed.

use serde::Serialize;

use crate::domain::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed average travel speed in km/h.
pub const AVERAGE_SPEED_KMH: f64 = 60.0;

/// Total distance and estimated travel time for a route.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    pub eta_hours: f64,
}

impl RouteEstimate {
    /// Estimate a route through `coords` in order.
    ///
    /// Fewer than two points yield a zero estimate.
    pub fn for_route(coords: &[Coordinate]) -> Self {
        if coords.len() < 2 {
            return Self::default();
        }

        let distance_km = coords.windows(2).map(|w| haversine_km(&w[0], &w[1])).sum();

        Self {
            distance_km,
            eta_hours: distance_km / AVERAGE_SPEED_KMH,
        }
    }

    pub fn eta_minutes(&self) -> f64 {
        self.eta_hours * 60.0
    }
}

/// Great-circle distance between two coordinates in kilometres.
pub fn haversine_km(a: &Coordinate, b: &Coordinate) -> f64 {
    let d_lat = (b.lat() - a.lat()).to_radians();
    let d_lon = (b.lon() - a.lon()).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat().to_radians().cos() * b.lat().to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}
