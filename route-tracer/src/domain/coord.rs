//! Geographic coordinate types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when constructing a coordinate outside the valid range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lon}, {lat}): {reason}")]
pub struct InvalidCoordinate {
    lon: f64,
    lat: f64,
    reason: &'static str,
}

/// A (longitude, latitude) pair in degrees.
///
/// Longitude is always in `[-180, 180]` and latitude in `[-90, 90]`.
/// The order follows the geocoding wire format (`center: [lon, lat]`).
///
/// # Examples
///
/// ```
/// use route_tracer::domain::Coordinate;
///
/// let paris = Coordinate::new(2.35, 48.85).unwrap();
/// assert_eq!(paris.lon(), 2.35);
///
/// // Latitude beyond the pole is rejected
/// assert!(Coordinate::new(0.0, 91.0).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    lon: f64,
    lat: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both components.
    pub fn new(lon: f64, lat: f64) -> Result<Self, InvalidCoordinate> {
        let invalid = |reason| InvalidCoordinate { lon, lat, reason };

        if !lon.is_finite() || !lat.is_finite() {
            return Err(invalid("components must be finite"));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(invalid("longitude must be within [-180, 180]"));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(invalid("latitude must be within [-90, 90]"));
        }

        Ok(Self { lon, lat })
    }

    /// Build a coordinate from components already known to be in range.
    pub(crate) const fn from_trusted(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Linear interpolation between two coordinates.
    ///
    /// `f` is expected in `[0, 1]`; the result stays in range because both
    /// endpoints are valid and the combination is convex.
    pub fn lerp(&self, to: &Coordinate, f: f64) -> Coordinate {
        let f = f.clamp(0.0, 1.0);
        Coordinate {
            lon: self.lon + (to.lon - self.lon) * f,
            lat: self.lat + (to.lat - self.lat) * f,
        }
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinate::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(c: Coordinate) -> Self {
        [c.lon, c.lat]
    }
}

impl fmt::Debug for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coordinate({}, {})", self.lon, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lon, self.lat)
    }
}

/// Axis-aligned bounding box over a set of coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    /// South-west corner (min lon, min lat).
    pub south_west: Coordinate,
    /// North-east corner (max lon, max lat).
    pub north_east: Coordinate,
}

impl Bounds {
    /// Smallest box containing every coordinate, or `None` for an empty slice.
    pub fn enclosing(coords: &[Coordinate]) -> Option<Self> {
        let first = coords.first()?;
        let mut sw = *first;
        let mut ne = *first;

        for c in &coords[1..] {
            sw.lon = sw.lon.min(c.lon);
            sw.lat = sw.lat.min(c.lat);
            ne.lon = ne.lon.max(c.lon);
            ne.lat = ne.lat.max(c.lat);
        }

        Some(Self {
            south_west: sw,
            north_east: ne,
        })
    }

    pub fn contains(&self, c: &Coordinate) -> bool {
        (self.south_west.lon..=self.north_east.lon).contains(&c.lon)
            && (self.south_west.lat..=self.north_east.lat).contains(&c.lat)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any in-range pair constructs successfully
        #[test]
        fn in_range_always_valid(lon in -180.0f64..=180.0, lat in -90.0f64..=90.0) {
            let c = Coordinate::new(lon, lat).unwrap();
            prop_assert_eq!(c.lon(), lon);
            prop_assert_eq!(c.lat(), lat);
        }

        /// Latitudes beyond the poles are always rejected
        #[test]
        fn polar_overflow_rejected(lon in -180.0f64..=180.0, lat in 90.0001f64..1000.0) {
            prop_assert!(Coordinate::new(lon, lat).is_err());
            prop_assert!(Coordinate::new(lon, -lat).is_err());
        }

        /// Interpolated points stay inside the endpoints' bounding box
        #[test]
        fn lerp_stays_within_bounds(
            a_lon in -180.0f64..=180.0, a_lat in -90.0f64..=90.0,
            b_lon in -180.0f64..=180.0, b_lat in -90.0f64..=90.0,
            f in 0.0f64..=1.0,
        ) {
            let a = Coordinate::new(a_lon, a_lat).unwrap();
            let b = Coordinate::new(b_lon, b_lat).unwrap();
            let bounds = Bounds::enclosing(&[a, b]).unwrap();
            let p = a.lerp(&b, f);
            // Allow for rounding at the edges
            prop_assert!(p.lon() >= bounds.south_west.lon() - 1e-9);
            prop_assert!(p.lon() <= bounds.north_east.lon() + 1e-9);
            prop_assert!(p.lat() >= bounds.south_west.lat() - 1e-9);
            prop_assert!(p.lat() <= bounds.north_east.lat() + 1e-9);
        }
    }
}
