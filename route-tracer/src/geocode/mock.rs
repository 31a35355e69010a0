//! Mock geocoder for development and testing without API access.
//!
//! Serves lookups from an in-memory gazetteer, optionally loaded from a
//! JSON fixture file.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::Coordinate;

use super::error::GeocodeError;
use super::resolver::Geocoder;
use super::types::{Feature, QueryMode};

/// Fixture file layout: `{ "places": [{ "name": ..., "center": [lon, lat] }] }`.
#[derive(Debug, Deserialize)]
struct Fixture {
    places: Vec<FixturePlace>,
}

#[derive(Debug, Deserialize)]
struct FixturePlace {
    name: String,
    center: Coordinate,
}

/// Geocoder backed by a fixed list of named places.
///
/// Best-match lookups prefer an exact (case-insensitive) name match, then
/// the first name starting with the query. Autocomplete lookups return
/// every name starting with the query, in insertion order.
#[derive(Debug, Default)]
pub struct MockGeocoder {
    features: Vec<Feature>,
    failing: HashSet<String>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<(String, QueryMode)>>,
}

impl MockGeocoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a gazetteer from a JSON fixture file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| GeocodeError::Api {
            status: 0,
            message: format!("Failed to read {:?}: {}", path, e),
        })?;

        let fixture: Fixture = serde_json::from_str(&json).map_err(|e| GeocodeError::Json {
            message: format!("Failed to parse {:?}: {}", path, e),
        })?;

        let mut mock = Self::new();
        for place in fixture.places {
            mock.push(place.name, place.center);
        }
        Ok(mock)
    }

    /// Add a place to the gazetteer.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of range; this is a fixture builder.
    pub fn with_place(mut self, name: &str, lon: f64, lat: f64) -> Self {
        let center = Coordinate::new(lon, lat).expect("fixture coordinate out of range");
        self.push(name.to_string(), center);
        self
    }

    /// Make every request for `query` fail as if the network were down.
    pub fn failing_on(mut self, query: &str) -> Self {
        self.failing.insert(normalize(query));
        self
    }

    /// Delay responses to `query` by `delay` before answering.
    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(normalize(query), delay);
        self
    }

    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<(String, QueryMode)> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    fn push(&mut self, name: String, center: Coordinate) {
        let id = format!("mock.{}", self.features.len());
        self.features.push(Feature::new(id, name, center));
    }

    fn lookup(&self, query: &str, mode: QueryMode) -> Vec<Feature> {
        let query = normalize(query);
        let prefix_matches = self
            .features
            .iter()
            .filter(|f| f.place_name.to_lowercase().starts_with(&query));

        match mode {
            QueryMode::Autocomplete => prefix_matches.cloned().collect(),
            QueryMode::BestMatch => self
                .features
                .iter()
                .find(|f| f.place_name.to_lowercase() == query)
                .or_else(|| prefix_matches.clone().next())
                .cloned()
                .into_iter()
                .collect(),
        }
    }
}

impl Geocoder for MockGeocoder {
    async fn forward(&self, query: &str, mode: QueryMode) -> Result<Vec<Feature>, GeocodeError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((query.to_string(), mode));
        }

        let key = normalize(query);
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(&key) {
            return Err(GeocodeError::Api {
                status: 503,
                message: format!("mock failure for {query}"),
            });
        }

        Ok(self.lookup(query, mode))
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn best_match_prefers_exact_name() {
        let mock = MockGeocoder::new()
            .with_place("Paris, Texas", -95.55, 33.66)
            .with_place("Paris", 2.35, 48.85);

        let features = mock.forward("PARIS", QueryMode::BestMatch).await.unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].place_name, "Paris");
    }

    #[tokio::test]
    async fn best_match_falls_back_to_prefix() {
        let mock = MockGeocoder::new().with_place("Tokyo, Japan", 139.69, 35.68);
        let features = mock.forward("tokyo", QueryMode::BestMatch).await.unwrap();
        assert_eq!(features[0].place_name, "Tokyo, Japan");
    }

    #[tokio::test]
    async fn autocomplete_returns_all_prefix_matches() {
        let mock = MockGeocoder::new()
            .with_place("Berlin", 13.4, 52.52)
            .with_place("Bern", 7.45, 46.95)
            .with_place("Oslo", 10.75, 59.91);

        let features = mock.forward("ber", QueryMode::Autocomplete).await.unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id, "mock.0");
        assert_eq!(features[1].id, "mock.1");
    }

    #[tokio::test]
    async fn failing_query_errors() {
        let mock = MockGeocoder::new().failing_on("oslo");
        assert!(mock.forward(" Oslo ", QueryMode::BestMatch).await.is_err());
    }

    #[tokio::test]
    async fn records_requests() {
        let mock = MockGeocoder::new();
        let _ = mock.forward("a", QueryMode::Autocomplete).await;
        let _ = mock.forward("b", QueryMode::BestMatch).await;
        assert_eq!(
            mock.requests(),
            vec![
                ("a".to_string(), QueryMode::Autocomplete),
                ("b".to_string(), QueryMode::BestMatch),
            ]
        );
    }

    #[test]
    fn load_fixture_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        std::fs::write(
            &path,
            r#"{"places": [
                {"name": "Paris, France", "center": [2.35, 48.85]},
                {"name": "Tokyo, Japan", "center": [139.69, 35.68]}
            ]}"#,
        )
        .unwrap();

        let mock = MockGeocoder::from_file(&path).unwrap();
        assert_eq!(mock.len(), 2);
    }

    #[test]
    fn fixture_with_bad_coordinate_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.json");
        std::fs::write(&path, r#"{"places": [{"name": "X", "center": [0, 100]}]}"#).unwrap();

        assert!(MockGeocoder::from_file(&path).is_err());
    }

    #[test]
    fn missing_fixture_file() {
        assert!(MockGeocoder::from_file("/nonexistent/places.json").is_err());
    }
}
