//! Wire types for forward-geocoding responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::Coordinate;

use super::error::GeocodeError;

/// Which kind of forward-geocode request to issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryMode {
    /// Single best match for a confirmed place name.
    BestMatch,
    /// Ranked candidate list for partially typed text.
    Autocomplete,
}

impl QueryMode {
    pub fn is_autocomplete(self) -> bool {
        matches!(self, QueryMode::Autocomplete)
    }
}

/// Top-level response: `{ "features": [...] }`.
///
/// Features are kept as raw JSON here so that one malformed entry does not
/// discard the whole ranking.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Value>,
}

/// A single geocoding result.
///
/// Fields the core does not use are preserved in `properties` so that the
/// raw provider record can be handed back to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub place_name: String,
    pub center: Coordinate,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Feature {
    /// Build a feature with no extra properties.
    pub fn new(id: impl Into<String>, place_name: impl Into<String>, center: Coordinate) -> Self {
        Self {
            id: id.into(),
            place_name: place_name.into(),
            center,
            properties: Map::new(),
        }
    }
}

/// A ranked autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    /// Canonical place name, appended to the place list on confirmation.
    pub name: String,
    /// Opaque provider id.
    pub id: String,
    /// The full provider record.
    pub raw: Feature,
}

impl From<Feature> for Suggestion {
    fn from(feature: Feature) -> Self {
        Self {
            name: feature.place_name.clone(),
            id: feature.id.clone(),
            raw: feature,
        }
    }
}

/// Parse a response body into features, in provider rank order.
///
/// Entries that lack an id, name, or valid `center` are skipped.
pub fn parse_features(body: &str) -> Result<Vec<Feature>, GeocodeError> {
    let collection: FeatureCollection =
        serde_json::from_str(body).map_err(|e| GeocodeError::Json {
            message: e.to_string(),
        })?;

    let features = collection
        .features
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<Feature>(value) {
            Ok(feature) => Some(feature),
            Err(e) => {
                debug!(error = %e, "Skipping malformed feature");
                None
            }
        })
        .collect();

    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "id": "place.123",
                "type": "Feature",
                "place_name": "Paris, France",
                "center": [2.35, 48.85],
                "relevance": 1
            },
            {
                "id": "place.456",
                "place_name": "Paris, Texas, United States",
                "center": [-95.55, 33.66]
            }
        ]
    }"#;

    #[test]
    fn parses_ranked_features() {
        let features = parse_features(PARIS).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].place_name, "Paris, France");
        assert_eq!(features[0].center, Coordinate::new(2.35, 48.85).unwrap());
        assert_eq!(features[1].id, "place.456");
    }

    #[test]
    fn keeps_unknown_fields_as_properties() {
        let features = parse_features(PARIS).unwrap();
        assert_eq!(features[0].properties.get("relevance"), Some(&Value::from(1)));
        assert_eq!(
            features[0].properties.get("type"),
            Some(&Value::from("Feature"))
        );
    }

    #[test]
    fn skips_features_with_bad_center() {
        let body = r#"{"features": [
            {"id": "a", "place_name": "Nowhere", "center": [500.0, 0.0]},
            {"id": "b", "place_name": "Missing"},
            {"id": "c", "place_name": "Oslo, Norway", "center": [10.75, 59.91]}
        ]}"#;
        let features = parse_features(body).unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].id, "c");
    }

    #[test]
    fn empty_and_missing_feature_list() {
        assert!(parse_features(r#"{"features": []}"#).unwrap().is_empty());
        assert!(parse_features("{}").unwrap().is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = parse_features("not json").unwrap_err();
        assert!(matches!(err, GeocodeError::Json { .. }));
    }

    #[test]
    fn suggestion_from_feature() {
        let feature = Feature::new("place.1", "Tokyo, Japan", Coordinate::new(139.69, 35.68).unwrap());
        let suggestion = Suggestion::from(feature.clone());
        assert_eq!(suggestion.name, "Tokyo, Japan");
        assert_eq!(suggestion.id, "place.1");
        assert_eq!(suggestion.raw, feature);
    }
}
