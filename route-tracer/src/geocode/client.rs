//! Forward-geocoding HTTP client.

use reqwest::Url;
use tracing::debug;

use super::error::GeocodeError;
use super::resolver::Geocoder;
use super::types::{Feature, QueryMode, parse_features};

/// Default base URL for the forward-geocoding endpoint.
const DEFAULT_BASE_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Default number of candidates requested in autocomplete mode.
const DEFAULT_CANDIDATE_LIMIT: u8 = 5;

/// Configuration for the geocoding client.
#[derive(Debug, Clone)]
pub struct GeocodeConfig {
    /// Access token, sent as the `access_token` query parameter.
    /// `None` disables every request.
    pub access_token: Option<String>,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum candidates per autocomplete request
    pub candidate_limit: u8,
}

impl GeocodeConfig {
    /// Create a config with the given access token.
    ///
    /// Blank tokens are treated as missing.
    pub fn new(access_token: Option<String>) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.trim().is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            candidate_limit: DEFAULT_CANDIDATE_LIMIT,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the autocomplete candidate limit.
    pub fn with_candidate_limit(mut self, limit: u8) -> Self {
        self.candidate_limit = limit;
        self
    }
}

/// Client for a forward-geocoding HTTP API.
#[derive(Debug, Clone)]
pub struct GeocodeClient {
    http: reqwest::Client,
    base_url: String,
    access_token: Option<String>,
    candidate_limit: u8,
}

impl GeocodeClient {
    /// Create a new geocoding client.
    ///
    /// A missing access token is not an error here; requests fail with
    /// [`GeocodeError::NotConfigured`] instead.
    pub fn new(config: GeocodeConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            access_token: config.access_token,
            candidate_limit: config.candidate_limit,
        })
    }

    /// Build the request URL for a query.
    ///
    /// The query becomes a single percent-encoded path segment.
    fn request_url(&self, token: &str, query: &str, mode: QueryMode) -> Result<Url, GeocodeError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| GeocodeError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| GeocodeError::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .push(&format!("{query}.json"));

        let limit = match mode {
            QueryMode::BestMatch => 1,
            QueryMode::Autocomplete => self.candidate_limit,
        };

        url.query_pairs_mut()
            .append_pair("access_token", token)
            .append_pair("autocomplete", &mode.is_autocomplete().to_string())
            .append_pair("limit", &limit.to_string());

        Ok(url)
    }
}

impl Geocoder for GeocodeClient {
    async fn forward(&self, query: &str, mode: QueryMode) -> Result<Vec<Feature>, GeocodeError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or_else(|| GeocodeError::NotConfigured("missing access token".to_string()))?;

        let url = self.request_url(token, query, mode)?;
        debug!(query, ?mode, "Forward geocode request");

        let response = self.http.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(GeocodeError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        parse_features(&body)
    }

    fn is_configured(&self) -> bool {
        self.access_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = GeocodeConfig::new(Some("pk.test".into()));
        assert_eq!(config.access_token.as_deref(), Some("pk.test"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.candidate_limit, 5);
    }

    #[test]
    fn config_builder() {
        let config = GeocodeConfig::new(Some("pk.test".into()))
            .with_base_url("http://localhost:8080/geocode")
            .with_timeout(5)
            .with_candidate_limit(8);

        assert_eq!(config.base_url, "http://localhost:8080/geocode");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.candidate_limit, 8);
    }

    #[test]
    fn blank_token_is_missing() {
        assert!(GeocodeConfig::new(Some("  ".into())).access_token.is_none());
        assert!(GeocodeConfig::new(None).access_token.is_none());
    }

    #[test]
    fn request_url_encodes_query() {
        let client = GeocodeClient::new(GeocodeConfig::new(Some("pk.test".into()))).unwrap();
        let url = client
            .request_url("pk.test", "São Paulo/Brazil", QueryMode::BestMatch)
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.mapbox.com/geocoding/v5/mapbox.places/S%C3%A3o%20Paulo%2FBrazil.json?access_token=pk.test&autocomplete=false&limit=1"
        );
    }

    #[test]
    fn request_url_autocomplete_uses_candidate_limit() {
        let config = GeocodeConfig::new(Some("pk.test".into()))
            .with_base_url("http://localhost:9000/places/")
            .with_candidate_limit(3);
        let client = GeocodeClient::new(config).unwrap();
        let url = client
            .request_url("pk.test", "lon", QueryMode::Autocomplete)
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://localhost:9000/places/lon.json?access_token=pk.test&autocomplete=true&limit=3"
        );
    }

    #[tokio::test]
    async fn unconfigured_client_fails_without_network() {
        let client = GeocodeClient::new(GeocodeConfig::new(None)).unwrap();
        assert!(!client.is_configured());

        let err = client
            .forward("Paris", QueryMode::BestMatch)
            .await
            .unwrap_err();
        assert!(matches!(err, GeocodeError::NotConfigured(_)));
    }
    mod stub {
        use std::collections::HashMap;

        use axum::{
            Router,
            extract::{Path, Query},
            http::StatusCode,
            routing::get,
        };

        const PLACES: &str = r#"{
            "features": [
                {"id": "place.1", "place_name": "Paris, France", "center": [2.35, 48.85], "relevance": 1},
                {"id": "place.2", "place_name": "Nowhere", "center": [500.0, 0.0]}
            ]
        }"#;

        async fn places(
            Path(file): Path<String>,
            Query(params): Query<HashMap<String, String>>,
        ) -> (StatusCode, String) {
            if params.get("access_token").map(String::as_str) != Some("pk.test") {
                return (StatusCode::UNAUTHORIZED, "bad token".to_string());
            }
            match file.as_str() {
                "forbidden.json" => (StatusCode::FORBIDDEN, String::new()),
                "busy.json" => (StatusCode::TOO_MANY_REQUESTS, String::new()),
                "broken.json" => (StatusCode::BAD_GATEWAY, "upstream down".to_string()),
                "garbled.json" => (StatusCode::OK, "<html>".to_string()),
                _ => (StatusCode::OK, PLACES.to_string()),
            }
        }

        /// Serve a fake geocoding API on an ephemeral port, returning its base URL.
        pub async fn serve() -> String {
            let app = Router::new().route("/places/:file", get(places));
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
            format!("http://{addr}/places")
        }
    }

    async fn stub_client(token: &str) -> GeocodeClient {
        let config = GeocodeConfig::new(Some(token.to_string())).with_base_url(stub::serve().await);
        GeocodeClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn success_skips_malformed_features() {
        let client = stub_client("pk.test").await;
        let features = client.forward("paris", QueryMode::Autocomplete).await.unwrap();

        assert_eq!(features.len(), 1);
        assert_eq!(features[0].place_name, "Paris, France");
        assert_eq!(features[0].center.lon(), 2.35);
        assert!(features[0].properties.contains_key("relevance"));
    }

    #[tokio::test]
    async fn auth_failures_map_to_unauthorized() {
        let client = stub_client("pk.wrong").await;
        let err = client.forward("paris", QueryMode::BestMatch).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Unauthorized), "{err:?}");

        let client = stub_client("pk.test").await;
        let err = client.forward("forbidden", QueryMode::BestMatch).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Unauthorized), "{err:?}");
    }

    #[tokio::test]
    async fn too_many_requests_maps_to_rate_limited() {
        let client = stub_client("pk.test").await;
        let err = client.forward("busy", QueryMode::Autocomplete).await.unwrap_err();
        assert!(matches!(err, GeocodeError::RateLimited), "{err:?}");
    }

    #[tokio::test]
    async fn other_statuses_map_to_api_error() {
        let client = stub_client("pk.test").await;
        let err = client.forward("broken", QueryMode::BestMatch).await.unwrap_err();
        match err {
            GeocodeError::Api { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "upstream down");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unparseable_body_maps_to_json_error() {
        let client = stub_client("pk.test").await;
        let err = client.forward("garbled", QueryMode::BestMatch).await.unwrap_err();
        assert!(matches!(err, GeocodeError::Json { .. }), "{err:?}");
    }
}
