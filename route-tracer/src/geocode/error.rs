//! Geocoding error types.

/// Errors that can occur when talking to the geocoding service.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Access token rejected
    #[error("unauthorized: check MAPBOX_ACCESS_TOKEN")]
    Unauthorized,

    /// Rate limited by the provider
    #[error("rate limited by geocoding provider")]
    RateLimited,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Request URL could not be built from the base URL and query
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),

    /// No access token was configured, so no request was made
    #[error("geocoding not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GeocodeError::Api {
            status: 500,
            message: "Internal Server Error".into(),
        };
        assert_eq!(err.to_string(), "API error 500: Internal Server Error");

        let err = GeocodeError::NotConfigured("missing access token".into());
        assert_eq!(
            err.to_string(),
            "geocoding not configured: missing access token"
        );

        let err = GeocodeError::Json {
            message: "expected value".into(),
        };
        assert!(err.to_string().contains("expected value"));
    }
}
