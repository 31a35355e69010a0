use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use route_tracer::animation::AnimationConfig;
use route_tracer::autocomplete::AutocompleteConfig;
use route_tracer::cache::{CacheConfig, CachedGeocoder};
use route_tracer::domain::Coordinate;
use route_tracer::geocode::{GeocodeClient, GeocodeConfig, Geocoder, MockGeocoder, Resolver};
use route_tracer::geolocate::{FixedLocation, initial_view};
use route_tracer::web::{AppState, FRAME_PERIOD, create_router, spawn_frame_loop};

/// How long to wait for the device position before using the world view.
const GEOLOCATION_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("route_tracer=info")),
        )
        .init();

    let addr = std::env::var("ROUTE_TRACER_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = match addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!(%addr, error = %e, "Invalid ROUTE_TRACER_ADDR");
            return ExitCode::FAILURE;
        }
    };

    let home = home_location();
    let cache_config = CacheConfig::default();

    // A fixture file replaces the live geocoder entirely
    let result = match std::env::var("ROUTE_TRACER_MOCK_DATA") {
        Ok(path) => match MockGeocoder::from_file(&path) {
            Ok(mock) => {
                info!(%path, places = mock.len(), "Using mock geocoder");
                serve(CachedGeocoder::new(mock, &cache_config), home, addr).await
            }
            Err(e) => {
                error!(%path, error = %e, "Failed to load mock geocoder data");
                return ExitCode::FAILURE;
            }
        },
        Err(_) => {
            let token = std::env::var("MAPBOX_ACCESS_TOKEN").ok();
            if token.as_deref().is_none_or(|t| t.trim().is_empty()) {
                warn!("MAPBOX_ACCESS_TOKEN not set. Place resolution and suggestions are disabled.");
            }
            match GeocodeClient::new(GeocodeConfig::new(token)) {
                Ok(client) => serve(CachedGeocoder::new(client, &cache_config), home, addr).await,
                Err(e) => {
                    error!(error = %e, "Failed to create geocoding client");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

/// Read the configured device position from `ROUTE_TRACER_HOME` ("lon,lat").
fn home_location() -> FixedLocation {
    let Ok(raw) = std::env::var("ROUTE_TRACER_HOME") else {
        return FixedLocation(None);
    };

    let parsed = raw.split_once(',').and_then(|(lon, lat)| {
        let lon = lon.trim().parse().ok()?;
        let lat = lat.trim().parse().ok()?;
        Coordinate::new(lon, lat).ok()
    });
    if parsed.is_none() {
        warn!(value = %raw, "Ignoring invalid ROUTE_TRACER_HOME, expected \"lon,lat\"");
    }
    FixedLocation(parsed)
}

async fn serve<G: Geocoder + 'static>(
    geocoder: G,
    home: FixedLocation,
    addr: SocketAddr,
) -> std::io::Result<()> {
    let view = initial_view(&home, GEOLOCATION_TIMEOUT).await;
    let state = AppState::new(
        Resolver::new(geocoder),
        view,
        AnimationConfig::default(),
        &AutocompleteConfig::default(),
    );

    let frames = spawn_frame_loop(state.itinerary.clone(), state.clock, FRAME_PERIOD);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Route tracer listening");
    info!("  GET  /health              - Health check");
    info!("  GET  /api/state           - Itinerary and suggestions");
    info!("  GET  /api/map             - Headless map contents");
    info!("  POST /api/places          - Add a place");
    info!("  POST /api/animation/start - Play the route");

    let result = axum::serve(listener, app).await;
    frames.abort();
    result
}
