//! Device position lookup for the initial map view.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::Coordinate;

/// Center used when the device position is unknown.
pub const DEFAULT_CENTER: Coordinate = Coordinate::from_trusted(0.0, 20.0);

/// Zoom used when the device position is unknown.
pub const DEFAULT_ZOOM: f64 = 1.5;

/// Zoom used when centring on the device position.
pub const LOCATED_ZOOM: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Permission to read the device position was denied")]
    Denied,

    #[error("Device position is unavailable")]
    Unavailable,

    #[error("Timed out waiting for the device position")]
    Timeout,
}

/// One-shot source of the device position.
pub trait Geolocator: Send + Sync {
    fn locate(&self) -> impl Future<Output = Result<Coordinate, GeolocationError>> + Send;
}

/// A position known up front, or none at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinate>);

impl Geolocator for FixedLocation {
    async fn locate(&self) -> Result<Coordinate, GeolocationError> {
        self.0.ok_or(GeolocationError::Unavailable)
    }
}

/// Where the map camera starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InitialView {
    pub center: Coordinate,
    pub zoom: f64,
}

impl InitialView {
    /// World view used when the position is unknown.
    pub fn fallback() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
        }
    }
}

/// Ask `geolocator` for the device position, waiting at most `timeout`.
///
/// Falls back to [`InitialView::fallback`] on any failure.
pub async fn initial_view<G: Geolocator>(geolocator: &G, timeout: Duration) -> InitialView {
    let result = match tokio::time::timeout(timeout, geolocator.locate()).await {
        Ok(result) => result,
        Err(_) => Err(GeolocationError::Timeout),
    };

    match result {
        Ok(center) => {
            info!(%center, "Centring map on device position");
            InitialView {
                center,
                zoom: LOCATED_ZOOM,
            }
        }
        Err(e) => {
            debug!(error = %e, "Using default map view");
            InitialView::fallback()
        }
    }
}
