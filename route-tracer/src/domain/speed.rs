//! Playback speed multipliers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a multiplier is not one of the selectable speeds.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid speed multiplier {0}: must be one of 0.5, 1, 1.5, 2, 3")]
pub struct InvalidSpeed(pub f64);

/// One of the fixed, user-selectable playback speeds.
///
/// # Examples
///
/// ```
/// use route_tracer::domain::SpeedMultiplier;
///
/// let speed = SpeedMultiplier::try_from(1.5).unwrap();
/// assert_eq!(speed, SpeedMultiplier::OneAndHalf);
/// assert!(SpeedMultiplier::try_from(4.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum SpeedMultiplier {
    Half,
    #[default]
    One,
    OneAndHalf,
    Two,
    Three,
}

impl SpeedMultiplier {
    /// Every selectable speed, slowest first.
    pub const ALL: [SpeedMultiplier; 5] = [
        SpeedMultiplier::Half,
        SpeedMultiplier::One,
        SpeedMultiplier::OneAndHalf,
        SpeedMultiplier::Two,
        SpeedMultiplier::Three,
    ];

    pub fn factor(self) -> f64 {
        match self {
            SpeedMultiplier::Half => 0.5,
            SpeedMultiplier::One => 1.0,
            SpeedMultiplier::OneAndHalf => 1.5,
            SpeedMultiplier::Two => 2.0,
            SpeedMultiplier::Three => 3.0,
        }
    }
}

impl TryFrom<f64> for SpeedMultiplier {
    type Error = InvalidSpeed;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|s| s.factor() == value)
            .ok_or(InvalidSpeed(value))
    }
}

impl From<SpeedMultiplier> for f64 {
    fn from(s: SpeedMultiplier) -> Self {
        s.factor()
    }
}

impl fmt::Display for SpeedMultiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x", self.factor())
    }
}
