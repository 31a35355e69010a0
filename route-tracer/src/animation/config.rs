//! Timing and camera choreography for route playback.

use std::time::Duration;

use crate::domain::SpeedMultiplier;

use super::ease::ease_in_out_cubic;

/// Configuration parameters for route playback.
#[derive(Debug, Clone)]
pub struct AnimationConfig {
    /// Time to travel one segment at 1x speed.
    pub segment_duration: Duration,

    /// Zoom at the start and end of each segment (and for the initial fly-to).
    pub edge_zoom: f64,

    /// Zoom held through the middle of each segment.
    pub cruise_zoom: f64,

    /// Raw progress at which the zoom-in ramp reaches `cruise_zoom`.
    pub zoom_in_until: f64,

    /// Raw progress at which the zoom-out ramp starts.
    pub zoom_out_from: f64,

    /// Padding (pixels) around the final fit-to-route camera move.
    pub fit_padding: f64,
}

impl AnimationConfig {
    /// Segment duration scaled by a speed multiplier.
    pub fn segment_duration_at(&self, speed: SpeedMultiplier) -> Duration {
        self.segment_duration.div_f64(speed.factor())
    }

    /// Camera zoom for raw (un-eased) segment progress `t`.
    ///
    /// Eases from `edge_zoom` up to `cruise_zoom` over `[0, zoom_in_until]`,
    /// holds, then eases back down over `[zoom_out_from, 1]`.
    pub fn zoom_at(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        let span = self.cruise_zoom - self.edge_zoom;

        if t <= self.zoom_in_until {
            let local = if self.zoom_in_until > 0.0 {
                t / self.zoom_in_until
            } else {
                1.0
            };
            self.edge_zoom + span * ease_in_out_cubic(local)
        } else if t < self.zoom_out_from {
            self.cruise_zoom
        } else {
            let ramp = 1.0 - self.zoom_out_from;
            let local = if ramp > 0.0 {
                (t - self.zoom_out_from) / ramp
            } else {
                1.0
            };
            self.cruise_zoom - span * ease_in_out_cubic(local)
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            segment_duration: Duration::from_millis(3500),
            edge_zoom: 8.0,
            cruise_zoom: 10.0,
            zoom_in_until: 0.18,
            zoom_out_from: 0.82,
            fit_padding: 80.0,
        }
    }
}
