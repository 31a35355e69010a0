//! Choreographed playback of a resolved route on a map.
//!
//! [`AnimationController`] owns the playback state machine and talks to the
//! rendering surface only through [`MapAdapter`]. [`HeadlessMap`] is the
//! in-memory surface used by the HTTP shell and in tests.

mod config;
mod controller;
mod cue;
mod ease;
mod headless;
mod map;

pub use config::AnimationConfig;
pub use controller::{AnimationController, AnimationState};
pub use cue::{Cue, CueLog, CuePlayer, CueSink, TracingCues};
pub use ease::ease_in_out_cubic;
pub use headless::{CameraView, HeadlessMap, MapSnapshot, MarkerView, RouteView};
pub use map::{MapAdapter, MarkerId, MarkerKind, RouteId, RouteStyle};
