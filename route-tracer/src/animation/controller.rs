//! Route playback state machine.
//!
//! ```text
//! Idle ──request──▶ Requested ──camera settled──▶ Running ⇄ Paused
//!  ▲                                                 │
//!  └──────────── Completing ◀── last segment done ───┘
//! ```
//!
//! Any coordinate change drops the session and returns to `Idle` from
//! whatever state it was in. The host drives the machine by calling
//! [`AnimationController::tick`] once per display frame with a monotonic
//! timestamp, and [`AnimationController::camera_settled`] when the map
//! reports that the initial flight has finished. Because time only enters
//! through `tick`, tests can replay exact frame sequences.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Bounds, Coordinate, SpeedMultiplier};

use super::config::AnimationConfig;
use super::cue::{Cue, CuePlayer, CueSink};
use super::ease::ease_in_out_cubic;
use super::map::{MapAdapter, MarkerId, MarkerKind, RouteId, RouteStyle};

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// No session.
    Idle,
    /// Flying to the first stop, waiting for the camera to settle.
    Requested,
    /// Interpolating along a segment.
    Running,
    /// Frozen mid-segment.
    Paused,
    /// Drawing the final route; only observable inside one step.
    Completing,
}

/// One playthrough of the route.
#[derive(Debug)]
struct Session {
    /// Index of the segment being travelled (stop `segment` → `segment + 1`).
    segment: usize,
    /// Raw progress through the current segment.
    progress: f64,
    /// Running (unpaused) time spent in the current segment.
    elapsed: Duration,
    /// Timestamp of the previous running frame. `None` means the next frame
    /// only establishes a baseline.
    last_frame: Option<Duration>,
    /// Stops fully travelled so far.
    travelled: Vec<Coordinate>,
    marker: Option<MarkerId>,
    route: Option<RouteId>,
}

impl Session {
    fn new(start: Coordinate) -> Self {
        Self {
            segment: 0,
            progress: 0.0,
            elapsed: Duration::ZERO,
            last_frame: None,
            travelled: vec![start],
            marker: None,
            route: None,
        }
    }
}

/// Static layers left on the map after a run completes.
#[derive(Debug, Default)]
struct Overlay {
    route: Option<RouteId>,
    stops: Vec<MarkerId>,
}

/// Drives a [`MapAdapter`] through a choreographed playback of the route.
pub struct AnimationController<M, S> {
    map: M,
    cues: CuePlayer<S>,
    config: AnimationConfig,
    coords: Vec<Coordinate>,
    speed: SpeedMultiplier,
    state: AnimationState,
    session: Option<Session>,
    overlay: Overlay,
    /// Travelled stops of the most recent completed run.
    last_run: Option<Vec<Coordinate>>,
}

impl<M: MapAdapter, S: CueSink> AnimationController<M, S> {
    pub fn new(map: M, cues: S, config: AnimationConfig) -> Self {
        Self {
            map,
            cues: CuePlayer::new(cues),
            config,
            coords: Vec::new(),
            speed: SpeedMultiplier::default(),
            state: AnimationState::Idle,
            session: None,
            overlay: Overlay::default(),
            last_run: None,
        }
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn cues(&self) -> &S {
        self.cues.sink()
    }

    pub fn state(&self) -> AnimationState {
        self.state
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn speed(&self) -> SpeedMultiplier {
        self.speed
    }

    pub fn is_muted(&self) -> bool {
        self.cues.is_muted()
    }

    /// Whether a session exists (requested, running, or paused).
    pub fn is_animating(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.state == AnimationState::Paused
    }

    /// Index of the segment being travelled, while a session exists.
    pub fn current_segment(&self) -> Option<usize> {
        self.session.as_ref().map(|s| s.segment)
    }

    /// Raw progress through the current segment, while a session exists.
    pub fn progress(&self) -> Option<f64> {
        self.session.as_ref().map(|s| s.progress)
    }

    /// Stops travelled so far, or those of the last completed run.
    pub fn confirmed_prefix(&self) -> &[Coordinate] {
        match (&self.session, &self.last_run) {
            (Some(session), _) => session.travelled.as_slice(),
            (None, Some(run)) => run.as_slice(),
            (None, None) => &[],
        }
    }

    /// Replace the route, tearing down any session and completed overlay.
    pub fn set_coordinates(&mut self, coords: Vec<Coordinate>) {
        self.invalidate();
        self.coords = coords;
    }

    /// Drop any session and everything it drew, returning to `Idle`.
    pub fn invalidate(&mut self) {
        if let Some(session) = self.session.take() {
            debug!(
                state = ?self.state,
                segment = session.segment,
                "Invalidating playback session"
            );
            self.clear_session_layers(&session);
        }
        self.clear_overlay();
        self.last_run = None;
        self.state = AnimationState::Idle;
    }

    /// Begin a playthrough.
    ///
    /// Ignored unless idle with at least two stops. Returns whether a
    /// session was created.
    pub fn request(&mut self) -> bool {
        if self.state != AnimationState::Idle || self.session.is_some() {
            debug!(state = ?self.state, "Ignoring start: session already active");
            return false;
        }
        let Some(&start) = self.coords.first().filter(|_| self.coords.len() >= 2) else {
            debug!(stops = self.coords.len(), "Ignoring start: need at least two stops");
            return false;
        };

        self.clear_overlay();
        self.last_run = None;
        self.map.fly_to(start, self.config.edge_zoom);
        self.session = Some(Session::new(start));
        self.state = AnimationState::Requested;
        info!(stops = self.coords.len(), speed = %self.speed, "Playback requested");
        true
    }

    /// The camera has finished the flight issued by [`request`](Self::request).
    ///
    /// Ignored in every other state.
    pub fn camera_settled(&mut self) {
        if self.state != AnimationState::Requested {
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let start = session.travelled[0];
        session.marker = Some(self.map.add_marker(start, MarkerKind::Traveller));
        session.route = Some(self.map.add_route(&[start], RouteStyle::Progress));
        session.last_frame = None;

        self.state = AnimationState::Running;
        self.cues.play(Cue::Start);
    }

    /// Pause a running session or resume a paused one at frame timestamp `now`.
    ///
    /// Running time up to the pause is banked and the clock restarts from the
    /// resume, so only the paused interval is left out of the progress.
    /// Returns whether the state changed.
    pub fn toggle_pause(&mut self, now: Duration) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        match self.state {
            AnimationState::Running => {
                if let Some(last) = session.last_frame.take() {
                    session.elapsed += now.saturating_sub(last);
                }
                self.state = AnimationState::Paused;
                true
            }
            AnimationState::Paused => {
                session.last_frame = Some(now);
                self.state = AnimationState::Running;
                true
            }
            _ => false,
        }
    }

    /// Change playback speed; only allowed while idle.
    pub fn set_speed(&mut self, speed: SpeedMultiplier) -> bool {
        if self.state != AnimationState::Idle {
            return false;
        }
        self.speed = speed;
        true
    }

    /// Flip the cue mute flag, returning the new state.
    pub fn toggle_sound(&mut self) -> bool {
        self.cues.toggle_mute()
    }

    /// Advance playback to frame timestamp `now`.
    ///
    /// Timestamps must be monotonic. Frames while idle, requested, or paused
    /// change nothing.
    pub fn tick(&mut self, now: Duration) {
        if self.state != AnimationState::Running {
            return;
        }
        if self.advance(now) {
            self.complete();
        }
    }

    /// Returns `true` once the last segment has been travelled.
    fn advance(&mut self, now: Duration) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(last) = session.last_frame.replace(now) else {
            return false;
        };
        session.elapsed += now.saturating_sub(last);

        let duration = self.config.segment_duration_at(self.speed);

        loop {
            let t = (session.elapsed.as_secs_f64() / duration.as_secs_f64()).min(1.0);
            session.progress = t;

            let from = self.coords[session.segment];
            let to = self.coords[session.segment + 1];

            if t < 1.0 {
                let point = from.lerp(&to, ease_in_out_cubic(t));
                let zoom = self.config.zoom_at(t);

                if let Some(marker) = session.marker {
                    self.map.move_marker(marker, point);
                }
                if let Some(route) = session.route {
                    let mut path = session.travelled.clone();
                    path.push(point);
                    self.map.update_route(route, &path);
                }
                self.map.ease_to(point, zoom, Duration::ZERO);
                return false;
            }

            session.travelled.push(to);
            if let Some(marker) = session.marker {
                self.map.move_marker(marker, to);
            }
            if let Some(route) = session.route {
                self.map.update_route(route, &session.travelled);
            }
            self.cues.play(Cue::Segment);
            debug!(segment = session.segment, "Segment complete");

            if session.segment + 2 >= self.coords.len() {
                return true;
            }

            // Carry any overshoot into the next segment.
            session.elapsed = session.elapsed.saturating_sub(duration);
            session.segment += 1;
            session.progress = 0.0;
        }
    }

    /// Replace the progressive drawing with the static final route.
    fn complete(&mut self) {
        self.state = AnimationState::Completing;
        self.cues.play(Cue::Complete);

        if let Some(session) = self.session.take() {
            self.clear_session_layers(&session);
            self.last_run = Some(session.travelled);
        }

        self.overlay.route = Some(self.map.add_route(&self.coords, RouteStyle::Complete));
        self.overlay.stops = self
            .coords
            .iter()
            .map(|c| self.map.add_marker(*c, MarkerKind::Stop))
            .collect();
        if let Some(bounds) = Bounds::enclosing(&self.coords) {
            self.map.fit_bounds(bounds, self.config.fit_padding);
        }

        self.state = AnimationState::Idle;
        info!(stops = self.coords.len(), "Playback complete");
    }

    fn clear_session_layers(&mut self, session: &Session) {
        if let Some(marker) = session.marker {
            self.map.remove_marker(marker);
        }
        if let Some(route) = session.route {
            self.map.remove_route(route);
        }
    }

    fn clear_overlay(&mut self) {
        let overlay = std::mem::take(&mut self.overlay);
        if let Some(route) = overlay.route {
            self.map.remove_route(route);
        }
        for marker in overlay.stops {
            self.map.remove_marker(marker);
        }
    }
}
