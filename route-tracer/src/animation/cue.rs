//! Feedback cues fired at playback boundaries.

use serde::Serialize;
use tracing::info;

/// A playback lifecycle boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Interpolation has begun.
    Start,
    /// One segment was fully travelled.
    Segment,
    /// The final segment was travelled.
    Complete,
}

/// Receives cues, e.g. to play a tone.
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Cue sink that logs each cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingCues;

impl CueSink for TracingCues {
    fn play(&mut self, cue: Cue) {
        info!(?cue, "Playback cue");
    }
}

/// Cue sink that records what it was asked to play.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CueLog(pub Vec<Cue>);

impl CueSink for CueLog {
    fn play(&mut self, cue: Cue) {
        self.0.push(cue);
    }
}

/// A sink behind a global mute flag.
#[derive(Debug, Clone, Default)]
pub struct CuePlayer<S> {
    sink: S,
    muted: bool,
}

impl<S: CueSink> CuePlayer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, muted: false }
    }

    /// Forward `cue` to the sink unless muted.
    pub fn play(&mut self, cue: Cue) {
        if !self.muted {
            self.sink.play(cue);
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Flip the mute flag, returning the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
