//! Background frame clock for the served itinerary.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use super::state::SharedItinerary;

/// Frame period of roughly 60 Hz.
pub const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// Monotonic timestamps shared by the frame loop and playback commands.
#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    start: Instant,
}

impl FrameClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since the clock started.
    pub fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Drive the itinerary's playback once per `period`.
///
/// Each frame first forwards a settled camera flight from the headless map,
/// then ticks the controller with the current `clock` reading.
/// Frames that fall behind are skipped rather than replayed.
pub fn spawn_frame_loop(
    itinerary: SharedItinerary,
    clock: FrameClock,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(period_ms = period.as_millis() as u64, "Starting frame loop");
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            let mut itinerary = itinerary.lock().await;
            if itinerary.map_mut().take_camera_settled() {
                itinerary.camera_settled();
            }
            itinerary.tick(clock.now());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationConfig, AnimationState, MarkerKind};
    use crate::autocomplete::AutocompleteConfig;
    use crate::geocode::{MockGeocoder, Resolver};
    use crate::geolocate::InitialView;
    use crate::web::AppState;

    /// Lyon to Nice, resolved and requested, with no frame loop yet.
    async fn requested_state() -> AppState<MockGeocoder> {
        let resolver = Resolver::new(
            MockGeocoder::new()
                .with_place("Lyon", 4.8357, 45.764)
                .with_place("Nice", 7.262, 43.7102),
        );
        let state = AppState::new(
            resolver.clone(),
            InitialView::fallback(),
            AnimationConfig::default(),
            &AutocompleteConfig::default(),
        );

        {
            let mut itinerary = state.itinerary.lock().await;
            for name in ["Lyon", "Nice"] {
                let request = itinerary.add_place(name).unwrap();
                let resolution = request.run(&resolver).await;
                assert!(itinerary.apply_resolution(resolution));
            }
            assert!(itinerary.request_animation());
        }
        state
    }

    #[tokio::test(start_paused = true)]
    async fn frame_loop_plays_route_to_completion() {
        let state = requested_state().await;
        let frames = spawn_frame_loop(state.itinerary.clone(), state.clock, FRAME_PERIOD);

        tokio::time::sleep(Duration::from_secs(1)).await;
        {
            let itinerary = state.itinerary.lock().await;
            assert_eq!(itinerary.controller().state(), AnimationState::Running);
            assert_eq!(itinerary.map().markers_of(MarkerKind::Traveller).len(), 1);
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        {
            let itinerary = state.itinerary.lock().await;
            assert_eq!(itinerary.controller().state(), AnimationState::Idle);
            assert_eq!(itinerary.map().markers_of(MarkerKind::Stop).len(), 2);
        }

        frames.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn pause_on_shared_clock_holds_playback() {
        let state = requested_state().await;
        let frames = spawn_frame_loop(state.itinerary.clone(), state.clock, FRAME_PERIOD);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(state.itinerary.lock().await.toggle_pause(state.clock.now()));

        tokio::time::sleep(Duration::from_secs(60)).await;
        {
            let mut itinerary = state.itinerary.lock().await;
            assert_eq!(itinerary.controller().state(), AnimationState::Paused);
            assert!(itinerary.toggle_pause(state.clock.now()));
        }

        // About two of the 3.5 running seconds have passed
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(
            state.itinerary.lock().await.controller().state(),
            AnimationState::Running
        );

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(
            state.itinerary.lock().await.controller().state(),
            AnimationState::Idle
        );

        frames.abort();
    }
}
