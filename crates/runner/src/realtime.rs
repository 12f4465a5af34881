//! Real-time / accelerated driver.

use mergeflow_engine::{Simulation, TickResult};
use std::time::Instant;

/// Cap on the raw wall-clock delta per frame, ms, applied before the
/// speed multiplier. A host that stalls between frames resumes smoothly
/// instead of slamming the simulation forward.
pub const DEFAULT_FRAME_CAP_MS: f64 = 200.0;

/// Drives a simulation from wall-clock time.
///
/// Call [`tick`](Self::tick) once per host frame. The driver measures
/// the delta since the previous frame, caps it, scales it by the
/// engine's `speed_multiplier`, and advances the simulation.
#[derive(Debug)]
pub struct RealtimeDriver {
    last_frame: Option<Instant>,
    frame_cap_ms: f64,
}

impl RealtimeDriver {
    /// Create a driver with the default frame cap.
    pub fn new() -> Self {
        Self {
            last_frame: None,
            frame_cap_ms: DEFAULT_FRAME_CAP_MS,
        }
    }

    /// Create a driver with a custom frame cap, ms.
    pub fn with_frame_cap(frame_cap_ms: f64) -> Self {
        Self {
            last_frame: None,
            frame_cap_ms,
        }
    }

    /// Advance the simulation by the scaled delta since the last frame.
    ///
    /// The first frame after construction or
    /// [`reset_clock`](Self::reset_clock) advances by zero, establishing
    /// a baseline.
    pub fn tick(&mut self, sim: &mut Simulation) -> TickResult {
        let now = Instant::now();
        let raw_ms = self
            .last_frame
            .map(|last| now.duration_since(last).as_secs_f64() * 1_000.0)
            .unwrap_or(0.0);
        self.last_frame = Some(now);

        let dt = raw_ms.min(self.frame_cap_ms) * sim.config().speed_multiplier;
        sim.advance(dt)
    }

    /// Forget the previous frame time.
    ///
    /// Call when resuming from a pause or a step-mode freeze so the idle
    /// period is not replayed as one giant delta.
    pub fn reset_clock(&mut self) {
        self.last_frame = None;
    }

    /// Drive the simulation to completion in a blocking loop.
    ///
    /// Sleeps `frame` between ticks. Returns early if the engine freezes
    /// for a step-mode acknowledgment, since no amount of looping will
    /// unfreeze it; the caller owns that interaction.
    pub fn run(&mut self, sim: &mut Simulation, frame: std::time::Duration) {
        while !sim.is_complete() {
            let tick = self.tick(sim);
            if tick.frozen || tick.entered_step_wait {
                return;
            }
            std::thread::sleep(frame);
        }
    }
}

impl Default for RealtimeDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergeflow_engine::SimConfig;
    use std::time::Duration;

    fn test_sim(speed: f64) -> Simulation {
        Simulation::new(
            SimConfig::default()
                .with_total_commits(4)
                .with_concurrency_limit(2)
                .with_ci_duration(15.0, 0.0)
                .with_speed_multiplier(speed)
                .with_step_mode(false),
        )
        .unwrap()
    }

    #[test]
    fn test_first_tick_establishes_baseline() {
        let mut sim = test_sim(240.0);
        let mut driver = RealtimeDriver::new();
        driver.tick(&mut sim);
        // No previous frame: zero delta, but CI still starts.
        assert_eq!(sim.stats().wall_clock_time_ms, 0.0);
        assert_eq!(sim.active_window_len(), 2);
    }

    #[test]
    fn test_frame_cap_bounds_delta() {
        let mut sim = test_sim(1_000_000.0);
        let mut driver = RealtimeDriver::with_frame_cap(50.0);
        driver.tick(&mut sim);
        std::thread::sleep(Duration::from_millis(120));
        driver.tick(&mut sim);
        // Raw delta ~120ms capped to 50 before scaling.
        assert!(sim.stats().wall_clock_time_ms <= 50.0 * 1_000_000.0);
        assert!(sim.stats().wall_clock_time_ms > 0.0);
    }

    #[test]
    fn test_reset_clock_swallows_idle_time() {
        let mut sim = test_sim(240.0);
        let mut driver = RealtimeDriver::new();
        driver.tick(&mut sim);
        std::thread::sleep(Duration::from_millis(30));
        driver.reset_clock();
        driver.tick(&mut sim);
        // The idle period was not replayed.
        assert_eq!(sim.stats().wall_clock_time_ms, 0.0);
    }

    #[test]
    fn test_run_returns_on_step_freeze() {
        let mut sim = Simulation::new(
            SimConfig::default()
                .with_total_commits(2)
                .with_concurrency_limit(2)
                .with_ci_duration(15.0, 0.0)
                // High speed so a head resolves within a few frames.
                .with_speed_multiplier(1_000_000.0)
                .with_step_mode(true),
        )
        .unwrap();
        let mut driver = RealtimeDriver::new();
        driver.run(&mut sim, Duration::from_millis(1));
        assert!(!sim.is_complete());
        assert!(sim.step_state().is_frozen());
    }
}
