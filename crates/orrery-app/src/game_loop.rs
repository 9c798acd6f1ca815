//! Fixed-timestep loop implementing the "Fix Your Timestep" pattern.
//!
//! Animation advances in whole ticks at a fixed rate regardless of how often
//! the window redraws; leftover time carries over in an accumulator.

use std::time::Instant;
use tracing::warn;

/// Default tick rate in Hz.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Maximum frame time clamp to prevent spiral of death.
/// A frame longer than this is treated as this long and the animation slows down.
pub const MAX_FRAME_TIME: f64 = 0.25;

/// Fixed-timestep loop state.
#[derive(Debug)]
pub struct GameLoop {
    fixed_dt: f64,
    previous_time: Instant,
    accumulator: f64,
}

impl GameLoop {
    /// A loop ticking `tick_rate` times per second, starting now. A rate of 0
    /// falls back to [`DEFAULT_TICK_RATE`].
    pub fn new(tick_rate: u32) -> Self {
        let rate = if tick_rate == 0 {
            DEFAULT_TICK_RATE
        } else {
            tick_rate
        };
        Self {
            fixed_dt: 1.0 / rate as f64,
            previous_time: Instant::now(),
            accumulator: 0.0,
        }
    }

    /// Measure the wall-clock time since the last call and run as many fixed
    /// updates as fit. Returns the number of updates run.
    pub fn tick(&mut self, update_fn: impl FnMut()) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f64();
        self.previous_time = now;
        self.step(frame_time, update_fn)
    }

    /// Run fixed updates for an explicit `frame_time` in seconds.
    pub fn step(&mut self, frame_time: f64, mut update_fn: impl FnMut()) -> u32 {
        let mut frame_time = frame_time.max(0.0);
        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            frame_time = MAX_FRAME_TIME;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= self.fixed_dt {
            update_fn();
            self.accumulator -= self.fixed_dt;
            updates += 1;
        }
        updates
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}
