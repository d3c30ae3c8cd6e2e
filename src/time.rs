//! Wall-clock timing for the host loop.
//!
//! The simulation itself is tick-based and has no notion of seconds. A host
//! driving it in real time uses [`TickClock`] to measure how fast ticks are
//! going.
//!
//! # Example
//!
//! ```
//! use flocksim::time::TickClock;
//!
//! let mut clock = TickClock::new();
//! for _ in 0..3 {
//!     // sim.tick();
//!     clock.tick();
//! }
//! assert_eq!(clock.ticks(), 3);
//! ```

use std::time::{Duration, Instant};

/// Tick counting and rate measurement.
#[derive(Debug, Clone)]
pub struct TickClock {
    /// When the clock was created or reset.
    start: Instant,
    /// When the previous tick finished.
    last_tick: Instant,
    /// Wall time of the previous tick in seconds.
    last_tick_secs: f32,
    /// Total ticks recorded.
    tick_count: u64,
    /// Ticks per second, refreshed every `rate_interval`.
    tps: f32,
    /// Tick count at the last rate refresh.
    rate_tick_count: u64,
    /// Time of the last rate refresh.
    rate_update_time: Instant,
    /// How often to refresh `tps`.
    rate_interval: Duration,
}

impl TickClock {
    /// Create a clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_tick: now,
            last_tick_secs: 0.0,
            tick_count: 0,
            tps: 0.0,
            rate_tick_count: 0,
            rate_update_time: now,
            rate_interval: Duration::from_millis(500),
        }
    }

    /// Change how often [`tps`](Self::tps) is refreshed.
    pub fn with_rate_interval(mut self, interval: Duration) -> Self {
        self.rate_interval = interval;
        self
    }

    /// Record that a tick finished. Returns its wall time in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.last_tick_secs = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.tick_count += 1;

        let since_rate = now.duration_since(self.rate_update_time);
        if since_rate >= self.rate_interval {
            let ticks = self.tick_count - self.rate_tick_count;
            self.tps = ticks as f32 / since_rate.as_secs_f32();
            self.rate_tick_count = self.tick_count;
            self.rate_update_time = now;
        }

        self.last_tick_secs
    }

    /// Total ticks recorded.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.tick_count
    }

    /// Wall time of the previous tick in seconds.
    #[inline]
    pub fn last_tick_secs(&self) -> f32 {
        self.last_tick_secs
    }

    /// Recent ticks per second.
    #[inline]
    pub fn tps(&self) -> f32 {
        self.tps
    }

    /// Time since the clock started.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Average wall time per tick since the clock started, in seconds.
    pub fn mean_tick_secs(&self) -> f32 {
        if self.tick_count == 0 {
            return 0.0;
        }
        self.last_tick.duration_since(self.start).as_secs_f32() / self.tick_count as f32
    }

    /// Reset to a fresh clock.
    pub fn reset(&mut self) {
        *self = Self::new().with_rate_interval(self.rate_interval);
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}
