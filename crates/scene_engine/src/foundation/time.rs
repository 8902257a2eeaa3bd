//! Time management utilities
//!
//! The loop driver never reads the wall clock directly; it asks a [`Clock`].
//! Hosts use [`SystemClock`]. Tests and replays use [`ManualClock`], which only
//! moves when told to.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of timestamps for frame timing
///
/// Implementations must be monotonic within a session.
pub trait Clock {
    /// Current timestamp
    fn now(&self) -> Instant;
}

/// Monotonic wall clock backed by [`Instant::now`]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually advanced clock
///
/// Clones share the same time source, so a test can keep one clone and hand
/// another to the game loop.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset: Rc<Cell<Duration>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a clock frozen at the moment of construction
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Move time forward
    pub fn advance(&self, by: Duration) {
        self.offset.set(self.offset.get() + by);
    }

    /// Move time forward by a number of seconds
    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }

    /// Total time advanced since construction
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset.get()
    }
}

/// Frame counters kept by the loop driver
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Frames stepped, including skipped ones
    pub frames: u64,
    /// Fixed updates run since setup
    pub updates: u64,
    /// Frames on which the update cap was hit
    pub capped_frames: u64,
    /// Simulated time (updates * timestep) in seconds
    pub simulated_secs: f64,
}

impl FrameStats {
    /// Average fixed updates per frame
    pub fn average_updates_per_frame(&self) -> f64 {
        if self.frames > 0 {
            self.updates as f64 / self.frames as f64
        } else {
            0.0
        }
    }
}
