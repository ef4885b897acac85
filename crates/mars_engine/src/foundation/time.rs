//! Time management utilities

use std::time::{Duration, Instant};

/// Converts variable frame times into a whole number of fixed simulation ticks
///
/// Leftover time carries into the next frame. When a frame would need more
/// than `max_substeps` ticks the backlog is dropped instead of letting the
/// simulation fall further behind every frame.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f64,
    max_substeps: u32,
    accumulator: f64,
}

impl FixedTimestep {
    /// Create an accumulator for ticks of `step` seconds
    pub fn new(step: f64, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    /// Fixed tick length in seconds
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Add `frame_time` seconds and return how many ticks to run now
    pub fn advance(&mut self, frame_time: f64) -> u32 {
        if frame_time.is_finite() && frame_time > 0.0 {
            self.accumulator += frame_time;
        }
        if self.step <= 0.0 {
            return 0;
        }

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }

        if self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.4}s of simulation backlog after {} substeps",
                self.accumulator - self.accumulator % self.step,
                ticks
            );
            self.accumulator %= self.step;
        }
        ticks
    }

    /// Fraction of a tick left in the accumulator, for render interpolation
    pub fn alpha(&self) -> f64 {
        if self.step > 0.0 {
            self.accumulator / self.step
        } else {
            0.0
        }
    }

    /// Discard accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time.take() {
            self.elapsed += start.elapsed();
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        self.elapsed + self.start_time.map_or(Duration::ZERO, |start| start.elapsed())
    }

    /// Get the elapsed time in milliseconds
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed().as_secs_f64() * 1000.0
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}
