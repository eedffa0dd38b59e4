//! Frame pacing for the record and playback loops.
//!
//! The engine does exactly one unit of work per visual frame. Where the frames come from is up
//! to the host: a display refresh callback, a fixed-rate timer, or a fixed count in tests.

use std::thread;
use std::time::{Duration, Instant};

/// A source of visual frames.
pub trait FrameClock {
    /// Waits for the next frame. Returns `false` once no more frames will come.
    fn next_frame(&mut self) -> bool;
}

/// Paces frames at a fixed rate using the system clock. Never runs out on its own.
#[derive(Debug)]
pub struct FixedRateClock {
    interval: Duration,
    next_deadline: Option<Instant>,
}

impl FixedRateClock {
    pub fn new(frame_rate_hz: f64) -> Self {
        let frame_rate_hz = if frame_rate_hz.is_finite() && frame_rate_hz > 0.0 {
            frame_rate_hz
        } else {
            crate::config::DEFAULT_FRAME_RATE_HZ
        };

        Self {
            interval: Duration::from_secs_f64(1.0 / frame_rate_hz),
            next_deadline: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameClock for FixedRateClock {
    fn next_frame(&mut self) -> bool {
        let now = Instant::now();

        let deadline = match self.next_deadline {
            Some(deadline) if deadline > now => {
                thread::sleep(deadline - now);
                deadline
            },
            // First frame, or we fell behind: start counting from now.
            _ => now,
        };

        self.next_deadline = Some(deadline + self.interval);
        true
    }
}

/// Yields a fixed number of frames, immediately, then stops.
#[derive(Debug, Clone, Copy)]
pub struct CountedClock {
    remaining: usize,
}

impl CountedClock {
    pub fn new(frames: usize) -> Self {
        Self { remaining: frames }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

impl FrameClock for CountedClock {
    fn next_frame(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }

        self.remaining -= 1;
        true
    }
}
