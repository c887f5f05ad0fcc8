//! Frame clock
//!
//! The host feeds the clock a timestamp (seconds) at the start of every
//! frame. All gameplay reads time from here, never from the OS, which keeps
//! the simulation deterministic under test.

use std::time::Duration;

use crate::consts::{FPS_WINDOW, FRAME_TIME_BUDGET_S};

#[derive(Debug, Clone)]
pub struct Clock {
    started_at: f64,
    frame_start: f64,
    last_frame_start: f64,
    frame_count: u64,
    // FPS tracking
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Clock {
    pub fn new(now: f64) -> Self {
        Self {
            started_at: now,
            frame_start: now,
            last_frame_start: now,
            frame_count: 0,
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Start a new frame at `now` and return the elapsed seconds since the
    /// previous frame start.
    ///
    /// Time never runs backwards: a timestamp older than the current frame
    /// start is treated as "no time passed".
    pub fn begin_frame(&mut self, now: f64) -> f32 {
        let now = now.max(self.frame_start);
        self.last_frame_start = self.frame_start;
        self.frame_start = now;
        self.frame_count += 1;

        // The slot we are about to overwrite was written FPS_WINDOW frames ago
        let oldest_time = self.frame_times[self.frame_index];
        self.frame_times[self.frame_index] = now;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        if self.frame_count > FPS_WINDOW as u64 {
            let elapsed = now - oldest_time;
            if elapsed > 0.0 {
                self.fps = (FPS_WINDOW as f64 / elapsed).round() as u32;
            }
        }

        self.delta_s()
    }

    /// Start time of the current frame
    #[inline]
    pub fn now(&self) -> f64 {
        self.frame_start
    }

    /// Seconds between the previous and current frame start
    #[inline]
    pub fn delta_s(&self) -> f32 {
        (self.frame_start - self.last_frame_start) as f32
    }

    pub fn started_at(&self) -> f64 {
        self.started_at
    }

    pub fn elapsed_s(&self) -> f64 {
        self.frame_start - self.started_at
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Rolling FPS over the last `FPS_WINDOW` frames (0 until the window fills)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// How long to sleep after a frame that took `frame_work_s` seconds.
///
/// Returns `None` when the frame already used its whole budget.
pub fn pacing_sleep(frame_work_s: f64) -> Option<Duration> {
    if frame_work_s < FRAME_TIME_BUDGET_S {
        Some(Duration::from_secs_f64(FRAME_TIME_BUDGET_S - frame_work_s.max(0.0)))
    } else {
        None
    }
}
