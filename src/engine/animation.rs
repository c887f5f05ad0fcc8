//! Time-based sprite animation
//!
//! Only the frame index is computed here; which image each index maps to is
//! up to the renderer.

#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    frame_count: usize,
    duration_s: f32,
    start_time: f64,
    looping: bool,
    paused: bool,
    playtime_before_pause_s: f64,
}

impl SpriteAnimation {
    pub fn new(frame_count: usize, duration_s: f32, now: f64) -> Self {
        debug_assert!(frame_count > 0, "animation needs at least one frame");
        Self {
            frame_count: frame_count.max(1),
            duration_s,
            start_time: now,
            looping: false,
            paused: false,
            playtime_before_pause_s: 0.0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    pub fn duration_s(&self) -> f32 {
        self.duration_s
    }

    pub fn set_duration(&mut self, duration_s: f32) {
        self.duration_s = duration_s;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Restart from the first frame
    pub fn play(&mut self, now: f64, looping: bool) {
        self.looping = looping;
        self.start_time = now;
        self.paused = false;
        self.playtime_before_pause_s = 0.0;
    }

    pub fn pause(&mut self, now: f64) {
        if self.paused {
            return;
        }
        self.playtime_before_pause_s = now - self.start_time;
        self.paused = true;
    }

    /// Resume from where `pause` left off
    pub fn unpause(&mut self, now: f64) {
        if !self.paused {
            return;
        }
        self.start_time = now - self.playtime_before_pause_s;
        self.paused = false;
    }

    /// Frame to show at `now`
    pub fn frame_index(&self, now: f64) -> usize {
        let last = self.frame_count - 1;
        if self.duration_s <= 0.0 {
            return last;
        }
        let duration = f64::from(self.duration_s);
        let elapsed = if self.paused {
            self.playtime_before_pause_s
        } else {
            now - self.start_time
        };

        if elapsed > duration && !self.looping {
            return last;
        }

        let completion = (elapsed / duration).max(0.0);
        let idx = (self.frame_count as f64 * completion) as usize;
        idx % self.frame_count
    }
}
