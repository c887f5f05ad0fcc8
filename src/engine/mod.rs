//! Engine context
//!
//! Everything the game looks up "globally" lives in one explicit struct that
//! is passed by reference:
//! - Clock (current time, frame delta, frame count, FPS)
//! - Deferred timers polled once per frame
//! - Audio request queue

pub mod animation;
pub mod clock;
pub mod input;
pub mod timers;

pub use animation::SpriteAnimation;
pub use clock::{Clock, pacing_sleep};
pub use input::{Action, GameplayAction, InputTracker};
pub use timers::{TimerEvent, TimerQueue};

use crate::audio::AudioManager;

/// Shared engine services for one running game
#[derive(Debug)]
pub struct Engine {
    pub clock: Clock,
    pub timers: TimerQueue,
    pub audio: AudioManager,
}

impl Engine {
    pub fn new(now: f64) -> Self {
        Self {
            clock: Clock::new(now),
            timers: TimerQueue::new(),
            audio: AudioManager::new(),
        }
    }

    /// Time at the start of the current frame
    #[inline]
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Schedule `event` to fire `delay_ms` after the current frame start
    pub fn schedule(&mut self, delay_ms: u32, event: TimerEvent) -> f64 {
        let now = self.clock.now();
        self.timers.schedule(now, delay_ms, event)
    }
}
