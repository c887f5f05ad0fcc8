//! Gembo - a small gem collecting arcade game
//!
//! Core modules:
//! - `engine`: Clock, deferred timers, input edge tracking, sprite animation
//! - `sim`: Gameplay entities, session state and the per-frame gameplay step
//! - `modes`: Update-mode state machine and menu selection
//! - `game`: Owns everything and runs one frame at a time
//! - `stats`: Cross-session statistics, persisted as flat JSON
//! - `persistence`: JSON file load/save
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences

pub mod audio;
pub mod engine;
pub mod game;
pub mod modes;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod stats;
pub mod tuning;

pub use game::{Game, RenderSnapshot};
pub use modes::{EnterHook, ModeManager, UpdateMode};
pub use settings::Settings;
pub use stats::StatisticsStore;
pub use tuning::Tuning;

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Playfield size the layout is designed for (width, height)
    pub const APPLICATION_WINDOW_SIZE: (f32, f32) = (480.0, 640.0);

    /// Frame budget for ~30 FPS
    pub const FRAME_TIME_BUDGET_S: f64 = 0.032;
    /// Number of frame starts used for the rolling FPS figure
    pub const FPS_WINDOW: usize = 60;

    /// Persisted statistics file
    pub const STATS_FILE: &str = "game.data";
    /// Persisted player preferences
    pub const SETTINGS_FILE: &str = "settings.json";
    /// Optional balance overrides
    pub const TUNING_FILE: &str = "tuning.json";
}

/// Clamp `value` into `[min, max]` (inclusive)
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value > max {
        max
    } else if value < min {
        min
    } else {
        value
    }
}

/// Fold an out-of-range coordinate back onto the screen.
///
/// Values below `min` reflect to `min - value`, values above `max` wrap to
/// `value - max`. This is not a hard clamp: a value far outside the range can
/// still land outside it.
#[inline]
pub fn clamp_onscreen(mut value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        value = min - value;
    }
    if value > max {
        value -= max;
    }
    value
}

/// Linear interpolation, `t` is not clamped
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Uniformly random point inside `[0, size.x] x [0, size.y]`
pub fn random_onscreen_coordinate<R: Rng + ?Sized>(rng: &mut R, size: Vec2) -> Vec2 {
    Vec2::new(
        rng.random_range(0.0..=size.x.max(0.0)),
        rng.random_range(0.0..=size.y.max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5, 0, 10), 5);
        assert_eq!(clamp(-1, 0, 10), 0);
        assert_eq!(clamp(11, 0, 10), 10);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn test_clamp_onscreen_folds_back() {
        assert_eq!(clamp_onscreen(50.0, 0.0, 100.0), 50.0);
        assert_eq!(clamp_onscreen(-20.0, 0.0, 100.0), 20.0);
        assert_eq!(clamp_onscreen(130.0, 0.0, 100.0), 30.0);
        assert_eq!(clamp_onscreen(-10.0, 5.0, 100.0), 15.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(200.0, 627.0, 0.0), 200.0);
        assert_eq!(lerp(200.0, 627.0, 1.0), 627.0);
        assert_eq!(lerp(1.0, 0.5, 0.5), 0.75);
    }

    #[test]
    fn test_random_coordinate_in_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        let size = Vec2::new(480.0, 640.0);
        for _ in 0..1000 {
            let p = random_onscreen_coordinate(&mut rng, size);
            assert!(p.x >= 0.0 && p.x <= size.x);
            assert!(p.y >= 0.0 && p.y <= size.y);
        }
    }
}
