//! Deterministic gameplay simulation
//!
//! Everything that happens on the playfield lives here:
//! - Time comes from the engine clock only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod state;
pub mod tick;

pub use autopilot::Autopilot;
pub use collision::{Movement, apply_movement, clamp_to_playfield, knockback, overlaps};
pub use state::{
    Cactus, Gem, GameplaySession, GameplayState, Hud, ImageId, Player, Ripeness, progression_at,
};
pub use tick::{collect_gem, collide_with_cactus, handle_timer, place_cactus, place_gem, spoil_gem, tick};
