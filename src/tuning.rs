//! Data-driven game balance
//!
//! Every number gameplay depends on lives here so it can be overridden from
//! `tuning.json` without a rebuild. Missing fields keep their defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::APPLICATION_WINDOW_SIZE;
use crate::persistence;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Playfield size in pixels
    pub screen_size: Vec2,

    // === Player ===
    pub player_sprite_size: Vec2,
    /// The player never moves slower than this
    pub player_min_speed: f32,
    /// Speed at progression 0
    pub player_start_speed: f32,
    /// Speed at progression 1
    pub player_top_speed: f32,
    /// The player never moves faster than this
    pub player_max_speed: f32,
    /// Seconds of session time until progression reaches 1
    pub reaches_top_speed_after_s: f32,
    pub walk_animation_frames: usize,
    pub walk_animation_duration_slowest_s: f32,
    pub walk_animation_duration_fastest_s: f32,

    // === Gem ===
    pub gem_sprite_size: Vec2,
    pub gem_pickup_radius: f32,
    pub gem_respawn_timeout_ms: u32,
    pub gem_spoilage_timeout_ms: u32,
    /// Volume of the pickup cue, before settings are applied
    pub gem_pickup_volume: f32,

    // === Cactus ===
    pub cactus_sprite_size: Vec2,
    pub cactus_collision_offset: Vec2,
    pub cactus_collision_radius_min: f32,
    pub cactus_collision_radius_max: f32,
    pub cactus_knockback_force_min: f32,
    pub cactus_knockback_force_max: f32,
    /// Move the cactus after more than this many ripe pickups
    pub cactus_respawn_every_n_gems: u32,

    // === Session / UI ===
    pub idle_timeout_s: f64,
    pub streak_popup_at_length: u32,
    pub points_highlight_duration_ms: u32,
    pub settings_selection_timeout_s: f64,
    pub display_n_top_streaks: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        let (w, h) = APPLICATION_WINDOW_SIZE;
        Self {
            screen_size: Vec2::new(w, h),

            player_sprite_size: Vec2::new(66.0, 92.0),
            player_min_speed: 70.0,
            player_start_speed: 200.0,
            player_top_speed: 627.0,
            player_max_speed: 700.0,
            reaches_top_speed_after_s: 60.0 * 5.0,
            walk_animation_frames: 11,
            walk_animation_duration_slowest_s: 1.0,
            walk_animation_duration_fastest_s: 0.5,

            gem_sprite_size: Vec2::new(70.0, 70.0),
            gem_pickup_radius: 70.0,
            gem_respawn_timeout_ms: 500,
            gem_spoilage_timeout_ms: 1000,
            gem_pickup_volume: 0.5,

            cactus_sprite_size: Vec2::new(70.0, 70.0),
            cactus_collision_offset: Vec2::new(10.0, 20.0),
            cactus_collision_radius_min: 60.0,
            cactus_collision_radius_max: 85.0,
            cactus_knockback_force_min: 2.0,
            cactus_knockback_force_max: 10.0,
            cactus_respawn_every_n_gems: 5,

            idle_timeout_s: 30.0,
            streak_popup_at_length: 3,
            points_highlight_duration_ms: 1000,
            settings_selection_timeout_s: 0.40,
            display_n_top_streaks: 10,
        }
    }
}

impl Tuning {
    /// Load overrides from `path`, defaults if missing or malformed
    pub fn load(path: &Path) -> Self {
        persistence::load_or_default(path, "tuning")
    }
}
