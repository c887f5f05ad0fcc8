//! Per-frame gameplay step
//!
//! Advances the player, resolves gem pickups and cactus contact, then
//! recomputes ramp-up. Deferred work (respawn, spoil, highlight) goes
//! through the engine timers and comes back via `handle_timer`.

use glam::Vec2;
use rand::Rng;

use super::collision::{apply_movement, clamp_to_playfield};
use super::state::{GameplayState, Ripeness};
use crate::engine::{Engine, GameplayAction, TimerEvent};
use crate::stats::StatisticsStore;
use crate::{clamp_onscreen, random_onscreen_coordinate};

/// Attempts at finding a cactus spot clear of the player
const CACTUS_PLACEMENT_ATTEMPTS: usize = 8;

/// Advance gameplay by one frame
pub fn tick(
    state: &mut GameplayState,
    engine: &mut Engine,
    stats: &mut StatisticsStore,
    actions: &[GameplayAction],
    dt: f32,
) {
    let now = engine.now();

    let moving = actions.iter().any(|a| a.action.is_movement());
    state.player.set_moving(moving, now);

    let movement = apply_movement(
        state.player.position,
        actions,
        state.player.speed(),
        dt,
        state.player.sprite_size,
        state.screen_size,
    );
    state.player.position = movement.position;
    if let Some(mirrored) = movement.mirrored {
        state.player.render_mirrored = mirrored;
    }

    if state.gem.is_colliding_with(state.player.position) {
        collect_gem(state, engine, stats);
    }

    if state.cactus.is_colliding_with(state.player.position) {
        let pushed = state.cactus.knockback(state.player.position);
        state.player.position =
            clamp_to_playfield(pushed, state.player.sprite_size, state.screen_size);
        log::debug!(
            "Cactus knockback ({:.1}) to {:?}",
            state.cactus.knockback_force,
            state.player.position
        );
    }

    let progression = state
        .session
        .update_progression(now, state.player.reaches_top_speed_after_s);
    state.player.apply_progression(progression);
    state.cactus.apply_progression(progression);
}

/// The player touched the active gem
pub fn collect_gem(state: &mut GameplayState, engine: &mut Engine, stats: &mut StatisticsStore) {
    let now = engine.now();
    let sound = state.gem.pickup_sound();

    state.gem.is_active = false;
    engine.schedule(state.gem.respawn_timeout_ms, TimerEvent::RespawnGem);
    stats.collect_one_gem();

    match state.gem.ripeness() {
        Ripeness::Ripe => {
            if let Some(length) = state.session.end_anti_streak() {
                log::debug!("Anti-streak of {} ended", length);
            }
            state.session.increment_gem_streak(now);
            stats.add_one_point();

            let stamp = state.hud.highlight_points();
            engine.schedule(
                state.hud.points_highlight_duration_ms,
                TimerEvent::UnhighlightPoints { stamp },
            );

            state.cactus.unchanged_for_n_ripe_gems += 1;
            if state.cactus.needs_reposition() {
                collide_with_cactus(state);
                place_cactus(state);
            }
        }
        Ripeness::Spoiled => {
            if let Some(length) = state.session.end_gem_streak() {
                stats.update_longest_streak(length);
                stats.update_streak_history(now, length);
                log::debug!("Streak of {} ended", length);
            }
            state.session.increment_anti_streak(now);
        }
    }

    debug_assert!(
        !(state.session.gem_streak_is_happening && state.session.gem_anti_streak_is_happening),
        "streak and anti-streak running at once"
    );

    engine.audio.play(sound, state.pickup_volume);
    state.session.last_gem_pickup_at = Some(now);
}

/// Put a fresh ripe gem somewhere on the field. No-op while one is active.
pub fn place_gem(state: &mut GameplayState, engine: &mut Engine) -> bool {
    if state.gem.is_active {
        return false;
    }

    let screen = state.screen_size;
    let max = (screen - state.gem.size).max(Vec2::ZERO);
    let raw = random_onscreen_coordinate(state.rng(), screen);
    state.gem.position = Vec2::new(
        clamp_onscreen(raw.x, 0.0, max.x),
        clamp_onscreen(raw.y, 0.0, max.y),
    );
    state.gem.set_ripe(true);
    state.gem.placement = state.gem.placement.wrapping_add(1);
    state.gem.is_active = true;

    engine.schedule(
        state.gem.spoilage_timeout_ms,
        TimerEvent::SpoilGem {
            placement: state.gem.placement,
        },
    );
    log::debug!("Gem placed at {:?}", state.gem.position);
    true
}

/// Spoil the gem if it is still the placement the timer was armed for
pub fn spoil_gem(state: &mut GameplayState, placement: u32) -> bool {
    if !state.gem.is_active || state.gem.placement != placement {
        return false;
    }
    state.gem.set_ripe(false);
    true
}

/// Put the cactus somewhere in the middle of the field, away from the player
/// when possible. No-op while it is active.
pub fn place_cactus(state: &mut GameplayState) -> bool {
    if state.cactus.is_active {
        return false;
    }

    let screen = state.screen_size;
    let size = state.cactus.size;
    let half = size / 2.0;
    let lo = (screen * 0.2 - half).max(Vec2::ZERO);
    let hi = (screen * 0.8 - half).max(lo);
    let player = state.player.position;
    let keep_out = state.cactus.collision_radius_max;
    let offset = state.cactus.collision_offset;

    let mut position = lo;
    for _ in 0..CACTUS_PLACEMENT_ATTEMPTS {
        let rng = state.rng();
        position = Vec2::new(
            rng.random_range(lo.x..=hi.x),
            rng.random_range(lo.y..=hi.y),
        );
        if (position + offset).distance(player) >= keep_out {
            break;
        }
    }

    state.cactus.position = clamp_to_playfield(position, size, screen);
    state.cactus.unchanged_for_n_ripe_gems = 0;
    state.cactus.is_active = true;
    log::debug!("Cactus placed at {:?}", state.cactus.position);
    true
}

/// Take the cactus off the field so it can be placed again
pub fn collide_with_cactus(state: &mut GameplayState) {
    state.cactus.collide();
}

/// React to a due timer; returns false when the event was stale
pub fn handle_timer(state: &mut GameplayState, engine: &mut Engine, event: TimerEvent) -> bool {
    match event {
        TimerEvent::RespawnGem => place_gem(state, engine),
        TimerEvent::SpoilGem { placement } => spoil_gem(state, placement),
        TimerEvent::UnhighlightPoints { stamp } => state.hud.unhighlight_points(stamp),
    }
}
