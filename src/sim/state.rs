//! Gameplay entities and session state
//!
//! Plain data plus the small self-mutations each entity owns. Anything that
//! touches more than one entity lives in `tick`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::collision;
use crate::audio::SoundEffect;
use crate::engine::SpriteAnimation;
use crate::tuning::Tuning;
use crate::{clamp, lerp};

/// Where entities wait while they are not on the field
const OFFSCREEN: Vec2 = Vec2::new(-100.0, -100.0);

/// Images the renderer needs to know about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageId {
    PlayerStand,
    PlayerWalk,
    GemYellow,
    GemBlue,
    Cactus,
    CactusBase,
}

impl ImageId {
    /// Asset stem the host should load for this image
    pub fn asset_name(self) -> &'static str {
        match self {
            ImageId::PlayerStand => "p1_stand",
            ImageId::PlayerWalk => "p1_walk",
            ImageId::GemYellow => "gemYellow",
            ImageId::GemBlue => "gemBlue",
            ImageId::Cactus => "cactus",
            ImageId::CactusBase => "halfDirt",
        }
    }
}

/// The player's avatar
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left of the sprite
    pub position: Vec2,
    pub sprite_size: Vec2,
    /// Current speed, always within `[min_speed, max_speed]`
    speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Speed at progression 0
    pub start_speed: f32,
    /// Speed at progression 1
    pub top_speed: f32,
    pub reaches_top_speed_after_s: f32,
    /// Facing left
    pub render_mirrored: bool,
    pub is_moving: bool,
    pub walk: SpriteAnimation,
    pub walk_duration_slowest_s: f32,
    pub walk_duration_fastest_s: f32,
}

impl Player {
    pub fn new(tuning: &Tuning, now: f64) -> Self {
        let position = (tuning.screen_size - tuning.player_sprite_size) / 2.0;
        Self {
            position: position.max(Vec2::ZERO),
            sprite_size: tuning.player_sprite_size,
            speed: tuning.player_start_speed,
            min_speed: tuning.player_min_speed,
            max_speed: tuning.player_max_speed,
            start_speed: tuning.player_start_speed,
            top_speed: tuning.player_top_speed,
            reaches_top_speed_after_s: tuning.reaches_top_speed_after_s,
            render_mirrored: false,
            is_moving: false,
            walk: SpriteAnimation::new(
                tuning.walk_animation_frames,
                tuning.walk_animation_duration_slowest_s,
                now,
            ),
            walk_duration_slowest_s: tuning.walk_animation_duration_slowest_s,
            walk_duration_fastest_s: tuning.walk_animation_duration_fastest_s,
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = clamp(speed, self.min_speed, self.max_speed);
    }

    /// Derive speed and walk cadence from ramp-up progression
    pub fn apply_progression(&mut self, progression: f32) {
        self.set_speed(lerp(self.start_speed, self.top_speed, progression));
        self.walk.set_duration(lerp(
            self.walk_duration_slowest_s,
            self.walk_duration_fastest_s,
            progression,
        ));
    }

    /// Run the walk cycle while moving. Stopping holds the current frame and
    /// moving again resumes from it.
    pub fn set_moving(&mut self, moving: bool, now: f64) {
        if moving && !self.is_moving {
            if self.walk.is_paused() {
                self.walk.unpause(now);
            } else {
                self.walk.play(now, true);
            }
        } else if !moving && self.is_moving {
            self.walk.pause(now);
        }
        self.is_moving = moving;
    }

    pub fn image(&self) -> ImageId {
        if self.is_moving {
            ImageId::PlayerWalk
        } else {
            ImageId::PlayerStand
        }
    }

    /// Walk frame to draw, `None` when standing
    pub fn walk_frame(&self, now: f64) -> Option<usize> {
        self.is_moving.then(|| self.walk.frame_index(now))
    }
}

/// Whether a gem scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ripeness {
    /// Yellow, worth a point and streak progress
    Ripe,
    /// Blue, ends a streak
    Spoiled,
}

/// The single collectible
#[derive(Debug, Clone)]
pub struct Gem {
    pub position: Vec2,
    pub size: Vec2,
    ripeness: Ripeness,
    /// At most one gem is ever active
    pub is_active: bool,
    /// How close the player must be to collect it
    pub pickup_radius: f32,
    /// Delay between a pickup and the next gem
    pub respawn_timeout_ms: u32,
    /// Delay between placement and spoiling
    pub spoilage_timeout_ms: u32,
    /// Bumped on every placement, lets stale spoil timers be ignored
    pub placement: u32,
}

impl Gem {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: OFFSCREEN,
            size: tuning.gem_sprite_size,
            ripeness: Ripeness::Ripe,
            is_active: false,
            pickup_radius: tuning.gem_pickup_radius,
            respawn_timeout_ms: tuning.gem_respawn_timeout_ms,
            spoilage_timeout_ms: tuning.gem_spoilage_timeout_ms,
            placement: 0,
        }
    }

    pub fn ripeness(&self) -> Ripeness {
        self.ripeness
    }

    pub fn is_ripe(&self) -> bool {
        self.ripeness == Ripeness::Ripe
    }

    /// true -> ripe (yellow), false -> spoiled (blue)
    pub fn set_ripe(&mut self, ripe: bool) {
        self.ripeness = if ripe {
            Ripeness::Ripe
        } else {
            Ripeness::Spoiled
        };
    }

    pub fn image(&self) -> ImageId {
        match self.ripeness {
            Ripeness::Ripe => ImageId::GemYellow,
            Ripeness::Spoiled => ImageId::GemBlue,
        }
    }

    pub fn pickup_sound(&self) -> SoundEffect {
        match self.ripeness {
            Ripeness::Ripe => SoundEffect::GemRipe,
            Ripeness::Spoiled => SoundEffect::GemSpoiled,
        }
    }

    pub fn is_colliding_with(&self, pos: Vec2) -> bool {
        self.is_active && collision::overlaps(pos, self.position, self.pickup_radius)
    }
}

/// The hazard; knocks the player back on contact
#[derive(Debug, Clone)]
pub struct Cactus {
    pub position: Vec2,
    pub size: Vec2,
    /// Collision circle center relative to `position`
    pub collision_offset: Vec2,
    pub collision_radius_min: f32,
    pub collision_radius_max: f32,
    pub collision_radius: f32,
    pub knockback_force_min: f32,
    pub knockback_force_max: f32,
    pub knockback_force: f32,
    pub is_active: bool,
    /// Ripe pickups since the cactus last moved
    pub unchanged_for_n_ripe_gems: u32,
    pub respawn_every_n_gems: u32,
}

impl Cactus {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            position: OFFSCREEN,
            size: tuning.cactus_sprite_size,
            collision_offset: tuning.cactus_collision_offset,
            collision_radius_min: tuning.cactus_collision_radius_min,
            collision_radius_max: tuning.cactus_collision_radius_max,
            collision_radius: tuning.cactus_collision_radius_min,
            knockback_force_min: tuning.cactus_knockback_force_min,
            knockback_force_max: tuning.cactus_knockback_force_max,
            knockback_force: tuning.cactus_knockback_force_min,
            is_active: false,
            unchanged_for_n_ripe_gems: 0,
            respawn_every_n_gems: tuning.cactus_respawn_every_n_gems,
        }
    }

    pub fn apply_progression(&mut self, progression: f32) {
        self.collision_radius = lerp(
            self.collision_radius_min,
            self.collision_radius_max,
            progression,
        );
        self.knockback_force = lerp(
            self.knockback_force_min,
            self.knockback_force_max,
            progression,
        );
    }

    pub fn collision_center(&self) -> Vec2 {
        self.position + self.collision_offset
    }

    pub fn is_colliding_with(&self, pos: Vec2) -> bool {
        self.is_active && collision::overlaps(pos, self.collision_center(), self.collision_radius)
    }

    /// Where a player at `pos` ends up after bumping into the cactus
    pub fn knockback(&self, pos: Vec2) -> Vec2 {
        collision::knockback(pos, self.position, self.knockback_force)
    }

    /// Take the cactus off the field
    pub fn collide(&mut self) {
        self.is_active = false;
    }

    pub fn needs_reposition(&self) -> bool {
        self.unchanged_for_n_ripe_gems > self.respawn_every_n_gems
    }

    pub fn image(&self) -> ImageId {
        ImageId::Cactus
    }
}

/// Ramp-up progression for `elapsed_s` of session time, in `[0, 1]`
pub fn progression_at(elapsed_s: f64, reaches_top_after_s: f32) -> f32 {
    if reaches_top_after_s <= 0.0 {
        return 1.0;
    }
    clamp(
        (elapsed_s.max(0.0) / f64::from(reaches_top_after_s)) as f32,
        0.0,
        1.0,
    )
}

/// Per-run state: streaks, progression and idle tracking
#[derive(Debug, Clone)]
pub struct GameplaySession {
    pub started_at: f64,
    /// Never decreases within a session
    pub ramp_up_progression: f32,

    pub gem_streak_is_happening: bool,
    pub gem_streak_length: u32,
    pub gem_streak_started_at: f64,

    pub gem_anti_streak_is_happening: bool,
    pub gem_anti_streak_length: u32,
    pub gem_anti_streak_started_at: f64,

    pub last_player_input_at: f64,
    pub last_gem_pickup_at: Option<f64>,

    pub idle_timeout_s: f64,
    pub streak_popup_at_length: u32,
}

impl GameplaySession {
    pub fn new(tuning: &Tuning, now: f64) -> Self {
        Self {
            started_at: now,
            ramp_up_progression: 0.0,
            gem_streak_is_happening: false,
            gem_streak_length: 0,
            gem_streak_started_at: now,
            gem_anti_streak_is_happening: false,
            gem_anti_streak_length: 0,
            gem_anti_streak_started_at: now,
            last_player_input_at: now,
            last_gem_pickup_at: None,
            idle_timeout_s: tuning.idle_timeout_s,
            streak_popup_at_length: tuning.streak_popup_at_length,
        }
    }

    pub fn elapsed_s(&self, now: f64) -> f64 {
        (now - self.started_at).max(0.0)
    }

    /// Recompute progression for `now`; returns the new value
    pub fn update_progression(&mut self, now: f64, reaches_top_after_s: f32) -> f32 {
        let p = progression_at(self.elapsed_s(now), reaches_top_after_s);
        self.ramp_up_progression = self.ramp_up_progression.max(p);
        self.ramp_up_progression
    }

    /// Start or continue a ripe streak
    pub fn increment_gem_streak(&mut self, now: f64) {
        debug_assert!(
            !self.gem_anti_streak_is_happening,
            "ripe streak while an anti-streak is running"
        );
        if !self.gem_streak_is_happening {
            self.gem_streak_started_at = now;
        }
        self.gem_streak_is_happening = true;
        self.gem_streak_length += 1;
    }

    /// End the ripe streak; returns its length if one was running
    pub fn end_gem_streak(&mut self) -> Option<u32> {
        let ended = self
            .gem_streak_is_happening
            .then_some(self.gem_streak_length);
        self.gem_streak_is_happening = false;
        self.gem_streak_length = 0;
        ended
    }

    /// Start or continue a spoiled streak
    pub fn increment_anti_streak(&mut self, now: f64) {
        debug_assert!(
            !self.gem_streak_is_happening,
            "anti-streak while a ripe streak is running"
        );
        if !self.gem_anti_streak_is_happening {
            self.gem_anti_streak_started_at = now;
        }
        self.gem_anti_streak_is_happening = true;
        self.gem_anti_streak_length += 1;
    }

    pub fn end_anti_streak(&mut self) -> Option<u32> {
        let ended = self
            .gem_anti_streak_is_happening
            .then_some(self.gem_anti_streak_length);
        self.gem_anti_streak_is_happening = false;
        self.gem_anti_streak_length = 0;
        ended
    }

    pub fn show_streak_popup(&self) -> bool {
        self.gem_streak_is_happening && self.gem_streak_length >= self.streak_popup_at_length
    }

    pub fn record_input(&mut self, now: f64) {
        self.last_player_input_at = now;
    }

    pub fn should_switch_to_demo_mode(&self, now: f64) -> bool {
        now - self.last_player_input_at > self.idle_timeout_s
    }
}

/// HUD flags driven by gameplay
#[derive(Debug, Clone)]
pub struct Hud {
    pub points_highlighted: bool,
    pub points_highlight_duration_ms: u32,
    highlight_stamp: u64,
}

impl Hud {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            points_highlighted: false,
            points_highlight_duration_ms: tuning.points_highlight_duration_ms,
            highlight_stamp: 0,
        }
    }

    /// Highlight the points total; the returned stamp identifies this request
    pub fn highlight_points(&mut self) -> u64 {
        self.highlight_stamp += 1;
        self.points_highlighted = true;
        self.highlight_stamp
    }

    /// Clear the highlight unless a newer highlight superseded `stamp`
    pub fn unhighlight_points(&mut self, stamp: u64) -> bool {
        if stamp != self.highlight_stamp {
            return false;
        }
        self.points_highlighted = false;
        true
    }
}

/// Everything the gameplay step reads and writes
#[derive(Debug, Clone)]
pub struct GameplayState {
    pub player: Player,
    pub gem: Gem,
    pub cactus: Cactus,
    pub session: GameplaySession,
    pub hud: Hud,
    pub screen_size: Vec2,
    /// Pickup cue volume before settings are applied
    pub pickup_volume: f32,
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
}

impl GameplayState {
    pub fn new(tuning: &Tuning, seed: u64, now: f64) -> Self {
        Self {
            player: Player::new(tuning, now),
            gem: Gem::new(tuning),
            cactus: Cactus::new(tuning),
            session: GameplaySession::new(tuning, now),
            hud: Hud::new(tuning),
            screen_size: tuning.screen_size,
            pickup_volume: tuning.gem_pickup_volume,
            seed,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_player_speed_follows_progression() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning, 0.0);
        assert_eq!(player.speed(), 200.0);
        player.apply_progression(1.0);
        assert_eq!(player.speed(), 627.0);
        assert_eq!(player.walk.duration_s(), 0.5);
        player.apply_progression(0.5);
        assert!((player.speed() - 413.5).abs() < 1e-3);
        assert!((player.walk.duration_s() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_player_speed_is_bounded() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning, 0.0);
        player.set_speed(10_000.0);
        assert_eq!(player.speed(), 700.0);
        player.set_speed(1.0);
        assert_eq!(player.speed(), 70.0);
    }

    #[test]
    fn test_walk_animation_only_while_moving() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning, 0.0);
        assert_eq!(player.walk_frame(0.0), None);
        assert_eq!(player.image(), ImageId::PlayerStand);
        player.set_moving(true, 1.0);
        assert_eq!(player.walk_frame(1.0), Some(0));
        assert_eq!(player.image(), ImageId::PlayerWalk);
        player.set_moving(false, 1.5);
        assert!(player.walk.is_paused());
        assert_eq!(player.walk_frame(2.0), None);
    }

    #[test]
    fn test_walk_cycle_resumes_where_it_stopped() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning, 0.0);
        player.set_moving(true, 0.0);
        // 11 frames over 1s: 0.5s in is frame 5
        assert_eq!(player.walk_frame(0.5), Some(5));
        player.set_moving(false, 0.5);

        player.set_moving(true, 10.0);
        assert!(!player.walk.is_paused());
        assert_eq!(player.walk_frame(10.0), Some(5));
        assert_eq!(player.walk_frame(10.2), Some(7));
    }

    #[test]
    fn test_gem_identity_follows_ripeness() {
        let mut gem = Gem::new(&Tuning::default());
        assert!(gem.is_ripe());
        assert_eq!(gem.image(), ImageId::GemYellow);
        assert_eq!(gem.pickup_sound(), SoundEffect::GemRipe);
        gem.set_ripe(false);
        assert_eq!(gem.ripeness(), Ripeness::Spoiled);
        assert_eq!(gem.image(), ImageId::GemBlue);
        assert_eq!(gem.pickup_sound(), SoundEffect::GemSpoiled);
    }

    #[test]
    fn test_inactive_gem_never_collides() {
        let mut gem = Gem::new(&Tuning::default());
        gem.position = Vec2::new(100.0, 100.0);
        assert!(!gem.is_colliding_with(gem.position));
        gem.is_active = true;
        assert!(gem.is_colliding_with(Vec2::new(110.0, 100.0)));
        assert!(!gem.is_colliding_with(Vec2::new(170.0, 100.0)));
    }

    #[test]
    fn test_cactus_collision_uses_offset() {
        let mut cactus = Cactus::new(&Tuning::default());
        cactus.position = Vec2::new(100.0, 100.0);
        cactus.is_active = true;
        // 65 from the sprite origin, under 59 from the offset center
        let point = Vec2::new(165.0, 100.0);
        assert!(cactus.is_colliding_with(point));
        cactus.collide();
        assert!(!cactus.is_colliding_with(point));
    }

    #[test]
    fn test_cactus_progression() {
        let mut cactus = Cactus::new(&Tuning::default());
        cactus.apply_progression(1.0);
        assert_eq!(cactus.collision_radius, 85.0);
        assert_eq!(cactus.knockback_force, 10.0);
        cactus.apply_progression(0.0);
        assert_eq!(cactus.collision_radius, 60.0);
        assert_eq!(cactus.knockback_force, 2.0);
    }

    #[test]
    fn test_streak_bookkeeping() {
        let mut session = GameplaySession::new(&Tuning::default(), 0.0);
        session.increment_gem_streak(1.0);
        session.increment_gem_streak(2.0);
        session.increment_gem_streak(3.0);
        assert_eq!(session.gem_streak_length, 3);
        assert_eq!(session.gem_streak_started_at, 1.0);
        assert!(session.show_streak_popup());

        assert_eq!(session.end_gem_streak(), Some(3));
        assert_eq!(session.end_gem_streak(), None);
        assert!(!session.show_streak_popup());

        session.increment_anti_streak(4.0);
        assert_eq!(session.gem_anti_streak_length, 1);
        assert_eq!(session.end_anti_streak(), Some(1));
    }

    #[test]
    fn test_idle_timeout() {
        let mut session = GameplaySession::new(&Tuning::default(), 0.0);
        assert!(!session.should_switch_to_demo_mode(30.0));
        assert!(session.should_switch_to_demo_mode(30.5));
        session.record_input(30.5);
        assert!(!session.should_switch_to_demo_mode(31.0));
    }

    #[test]
    fn test_points_highlight_superseded() {
        let mut hud = Hud::new(&Tuning::default());
        let first = hud.highlight_points();
        let second = hud.highlight_points();
        assert!(!hud.unhighlight_points(first));
        assert!(hud.points_highlighted);
        assert!(hud.unhighlight_points(second));
        assert!(!hud.points_highlighted);
    }

    proptest! {
        #[test]
        fn prop_progression_bounded_and_monotonic(
            mut times in prop::collection::vec(0.0f64..10_000.0, 1..50),
        ) {
            times.sort_by(f64::total_cmp);
            let mut session = GameplaySession::new(&Tuning::default(), 0.0);
            let mut last = 0.0f32;
            for t in times {
                let p = session.update_progression(t, 300.0);
                prop_assert!((0.0..=1.0).contains(&p));
                prop_assert!(p >= last);
                last = p;
            }
        }

        #[test]
        fn prop_progression_at_is_clamped(t in -1_000.0f64..1_000_000.0) {
            let p = progression_at(t, 300.0);
            prop_assert!((0.0..=1.0).contains(&p));
        }
    }
}
