//! Simple AI that plays gameplay by itself
//!
//! Used by the headless binary and by tests that want a "player" without
//! scripting every frame. It only ever emits the same logical actions a
//! human would.

use glam::Vec2;

use super::state::GameplayState;
use crate::engine::Action;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Stop steering on an axis once within this many pixels of the target
    pub dead_zone: f32,
    /// Detour around the cactus when passing this close to it
    pub cactus_margin: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            dead_zone: 8.0,
            cactus_margin: 20.0,
        }
    }
}

impl Autopilot {
    /// Where the autopilot wants to go: the active gem, otherwise the middle
    pub fn target(&self, state: &GameplayState) -> Vec2 {
        if state.gem.is_active {
            state.gem.position
        } else {
            (state.screen_size - state.player.sprite_size) / 2.0
        }
    }

    /// Actions to hold this frame
    pub fn actions(&self, state: &GameplayState) -> Vec<Action> {
        let pos = state.player.position;
        let mut to_target = self.target(state) - pos;

        // Sidestep if the cactus is in the way
        if state.cactus.is_active {
            let center = state.cactus.collision_center();
            let danger = state.cactus.collision_radius + self.cactus_margin;
            let to_cactus = center - pos;
            let heading_into = to_cactus.dot(to_target) > 0.0;
            if heading_into && to_cactus.length() < danger {
                to_target = to_target.perp();
            }
        }

        let mut actions = Vec::with_capacity(2);
        if to_target.x < -self.dead_zone {
            actions.push(Action::MoveLeft);
        } else if to_target.x > self.dead_zone {
            actions.push(Action::MoveRight);
        }
        if to_target.y < -self.dead_zone {
            actions.push(Action::MoveUp);
        } else if to_target.y > self.dead_zone {
            actions.push(Action::MoveDown);
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_steers_toward_gem() {
        let mut state = GameplayState::new(&Tuning::default(), 1, 0.0);
        state.player.position = Vec2::new(200.0, 200.0);
        state.gem.position = Vec2::new(50.0, 400.0);
        state.gem.is_active = true;
        let actions = Autopilot::default().actions(&state);
        assert_eq!(actions, vec![Action::MoveLeft, Action::MoveDown]);
    }

    #[test]
    fn test_idles_on_target() {
        let mut state = GameplayState::new(&Tuning::default(), 1, 0.0);
        state.gem.position = state.player.position + Vec2::new(3.0, -3.0);
        state.gem.is_active = true;
        assert!(Autopilot::default().actions(&state).is_empty());
    }

    #[test]
    fn test_returns_to_middle_without_gem() {
        let state = GameplayState::new(&Tuning::default(), 1, 0.0);
        let pilot = Autopilot::default();
        assert_eq!(pilot.target(&state), state.player.position);
        assert!(pilot.actions(&state).is_empty());
    }
}
