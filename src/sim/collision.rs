//! Collision checks and movement response
//!
//! Pure functions over positions. Entities are axis-aligned sprites addressed
//! by their top-left corner; contact is tested with circles.

use glam::Vec2;

use crate::clamp;
use crate::engine::{Action, GameplayAction};

/// True if `a` lies strictly within `radius` of `b`
#[inline]
pub fn overlaps(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance(b) < radius
}

/// Push `pos` away from `source` by `force` pixels.
///
/// Coincident points produce no push.
pub fn knockback(pos: Vec2, source: Vec2, force: f32) -> Vec2 {
    pos - (source - pos).normalize_or_zero() * force
}

/// Outcome of applying movement actions for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub position: Vec2,
    /// New facing if a horizontal move happened: true = facing left
    pub mirrored: Option<bool>,
}

/// Apply every movement action in `actions` at `speed` over `dt`.
///
/// A step is taken only if the sprite stays strictly inside the playfield
/// afterwards; otherwise that axis does not move at all this frame.
pub fn apply_movement(
    position: Vec2,
    actions: &[GameplayAction],
    speed: f32,
    dt: f32,
    sprite_size: Vec2,
    bounds: Vec2,
) -> Movement {
    let step = speed * dt;
    let mut position = position;
    let mut mirrored = None;

    for action in actions {
        match action.action {
            Action::MoveLeft => {
                if position.x - step > 0.0 {
                    position.x -= step;
                    mirrored = Some(true);
                }
            }
            Action::MoveRight => {
                if position.x + step + sprite_size.x < bounds.x {
                    position.x += step;
                    mirrored = Some(false);
                }
            }
            Action::MoveUp => {
                if position.y - step > 0.0 {
                    position.y -= step;
                }
            }
            Action::MoveDown => {
                if position.y + step + sprite_size.y < bounds.y {
                    position.y += step;
                }
            }
            Action::Return | Action::Escape => {}
        }
    }

    Movement { position, mirrored }
}

/// Hard clamp a sprite's top-left so the whole sprite stays on the playfield
pub fn clamp_to_playfield(position: Vec2, sprite_size: Vec2, bounds: Vec2) -> Vec2 {
    let max = (bounds - sprite_size).max(Vec2::ZERO);
    Vec2::new(
        clamp(position.x, 0.0, max.x),
        clamp(position.y, 0.0, max.y),
    )
}
