//! Logical input actions
//!
//! Mapping physical keys to actions is the host's job. The host tells the
//! tracker which actions are active each frame, and the tracker derives the
//! starting/held/stopping edges by diffing against the previous frame.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Logical actions the game understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Return,
    Escape,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::MoveLeft,
        Action::MoveRight,
        Action::Return,
        Action::Escape,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::MoveLeft => "move_left",
            Action::MoveRight => "move_right",
            Action::Return => "return",
            Action::Escape => "escape",
        }
    }

    pub fn is_movement(self) -> bool {
        matches!(
            self,
            Action::MoveUp | Action::MoveDown | Action::MoveLeft | Action::MoveRight
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

/// One active action this frame, with its edge flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameplayAction {
    pub action: Action,
    pub is_starting: bool,
    pub is_held: bool,
    pub is_stopping: bool,
}

impl GameplayAction {
    /// Action pressed this frame
    pub fn started(action: Action) -> Self {
        Self {
            action,
            is_starting: true,
            is_held: false,
            is_stopping: false,
        }
    }

    /// Action pressed on an earlier frame and still down
    pub fn held(action: Action) -> Self {
        Self {
            action,
            is_starting: false,
            is_held: true,
            is_stopping: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.action.name()
    }
}

/// True if `action` is active this frame
pub fn is_active(actions: &[GameplayAction], action: Action) -> bool {
    actions.iter().any(|a| a.action == action)
}

/// True if `action` went down this frame
pub fn is_starting(actions: &[GameplayAction], action: Action) -> bool {
    actions.iter().any(|a| a.action == action && a.is_starting)
}

/// Diffs active actions frame to frame
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    last_frame: Vec<Action>,
    this_frame: Vec<Action>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's active actions (duplicates are dropped, order kept)
    pub fn collect(&mut self, active: impl IntoIterator<Item = Action>) {
        let mut this_frame = Vec::new();
        for action in active {
            if !this_frame.contains(&action) {
                this_frame.push(action);
            }
        }
        self.last_frame = std::mem::replace(&mut self.this_frame, this_frame);
    }

    pub fn action_is_starting(&self, action: Action) -> bool {
        self.this_frame.contains(&action) && !self.last_frame.contains(&action)
    }

    pub fn action_is_held(&self, action: Action) -> bool {
        self.this_frame.contains(&action) && self.last_frame.contains(&action)
    }

    pub fn action_is_stopping(&self, action: Action) -> bool {
        !self.this_frame.contains(&action) && self.last_frame.contains(&action)
    }

    /// Actions active this frame, in the order they were collected
    pub fn actions_this_frame(&self) -> Vec<GameplayAction> {
        self.this_frame
            .iter()
            .map(|&action| GameplayAction {
                action,
                is_starting: self.action_is_starting(action),
                is_held: self.action_is_held(action),
                is_stopping: self.action_is_stopping(action),
            })
            .collect()
    }
}
