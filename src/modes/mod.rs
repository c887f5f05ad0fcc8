//! Update-mode state machine
//!
//! Exactly one `UpdateMode` is current. Changing mode records the previous
//! one and fires every enter-hook registered for the target, in registration
//! order. Hooks are plain values (usually `EnterHook`), so registration is
//! idempotent by equality and the table is a fixed array indexed by mode.

pub mod menu;

pub use menu::{MenuOption, MenuState};

use std::fmt;

/// Top-level screens/states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateMode {
    /// Not finished initializing
    Uninit,
    /// Attract screen; plays itself, any input starts gameplay
    Demo,
    /// Where the game lives
    Gameplay,
    /// Access to the other screens
    Menu,
    /// Volume, mute, reset
    Settings,
    /// Longest streak and streak histogram
    Statistics,
    About,
    /// Sentinel the host loop checks to stop
    InvokeExit,
}

impl UpdateMode {
    pub const COUNT: usize = 8;

    pub const ALL: [UpdateMode; Self::COUNT] = [
        UpdateMode::Uninit,
        UpdateMode::Demo,
        UpdateMode::Gameplay,
        UpdateMode::Menu,
        UpdateMode::Settings,
        UpdateMode::Statistics,
        UpdateMode::About,
        UpdateMode::InvokeExit,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            UpdateMode::Uninit => "uninit",
            UpdateMode::Demo => "demo",
            UpdateMode::Gameplay => "gameplay",
            UpdateMode::Menu => "menu",
            UpdateMode::Settings => "settings",
            UpdateMode::Statistics => "stats",
            UpdateMode::About => "about",
            UpdateMode::InvokeExit => "exit",
        }
    }
}

impl fmt::Display for UpdateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Work the game does when a mode is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterHook {
    /// Rebuild the streak histogram for the stats screen
    ParsePlayerHistory,
    /// Make sure a gem is on the field
    PlaceGem,
    /// Make sure the cactus is on the field
    PlaceCactus,
    /// Start the settings screen on its first row
    SelectFirstSetting,
}

/// Owns the current/previous mode and the per-mode hook lists
#[derive(Debug, Clone)]
pub struct ModeManager<H = EnterHook> {
    current: UpdateMode,
    previous: UpdateMode,
    // `None` means the mode was never given a subscriber list
    on_enter: [Option<Vec<H>>; UpdateMode::COUNT],
}

impl<H: Copy + PartialEq> Default for ModeManager<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + PartialEq> ModeManager<H> {
    /// Every mode except `Uninit` starts with an empty subscriber list
    pub fn new() -> Self {
        let on_enter = std::array::from_fn(|i| {
            if UpdateMode::ALL[i] == UpdateMode::Uninit {
                None
            } else {
                Some(Vec::new())
            }
        });
        Self {
            current: UpdateMode::Uninit,
            previous: UpdateMode::Uninit,
            on_enter,
        }
    }

    pub fn current(&self) -> UpdateMode {
        self.current
    }

    pub fn previous(&self) -> UpdateMode {
        self.previous
    }

    /// Hooks for `mode`; `None` if the mode has no subscriber list at all
    pub fn callables_of_mode(&self, mode: UpdateMode) -> Option<&[H]> {
        self.on_enter[mode.index()].as_deref()
    }

    pub fn is_callable_registered(&self, mode: UpdateMode, hook: H) -> bool {
        self.callables_of_mode(mode)
            .is_some_and(|hooks| hooks.contains(&hook))
    }

    /// Add `hook` to `mode`. Registering twice is a no-op; always true.
    pub fn register_callable(&mut self, mode: UpdateMode, hook: H) -> bool {
        let hooks = self.on_enter[mode.index()].get_or_insert_with(Vec::new);
        if !hooks.contains(&hook) {
            hooks.push(hook);
        }
        true
    }

    /// Remove one occurrence of `hook`; true only if something was removed
    pub fn unregister_callable(&mut self, mode: UpdateMode, hook: H) -> bool {
        let Some(hooks) = self.on_enter[mode.index()].as_mut() else {
            return false;
        };
        match hooks.iter().position(|&h| h == hook) {
            Some(i) => {
                hooks.remove(i);
                true
            }
            None => false,
        }
    }

    /// Run every hook registered for `mode`, in order.
    ///
    /// Panics if `mode` has no subscriber list: that is a wiring bug.
    pub fn run_callables_for_mode(&self, mode: UpdateMode, mut run: impl FnMut(H)) {
        let hooks = self.on_enter[mode.index()].as_deref();
        assert!(hooks.is_some(), "no subscriber list for update mode '{mode}'");
        for &hook in hooks.unwrap_or_default() {
            run(hook);
        }
    }

    /// Switch to `mode` and fire its hooks. Re-entering the current mode
    /// still fires them.
    pub fn set_mode(&mut self, mode: UpdateMode, run: impl FnMut(H)) {
        self.previous = self.current;
        self.current = mode;
        log::info!("update mode: {} -> {}", self.previous, self.current);
        self.run_callables_for_mode(mode, run);
    }
}
