//! Main menu selection

use super::UpdateMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOption {
    Stats,
    Settings,
    About,
    Quit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 4] = [
        MenuOption::Stats,
        MenuOption::Settings,
        MenuOption::About,
        MenuOption::Quit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MenuOption::Stats => "stats",
            MenuOption::Settings => "settings",
            MenuOption::About => "about",
            MenuOption::Quit => "quit",
        }
    }

    /// Mode entered when this option is invoked
    pub fn target(&self) -> UpdateMode {
        match self {
            MenuOption::Stats => UpdateMode::Statistics,
            MenuOption::Settings => UpdateMode::Settings,
            MenuOption::About => UpdateMode::About,
            MenuOption::Quit => UpdateMode::InvokeExit,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MenuState {
    selected: usize,
    /// Where escape goes back to
    return_mode: UpdateMode,
}

impl Default for MenuState {
    fn default() -> Self {
        Self {
            selected: 0,
            return_mode: UpdateMode::Gameplay,
        }
    }
}

impl MenuState {
    pub fn selection(&self) -> MenuOption {
        MenuOption::ALL[self.selected]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % MenuOption::ALL.len();
    }

    pub fn select_previous(&mut self) {
        let len = MenuOption::ALL.len();
        self.selected = (self.selected + len - 1) % len;
    }

    pub fn return_mode(&self) -> UpdateMode {
        self.return_mode
    }

    /// Remember the screen that opened the menu. Only demo and gameplay
    /// count; coming back from a sub-screen keeps the earlier one.
    pub fn opened_from(&mut self, mode: UpdateMode) {
        if matches!(mode, UpdateMode::Demo | UpdateMode::Gameplay) {
            self.return_mode = mode;
        }
    }

    /// `(name, is_selected)` for each option
    pub fn options(&self) -> Vec<(&'static str, bool)> {
        MenuOption::ALL
            .iter()
            .enumerate()
            .map(|(i, o)| (o.as_str(), i == self.selected))
            .collect()
    }
}
