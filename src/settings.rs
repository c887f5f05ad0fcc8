//! Player preferences and the settings screen selection
//!
//! Persisted separately from statistics.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};

/// Volume change per left/right press
pub const VOLUME_STEP: f32 = 0.1;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Music volume (0.0 - 1.0)
    pub bgm_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub mute_audio: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bgm_volume: 1.0,
            sfx_volume: 1.0,
            mute_audio: false,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Self {
        persistence::load_or_default(path, "settings")
    }

    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Nudge a volume property; other properties are left alone
    pub fn adjust(&mut self, property: SettingsProperty, delta: f32) {
        match property {
            SettingsProperty::BgmVolume => {
                self.bgm_volume = step_volume(self.bgm_volume, delta);
            }
            SettingsProperty::SfxVolume => {
                self.sfx_volume = step_volume(self.sfx_volume, delta);
            }
            SettingsProperty::MuteAudio | SettingsProperty::ResetSaveFile => {}
        }
    }
}

// Round to the step grid so repeated presses don't drift
fn step_volume(current: f32, delta: f32) -> f32 {
    let steps = ((current + delta) / VOLUME_STEP).round();
    (steps * VOLUME_STEP).clamp(0.0, 1.0)
}

/// Rows on the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsProperty {
    BgmVolume,
    SfxVolume,
    MuteAudio,
    ResetSaveFile,
}

impl SettingsProperty {
    pub const ALL: [SettingsProperty; 4] = [
        SettingsProperty::BgmVolume,
        SettingsProperty::SfxVolume,
        SettingsProperty::MuteAudio,
        SettingsProperty::ResetSaveFile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SettingsProperty::BgmVolume => "bgm_volume",
            SettingsProperty::SfxVolume => "sfx_volume",
            SettingsProperty::MuteAudio => "mute_audio",
            SettingsProperty::ResetSaveFile => "reset_save_file",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|&p| p == self).unwrap_or(0)
    }

    fn offset(self, by: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let idx = (self.index() as isize + by).rem_euclid(len);
        Self::ALL[idx as usize]
    }
}

/// Selection state of the settings screen, with a debounce between changes
#[derive(Debug, Clone)]
pub struct SettingsMenu {
    selected: Option<SettingsProperty>,
    last_changed_at: f64,
    selection_timeout_s: f64,
}

impl SettingsMenu {
    pub fn new(selection_timeout_s: f64, now: f64) -> Self {
        Self {
            selected: None,
            last_changed_at: now,
            selection_timeout_s,
        }
    }

    pub fn selected(&self) -> Option<SettingsProperty> {
        self.selected
    }

    pub fn select(&mut self, property: SettingsProperty) {
        self.selected = Some(property);
    }

    pub fn allow_selection_change(&self, now: f64) -> bool {
        now - self.last_changed_at > self.selection_timeout_s
    }

    pub fn select_next(&mut self, now: f64) {
        self.step(1, now);
    }

    pub fn select_previous(&mut self, now: f64) {
        self.step(-1, now);
    }

    fn step(&mut self, by: isize, now: f64) {
        let Some(current) = self.selected else {
            self.selected = Some(SettingsProperty::BgmVolume);
            return;
        };
        if self.allow_selection_change(now) {
            self.selected = Some(current.offset(by));
            self.last_changed_at = now;
        }
    }

    /// `(name, is_selected)` for each row, in display order
    pub fn options(&self) -> Vec<(&'static str, bool)> {
        SettingsProperty::ALL
            .iter()
            .map(|&p| (p.as_str(), self.selected == Some(p)))
            .collect()
    }
}
