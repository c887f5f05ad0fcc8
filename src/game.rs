//! Top-level game object
//!
//! Owns every subsystem and advances them one frame at a time:
//! clock -> due timers -> idle check -> exactly one mode update.

use glam::Vec2;

use crate::engine::input::is_starting;
use crate::engine::{Action, Engine, GameplayAction};
use crate::modes::{EnterHook, MenuState, ModeManager, UpdateMode};
use crate::persistence::PersistenceError;
use crate::settings::{Settings, SettingsMenu, SettingsProperty, VOLUME_STEP};
use crate::sim::{self, GameplayState, ImageId};
use crate::stats::{StatisticsStore, format_play_time};
use crate::tuning::Tuning;

/// Read-only view of everything a renderer draws
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub mode: UpdateMode,

    pub player_position: Vec2,
    pub player_mirrored: bool,
    pub player_image: ImageId,
    pub player_walk_frame: Option<usize>,
    pub player_speed: f32,

    pub gem_position: Vec2,
    pub gem_visible: bool,
    pub gem_image: ImageId,

    pub cactus_position: Vec2,
    pub cactus_visible: bool,

    pub progression: f32,
    pub streak_length: u32,
    pub show_streak_popup: bool,
    pub points: u64,
    pub points_highlighted: bool,
    pub longest_streak: u32,
    /// Streak length -> count, longest first
    pub top_streaks: Vec<(u32, u32)>,

    pub session_play_time_s: f64,
    pub total_play_time_s: f64,
    pub fps: u32,

    pub menu_options: Vec<(&'static str, bool)>,
    pub settings_options: Vec<(&'static str, bool)>,
    /// Music volume to play at right now (0 while muted)
    pub music_volume: f32,
    pub bgm_volume: f32,
    pub sfx_volume: f32,
    pub mute_audio: bool,
}

pub struct Game {
    pub engine: Engine,
    pub tuning: Tuning,
    pub settings: Settings,
    pub gameplay: GameplayState,
    pub stats: StatisticsStore,
    modes: ModeManager<EnterHook>,
    menu: MenuState,
    settings_menu: SettingsMenu,
    /// Mode whose update ran during the last frame
    last_updated: Option<UpdateMode>,
}

impl Game {
    /// Build a game in `Uninit`; call `start` to show the demo screen
    pub fn new(tuning: Tuning, settings: Settings, stats: StatisticsStore, seed: u64, now: f64) -> Self {
        let mut modes = ModeManager::new();
        modes.register_callable(UpdateMode::Statistics, EnterHook::ParsePlayerHistory);
        modes.register_callable(UpdateMode::Gameplay, EnterHook::PlaceGem);
        modes.register_callable(UpdateMode::Gameplay, EnterHook::PlaceCactus);
        modes.register_callable(UpdateMode::Settings, EnterHook::SelectFirstSetting);

        let mut game = Self {
            engine: Engine::new(now),
            gameplay: GameplayState::new(&tuning, seed, now),
            settings_menu: SettingsMenu::new(tuning.settings_selection_timeout_s, now),
            menu: MenuState::default(),
            tuning,
            settings,
            stats,
            modes,
            last_updated: None,
        };
        game.apply_settings();
        log::info!("Game created with seed {}", seed);
        game
    }

    pub fn start(&mut self) {
        self.set_mode(UpdateMode::Demo);
    }

    pub fn mode(&self) -> UpdateMode {
        self.modes.current()
    }

    pub fn modes(&self) -> &ModeManager<EnterHook> {
        &self.modes
    }

    pub fn menu(&self) -> &MenuState {
        &self.menu
    }

    pub fn settings_menu(&self) -> &SettingsMenu {
        &self.settings_menu
    }

    pub fn last_updated(&self) -> Option<UpdateMode> {
        self.last_updated
    }

    pub fn is_exit_requested(&self) -> bool {
        self.modes.current() == UpdateMode::InvokeExit
    }

    /// Switch mode and run its enter hooks
    pub fn set_mode(&mut self, mode: UpdateMode) {
        let mut fired = Vec::new();
        self.modes.set_mode(mode, |hook| fired.push(hook));
        if mode == UpdateMode::Menu {
            self.menu.opened_from(self.modes.previous());
        }
        for hook in fired {
            self.run_enter_hook(hook);
        }
    }

    fn run_enter_hook(&mut self, hook: EnterHook) {
        match hook {
            EnterHook::ParsePlayerHistory => self.stats.parse_player_history(),
            EnterHook::PlaceGem => {
                sim::place_gem(&mut self.gameplay, &mut self.engine);
            }
            EnterHook::PlaceCactus => {
                sim::place_cactus(&mut self.gameplay);
            }
            EnterHook::SelectFirstSetting => self.settings_menu.select(SettingsProperty::BgmVolume),
        }
    }

    /// Push the current settings into the audio manager
    pub fn apply_settings(&mut self) {
        self.engine.audio.set_bgm_volume(self.settings.bgm_volume);
        self.engine.audio.set_sfx_volume(self.settings.sfx_volume);
        self.engine.audio.set_muted(self.settings.mute_audio);
    }

    /// Run one frame at host time `now`.
    ///
    /// Returns the mode after the update, or `None` once exit was requested.
    pub fn frame(&mut self, now: f64, actions: &[GameplayAction]) -> Option<UpdateMode> {
        let dt = self.engine.clock.begin_frame(now);
        let now = self.engine.now();

        while let Some(event) = self.engine.timers.pop_due(now) {
            if !sim::handle_timer(&mut self.gameplay, &mut self.engine, event) {
                log::debug!("Ignored stale timer {:?}", event);
            }
        }

        if !actions.is_empty() {
            self.gameplay.session.record_input(now);
        } else if self.gameplay.session.should_switch_to_demo_mode(now)
            && !matches!(
                self.modes.current(),
                UpdateMode::Demo | UpdateMode::Uninit | UpdateMode::InvokeExit
            )
        {
            log::info!("No input for {:.0}s, back to demo", self.tuning.idle_timeout_s);
            self.set_mode(UpdateMode::Demo);
        }

        self.update(dt, actions)
    }

    /// Dispatch to exactly one mode update
    pub fn update(&mut self, dt: f32, actions: &[GameplayAction]) -> Option<UpdateMode> {
        let mode = self.modes.current();
        match mode {
            UpdateMode::Uninit => panic!("update called before the game was started"),
            UpdateMode::InvokeExit => return None,
            UpdateMode::Demo => self.update_demo(actions),
            UpdateMode::Gameplay => self.update_gameplay(dt, actions),
            UpdateMode::Menu => self.update_menu(actions),
            UpdateMode::Settings => self.update_settings(actions),
            UpdateMode::Statistics | UpdateMode::About => self.update_info_screen(actions),
        }
        self.last_updated = Some(mode);

        let current = self.modes.current();
        (current != UpdateMode::InvokeExit).then_some(current)
    }

    fn update_demo(&mut self, actions: &[GameplayAction]) {
        if is_starting(actions, Action::Escape) {
            self.set_mode(UpdateMode::Menu);
        } else if actions.iter().any(|a| a.is_starting) {
            self.set_mode(UpdateMode::Gameplay);
        }
    }

    fn update_gameplay(&mut self, dt: f32, actions: &[GameplayAction]) {
        if is_starting(actions, Action::Escape) {
            self.set_mode(UpdateMode::Menu);
            return;
        }
        sim::tick(&mut self.gameplay, &mut self.engine, &mut self.stats, actions, dt);
    }

    fn update_menu(&mut self, actions: &[GameplayAction]) {
        for action in actions.iter().filter(|a| a.is_starting) {
            match action.action {
                Action::MoveUp => self.menu.select_previous(),
                Action::MoveDown => self.menu.select_next(),
                Action::Return => {
                    let target = self.menu.selection().target();
                    self.set_mode(target);
                    return;
                }
                Action::Escape => {
                    let back = self.menu.return_mode();
                    self.set_mode(back);
                    return;
                }
                Action::MoveLeft | Action::MoveRight => {}
            }
        }
    }

    fn update_settings(&mut self, actions: &[GameplayAction]) {
        let now = self.engine.now();
        for action in actions {
            match action.action {
                // Held up/down keep scrolling, throttled by the menu debounce
                Action::MoveUp => self.settings_menu.select_previous(now),
                Action::MoveDown => self.settings_menu.select_next(now),
                Action::MoveLeft | Action::MoveRight if action.is_starting => {
                    let delta = if action.action == Action::MoveLeft {
                        -VOLUME_STEP
                    } else {
                        VOLUME_STEP
                    };
                    if let Some(property) = self.settings_menu.selected() {
                        self.settings.adjust(property, delta);
                        self.apply_settings();
                    }
                }
                Action::Return if action.is_starting => match self.settings_menu.selected() {
                    Some(SettingsProperty::MuteAudio) => {
                        self.settings.mute_audio = !self.settings.mute_audio;
                        self.apply_settings();
                        log::info!("Audio muted: {}", self.settings.mute_audio);
                    }
                    Some(SettingsProperty::ResetSaveFile) => self.stats.reset(),
                    _ => {}
                },
                Action::Escape if action.is_starting => {
                    self.set_mode(UpdateMode::Menu);
                    return;
                }
                _ => {}
            }
        }
    }

    fn update_info_screen(&mut self, actions: &[GameplayAction]) {
        if is_starting(actions, Action::Escape) {
            self.set_mode(UpdateMode::Menu);
        }
    }

    /// Seconds since this session's gameplay state was created
    pub fn session_play_time_s(&self) -> f64 {
        self.gameplay.session.elapsed_s(self.engine.now())
    }

    /// Fold this session's play time into the statistics and save them
    pub fn finish_session(&mut self) -> Result<(), PersistenceError> {
        let session_s = self.session_play_time_s();
        self.stats.finish_session(session_s);
        log::info!(
            "Session over after {} ({} total)",
            format_play_time(session_s),
            format_play_time(self.stats.player_stats.total_play_time)
        );
        self.stats.save()
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        let now = self.engine.now();
        let state = &self.gameplay;
        let session_s = self.session_play_time_s();
        RenderSnapshot {
            mode: self.modes.current(),

            player_position: state.player.position,
            player_mirrored: state.player.render_mirrored,
            player_image: state.player.image(),
            player_walk_frame: state.player.walk_frame(now),
            player_speed: state.player.speed(),

            gem_position: state.gem.position,
            gem_visible: state.gem.is_active,
            gem_image: state.gem.image(),

            cactus_position: state.cactus.position,
            cactus_visible: state.cactus.is_active,

            progression: state.session.ramp_up_progression,
            streak_length: state.session.gem_streak_length,
            show_streak_popup: state.session.show_streak_popup(),
            points: self.stats.points(),
            points_highlighted: state.hud.points_highlighted,
            longest_streak: self.stats.longest_streak(),
            top_streaks: self.stats.top_streaks(self.tuning.display_n_top_streaks),

            session_play_time_s: session_s,
            total_play_time_s: self.stats.total_play_time_with(session_s),
            fps: self.engine.clock.fps(),

            menu_options: self.menu.options(),
            settings_options: self.settings_menu.options(),
            music_volume: self.engine.audio.bgm_volume(),
            bgm_volume: self.settings.bgm_volume,
            sfx_volume: self.settings.sfx_volume,
            mute_audio: self.settings.mute_audio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        let mut game = Game::new(
            Tuning::default(),
            Settings::default(),
            StatisticsStore::new("unused.data"),
            42,
            0.0,
        );
        game.start();
        game
    }

    fn press(action: Action) -> Vec<GameplayAction> {
        vec![GameplayAction::started(action)]
    }

    #[test]
    fn test_start_enters_demo() {
        let g = game();
        assert_eq!(g.mode(), UpdateMode::Demo);
        assert_eq!(g.modes().previous(), UpdateMode::Uninit);
        assert!(!g.gameplay.gem.is_active);
    }

    #[test]
    #[should_panic(expected = "before the game was started")]
    fn test_update_in_uninit_panics() {
        let mut g = Game::new(
            Tuning::default(),
            Settings::default(),
            StatisticsStore::new("unused.data"),
            1,
            0.0,
        );
        g.frame(0.1, &[]);
    }

    #[test]
    fn test_any_key_starts_gameplay_and_places_entities() {
        let mut g = game();
        assert_eq!(g.frame(0.1, &press(Action::MoveLeft)), Some(UpdateMode::Gameplay));
        assert!(g.gameplay.gem.is_active);
        assert!(g.gameplay.cactus.is_active);
    }

    #[test]
    fn test_escape_round_trip_through_menu() {
        let mut g = game();
        g.frame(0.1, &press(Action::Return));
        assert_eq!(g.mode(), UpdateMode::Gameplay);
        g.frame(0.2, &press(Action::Escape));
        assert_eq!(g.mode(), UpdateMode::Menu);
        assert_eq!(g.menu().return_mode(), UpdateMode::Gameplay);

        // Into stats and back; escape from the menu still returns to gameplay
        g.frame(0.3, &press(Action::Return));
        assert_eq!(g.mode(), UpdateMode::Statistics);
        assert!(g.stats.streak_counts().is_some());
        g.frame(0.4, &press(Action::Escape));
        assert_eq!(g.mode(), UpdateMode::Menu);
        g.frame(0.5, &press(Action::Escape));
        assert_eq!(g.mode(), UpdateMode::Gameplay);
    }

    #[test]
    fn test_quit_from_menu() {
        let mut g = game();
        g.frame(0.1, &press(Action::Escape));
        assert_eq!(g.menu().return_mode(), UpdateMode::Demo);
        g.frame(0.2, &press(Action::MoveUp));
        assert_eq!(g.menu().selection().as_str(), "quit");
        assert_eq!(g.frame(0.3, &press(Action::Return)), None);
        assert!(g.is_exit_requested());
        assert_eq!(g.frame(0.4, &[]), None);
    }

    #[test]
    fn test_settings_screen() {
        let mut g = game();
        g.frame(0.1, &press(Action::Escape));
        g.frame(0.2, &press(Action::MoveDown));
        g.frame(0.3, &press(Action::Return));
        assert_eq!(g.mode(), UpdateMode::Settings);
        assert_eq!(g.settings_menu().selected(), Some(SettingsProperty::BgmVolume));

        g.frame(0.4, &press(Action::MoveLeft));
        assert!((g.settings.bgm_volume - 0.9).abs() < 1e-6);
        assert!((g.engine.audio.bgm_volume() - 0.9).abs() < 1e-6);

        // Debounced: a held key moves the selection only every 0.4s
        let held = vec![GameplayAction::held(Action::MoveDown)];
        g.frame(1.0, &held);
        g.frame(1.1, &held);
        assert_eq!(g.settings_menu().selected(), Some(SettingsProperty::SfxVolume));
        g.frame(1.5, &held);
        assert_eq!(g.settings_menu().selected(), Some(SettingsProperty::MuteAudio));

        g.frame(1.6, &press(Action::Return));
        assert!(g.settings.mute_audio);
        assert!(g.engine.audio.is_muted());
        assert_eq!(g.snapshot().music_volume, 0.0);

        g.frame(1.7, &press(Action::Escape));
        assert_eq!(g.mode(), UpdateMode::Menu);
    }

    #[test]
    fn test_reset_save_file() {
        let mut g = game();
        g.stats.add_one_point();
        g.set_mode(UpdateMode::Settings);
        g.settings_menu.select(SettingsProperty::ResetSaveFile);
        g.frame(0.1, &press(Action::Return));
        assert_eq!(g.stats.points(), 0);
    }

    #[test]
    fn test_idle_returns_to_demo() {
        let mut g = game();
        g.frame(1.0, &press(Action::MoveRight));
        g.set_mode(UpdateMode::About);
        assert_eq!(g.frame(30.0, &[]), Some(UpdateMode::About));
        assert_eq!(g.frame(31.5, &[]), Some(UpdateMode::Demo));
        assert_eq!(g.last_updated(), Some(UpdateMode::Demo));
    }

    #[test]
    fn test_timers_fire_between_frames() {
        let mut g = game();
        g.frame(0.1, &press(Action::MoveUp));
        assert!(g.gameplay.gem.is_ripe());
        g.frame(1.2, &[]);
        assert!(!g.gameplay.gem.is_ripe());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut g = game();
        g.frame(0.1, &press(Action::MoveUp));
        let snap = g.snapshot();
        assert_eq!(snap.mode, UpdateMode::Gameplay);
        assert!(snap.gem_visible);
        assert_eq!(snap.gem_image, ImageId::GemYellow);
        assert_eq!(snap.player_image, ImageId::PlayerStand);
        assert_eq!(snap.player_walk_frame, None);
        assert_eq!(snap.player_speed, 200.0);
        assert_eq!(snap.menu_options.len(), 4);
        assert!(snap.total_play_time_s >= snap.session_play_time_s);
    }

    #[test]
    fn test_finish_session_saves_play_time() {
        let path = std::env::temp_dir().join(format!("gembo-game-{}", std::process::id()));
        let mut g = Game::new(
            Tuning::default(),
            Settings::default(),
            StatisticsStore::new(&path),
            3,
            100.0,
        );
        g.start();
        g.frame(190.0, &press(Action::Return));
        g.finish_session().unwrap();
        let loaded = StatisticsStore::load(&path);
        assert_eq!(loaded.player_stats.total_play_time, 90.0);
        let _ = std::fs::remove_file(&path);
    }
}
