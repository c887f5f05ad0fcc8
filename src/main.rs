//! Gembo entry point
//!
//! Headless native host: loads config and statistics, runs a fixed number of
//! paced frames with the autopilot at the controls, then saves everything.

use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use gembo::consts::{SETTINGS_FILE, STATS_FILE, TUNING_FILE};
use gembo::engine::{Action, InputTracker, pacing_sleep};
use gembo::sim::Autopilot;
use gembo::stats::format_play_time;
use gembo::{Game, Settings, StatisticsStore, Tuning, UpdateMode};

/// ~30 seconds at the 30 FPS frame budget
const HEADLESS_FRAMES: u64 = 900;

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

fn main() {
    env_logger::init();
    log::info!("Gembo (headless) starting...");

    let tuning = Tuning::load(Path::new(TUNING_FILE));
    let settings = Settings::load(Path::new(SETTINGS_FILE));
    let stats = StatisticsStore::load(STATS_FILE);

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x9e37_79b9_7f4a_7c15);

    let mut game = Game::new(tuning, settings, stats, seed, unix_now());
    game.start();

    let autopilot = Autopilot::default();
    let mut input = InputTracker::new();

    for _ in 0..HEADLESS_FRAMES {
        let frame_start = Instant::now();

        // Leave the attract screen the way a player would
        if game.mode() == UpdateMode::Demo {
            input.collect([Action::Return]);
        } else {
            input.collect(autopilot.actions(&game.gameplay));
        }
        let actions = input.actions_this_frame();
        if game.frame(unix_now(), &actions).is_none() {
            break;
        }

        // Nobody is listening; drop queued sounds
        game.engine.audio.drain();

        if let Some(sleep) = pacing_sleep(frame_start.elapsed().as_secs_f64()) {
            std::thread::sleep(sleep);
        }
    }

    let snapshot = game.snapshot();
    log::info!(
        "Played {} frames: {} points, longest streak {}, {} fps",
        game.engine.clock.frame_count(),
        snapshot.points,
        snapshot.longest_streak,
        snapshot.fps
    );
    log::info!("Total play time {}", format_play_time(snapshot.total_play_time_s));

    if let Err(e) = game.finish_session() {
        log::error!("Failed to save statistics: {}", e);
    }
    if let Err(e) = game.settings.save(Path::new(SETTINGS_FILE)) {
        log::error!("Failed to save settings: {}", e);
    }
}
