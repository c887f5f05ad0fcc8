//! Cross-session statistics
//!
//! Persisted as a flat JSON object. Tracks points, gems, play time and every
//! finished ripe streak.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::persistence::{self, PersistenceError};

/// The persisted record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerStats {
    /// Seconds played across all finished sessions
    pub total_play_time: f64,
    pub total_gems_collected: u64,
    pub total_points: u64,
    pub longest_streak: u32,
    /// `(timestamp, streak_length)` for every finished streak, oldest first
    pub player_streak_history: Vec<(f64, u32)>,
}

/// Statistics plus where they live on disk
#[derive(Debug, Clone)]
pub struct StatisticsStore {
    pub player_stats: PlayerStats,
    path: PathBuf,
    /// streak length -> times achieved, rebuilt by `parse_player_history`
    streak_counts: Option<BTreeMap<u32, u32>>,
    /// The file on disk could not be read or backed up; never overwrite it
    protect_file: bool,
}

impl StatisticsStore {
    /// Fresh statistics that will be saved to `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            player_stats: PlayerStats::default(),
            path: path.into(),
            streak_counts: None,
            protect_file: false,
        }
    }

    /// Load from `path`. A missing file starts fresh. A file that exists but
    /// cannot be read also starts fresh, after being copied to `<path>.bak`;
    /// if even that fails, `save` will refuse to touch it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (player_stats, protect_file) = match persistence::load_json::<PlayerStats>(&path) {
            Ok(Some(stats)) => {
                log::info!("Loaded statistics from {}", path.display());
                (stats, false)
            }
            Ok(None) => {
                log::info!("No statistics at {}, starting fresh", path.display());
                (PlayerStats::default(), false)
            }
            Err(e) => {
                log::warn!("Statistics unreadable: {}", e);
                match persistence::backup(&path) {
                    Ok(backup) => {
                        log::warn!("Kept the unreadable statistics as {}", backup.display());
                        (PlayerStats::default(), false)
                    }
                    Err(e) => {
                        log::error!("Could not back up statistics: {}", e);
                        (PlayerStats::default(), true)
                    }
                }
            }
        };
        let mut store = Self {
            player_stats,
            path,
            streak_counts: None,
            protect_file,
        };
        store.parse_player_history();
        store
    }

    /// Overwrite the stats file
    pub fn save(&self) -> Result<(), PersistenceError> {
        if self.protect_file {
            return Err(PersistenceError::Unreadable {
                path: self.path.clone(),
            });
        }
        persistence::save_json(&self.path, &self.player_stats)?;
        log::info!(
            "Statistics saved ({} points, {} streaks)",
            self.player_stats.total_points,
            self.player_stats.player_streak_history.len()
        );
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Forget everything (settings screen "reset save file")
    pub fn reset(&mut self) {
        self.player_stats = PlayerStats::default();
        self.streak_counts = None;
        log::info!("Statistics reset");
    }

    pub fn add_one_point(&mut self) {
        self.player_stats.total_points += 1;
    }

    pub fn collect_one_gem(&mut self) {
        self.player_stats.total_gems_collected += 1;
    }

    pub fn points(&self) -> u64 {
        self.player_stats.total_points
    }

    pub fn gems_collected(&self) -> u64 {
        self.player_stats.total_gems_collected
    }

    pub fn longest_streak(&self) -> u32 {
        self.player_stats.longest_streak
    }

    pub fn streak_history(&self) -> &[(f64, u32)] {
        &self.player_stats.player_streak_history
    }

    /// Returns true if `value` is a new record
    pub fn update_longest_streak(&mut self, value: u32) -> bool {
        if value > self.player_stats.longest_streak {
            self.player_stats.longest_streak = value;
            log::info!("New longest streak! {}", value);
            true
        } else {
            false
        }
    }

    pub fn update_streak_history(&mut self, timestamp: f64, value: u32) {
        self.player_stats.player_streak_history.push((timestamp, value));
    }

    /// Rebuild the streak length histogram from history
    pub fn parse_player_history(&mut self) {
        let mut counts = BTreeMap::new();
        for &(_, length) in &self.player_stats.player_streak_history {
            *counts.entry(length).or_insert(0) += 1;
        }
        self.streak_counts = Some(counts);
    }

    /// Histogram from the last `parse_player_history`, if any
    pub fn streak_counts(&self) -> Option<&BTreeMap<u32, u32>> {
        self.streak_counts.as_ref()
    }

    /// Longest `n` streak lengths with their counts, longest first
    pub fn top_streaks(&self, n: usize) -> Vec<(u32, u32)> {
        self.streak_counts
            .as_ref()
            .map(|counts| counts.iter().rev().take(n).map(|(&k, &v)| (k, v)).collect())
            .unwrap_or_default()
    }

    /// Stored play time plus the running session
    pub fn total_play_time_with(&self, session_s: f64) -> f64 {
        self.player_stats.total_play_time + session_s.max(0.0)
    }

    /// Fold a finished session into the stored play time
    pub fn finish_session(&mut self, session_s: f64) {
        self.player_stats.total_play_time = self.total_play_time_with(session_s);
    }
}

/// Whole hours, minutes and seconds of a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeGroups {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl TimeGroups {
    pub fn from_seconds(seconds: f64) -> Self {
        let total = seconds.max(0.0) as u64;
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

/// `HHh MMm SSs`
pub fn format_play_time(seconds: f64) -> String {
    let t = TimeGroups::from_seconds(seconds);
    format!("{:02}h {:02}m {:02}s", t.hours, t.minutes, t.seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn store() -> StatisticsStore {
        StatisticsStore::new("unused.data")
    }

    #[test]
    fn test_longest_streak_only_grows() {
        let mut s = store();
        assert!(s.update_longest_streak(4));
        assert!(!s.update_longest_streak(4));
        assert!(!s.update_longest_streak(2));
        assert_eq!(s.longest_streak(), 4);
        assert!(s.update_longest_streak(9));
        assert_eq!(s.longest_streak(), 9);
    }

    #[test]
    fn test_histogram() {
        let mut s = store();
        assert!(s.streak_counts().is_none());
        for (t, n) in [(1.0, 3), (2.0, 5), (3.0, 3), (4.0, 1)] {
            s.update_streak_history(t, n);
        }
        s.parse_player_history();
        let counts = s.streak_counts().unwrap();
        assert_eq!(counts.get(&3), Some(&2));
        assert_eq!(counts.get(&5), Some(&1));
        assert_eq!(s.top_streaks(2), vec![(5, 1), (3, 2)]);
    }

    #[test]
    fn test_json_shape() {
        let mut s = store();
        s.add_one_point();
        s.collect_one_gem();
        s.update_streak_history(12.5, 2);
        let json = serde_json::to_value(&s.player_stats).unwrap();
        assert_eq!(json["total_points"], 1);
        assert_eq!(json["total_gems_collected"], 1);
        assert_eq!(json["player_streak_history"][0][0], 12.5);
        assert_eq!(json["player_streak_history"][0][1], 2);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let stats: PlayerStats = serde_json::from_str(r#"{"total_points": 7}"#).unwrap();
        assert_eq!(stats.total_points, 7);
        assert!(stats.player_streak_history.is_empty());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let path = std::env::temp_dir().join(format!("gembo-stats-missing-{}", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let s = StatisticsStore::load(&path);
        assert_eq!(s.player_stats, PlayerStats::default());
        assert!(s.streak_counts().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let path = std::env::temp_dir().join(format!("gembo-stats-save-{}", std::process::id()));
        let mut s = StatisticsStore::new(&path);
        s.add_one_point();
        s.update_longest_streak(3);
        s.update_streak_history(1.0, 3);
        s.finish_session(90.0);
        s.save().unwrap();

        let loaded = StatisticsStore::load(&path);
        assert_eq!(loaded.player_stats, s.player_stats);
        assert_eq!(loaded.streak_counts().unwrap().get(&3), Some(&1));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_malformed_file_is_backed_up_before_save() {
        let path = std::env::temp_dir().join(format!("gembo-stats-bad-{}", std::process::id()));
        let backup = path.with_file_name(format!("gembo-stats-bad-{}.bak", std::process::id()));
        let broken = r#"{"total_points": 800, "longest_streak": 42,}"#;
        std::fs::write(&path, broken).unwrap();

        let mut s = StatisticsStore::load(&path);
        assert_eq!(s.player_stats, PlayerStats::default());
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), broken);

        s.add_one_point();
        s.save().unwrap();
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), broken);
        assert_eq!(StatisticsStore::load(&path).points(), 1);

        let _ = std::fs::remove_file(&path);
        let _ = std::fs::remove_file(&backup);
    }

    #[test]
    fn test_unreadable_file_without_backup_is_never_overwritten() {
        // A directory can be neither parsed nor copied
        let path = std::env::temp_dir().join(format!("gembo-stats-dir-{}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();

        let s = StatisticsStore::load(&path);
        assert!(matches!(s.save(), Err(PersistenceError::Unreadable { .. })));
        assert!(path.is_dir());

        let _ = std::fs::remove_dir(&path);
    }

    #[test]
    fn test_play_time() {
        let mut s = store();
        s.player_stats.total_play_time = 100.0;
        assert_eq!(s.total_play_time_with(20.0), 120.0);
        s.finish_session(20.0);
        assert_eq!(s.player_stats.total_play_time, 120.0);
        assert_eq!(format_play_time(3725.9), "01h 02m 05s");
        assert_eq!(format_play_time(0.0), "00h 00m 00s");
    }

    proptest! {
        #[test]
        fn prop_history_append_bumps_one_bucket(
            history in prop::collection::vec(1u32..20, 0..40),
            n in 1u32..20,
        ) {
            let mut s = store();
            for (i, &len) in history.iter().enumerate() {
                s.update_streak_history(i as f64, len);
            }
            s.parse_player_history();
            let before = s.streak_counts().unwrap().clone();

            s.update_streak_history(1000.0, n);
            s.parse_player_history();
            let after = s.streak_counts().unwrap();

            prop_assert_eq!(after.get(&n).copied().unwrap_or(0), before.get(&n).copied().unwrap_or(0) + 1);
            for (k, v) in after {
                if *k != n {
                    prop_assert_eq!(Some(v), before.get(k));
                }
            }
        }
    }
}
