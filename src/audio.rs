//! Audio requests
//!
//! The game never plays sound itself. It queues "play this effect at this
//! volume" requests, and the host drains and plays them once per frame.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ripe (yellow) gem collected
    GemRipe,
    /// Spoiled (blue) gem collected
    GemSpoiled,
}

impl SoundEffect {
    /// Asset stem the host should load for this effect
    pub fn asset_name(self) -> &'static str {
        match self {
            SoundEffect::GemRipe => "coin10",
            SoundEffect::GemSpoiled => "misc_menu_2",
        }
    }
}

/// A queued sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayRequest {
    pub effect: SoundEffect,
    /// Final volume (0.0 - 1.0), already scaled by the sfx volume
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug)]
pub struct AudioManager {
    bgm_volume: f32,
    sfx_volume: f32,
    muted: bool,
    pending: Vec<PlayRequest>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            bgm_volume: 1.0,
            sfx_volume: 1.0,
            muted: false,
            pending: Vec::new(),
        }
    }

    pub fn set_bgm_volume(&mut self, vol: f32) {
        self.bgm_volume = vol.clamp(0.0, 1.0);
    }

    /// Volume the host should play background music at; 0 while muted
    pub fn bgm_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.bgm_volume }
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.pending.clear();
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Queue a sound effect. Returns false when muted.
    pub fn play(&mut self, effect: SoundEffect, volume: f32) -> bool {
        if self.muted {
            return false;
        }
        let volume = (volume * self.sfx_volume).clamp(0.0, 1.0);
        log::debug!("play {:?} at {:.2}", effect, volume);
        self.pending.push(PlayRequest { effect, volume });
        true
    }

    /// Requests queued since the last drain
    pub fn pending(&self) -> &[PlayRequest] {
        &self.pending
    }

    /// Take all queued requests
    pub fn drain(&mut self) -> Vec<PlayRequest> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_scales_volume() {
        let mut audio = AudioManager::new();
        audio.set_sfx_volume(0.5);
        assert!(audio.play(SoundEffect::GemRipe, 0.5));
        let queued = audio.drain();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].effect, SoundEffect::GemRipe);
        assert!((queued[0].volume - 0.25).abs() < 1e-6);
        assert!(audio.pending().is_empty());
    }

    #[test]
    fn test_muted_drops_requests() {
        let mut audio = AudioManager::new();
        audio.play(SoundEffect::GemSpoiled, 0.5);
        audio.set_muted(true);
        assert!(audio.pending().is_empty());
        assert!(!audio.play(SoundEffect::GemSpoiled, 0.5));
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_music_volume_follows_mute() {
        let mut audio = AudioManager::new();
        audio.set_bgm_volume(0.3);
        assert!((audio.bgm_volume() - 0.3).abs() < 1e-6);
        audio.set_muted(true);
        assert_eq!(audio.bgm_volume(), 0.0);
        audio.set_muted(false);
        audio.set_bgm_volume(4.0);
        assert_eq!(audio.bgm_volume(), 1.0);
    }
}
