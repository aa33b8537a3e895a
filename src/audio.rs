//! Background music playlist
//!
//! The simulation knows nothing about audio. The host drives a `Playlist`
//! from drained game events: start on run start/resume, pause on pause or
//! game over, advance when the backend reports a track ended.
//!
//! Playback failures (autoplay blocked, device gone) are logged and ignored.

use thiserror::Error;

/// Number of music tracks in rotation
pub const TRACK_COUNT: usize = 4;

/// Default music volume (0.0 - 1.0)
pub const DEFAULT_VOLUME: f32 = 0.4;

/// Playback failure reported by a backend
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AudioError {
    #[error("playback blocked by the platform")]
    Blocked,
}

/// Something that can play numbered music tracks
pub trait MusicPlayer {
    /// Start (or resume) `track` at `volume`
    fn play(&mut self, track: usize, volume: f32) -> Result<(), AudioError>;
    fn pause(&mut self, track: usize);
    /// Seek `track` back to its start
    fn rewind(&mut self, track: usize);
}

/// Backend that only logs; used by the headless runner
#[derive(Debug, Default)]
pub struct LogPlayer;

impl MusicPlayer for LogPlayer {
    fn play(&mut self, track: usize, volume: f32) -> Result<(), AudioError> {
        log::debug!("Music: play track {} at volume {:.2}", track + 1, volume);
        Ok(())
    }

    fn pause(&mut self, track: usize) {
        log::debug!("Music: pause track {}", track + 1);
    }

    fn rewind(&mut self, track: usize) {
        log::debug!("Music: rewind track {}", track + 1);
    }
}

/// Four-track rotation over some `MusicPlayer`
#[derive(Debug)]
pub struct Playlist<P: MusicPlayer> {
    player: P,
    current: usize,
    volume: f32,
    muted: bool,
    playing: bool,
}

impl<P: MusicPlayer> Playlist<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            current: 0,
            volume: DEFAULT_VOLUME,
            muted: false,
            playing: false,
        }
    }

    pub fn current_track(&self) -> usize {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Volume actually sent to the backend
    pub fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Start the current track; errors are logged, never propagated
    pub fn play_current(&mut self) {
        let volume = self.effective_volume();
        match self.player.play(self.current, volume) {
            Ok(()) => self.playing = true,
            Err(e) => {
                self.playing = false;
                log::warn!("Music track {} failed to play: {}", self.current + 1, e);
            }
        }
    }

    pub fn pause_current(&mut self) {
        if self.playing {
            self.player.pause(self.current);
            self.playing = false;
        }
    }

    /// Rewind and play the next track, wrapping after the last
    pub fn next_track(&mut self) {
        self.current = (self.current + 1) % TRACK_COUNT;
        self.player.rewind(self.current);
        self.play_current();
    }

    /// Backend callback: the current track finished
    pub fn on_track_ended(&mut self) {
        self.next_track();
    }
}
