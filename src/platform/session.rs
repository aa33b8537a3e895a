//! Game session
//!
//! Owns a `Simulation` plus everything around it: the wall-clock spawn
//! timer, the music playlist, the score store and user settings. Each
//! frame it runs the spawn timer, ticks the simulation, then routes the
//! drained events to the collaborators.

use crate::audio::{MusicPlayer, Playlist};
use crate::consts::SPAWN_INTERVAL_MS;
use crate::highscores::HighScores;
use crate::persistence::ScoreStore;
use crate::settings::Settings;
use crate::sim::{
    self, ActionError, Cooldown, GameEvent, GamePhase, RunOptions, Simulation, TickInput,
    UpgradeDefinition,
};
use crate::ui::{self, HudView, UpgradeOffer};

use super::unix_time_ms;

pub struct Session<S: ScoreStore, P: MusicPlayer> {
    sim: Simulation,
    spawn_clock: Cooldown,
    playlist: Playlist<P>,
    store: S,
    scores: HighScores,
    settings: Settings,
}

impl<S: ScoreStore, P: MusicPlayer> Session<S, P> {
    /// Wrap a simulation sitting at the menu. Unreadable scores start empty.
    pub fn new(sim: Simulation, store: S, player: P, settings: Settings) -> Self {
        let scores = store.load().unwrap_or_else(|e| {
            log::warn!("High scores unavailable: {}", e);
            HighScores::new()
        });
        let mut playlist = Playlist::new(player);
        playlist.set_volume(settings.music_volume);
        playlist.set_muted(settings.muted);
        Self {
            sim,
            spawn_clock: Cooldown::new(SPAWN_INTERVAL_MS),
            playlist,
            store,
            scores,
            settings,
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn playlist(&self) -> &Playlist<P> {
        &self.playlist
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn scores(&self) -> &HighScores {
        &self.scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn phase(&self) -> GamePhase {
        self.sim.phase
    }

    /// Start (or restart) a run from the menu or the game-over screen
    pub fn start(&mut self, options: RunOptions, now_ms: f64) {
        sim::start_run(&mut self.sim, options);
        // First spawn one full interval after the start
        self.spawn_clock.trigger(now_ms);
        self.dispatch();
    }

    /// Start via a main-menu override code; false if the code is unknown
    pub fn start_with_code(&mut self, code: &str, now_ms: f64) -> bool {
        match RunOptions::from_code(code) {
            Some(options) => {
                self.start(options, now_ms);
                true
            }
            None => false,
        }
    }

    /// One display frame
    pub fn frame(&mut self, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
        if self.sim.phase == GamePhase::Playing && self.spawn_clock.try_trigger(now_ms) {
            sim::spawn_scheduled(&mut self.sim);
        }
        sim::tick(&mut self.sim, input, now_ms);

        if !self.settings.effective_screen_shake() {
            self.sim.screen_shake = 0.0;
        }
        if !self.settings.floating_text {
            self.sim.floating_texts.clear();
        }
        self.dispatch()
    }

    pub fn purchase(
        &mut self,
        slot: usize,
        now_ms: f64,
    ) -> Result<&'static UpgradeDefinition, ActionError> {
        let def = sim::purchase(&mut self.sim, slot, now_ms)?;
        self.dispatch();
        Ok(def)
    }

    pub fn reroll(&mut self, now_ms: f64) -> Result<u32, ActionError> {
        let next = sim::reroll(&mut self.sim, now_ms)?;
        self.dispatch();
        Ok(next)
    }

    pub fn skip(&mut self, now_ms: f64) -> Result<(), ActionError> {
        sim::skip(&mut self.sim, now_ms)?;
        self.dispatch();
        Ok(())
    }

    /// Pause menu "quit": back to the main menu
    pub fn quit(&mut self) -> bool {
        let quit = sim::quit_to_menu(&mut self.sim);
        self.dispatch();
        quit
    }

    /// Backend callback: the playing music track ended
    pub fn on_track_ended(&mut self) {
        self.playlist.on_track_ended();
    }

    pub fn hud(&self, now_ms: f64) -> HudView {
        HudView::from_sim(&self.sim, now_ms)
    }

    pub fn offers(&self) -> Vec<UpgradeOffer> {
        ui::upgrade_offers(&self.sim)
    }

    /// Route simulation events to music and score storage
    fn dispatch(&mut self) -> Vec<GameEvent> {
        let events = self.sim.drain_events();
        for event in &events {
            match event {
                GameEvent::RunStarted { .. } | GameEvent::Resumed => self.playlist.play_current(),
                GameEvent::Paused | GameEvent::QuitToMenu => self.playlist.pause_current(),
                GameEvent::GameOver { wave, gold } => {
                    self.playlist.pause_current();
                    self.record_run(*wave, *gold);
                }
                GameEvent::BossesSpawned { count } => {
                    log::debug!("{} boss(es) on the field", count);
                }
                _ => {}
            }
        }
        events
    }

    fn record_run(&mut self, wave: u32, gold: u32) {
        if self.scores.record(wave, gold, unix_time_ms()) {
            log::info!("New best wave: {}", wave);
        }
        if let Err(e) = self.store.save(&self.scores) {
            log::warn!("Failed to save high scores: {}", e);
        }
    }
}
