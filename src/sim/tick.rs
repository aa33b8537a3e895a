//! Per-frame simulation tick and game state machine
//!
//! Only `Playing` runs movement, abilities, collisions and progression.
//! `Upgrade` waits for menu actions, `Paused` and `GameOver` do nothing.

use glam::Vec2;

use super::abilities;
use super::resolve::{self, Resolution};
use super::state::{GameEvent, GamePhase, RunOptions, Simulation};

/// Input sampled once per frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Aim point in arena coordinates
    pub aim: Vec2,
    /// Fire button held
    pub fire: bool,
    /// Dash pressed this frame (edge)
    pub dash: bool,
    /// Bomb pressed this frame (edge)
    pub bomb: bool,
    /// Pause toggle pressed this frame (edge)
    pub pause: bool,
}

/// Advance the simulation by one frame at wall-clock time `now_ms`
pub fn tick(sim: &mut Simulation, input: &TickInput, now_ms: f64) {
    if input.pause {
        toggle_pause(sim);
    }

    if sim.phase != GamePhase::Playing {
        return;
    }

    if input.fire {
        abilities::fire(sim, input.aim, now_ms);
    }
    abilities::move_player(sim, input);
    if input.dash {
        if let Err(why) = abilities::dash(sim, input, now_ms) {
            log::debug!("Dash ignored: {why}");
        }
    }
    if input.bomb {
        if let Err(why) = abilities::deploy_bomb(sim, now_ms) {
            log::debug!("Bomb ignored: {why}");
        }
    }

    match resolve::resolve_frame(sim, now_ms) {
        Resolution::PlayerDied => {
            game_over(sim);
            return;
        }
        Resolution::WaveCleared | Resolution::Continue => {}
    }

    resolve::decay_effects(sim);
}

/// Begin a new run from the menu or the game-over screen
pub fn start_run(sim: &mut Simulation, options: RunOptions) {
    sim.reset_run(options);
    if options.head_start {
        sim.player.gold = sim.tuning.waves.head_start_gold;
        let levels = sim.wave / 10 + 3;
        for index in 0..sim.upgrades.len() {
            for _ in 0..levels {
                sim.upgrades.apply(index, &mut sim.player);
            }
        }
    }
    sim.phase = GamePhase::Playing;
    log::info!("Run started at wave {}", sim.wave);
    sim.emit(GameEvent::RunStarted { wave: sim.wave });
}

/// Playing <-> Paused; ignored in every other phase
pub fn toggle_pause(sim: &mut Simulation) {
    match sim.phase {
        GamePhase::Playing => {
            sim.phase = GamePhase::Paused;
            sim.emit(GameEvent::Paused);
        }
        GamePhase::Paused => {
            sim.phase = GamePhase::Playing;
            sim.emit(GameEvent::Resumed);
        }
        _ => {}
    }
}

/// Abandon a paused run and return to the main menu
pub fn quit_to_menu(sim: &mut Simulation) -> bool {
    if sim.phase != GamePhase::Paused {
        return false;
    }
    sim.phase = GamePhase::Menu;
    sim.emit(GameEvent::QuitToMenu);
    true
}

/// Terminal transition for the run; raised exactly once
fn game_over(sim: &mut Simulation) {
    sim.player.hp = sim.player.hp.max(0.0);
    sim.phase = GamePhase::GameOver;
    log::info!(
        "Game over on wave {} with {} gold",
        sim.wave,
        sim.player.gold
    );
    sim.emit(GameEvent::GameOver {
        wave: sim.wave,
        gold: sim.player.gold,
    });
}
