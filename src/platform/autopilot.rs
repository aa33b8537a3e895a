//! Autopilot input
//!
//! Plays the game well enough for the attract screen and the headless
//! runner: aim at the nearest enemy, keep firing, back away from anything
//! close, dash out of crowds, drop bombs into packs.

use glam::Vec2;

use crate::sim::{GamePhase, Simulation, TickInput};

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Back away from enemies inside this distance
    pub retreat_distance: f32,
    /// Radius used for crowd and pack counts
    pub crowd_radius: f32,
    /// Dash when at least this many enemies are inside `crowd_radius`
    pub dash_crowd: usize,
    /// Bomb when at least this many enemies are inside `crowd_radius`
    pub bomb_pack: usize,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            retreat_distance: 140.0,
            crowd_radius: 90.0,
            dash_crowd: 3,
            bomb_pack: 4,
        }
    }
}

impl Autopilot {
    /// Input for the coming frame
    pub fn input(&self, sim: &Simulation) -> TickInput {
        let mut input = TickInput::default();
        if sim.phase != GamePhase::Playing {
            return input;
        }

        let me = sim.player.pos;
        let nearest = sim
            .enemies
            .iter()
            .filter(|e| !e.is_dead())
            .min_by(|a, b| me.distance_squared(a.pos).total_cmp(&me.distance_squared(b.pos)));

        let centre = Vec2::new(sim.tuning.arena_width, sim.tuning.arena_height) * 0.5;
        let Some(target) = nearest else {
            // Idle: drift back to the middle
            steer(&mut input, centre - me);
            input.aim = centre;
            return input;
        };

        input.aim = target.pos;
        input.fire = true;

        if me.distance(target.pos) < self.retreat_distance {
            // Away from the threat, biased toward the centre so we don't pin ourselves
            let away = (me - target.pos).normalize_or_zero();
            let home = (centre - me).normalize_or_zero() * 0.5;
            steer(&mut input, away + home);
        }

        let crowd = sim
            .enemies
            .iter()
            .filter(|e| me.distance(e.pos) < self.crowd_radius)
            .count();
        input.dash = crowd >= self.dash_crowd;
        input.bomb = crowd >= self.bomb_pack;
        input
    }
}

/// Hold the movement keys closest to `dir`
fn steer(input: &mut TickInput, dir: Vec2) {
    const DEADZONE: f32 = 0.3;
    let dir = dir.normalize_or_zero();
    input.left = dir.x < -DEADZONE;
    input.right = dir.x > DEADZONE;
    input.up = dir.y < -DEADZONE;
    input.down = dir.y > DEADZONE;
}
