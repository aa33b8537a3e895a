//! Player movement and abilities
//!
//! Movement is frame-locked (pixels per frame). Firing, dashing and bomb
//! placement are gated by wall-clock cooldowns.

use glam::Vec2;

use super::error::ActionError;
use super::state::{Bomb, GamePhase, Projectile, Simulation, TextTone};
use super::tick::TickInput;
use crate::clamp_inside;

/// Held movement axes as (-1/0/1, -1/0/1). Opposite keys cancel.
pub fn held_axes(input: &TickInput) -> Vec2 {
    let dx = input.right as i8 - input.left as i8;
    let dy = input.down as i8 - input.up as i8;
    Vec2::new(dx as f32, dy as f32)
}

/// Move the player along each held axis independently, then clamp the whole
/// body inside the arena.
pub fn move_player(sim: &mut Simulation, input: &TickInput) {
    let axes = held_axes(input);
    if axes == Vec2::ZERO {
        return;
    }
    let p = &mut sim.player;
    let moved = p.pos + axes * p.speed;
    p.pos = clamp_inside(moved, p.radius, sim.tuning.arena_width, sim.tuning.arena_height);
}

/// Fire a volley toward `aim` if the fire delay has elapsed.
/// Returns the number of projectiles created.
pub fn fire(sim: &mut Simulation, aim: Vec2, now_ms: f64) -> u32 {
    if !fire_ready(sim, now_ms) {
        return 0;
    }
    sim.timers.fire.trigger(now_ms);

    let origin = sim.player.pos;
    let count = sim.player.multi_shot.max(1);
    let base_angle = crate::angle_between(origin, aim);
    let a = &sim.tuning.abilities;
    let center = (count - 1) as f32 / 2.0;

    for i in 0..count {
        let angle = base_angle + (i as f32 - center) * a.spread_step;
        sim.projectiles.push(Projectile {
            pos: origin,
            vel: crate::direction(angle) * a.projectile_speed,
            radius: a.projectile_radius,
            bounces: sim.player.ricochet,
            hit: Vec::new(),
        });
    }
    count
}

/// Fire gate measured against the player's current fire delay
pub fn fire_ready(sim: &Simulation, now_ms: f64) -> bool {
    let mut gate = sim.timers.fire;
    gate.set_duration(sim.player.fire_delay_ms);
    gate.ready(now_ms)
}

/// Instant displacement along the held direction
pub fn dash(sim: &mut Simulation, input: &TickInput, now_ms: f64) -> Result<(), ActionError> {
    if sim.phase != GamePhase::Playing {
        return Err(ActionError::WrongPhase(sim.phase));
    }
    let gate = &sim.timers.dash;
    if !gate.ready(now_ms) {
        return Err(ActionError::OnCooldown {
            remaining_ms: gate.remaining(now_ms),
        });
    }
    let axes = held_axes(input);
    if axes == Vec2::ZERO {
        return Err(ActionError::NoDirection);
    }

    let p = &mut sim.player;
    let moved = p.pos + axes.normalize() * p.dash_dist;
    p.pos = clamp_inside(moved, p.radius, sim.tuning.arena_width, sim.tuning.arena_height);
    sim.timers.dash.trigger(now_ms);
    sim.shake(sim.tuning.effects.shake_dash);
    Ok(())
}

/// Place a bug bomb at the player's feet.
///
/// Up to `bug_bomb_level` bombs fit in a cycle; the cycle refills once the
/// bomb cooldown has fully elapsed since the last placement.
pub fn deploy_bomb(sim: &mut Simulation, now_ms: f64) -> Result<(), ActionError> {
    if sim.phase != GamePhase::Playing {
        return Err(ActionError::WrongPhase(sim.phase));
    }
    let level = sim.player.bug_bomb_level;
    if level == 0 {
        return Err(ActionError::NotOwned);
    }

    let cooled = sim.timers.bomb.ready(now_ms);
    if sim.timers.bombs_in_cycle >= level && !cooled {
        let remaining_ms = sim.timers.bomb.remaining(now_ms);
        let above = sim.player.pos - Vec2::new(0.0, sim.tuning.effects.notice_offset);
        sim.add_text(above, "RECHARGING", TextTone::Muted);
        return Err(ActionError::OnCooldown { remaining_ms });
    }
    if cooled {
        sim.timers.bombs_in_cycle = 0;
    }

    let a = &sim.tuning.abilities;
    let bomb = Bomb {
        pos: sim.player.pos,
        placed_at: now_ms,
        fuse_ms: a.bomb_fuse_ms,
        radius: a.bomb_radius,
    };
    sim.bombs.push(bomb);
    sim.timers.bombs_in_cycle += 1;
    sim.timers.bomb.trigger(now_ms);
    sim.add_text(sim.player.pos, "BOMB DEPLOYED", TextTone::Notice);
    Ok(())
}

/// Bombs that can still be placed right now
pub fn bombs_ready(sim: &Simulation, now_ms: f64) -> u32 {
    let level = sim.player.bug_bomb_level;
    if sim.timers.bomb.ready(now_ms) {
        level
    } else {
        level.saturating_sub(sim.timers.bombs_in_cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn playing() -> Simulation {
        let mut sim = Simulation::with_seed(Tuning::default(), 5);
        sim.phase = GamePhase::Playing;
        sim
    }

    fn keys(up: bool, down: bool, left: bool, right: bool) -> TickInput {
        TickInput {
            up,
            down,
            left,
            right,
            ..Default::default()
        }
    }

    #[test]
    fn test_move_and_clamp() {
        let mut sim = playing();
        move_player(&mut sim, &keys(false, false, false, true));
        assert_eq!(sim.player.pos, Vec2::new(404.0, 300.0));

        sim.player.pos = Vec2::new(20.0, 20.0);
        move_player(&mut sim, &keys(true, false, true, false));
        assert_eq!(sim.player.pos, Vec2::new(18.0, 18.0));
    }

    #[test]
    fn test_fire_respects_delay() {
        let mut sim = playing();
        let aim = Vec2::new(600.0, 300.0);
        assert_eq!(fire(&mut sim, aim, 0.0), 1);
        assert_eq!(fire(&mut sim, aim, 399.0), 0);
        assert_eq!(fire(&mut sim, aim, 400.0), 1);
        assert_eq!(sim.projectiles.len(), 2);
        let v = sim.projectiles[0].vel;
        assert!((v.x - 11.0).abs() < 1e-4 && v.y.abs() < 1e-4);
    }

    #[test]
    fn test_multishot_fans_symmetrically() {
        let mut sim = playing();
        sim.player.multi_shot = 3;
        sim.player.ricochet = 2;
        fire(&mut sim, Vec2::new(600.0, 300.0), 0.0);
        assert_eq!(sim.projectiles.len(), 3);
        let angles: Vec<f32> = sim.projectiles.iter().map(|p| p.vel.y.atan2(p.vel.x)).collect();
        assert!((angles[0] + 0.2).abs() < 1e-4);
        assert!(angles[1].abs() < 1e-4);
        assert!((angles[2] - 0.2).abs() < 1e-4);
        assert!(sim.projectiles.iter().all(|p| p.bounces == 2));
    }

    #[test]
    fn test_dash_needs_direction_and_cooldown() {
        let mut sim = playing();
        assert_eq!(
            dash(&mut sim, &TickInput::default(), 0.0),
            Err(ActionError::NoDirection)
        );

        let right = keys(false, false, false, true);
        assert!(dash(&mut sim, &right, 0.0).is_ok());
        assert_eq!(sim.player.pos, Vec2::new(500.0, 300.0));

        assert!(matches!(
            dash(&mut sim, &right, 1999.0),
            Err(ActionError::OnCooldown { .. })
        ));
        assert!(dash(&mut sim, &right, 2000.0).is_ok());
        assert_eq!(sim.player.pos.x, 600.0);
    }

    #[test]
    fn test_diagonal_dash_is_normalized_and_clamped() {
        let mut sim = playing();
        dash(&mut sim, &keys(true, false, false, true), 0.0).expect("dash");
        let moved = sim.player.pos - Vec2::new(400.0, 300.0);
        assert!((moved.length() - 100.0).abs() < 1e-3);

        sim.player.pos = Vec2::new(780.0, 300.0);
        dash(&mut sim, &keys(false, false, false, true), 5000.0).expect("dash");
        assert_eq!(sim.player.pos.x, 800.0 - 18.0);
    }

    #[test]
    fn test_bomb_requires_upgrade() {
        let mut sim = playing();
        assert_eq!(deploy_bomb(&mut sim, 0.0), Err(ActionError::NotOwned));
        assert!(sim.bombs.is_empty());
    }

    #[test]
    fn test_bomb_cycle() {
        let mut sim = playing();
        sim.player.bug_bomb_level = 2;
        assert!(deploy_bomb(&mut sim, 0.0).is_ok());
        assert!(deploy_bomb(&mut sim, 100.0).is_ok());
        assert_eq!(bombs_ready(&sim, 200.0), 0);

        let texts = sim.floating_texts.len();
        assert!(matches!(
            deploy_bomb(&mut sim, 200.0),
            Err(ActionError::OnCooldown { .. })
        ));
        assert_eq!(sim.floating_texts.len(), texts + 1);
        let notice = sim.floating_texts.last().expect("notice");
        assert_eq!(notice.text, "RECHARGING");
        assert_eq!(notice.pos.y, sim.player.pos.y - sim.tuning.effects.notice_offset);
        assert_eq!(sim.bombs.len(), 2);

        // Cooldown counts from the last placement
        assert!(deploy_bomb(&mut sim, 5099.0).is_err());
        assert!(deploy_bomb(&mut sim, 5100.0).is_ok());
        assert_eq!(sim.timers.bombs_in_cycle, 1);
        assert_eq!(sim.bombs.len(), 3);
    }

    #[test]
    fn test_abilities_ignored_outside_play() {
        let mut sim = playing();
        sim.player.bug_bomb_level = 1;
        sim.phase = GamePhase::Paused;
        assert_eq!(
            deploy_bomb(&mut sim, 0.0),
            Err(ActionError::WrongPhase(GamePhase::Paused))
        );
        assert!(dash(&mut sim, &keys(true, false, false, false), 0.0).is_err());
    }
}
