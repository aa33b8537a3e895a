//! Collision and damage resolution
//!
//! Runs once per playing frame. Each collection is scanned against a stable
//! snapshot: entities are taken out, processed exactly once, and the
//! survivors written back. Spawns triggered mid-scan (boss minions, split
//! children) are appended after the scan and first act next frame.

use glam::Vec2;
use rand::Rng;

use super::collision::{aim, circles_overlap, out_of_bounds, points_within, pursue};
use super::progression;
use super::spawn::spawn_forced;
use super::state::{
    BlastKind, BossProjectile, EnemyKind, Explosion, Simulation, StatBlock, TextTone,
};

/// What a frame of resolution ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    WaveCleared,
    PlayerDied,
}

/// Run every gameplay collision and damage step for one frame
pub fn resolve_frame(sim: &mut Simulation, now_ms: f64) -> Resolution {
    detonate_bombs(sim, now_ms);
    advance_projectiles(sim);
    if advance_boss_projectiles(sim) {
        return Resolution::PlayerDied;
    }
    if advance_enemies(sim, now_ms) {
        return Resolution::PlayerDied;
    }
    if process_deaths(sim, now_ms) {
        return Resolution::WaveCleared;
    }
    Resolution::Continue
}

/// Expired bombs become large explosions
pub fn detonate_bombs(sim: &mut Simulation, now_ms: f64) {
    let (expired, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut sim.bombs)
        .into_iter()
        .partition(|b| b.expired(now_ms));
    sim.bombs = pending;
    for bomb in expired {
        explode(sim, bomb.pos, BlastKind::Bomb);
    }
}

/// Create an explosion and deal its single damage tick to every enemy inside
/// the blast radius.
pub fn explode(sim: &mut Simulation, pos: Vec2, kind: BlastKind) {
    let t = &sim.tuning.explosions;
    let (max_radius, mult, shake, tone) = match kind {
        BlastKind::Bomb => (
            t.bomb_blast_radius,
            t.bomb_damage_mult,
            sim.tuning.effects.shake_big_blast,
            TextTone::BombBlast,
        ),
        BlastKind::OnHit => (
            t.on_hit_base_radius + sim.player.explosive_level as f32 * t.on_hit_radius_per_level,
            t.on_hit_damage_mult,
            sim.tuning.effects.shake_small_blast,
            TextTone::Blast,
        ),
    };
    sim.explosions.push(Explosion {
        pos,
        radius: t.start_radius,
        max_radius,
        alpha: 1.0,
        kind,
    });
    sim.shake(shake);

    let damage = sim.player.damage * mult;
    let mut labels = Vec::new();
    for enemy in sim.enemies.iter_mut() {
        if enemy.pos.distance(pos) < max_radius {
            enemy.hp -= damage;
            labels.push(enemy.pos);
        }
    }
    for at in labels {
        sim.add_text(at, format!("-{}", damage.floor()), tone);
    }
}

/// Move projectiles, cull strays, and resolve at most one enemy hit each
pub fn advance_projectiles(sim: &mut Simulation) {
    let (w, h) = (sim.tuning.arena_width, sim.tuning.arena_height);
    let margin = sim.tuning.abilities.cull_margin;
    let ricochet_speed = sim.tuning.abilities.ricochet_speed;
    let mut kept = Vec::with_capacity(sim.projectiles.len());

    for mut shot in std::mem::take(&mut sim.projectiles) {
        shot.pos += shot.vel;
        if out_of_bounds(shot.pos, w, h, margin) {
            continue;
        }

        let target = sim.enemies.iter().position(|e| {
            !e.is_dead()
                && !shot.hit.contains(&e.id)
                && circles_overlap(shot.pos, shot.radius, e.pos, e.radius)
        });
        let Some(idx) = target else {
            kept.push(shot);
            continue;
        };

        let damage = sim.player.damage;
        let enemy = &mut sim.enemies[idx];
        enemy.hp -= damage;
        let (struck_id, struck_pos) = (enemy.id, enemy.pos);
        sim.add_text(struck_pos, format!("-{}", damage.floor()), TextTone::Hit);

        if sim.player.explosive {
            explode(sim, struck_pos, BlastKind::OnHit);
        }

        if shot.bounces > 0 {
            shot.bounces -= 1;
            shot.hit.push(struck_id);
            // First living enemy not yet struck, in collection order
            let next = sim
                .enemies
                .iter()
                .find(|e| !e.is_dead() && !shot.hit.contains(&e.id));
            if let Some(next) = next {
                shot.vel = aim(shot.pos, next.pos, ricochet_speed);
            }
            kept.push(shot);
        }
    }
    sim.projectiles = kept;
}

/// Move boss shots; returns true if the player died
pub fn advance_boss_projectiles(sim: &mut Simulation) -> bool {
    let (w, h) = (sim.tuning.arena_width, sim.tuning.arena_height);
    let damage = sim.tuning.boss.shot_damage;
    let mut hits = 0;
    let mut kept = Vec::with_capacity(sim.boss_projectiles.len());

    for mut shot in std::mem::take(&mut sim.boss_projectiles) {
        shot.pos += shot.vel;
        if circles_overlap(shot.pos, shot.radius, sim.player.pos, sim.player.radius) {
            hits += 1;
            continue;
        }
        // Shots start outside the arena with the boss
        if out_of_bounds(shot.pos, w, h, sim.tuning.boss.shot_cull_margin) {
            continue;
        }
        kept.push(shot);
    }
    sim.boss_projectiles = kept;

    for _ in 0..hits {
        let dealt = sim.player.take_damage(damage);
        sim.shake(sim.tuning.effects.shake_hit);
        sim.add_text(sim.player.pos, format!("-{}", dealt.floor()), TextTone::Hurt);
    }
    sim.player.is_dead()
}

/// Steering, snake trails, boss actions and contact damage.
/// Returns true if the player died.
pub fn advance_enemies(sim: &mut Simulation, now_ms: f64) -> bool {
    let player_pos = sim.player.pos;
    let player_radius = sim.player.radius;
    let t = &sim.tuning.enemies;
    let boss = &sim.tuning.boss;
    let tail_reach = player_radius + t.snake_tail_reach;

    let mut damage = 0.0;
    let mut contacts = 0;
    let mut minion_at = Vec::new();
    let mut shots = Vec::new();

    for enemy in sim.enemies.iter_mut() {
        enemy.pos = pursue(enemy.pos, player_pos, enemy.speed);

        match &mut enemy.kind {
            EnemyKind::Snake { tail } => {
                tail.push_back(enemy.pos);
                while tail.len() > t.snake_tail_len {
                    tail.pop_front();
                }
                let touching = points_within(tail.iter(), player_pos, tail_reach);
                damage += touching as f32 * t.snake_tail_damage;
            }
            EnemyKind::Boss {
                minion_timer,
                shot_timer,
            } => {
                if minion_timer.try_trigger(now_ms) {
                    minion_at.push(enemy.pos);
                }
                if shot_timer.try_trigger(now_ms) {
                    shots.push(BossProjectile {
                        pos: enemy.pos,
                        vel: aim(enemy.pos, player_pos, boss.shot_speed),
                        radius: boss.shot_radius,
                    });
                }
            }
            EnemyKind::Common | EnemyKind::Splitter => {}
        }

        if circles_overlap(enemy.pos, enemy.radius, player_pos, player_radius) {
            damage += t.contact_damage;
            contacts += 1;
        }
    }

    sim.boss_projectiles.extend(shots);
    let minion = StatBlock::minion(&sim.tuning);
    for pos in minion_at {
        spawn_forced(sim, pos, minion);
    }

    if damage > 0.0 {
        sim.player.take_damage(damage);
    }
    if contacts > 0 && sim.rng.random::<f32>() < sim.tuning.effects.contact_text_chance {
        sim.add_text(player_pos, "!", TextTone::Hurt);
    }
    sim.player.is_dead()
}

/// Remove dead enemies, pay out, split, and detect the end of the wave.
/// Returns true if the wave ended this frame.
pub fn process_deaths(sim: &mut Simulation, now_ms: f64) -> bool {
    if !sim.enemies.iter().any(|e| e.is_dead()) {
        return false;
    }
    let (dead, alive): (Vec<_>, Vec<_>) = std::mem::take(&mut sim.enemies)
        .into_iter()
        .partition(|e| e.is_dead());
    sim.enemies = alive;

    let scatter = sim.tuning.enemies.split_scatter;
    let spore = StatBlock::spore(&sim.tuning);
    let mut boss_killed = false;
    for enemy in &dead {
        if enemy.splits() {
            for _ in 0..2 {
                let offset = Vec2::new(
                    sim.rng.random_range(-scatter..=scatter),
                    sim.rng.random_range(-scatter..=scatter),
                );
                spawn_forced(sim, enemy.pos + offset, spore);
            }
        }
        let reward = if enemy.is_boss() {
            boss_killed = true;
            sim.tuning.boss.reward
        } else {
            sim.tuning.enemies.kill_reward
        };
        sim.player.gold += reward;
        sim.player.kills_in_wave += 1;
    }

    if boss_killed {
        sim.enemies.clear();
        sim.boss_projectiles.clear();
        progression::end_wave(sim, now_ms, true);
        return true;
    }
    if sim.quota_met() && sim.enemies.is_empty() {
        sim.boss_projectiles.clear();
        progression::end_wave(sim, now_ms, false);
        return true;
    }
    false
}

/// Cosmetic decay: floating text drift/fade, explosion growth/fade, shake.
/// Fully faded entries are removed; repeating the step on an empty or faded
/// set has no further effect.
pub fn decay_effects(sim: &mut Simulation) {
    let fx = &sim.tuning.effects;
    for text in sim.floating_texts.iter_mut() {
        text.pos.y += text.vy;
        text.life -= fx.text_fade;
    }
    sim.floating_texts.retain(|t| t.life > 0.0);

    let ex = &sim.tuning.explosions;
    for blast in sim.explosions.iter_mut() {
        blast.radius += ex.growth;
        blast.alpha -= ex.fade;
    }
    sim.explosions.retain(|e| e.alpha > 0.0);

    sim.screen_shake *= fx.shake_decay;
    if sim.screen_shake < 0.01 {
        sim.screen_shake = 0.0;
    }
}
