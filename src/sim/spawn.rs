//! Spawn director
//!
//! Decides what enemy (or boss) to create, when, and where. Scheduled spawns
//! come from the host's periodic timer and count against the wave quota;
//! forced spawns (split children, boss minions) bypass both the quota and the
//! variant chain.

use glam::Vec2;
use rand::Rng;
use std::collections::VecDeque;

use super::cooldown::Cooldown;
use super::state::{Archetype, Enemy, EnemyKind, GameEvent, GamePhase, Simulation, StatBlock};
use crate::tuning::{Tuning, VariantStats};

/// What a scheduled invocation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    Bosses(u32),
    Enemy,
    /// Quota already met (or not playing)
    Idle,
}

/// Periodic spawn entry point (nominally once per second while playing)
pub fn spawn_scheduled(sim: &mut Simulation) -> SpawnOutcome {
    if sim.phase != GamePhase::Playing {
        return SpawnOutcome::Idle;
    }

    if sim.tuning.is_boss_wave(sim.wave) && sim.spawned_count == 0 {
        let count = spawn_bosses(sim);
        return SpawnOutcome::Bosses(count);
    }

    if sim.quota_met() {
        return SpawnOutcome::Idle;
    }

    let pos = edge_point(&sim.tuning, &mut sim.rng);
    let (stats, kind) = roll_variant(&sim.tuning, sim.wave, &mut sim.rng);
    insert(sim, pos, stats, kind);
    sim.spawned_count += 1;
    log::debug!(
        "Spawned {:?} ({}/{}) on wave {}",
        stats.archetype,
        sim.spawned_count,
        sim.player.target_kills,
        sim.wave
    );
    SpawnOutcome::Enemy
}

/// Spawn with a caller-supplied stat block at an explicit position.
/// Does not touch the wave counter.
pub fn spawn_forced(sim: &mut Simulation, pos: Vec2, stats: StatBlock) -> u32 {
    insert(sim, pos, stats, EnemyKind::Common)
}

/// Boss wave opener: `wave / interval` bosses spread across the top edge.
/// Marks the quota satisfied so no normal mobs follow.
fn spawn_bosses(sim: &mut Simulation) -> u32 {
    let boss = &sim.tuning.boss;
    let count = (sim.wave / boss.wave_interval.max(1)).max(1);
    let hp = boss.base_hp + sim.wave as f32 * boss.hp_per_wave;
    let stats = StatBlock {
        radius: boss.radius,
        hp,
        speed: boss.speed,
        archetype: Archetype::Crown,
    };
    let spacing = sim.tuning.arena_width / (count + 1) as f32;
    let y = boss.spawn_y;
    let (minion_ms, shot_ms) = (boss.minion_interval_ms, boss.shot_interval_ms);

    for i in 0..count {
        let pos = Vec2::new(spacing * (i + 1) as f32, y);
        let kind = EnemyKind::Boss {
            minion_timer: Cooldown::new(minion_ms),
            shot_timer: Cooldown::new(shot_ms),
        };
        insert(sim, pos, stats, kind);
    }

    sim.spawned_count = sim.player.target_kills;
    log::info!("Wave {}: {} boss(es) with {} hp", sim.wave, count, hp);
    sim.emit(GameEvent::BossesSpawned { count });
    count
}

fn insert(sim: &mut Simulation, pos: Vec2, stats: StatBlock, kind: EnemyKind) -> u32 {
    let id = sim.next_entity_id();
    sim.enemies.push(Enemy {
        id,
        pos,
        radius: stats.radius,
        hp: stats.hp,
        max_hp: stats.hp,
        speed: stats.speed,
        archetype: stats.archetype,
        kind,
    });
    id
}

/// Random point just outside one of the four arena edges
pub fn edge_point<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Vec2 {
    let (w, h) = (tuning.arena_width, tuning.arena_height);
    let off = tuning.enemies.edge_offset;
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * w, -off),
        1 => Vec2::new(rng.random::<f32>() * w, h + off),
        2 => Vec2::new(-off, rng.random::<f32>() * h),
        _ => Vec2::new(w + off, rng.random::<f32>() * h),
    }
}

fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Cascading variant chain. The base germ is always assigned first, may be
/// uprated to an elite, then at most one of splitter / snake / fast / tank
/// replaces the stat block outright.
pub fn roll_variant<R: Rng + ?Sized>(
    tuning: &Tuning,
    wave: u32,
    rng: &mut R,
) -> (StatBlock, EnemyKind) {
    let t = &tuning.enemies;
    let w = wave as f32;
    let hp = t.base_hp + w * t.hp_per_wave;

    let mut stats = StatBlock {
        radius: t.radius,
        hp,
        speed: t.base_speed + w * t.speed_per_wave,
        archetype: Archetype::Germ,
    };

    if t.elite.eligible(wave) && chance(rng, t.elite.chance) {
        stats.hp *= t.elite_hp_mult;
        stats.archetype = Archetype::MutatedGerm;
    }

    let replace = |v: &VariantStats, archetype: Archetype| StatBlock {
        radius: v.radius,
        hp: v.hp(hp, wave),
        speed: v.speed(wave),
        archetype,
    };

    if t.splitter.eligible(wave) && chance(rng, t.splitter.chance) {
        (replace(&t.splitter_stats, Archetype::Sponge), EnemyKind::Splitter)
    } else if t.snake.eligible(wave) && chance(rng, t.snake.chance) {
        let tail = VecDeque::with_capacity(t.snake_tail_len);
        (replace(&t.snake_stats, Archetype::Serpent), EnemyKind::Snake { tail })
    } else if t.fast.eligible(wave) && chance(rng, t.fast.chance) {
        (replace(&t.fast_stats, Archetype::DustBunny), EnemyKind::Common)
    } else if t.tank.eligible(wave) && chance(rng, t.tank.chance) {
        (replace(&t.tank_stats, Archetype::Sludge), EnemyKind::Common)
    } else {
        (stats, EnemyKind::Common)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::VariantRoll;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(wave: u32) -> Simulation {
        let mut sim = Simulation::with_seed(Tuning::default(), 42);
        sim.wave = wave;
        sim.player.target_kills = sim.tuning.waves.target_kills(wave);
        sim.phase = GamePhase::Playing;
        sim
    }

    #[test]
    fn test_normal_spawn_respects_quota() {
        let mut sim = playing(1);
        for _ in 0..13 {
            assert_eq!(spawn_scheduled(&mut sim), SpawnOutcome::Enemy);
        }
        assert_eq!(spawn_scheduled(&mut sim), SpawnOutcome::Idle);
        assert_eq!(sim.enemies.len(), 13);
        assert_eq!(sim.spawned_count, 13);
    }

    #[test]
    fn test_no_spawn_unless_playing() {
        let mut sim = playing(1);
        sim.phase = GamePhase::Upgrade;
        assert_eq!(spawn_scheduled(&mut sim), SpawnOutcome::Idle);
        assert!(sim.enemies.is_empty());
    }

    #[test]
    fn test_spawns_land_outside_an_edge() {
        let mut sim = playing(4);
        for _ in 0..20 {
            spawn_scheduled(&mut sim);
        }
        let (w, h) = (sim.tuning.arena_width, sim.tuning.arena_height);
        for e in &sim.enemies {
            let outside = e.pos.x < 0.0 || e.pos.x > w || e.pos.y < 0.0 || e.pos.y > h;
            assert!(outside, "spawned inside arena at {:?}", e.pos);
        }
    }

    #[test]
    fn test_boss_wave_spawns_bosses_once() {
        let mut sim = playing(50);
        assert_eq!(spawn_scheduled(&mut sim), SpawnOutcome::Bosses(2));
        assert_eq!(sim.enemies.len(), 2);
        assert!(sim.enemies.iter().all(|e| e.is_boss()));
        assert_eq!(sim.enemies[0].hp, 1000.0 + 50.0 * 100.0);
        assert_eq!(sim.enemies[0].pos.x, 800.0 / 3.0);
        assert_eq!(sim.enemies[1].pos.x, 1600.0 / 3.0);
        assert!(sim.quota_met());
        // No normal mobs while the bosses live
        assert_eq!(spawn_scheduled(&mut sim), SpawnOutcome::Idle);
        assert_eq!(sim.enemies.len(), 2);
        assert!(sim.drain_events().contains(&GameEvent::BossesSpawned { count: 2 }));
    }

    #[test]
    fn test_forced_spawn_bypasses_counter() {
        let mut sim = playing(1);
        sim.spawned_count = sim.player.target_kills;
        let spore = StatBlock::spore(&sim.tuning);
        spawn_forced(&mut sim, Vec2::new(10.0, 20.0), spore);
        assert_eq!(sim.enemies.len(), 1);
        assert_eq!(sim.enemies[0].pos, Vec2::new(10.0, 20.0));
        assert_eq!(sim.enemies[0].hp, 15.0);
        assert_eq!(sim.spawned_count, sim.player.target_kills);
    }

    #[test]
    fn test_wave_one_is_all_germs() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..100 {
            let (stats, kind) = roll_variant(&tuning, 1, &mut rng);
            assert_eq!(stats.archetype, Archetype::Germ);
            assert!(matches!(kind, EnemyKind::Common));
            assert_eq!(stats.hp, 13.0);
            assert!((stats.speed - 1.3).abs() < 1e-5);
        }
    }

    #[test]
    fn test_forced_variants_replace_stats() {
        let mut tuning = Tuning::default();
        tuning.enemies.elite = VariantRoll::new(0, 1.0);
        tuning.enemies.splitter = VariantRoll::new(0, 1.0);
        let mut rng = Pcg32::seed_from_u64(1);
        let (stats, kind) = roll_variant(&tuning, 20, &mut rng);
        assert!(matches!(kind, EnemyKind::Splitter));
        assert_eq!(stats.archetype, Archetype::Sponge);
        // Replaces the elite block rather than stacking on it
        assert_eq!(stats.hp, (10.0 + 60.0) * 1.2);

        tuning.enemies.splitter = VariantRoll::new(0, 0.0);
        tuning.enemies.snake = VariantRoll::new(0, 1.0);
        let (_, kind) = roll_variant(&tuning, 20, &mut rng);
        assert!(matches!(kind, EnemyKind::Snake { .. }));

        tuning.enemies.snake = VariantRoll::new(0, 0.0);
        tuning.enemies.fast = VariantRoll::new(0, 0.0);
        tuning.enemies.tank = VariantRoll::new(0, 1.0);
        let (stats, _) = roll_variant(&tuning, 20, &mut rng);
        assert_eq!(stats.archetype, Archetype::Sludge);
        assert_eq!(stats.hp, 250.0);

        tuning.enemies.tank = VariantRoll::new(0, 0.0);
        let (stats, _) = roll_variant(&tuning, 20, &mut rng);
        assert_eq!(stats.archetype, Archetype::MutatedGerm);
        assert_eq!(stats.hp, 70.0 * 1.5);
    }

    #[test]
    fn test_variants_respect_min_wave() {
        let mut tuning = Tuning::default();
        tuning.enemies.splitter.chance = 1.0;
        tuning.enemies.snake.chance = 1.0;
        let mut rng = Pcg32::seed_from_u64(9);
        // Wave 9: splitter (10+) and snake (15+) both locked out
        for _ in 0..50 {
            let (_, kind) = roll_variant(&tuning, 9, &mut rng);
            assert!(matches!(kind, EnemyKind::Common));
        }
    }

    #[test]
    fn test_variant_stats_come_from_tuning() {
        let mut tuning = Tuning::from_json(
            r#"{ "enemies": {
                "splitter": { "min_wave": 0, "chance": 1.0 },
                "splitter_stats": { "radius": 32, "hp_mult": 0.5, "speed": 3.0 }
            } }"#,
        )
        .expect("valid json");
        tuning.enemies.elite.chance = 0.0;
        let mut rng = Pcg32::seed_from_u64(4);
        let (stats, kind) = roll_variant(&tuning, 12, &mut rng);
        assert!(matches!(kind, EnemyKind::Splitter));
        assert_eq!(stats.radius, 32.0);
        assert_eq!(stats.speed, 3.0);
        assert_eq!(stats.hp, (10.0 + 36.0) * 0.5);
    }
}
