//! Data-driven game balance
//!
//! Every gameplay number lives here so balance passes never touch simulation
//! code. Missing fields in a JSON file fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};

/// Failure loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Probability gate for one enemy variant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VariantRoll {
    /// First wave on which the variant can appear
    pub min_wave: u32,
    /// Chance per spawn (0-1)
    pub chance: f64,
}

impl VariantRoll {
    pub const fn new(min_wave: u32, chance: f64) -> Self {
        Self { min_wave, chance }
    }

    pub fn eligible(&self, wave: u32) -> bool {
        wave >= self.min_wave
    }
}

/// Stat formula for a variant that replaces the base enemy outright.
///
/// `hp = base_hp * hp_mult + hp_flat + wave * hp_per_wave`, where `base_hp`
/// is the common enemy's hp for that wave; `speed = speed + wave * speed_per_wave`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantStats {
    pub radius: f32,
    pub hp_mult: f32,
    pub hp_flat: f32,
    pub hp_per_wave: f32,
    pub speed: f32,
    pub speed_per_wave: f32,
}

impl Default for VariantStats {
    fn default() -> Self {
        Self {
            radius: 15.0,
            hp_mult: 1.0,
            hp_flat: 0.0,
            hp_per_wave: 0.0,
            speed: 1.0,
            speed_per_wave: 0.0,
        }
    }
}

impl VariantStats {
    pub fn hp(&self, base_hp: f32, wave: u32) -> f32 {
        base_hp * self.hp_mult + self.hp_flat + wave as f32 * self.hp_per_wave
    }

    pub fn speed(&self, wave: u32) -> f32 {
        self.speed + wave as f32 * self.speed_per_wave
    }
}

/// Wave-independent stats for forced spawns (split children, boss minions)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixedStats {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
}

/// Starting stats for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub radius: f32,
    pub hp: f32,
    /// Pixels per frame
    pub speed: f32,
    pub fire_delay_ms: f64,
    pub damage: f32,
    pub gold: u32,
    pub armor: f32,
    pub dash_dist: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 18.0,
            hp: 100.0,
            speed: 4.0,
            fire_delay_ms: 400.0,
            damage: 10.0,
            gold: 50,
            armor: 1.0,
            dash_dist: 100.0,
        }
    }
}

/// Ability timing and projectile behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityTuning {
    pub dash_cooldown_ms: f64,
    pub bomb_cooldown_ms: f64,
    pub bomb_fuse_ms: f64,
    pub bomb_radius: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    /// Speed after a ricochet retarget
    pub ricochet_speed: f32,
    /// Angular step between fanned projectiles (radians)
    pub spread_step: f32,
    /// How far outside the arena a projectile may travel before culling
    pub cull_margin: f32,
}

impl Default for AbilityTuning {
    fn default() -> Self {
        Self {
            dash_cooldown_ms: 2000.0,
            bomb_cooldown_ms: 5000.0,
            bomb_fuse_ms: 2000.0,
            bomb_radius: 12.0,
            projectile_speed: 11.0,
            projectile_radius: 6.0,
            ricochet_speed: 9.0,
            spread_step: 0.2,
            cull_margin: 10.0,
        }
    }
}

/// Explosion sizing, damage and decay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionTuning {
    pub bomb_blast_radius: f32,
    pub bomb_damage_mult: f32,
    pub on_hit_base_radius: f32,
    pub on_hit_radius_per_level: f32,
    pub on_hit_damage_mult: f32,
    pub start_radius: f32,
    /// Radius growth per frame
    pub growth: f32,
    /// Opacity lost per frame
    pub fade: f32,
}

impl Default for ExplosionTuning {
    fn default() -> Self {
        Self {
            bomb_blast_radius: 180.0,
            bomb_damage_mult: 4.0,
            on_hit_base_radius: 60.0,
            on_hit_radius_per_level: 20.0,
            on_hit_damage_mult: 0.8,
            start_radius: 5.0,
            growth: 5.0,
            fade: 0.04,
        }
    }
}

/// Enemy stat formulas (linear in wave) and variant chances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub base_hp: f32,
    pub hp_per_wave: f32,
    pub base_speed: f32,
    pub speed_per_wave: f32,
    pub radius: f32,
    /// Spawn distance outside the arena edge
    pub edge_offset: f32,
    pub elite: VariantRoll,
    pub elite_hp_mult: f32,
    pub splitter: VariantRoll,
    pub snake: VariantRoll,
    pub fast: VariantRoll,
    pub tank: VariantRoll,
    pub splitter_stats: VariantStats,
    pub snake_stats: VariantStats,
    pub fast_stats: VariantStats,
    pub tank_stats: VariantStats,
    /// Children left behind by a dead splitter
    pub spore: FixedStats,
    /// Per-frame contact damage while overlapping the player
    pub contact_damage: f32,
    pub kill_reward: u32,
    pub snake_tail_len: usize,
    pub snake_tail_damage: f32,
    /// Extra reach of each tail point beyond the player's radius
    pub snake_tail_reach: f32,
    /// Max offset (each axis) of split children from the parent
    pub split_scatter: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            base_hp: 10.0,
            hp_per_wave: 3.0,
            base_speed: 1.2,
            speed_per_wave: 0.1,
            radius: 15.0,
            edge_offset: 40.0,
            elite: VariantRoll::new(11, 0.5),
            elite_hp_mult: 1.5,
            splitter: VariantRoll::new(10, 0.15),
            snake: VariantRoll::new(15, 0.10),
            fast: VariantRoll::new(3, 0.20),
            tank: VariantRoll::new(5, 0.15),
            splitter_stats: VariantStats {
                radius: 20.0,
                hp_mult: 1.2,
                speed: 1.0,
                ..Default::default()
            },
            snake_stats: VariantStats {
                radius: 15.0,
                hp_mult: 2.0,
                speed: 1.5,
                ..Default::default()
            },
            fast_stats: VariantStats {
                radius: 10.0,
                hp_mult: 0.0,
                hp_flat: 8.0,
                hp_per_wave: 1.0,
                speed: 2.8,
                speed_per_wave: 0.1,
            },
            tank_stats: VariantStats {
                radius: 25.0,
                hp_mult: 0.0,
                hp_flat: 50.0,
                hp_per_wave: 10.0,
                speed: 0.8,
                speed_per_wave: 0.0,
            },
            spore: FixedStats {
                radius: 10.0,
                hp: 15.0,
                speed: 1.8,
            },
            contact_damage: 0.7,
            kill_reward: 10,
            snake_tail_len: 50,
            snake_tail_damage: 0.5,
            snake_tail_reach: 5.0,
            split_scatter: 10.0,
        }
    }
}

/// Boss waves
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    /// Bosses appear on every wave that is a multiple of this
    pub wave_interval: u32,
    pub base_hp: f32,
    pub hp_per_wave: f32,
    pub radius: f32,
    pub speed: f32,
    /// Spawn height (negative = above the arena)
    pub spawn_y: f32,
    pub minion_interval_ms: f64,
    pub shot_interval_ms: f64,
    pub shot_speed: f32,
    pub shot_radius: f32,
    pub shot_damage: f32,
    /// Boss shots are culled this far outside the arena
    pub shot_cull_margin: f32,
    pub minion: FixedStats,
    pub reward: u32,
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            wave_interval: 25,
            base_hp: 1000.0,
            hp_per_wave: 100.0,
            radius: 60.0,
            speed: 0.5,
            spawn_y: -100.0,
            minion_interval_ms: 1500.0,
            shot_interval_ms: 1000.0,
            shot_speed: 5.0,
            shot_radius: 12.0,
            shot_damage: 10.0,
            shot_cull_margin: 180.0,
            minion: FixedStats {
                radius: 12.0,
                hp: 25.0,
                speed: 2.2,
            },
            reward: 1000,
        }
    }
}

/// Wave quota and intermission economy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    pub base_kills: u32,
    pub kills_per_wave: u32,
    pub reroll_cost: u32,
    pub reroll_growth: f64,
    /// Added to the reroll cost whenever an intermission closes
    pub reroll_wave_bump: u32,
    pub menu_debounce_ms: f64,
    pub head_start_gold: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            base_kills: 8,
            kills_per_wave: 5,
            reroll_cost: 15,
            reroll_growth: 1.5,
            reroll_wave_bump: 5,
            menu_debounce_ms: 1000.0,
            head_start_gold: 5000,
        }
    }
}

impl WaveTuning {
    /// Kill quota for a wave
    pub fn target_kills(&self, wave: u32) -> u32 {
        self.base_kills + wave * self.kills_per_wave
    }
}

/// Cosmetic effects owned by the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    pub text_rise: f32,
    pub text_fade: f32,
    pub shake_decay: f32,
    pub shake_dash: f32,
    pub shake_hit: f32,
    pub shake_small_blast: f32,
    pub shake_big_blast: f32,
    /// Per-frame chance of a "!" while an enemy touches the player
    pub contact_text_chance: f32,
    /// Height of ability notices above the player
    pub notice_offset: f32,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            text_rise: 1.0,
            text_fade: 0.02,
            shake_decay: 0.9,
            shake_dash: 5.0,
            shake_hit: 10.0,
            shake_small_blast: 8.0,
            shake_big_blast: 15.0,
            contact_text_chance: 0.1,
            notice_offset: 30.0,
        }
    }
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub arena_width: f32,
    pub arena_height: f32,
    pub player: PlayerTuning,
    pub abilities: AbilityTuning,
    pub explosions: ExplosionTuning,
    pub enemies: EnemyTuning,
    pub boss: BossTuning,
    pub waves: WaveTuning,
    pub effects: EffectTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            player: PlayerTuning::default(),
            abilities: AbilityTuning::default(),
            explosions: ExplosionTuning::default(),
            enemies: EnemyTuning::default(),
            boss: BossTuning::default(),
            waves: WaveTuning::default(),
            effects: EffectTuning::default(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Is this a boss wave?
    pub fn is_boss_wave(&self, wave: u32) -> bool {
        self.boss.wave_interval > 0 && wave % self.boss.wave_interval == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_kills_formula() {
        let waves = WaveTuning::default();
        assert_eq!(waves.target_kills(1), 13);
        assert_eq!(waves.target_kills(25), 133);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "boss": { "reward": 5 }, "arena_width": 1024 }"#)
            .expect("valid json");
        assert_eq!(tuning.boss.reward, 5);
        assert_eq!(tuning.boss.wave_interval, 25);
        assert_eq!(tuning.arena_width, 1024.0);
        assert_eq!(tuning.arena_height, ARENA_HEIGHT);
        assert_eq!(tuning.abilities.dash_cooldown_ms, 2000.0);
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, TuningError::Io { .. }));
    }

    #[test]
    fn test_variant_stat_formulas() {
        let e = EnemyTuning::default();
        // wave 12 common hp = 10 + 12*3
        let base = 46.0;
        assert!((e.splitter_stats.hp(base, 12) - 55.2).abs() < 1e-4);
        assert_eq!(e.snake_stats.hp(base, 12), 92.0);
        assert_eq!(e.fast_stats.hp(base, 12), 20.0);
        assert!((e.fast_stats.speed(12) - 4.0).abs() < 1e-5);
        assert_eq!(e.tank_stats.hp(base, 12), 170.0);
        assert_eq!(e.tank_stats.speed(12), 0.8);
    }

    #[test]
    fn test_variant_stats_overridable() {
        let tuning = Tuning::from_json(
            r#"{ "enemies": { "splitter_stats": { "radius": 33, "speed": 2.5 } },
                 "boss": { "minion": { "radius": 5, "hp": 1, "speed": 9 } } }"#,
        )
        .expect("valid json");
        assert_eq!(tuning.enemies.splitter_stats.radius, 33.0);
        assert_eq!(tuning.enemies.splitter_stats.speed, 2.5);
        // Unnamed fields fall back to the neutral formula, not the splitter's
        assert_eq!(tuning.enemies.splitter_stats.hp_mult, 1.0);
        assert_eq!(tuning.boss.minion.hp, 1.0);
        assert_eq!(tuning.enemies.spore.hp, 15.0);
    }

    #[test]
    fn test_boss_waves() {
        let tuning = Tuning::default();
        assert!(!tuning.is_boss_wave(1));
        assert!(tuning.is_boss_wave(25));
        assert!(tuning.is_boss_wave(50));
        assert!(!tuning.is_boss_wave(26));
    }
}
