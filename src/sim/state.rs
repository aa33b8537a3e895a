//! Game state and core simulation types
//!
//! One `Simulation` owns everything scoped to a run. Systems take it by
//! `&mut` and never keep references to entities across frames; projectiles
//! remember struck enemies by id.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::cooldown::Cooldown;
use super::upgrades::UpgradeBook;
use crate::tuning::{FixedStats, Tuning};

/// Top-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Main menu, no run in progress
    Menu,
    /// Active gameplay
    Playing,
    /// Everything suspended, music included
    Paused,
    /// Between-wave upgrade intermission
    Upgrade,
    /// Run ended
    GameOver,
}

/// Notifications for collaborators (audio, storage, UI), drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted { wave: u32 },
    Paused,
    Resumed,
    QuitToMenu,
    BossesSpawned { count: u32 },
    WaveCleared { wave: u32, boss: bool },
    UpgradePurchased { name: String, level: u32 },
    Rerolled { cost: u32 },
    WaveStarted { wave: u32 },
    GameOver { wave: u32, gold: u32 },
}

/// The player-controlled agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    /// Pixels per frame
    pub speed: f32,
    pub fire_delay_ms: f64,
    pub damage: f32,
    pub gold: u32,
    /// Multiplier on incoming damage (1.0 = none absorbed)
    pub armor: f32,
    pub kills_in_wave: u32,
    pub target_kills: u32,
    pub ricochet: u32,
    pub explosive: bool,
    pub explosive_level: u32,
    /// Fraction of missing hp restored when a wave ends (0-1)
    pub recovery_rate: f32,
    pub multi_shot: u32,
    pub dash_dist: f32,
    pub bug_bomb_level: u32,
}

impl Player {
    pub fn new(tuning: &Tuning, target_kills: u32) -> Self {
        let t = &tuning.player;
        Self {
            pos: Vec2::new(tuning.arena_width / 2.0, tuning.arena_height / 2.0),
            radius: t.radius,
            hp: t.hp,
            max_hp: t.hp,
            speed: t.speed,
            fire_delay_ms: t.fire_delay_ms,
            damage: t.damage,
            gold: t.gold,
            armor: t.armor,
            kills_in_wave: 0,
            target_kills,
            ricochet: 0,
            explosive: false,
            explosive_level: 0,
            recovery_rate: 0.0,
            multi_shot: 1,
            dash_dist: t.dash_dist,
            bug_bomb_level: 0,
        }
    }

    /// Apply incoming damage scaled by armor; hp never drops below zero
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let dealt = (amount * self.armor).min(self.hp).max(0.0);
        self.hp -= dealt;
        dealt
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Visual tag for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Archetype {
    /// Common germ
    Germ,
    /// Uprated germ (late waves)
    MutatedGerm,
    /// Splitter
    Sponge,
    /// Snake with a hazardous trail
    Serpent,
    /// Fast, fragile
    DustBunny,
    /// Slow, tanky
    Sludge,
    /// Child of a splitter
    Spore,
    /// Spawned by a boss
    Minion,
    /// Boss
    Crown,
}

/// Special behaviour carried by an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EnemyKind {
    Common,
    /// Spawns two weaker enemies on death
    Splitter,
    /// Drags a hazardous trail (oldest point at the front)
    Snake { tail: VecDeque<Vec2> },
    Boss { minion_timer: Cooldown, shot_timer: Cooldown },
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub archetype: Archetype,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }

    pub fn splits(&self) -> bool {
        matches!(self.kind, EnemyKind::Splitter)
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    /// Snake trail points, empty for everything else
    pub fn tail(&self) -> impl Iterator<Item = &Vec2> {
        let tail = match &self.kind {
            EnemyKind::Snake { tail } => Some(tail.iter()),
            _ => None,
        };
        tail.into_iter().flatten()
    }
}

/// Stat block used to create an enemy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBlock {
    pub radius: f32,
    pub hp: f32,
    pub speed: f32,
    pub archetype: Archetype,
}

impl StatBlock {
    pub fn fixed(stats: &FixedStats, archetype: Archetype) -> Self {
        Self {
            radius: stats.radius,
            hp: stats.hp,
            speed: stats.speed,
            archetype,
        }
    }

    /// Split child of a dead splitter
    pub fn spore(tuning: &Tuning) -> Self {
        Self::fixed(&tuning.enemies.spore, Archetype::Spore)
    }

    /// Boss-summoned minion
    pub fn minion(tuning: &Tuning) -> Self {
        Self::fixed(&tuning.boss.minion, Archetype::Minion)
    }
}

/// A player-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Remaining ricochets
    pub bounces: u32,
    /// Ids of enemies already struck (only grows)
    pub hit: Vec<u32>,
}

/// A boss-fired projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// A placed bug bomb waiting for its fuse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub placed_at: f64,
    pub fuse_ms: f64,
    pub radius: f32,
}

impl Bomb {
    pub fn expired(&self, now_ms: f64) -> bool {
        now_ms - self.placed_at > self.fuse_ms
    }
}

/// What produced an explosion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlastKind {
    /// Bug bomb fuse expiry (large, high damage)
    Bomb,
    /// Explosive-upgrade projectile hit (small)
    OnHit,
}

/// Expanding ring; damage is dealt once at creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub alpha: f32,
    pub kind: BlastKind,
}

/// Colour hint for floating text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextTone {
    Hit,
    Blast,
    BombBlast,
    Hurt,
    Notice,
    Muted,
}

/// Cosmetic damage/status label
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingText {
    pub pos: Vec2,
    pub text: String,
    pub tone: TextTone,
    /// Vertical drift per frame (negative = up)
    pub vy: f32,
    /// Opacity, 1 -> 0
    pub life: f32,
}

/// Ability gates for the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityTimers {
    pub fire: Cooldown,
    pub dash: Cooldown,
    pub bomb: Cooldown,
    /// Bombs placed in the current refill cycle
    pub bombs_in_cycle: u32,
}

impl AbilityTimers {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            fire: Cooldown::new(tuning.player.fire_delay_ms),
            dash: Cooldown::new(tuning.abilities.dash_cooldown_ms),
            bomb: Cooldown::new(tuning.abilities.bomb_cooldown_ms),
            bombs_in_cycle: 0,
        }
    }
}

/// The upgrade menu between waves
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intermission {
    /// Clicks are ignored until this gate opens
    pub debounce: Cooldown,
    /// Catalog indices on offer
    pub offers: Vec<usize>,
}

/// How a run starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOptions {
    pub start_wave: u32,
    /// Extra gold and pre-applied upgrades
    pub head_start: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            start_wave: 1,
            head_start: false,
        }
    }
}

impl RunOptions {
    /// Main menu override codes
    pub fn from_code(code: &str) -> Option<Self> {
        let start_wave = match code.trim() {
            "clean25" => 25,
            "clean50" => 50,
            _ => return None,
        };
        Some(Self {
            start_wave,
            head_start: true,
        })
    }
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct Simulation {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub boss_projectiles: Vec<BossProjectile>,
    pub bombs: Vec<Bomb>,
    pub explosions: Vec<Explosion>,
    pub floating_texts: Vec<FloatingText>,
    /// Current wave (1-based)
    pub wave: u32,
    /// Normal spawns created this wave
    pub spawned_count: u32,
    pub reroll_cost: u32,
    pub upgrades: UpgradeBook,
    pub intermission: Option<Intermission>,
    pub timers: AbilityTimers,
    /// Screen shake magnitude for the renderer
    pub screen_shake: f32,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl Simulation {
    /// New simulation sitting at the main menu, entropy-seeded
    pub fn new(tuning: Tuning) -> Self {
        Self::from_rng(tuning, Pcg32::from_rng(&mut rand::rng()))
    }

    /// Seeded simulation (tests, demos)
    pub fn with_seed(tuning: Tuning, seed: u64) -> Self {
        Self::from_rng(tuning, Pcg32::seed_from_u64(seed))
    }

    fn from_rng(tuning: Tuning, rng: Pcg32) -> Self {
        let target = tuning.waves.target_kills(1);
        Self {
            player: Player::new(&tuning, target),
            timers: AbilityTimers::new(&tuning),
            reroll_cost: tuning.waves.reroll_cost,
            upgrades: UpgradeBook::new(),
            phase: GamePhase::Menu,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            boss_projectiles: Vec::new(),
            bombs: Vec::new(),
            explosions: Vec::new(),
            floating_texts: Vec::new(),
            wave: 1,
            spawned_count: 0,
            intermission: None,
            screen_shake: 0.0,
            rng,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    /// Reinitialize every run-scoped field (player, collections, counters, upgrades)
    pub(crate) fn reset_run(&mut self, options: RunOptions) {
        let wave = options.start_wave.max(1);
        self.player = Player::new(&self.tuning, self.tuning.waves.target_kills(wave));
        self.enemies.clear();
        self.projectiles.clear();
        self.boss_projectiles.clear();
        self.bombs.clear();
        self.explosions.clear();
        self.floating_texts.clear();
        self.wave = wave;
        self.spawned_count = 0;
        self.reroll_cost = self.tuning.waves.reroll_cost;
        self.upgrades = UpgradeBook::new();
        self.intermission = None;
        self.timers = AbilityTimers::new(&self.tuning);
        self.screen_shake = 0.0;
        self.next_id = 1;
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Queue a floating label
    pub fn add_text(&mut self, pos: Vec2, text: impl Into<String>, tone: TextTone) {
        self.floating_texts.push(FloatingText {
            pos,
            text: text.into(),
            tone,
            vy: -self.tuning.effects.text_rise,
            life: 1.0,
        });
    }

    pub(crate) fn shake(&mut self, amount: f32) {
        self.screen_shake = self.screen_shake.max(amount);
    }

    /// Has the normal spawn quota for this wave been met?
    pub fn quota_met(&self) -> bool {
        self.spawned_count >= self.player.target_kills
    }
}
