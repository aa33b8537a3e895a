//! Simulation module
//!
//! All gameplay logic lives here, free of rendering, audio and storage:
//! - Wall-clock time is passed in, never read
//! - Randomness comes from the simulation's own RNG
//! - Collaborators learn about transitions through drained `GameEvent`s

pub mod abilities;
pub mod collision;
pub mod cooldown;
pub mod error;
pub mod progression;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod upgrades;

pub use cooldown::Cooldown;
pub use error::ActionError;
pub use progression::{purchase, reroll, skip};
pub use spawn::{SpawnOutcome, spawn_forced, spawn_scheduled};
pub use state::{
    Archetype, BlastKind, Bomb, BossProjectile, Enemy, EnemyKind, Explosion, FloatingText,
    GameEvent, GamePhase, Player, Projectile, RunOptions, Simulation, StatBlock, TextTone,
};
pub use tick::{TickInput, quit_to_menu, start_run, tick, toggle_pause};
pub use upgrades::{CATALOG, Rarity, UpgradeBook, UpgradeDefinition};
