//! Permanent upgrades bought between waves
//!
//! Definitions are plain data: a stat effect plus a cost policy. The per-run
//! `UpgradeBook` tracks level, current cost and the maxed flag, and applies
//! the same leveling rule to every entry.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::state::Player;

/// Rarity tag shown on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// Stat change applied once per purchase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Max hp +fraction; current hp rises by the same amount
    MaxHp(f32),
    /// Damage x(1 + fraction)
    Damage(f32),
    /// One more projectile per volley
    ExtraProjectile,
    /// Movement speed x(1 + fraction)
    MoveSpeed(f32),
    /// One more ricochet
    Ricochet,
    /// Enable on-hit explosions, +1 blast level
    Explosive,
    /// One more bomb per refill cycle
    BugBomb,
    /// Recovery rate +amount, capped at 1.0
    Recovery(f32),
    /// Fire delay x factor, never below the floor
    FireRate { factor: f32, floor_ms: f64 },
    /// Dash distance +pixels
    DashDistance(f32),
    /// Incoming damage x factor
    Armor(f32),
}

impl Effect {
    /// Apply to the player. Returns true when the effect has hit its cap.
    pub fn apply(&self, player: &mut Player) -> bool {
        match *self {
            Effect::MaxHp(frac) => {
                let inc = player.max_hp * frac;
                player.max_hp += inc;
                player.hp = (player.hp + inc).min(player.max_hp);
                false
            }
            Effect::Damage(frac) => {
                player.damage *= 1.0 + frac;
                false
            }
            Effect::ExtraProjectile => {
                player.multi_shot += 1;
                false
            }
            Effect::MoveSpeed(frac) => {
                player.speed *= 1.0 + frac;
                false
            }
            Effect::Ricochet => {
                player.ricochet += 1;
                false
            }
            Effect::Explosive => {
                player.explosive = true;
                player.explosive_level += 1;
                false
            }
            Effect::BugBomb => {
                player.bug_bomb_level += 1;
                false
            }
            Effect::Recovery(amount) => {
                player.recovery_rate += amount;
                // Float sums of 0.2 can land just under 1.0
                if player.recovery_rate >= 1.0 - 1e-4 {
                    player.recovery_rate = 1.0;
                    true
                } else {
                    false
                }
            }
            Effect::FireRate { factor, floor_ms } => {
                player.fire_delay_ms = (player.fire_delay_ms * factor as f64).max(floor_ms);
                player.fire_delay_ms <= floor_ms
            }
            Effect::DashDistance(px) => {
                player.dash_dist += px;
                false
            }
            Effect::Armor(factor) => {
                player.armor *= factor;
                false
            }
        }
    }
}

/// Static upgrade definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpgradeDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub base_cost: u32,
    /// Cost multiplier per purchase (floored)
    pub cost_growth: f64,
    /// Maxed once this level is reached
    pub max_level: Option<u32>,
    pub effect: Effect,
}

/// The full upgrade set
pub const CATALOG: &[UpgradeDefinition] = &[
    UpgradeDefinition {
        name: "HEPA Filter Mask",
        description: "Max Integrity +15%",
        rarity: Rarity::Common,
        base_cost: 100,
        cost_growth: 1.4,
        max_level: None,
        effect: Effect::MaxHp(0.15),
    },
    UpgradeDefinition {
        name: "Industrial Bleach",
        description: "Base Damage +20%",
        rarity: Rarity::Common,
        base_cost: 150,
        cost_growth: 1.5,
        max_level: None,
        effect: Effect::Damage(0.2),
    },
    UpgradeDefinition {
        name: "Dual-Nozzle Wand",
        description: "+1 Projectile per shot",
        rarity: Rarity::Legendary,
        base_cost: 400,
        cost_growth: 2.2,
        max_level: None,
        effect: Effect::ExtraProjectile,
    },
    UpgradeDefinition {
        name: "Hydro-Slide Boots",
        description: "Movement Speed +10%",
        rarity: Rarity::Common,
        base_cost: 80,
        cost_growth: 1.3,
        max_level: None,
        effect: Effect::MoveSpeed(0.1),
    },
    UpgradeDefinition {
        name: "High-Pressure Wash",
        description: "Bullets ricochet to another target",
        rarity: Rarity::Rare,
        base_cost: 300,
        cost_growth: 1.7,
        max_level: None,
        effect: Effect::Ricochet,
    },
    UpgradeDefinition {
        name: "Aerosol Combustion",
        description: "Hits explode; bigger blast per level",
        rarity: Rarity::Rare,
        base_cost: 350,
        cost_growth: 1.6,
        max_level: None,
        effect: Effect::Explosive,
    },
    UpgradeDefinition {
        name: "Bug Bomb",
        description: "Drop AOE traps (+1 per cycle)",
        rarity: Rarity::Rare,
        base_cost: 450,
        cost_growth: 1.8,
        max_level: Some(5),
        effect: Effect::BugBomb,
    },
    UpgradeDefinition {
        name: "Post Shift Recovery",
        description: "Restore 20% missing HP after each wave",
        rarity: Rarity::Legendary,
        base_cost: 500,
        cost_growth: 1.8,
        max_level: None,
        effect: Effect::Recovery(0.2),
    },
    UpgradeDefinition {
        name: "Rapid Scrubber",
        description: "Fire Rate +15%",
        rarity: Rarity::Common,
        base_cost: 120,
        cost_growth: 1.5,
        max_level: None,
        effect: Effect::FireRate {
            factor: 0.85,
            floor_ms: 100.0,
        },
    },
    UpgradeDefinition {
        name: "Turbo Treads",
        description: "Dash Distance +25",
        rarity: Rarity::Common,
        base_cost: 90,
        cost_growth: 1.4,
        max_level: None,
        effect: Effect::DashDistance(25.0),
    },
    UpgradeDefinition {
        name: "Hazmat Lining",
        description: "Incoming Damage -10%",
        rarity: Rarity::Rare,
        base_cost: 250,
        cost_growth: 1.6,
        max_level: Some(5),
        effect: Effect::Armor(0.9),
    },
];

/// Per-run progress of one catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSlot {
    pub level: u32,
    pub cost: u32,
    pub maxed: bool,
}

/// Per-run upgrade levels and costs, index-aligned with `CATALOG`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeBook {
    slots: Vec<UpgradeSlot>,
}

impl Default for UpgradeBook {
    fn default() -> Self {
        Self::new()
    }
}

impl UpgradeBook {
    /// Fresh book: level 0, base costs, nothing maxed
    pub fn new() -> Self {
        Self {
            slots: CATALOG
                .iter()
                .map(|def| UpgradeSlot {
                    level: 0,
                    cost: def.base_cost,
                    maxed: false,
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&UpgradeSlot> {
        self.slots.get(index)
    }

    pub fn definition(index: usize) -> Option<&'static UpgradeDefinition> {
        CATALOG.get(index)
    }

    /// Catalog index by name
    pub fn find(name: &str) -> Option<usize> {
        CATALOG.iter().position(|def| def.name == name)
    }

    /// Indices of every upgrade that can still be bought
    pub fn available(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.maxed)
            .map(|(i, _)| i)
            .collect()
    }

    /// Apply an upgrade and advance its level/cost. Gold is the caller's job.
    /// Returns false (no change) for a maxed or unknown entry.
    pub fn apply(&mut self, index: usize, player: &mut Player) -> bool {
        let (Some(def), Some(slot)) = (CATALOG.get(index), self.slots.get_mut(index)) else {
            return false;
        };
        if slot.maxed {
            return false;
        }
        let capped = def.effect.apply(player);
        slot.level += 1;
        slot.cost = (slot.cost as f64 * def.cost_growth).floor() as u32;
        if capped || def.max_level.is_some_and(|max| slot.level >= max) {
            slot.maxed = true;
        }
        true
    }

    /// Draw up to `count` distinct offers uniformly from the non-maxed entries
    pub fn draw_offers<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<usize> {
        self.available()
            .choose_multiple(rng, count)
            .copied()
            .collect()
    }
}
