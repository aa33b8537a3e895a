//! Read-only views for the HUD and the upgrade overlay
//!
//! Everything here is derived from a `Simulation` snapshot; nothing mutates.

use crate::sim::abilities::{bombs_ready, fire_ready};
use crate::sim::{Rarity, Simulation, UpgradeBook};

/// Bug bomb indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombStatus {
    /// Bombs placeable right now
    Ready(u32),
    Reloading,
}

/// Per-frame HUD numbers
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    /// Current hp, floored and never negative
    pub hp: u32,
    pub max_hp: u32,
    /// hp / max_hp in 0.0..=1.0
    pub hp_fraction: f32,
    pub wave: u32,
    pub gold: u32,
    /// kills / target, capped at 1.0
    pub wave_progress: f32,
    pub enemies_remaining: u32,
    pub dash_ready: bool,
    /// Crosshair colour cue
    pub fire_ready: bool,
    /// None until the bomb upgrade is owned
    pub bomb: Option<BombStatus>,
}

impl HudView {
    pub fn from_sim(sim: &Simulation, now_ms: f64) -> Self {
        let p = &sim.player;
        let hp = p.hp.max(0.0);
        let hp_fraction = if p.max_hp > 0.0 {
            (hp / p.max_hp).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let wave_progress = if p.target_kills == 0 {
            1.0
        } else {
            (p.kills_in_wave as f32 / p.target_kills as f32).min(1.0)
        };
        let unspawned = p.target_kills.saturating_sub(sim.spawned_count);
        let bomb = (p.bug_bomb_level > 0).then(|| match bombs_ready(sim, now_ms) {
            0 => BombStatus::Reloading,
            n => BombStatus::Ready(n),
        });

        Self {
            hp: hp.floor() as u32,
            max_hp: p.max_hp.floor() as u32,
            hp_fraction,
            wave: sim.wave,
            gold: p.gold,
            wave_progress,
            enemies_remaining: sim.enemies.len() as u32 + unspawned,
            dash_ready: sim.timers.dash.ready(now_ms),
            fire_ready: fire_ready(sim, now_ms),
            bomb,
        }
    }
}

/// One card in the upgrade overlay
#[derive(Debug, Clone, PartialEq)]
pub struct UpgradeOffer {
    /// Position in the overlay; pass to `purchase`
    pub slot: usize,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    /// Level already owned
    pub level: u32,
    pub cost: u32,
    pub affordable: bool,
}

/// Cards for the open intermission (empty outside it)
pub fn upgrade_offers(sim: &Simulation) -> Vec<UpgradeOffer> {
    let Some(menu) = &sim.intermission else {
        return Vec::new();
    };
    menu.offers
        .iter()
        .enumerate()
        .filter_map(|(slot, &index)| {
            let def = UpgradeBook::definition(index)?;
            let owned = sim.upgrades.slot(index)?;
            Some(UpgradeOffer {
                slot,
                name: def.name,
                description: def.description,
                rarity: def.rarity,
                level: owned.level,
                cost: owned.cost,
                affordable: sim.player.gold >= owned.cost,
            })
        })
        .collect()
}

/// Reroll button label: cost and whether it can be paid
pub fn reroll_button(sim: &Simulation) -> (u32, bool) {
    (sim.reroll_cost, sim.player.gold >= sim.reroll_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::progression::end_wave;
    use crate::sim::{GamePhase, RunOptions, start_run};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn running() -> Simulation {
        let mut sim = Simulation::with_seed(Tuning::default(), 3);
        start_run(&mut sim, RunOptions::default());
        sim
    }

    #[test]
    fn test_fresh_hud() {
        let sim = running();
        let hud = HudView::from_sim(&sim, 0.0);
        assert_eq!(hud.hp, 100);
        assert_eq!(hud.hp_fraction, 1.0);
        assert_eq!(hud.wave, 1);
        assert_eq!(hud.gold, 50);
        assert_eq!(hud.wave_progress, 0.0);
        assert_eq!(hud.enemies_remaining, 13);
        assert!(hud.dash_ready);
        assert!(hud.fire_ready);
        assert_eq!(hud.bomb, None);
    }

    #[test]
    fn test_hud_clamps_hp_and_progress() {
        let mut sim = running();
        sim.player.hp = -12.5;
        sim.player.kills_in_wave = 40;
        let hud = HudView::from_sim(&sim, 0.0);
        assert_eq!(hud.hp, 0);
        assert_eq!(hud.hp_fraction, 0.0);
        assert_eq!(hud.wave_progress, 1.0);
    }

    #[test]
    fn test_fire_and_dash_flags_follow_gates() {
        let mut sim = running();
        sim.timers.fire.trigger(1000.0);
        sim.timers.dash.trigger(1000.0);
        let hud = HudView::from_sim(&sim, 1200.0);
        assert!(!hud.fire_ready);
        assert!(!hud.dash_ready);
        let hud = HudView::from_sim(&sim, 3000.0);
        assert!(hud.fire_ready);
        assert!(hud.dash_ready);
    }

    #[test]
    fn test_fire_flag_tracks_fire_rate_upgrades() {
        let mut sim = running();
        crate::sim::abilities::fire(&mut sim, Vec2::new(400.0, 0.0), 1000.0);
        assert!(!HudView::from_sim(&sim, 1300.0).fire_ready);
        // A faster fire rate opens the gate for both the HUD and the trigger
        sim.player.fire_delay_ms = 250.0;
        assert!(HudView::from_sim(&sim, 1300.0).fire_ready);
        assert_eq!(crate::sim::abilities::fire(&mut sim, Vec2::new(400.0, 0.0), 1300.0), 1);
    }

    #[test]
    fn test_bomb_status() {
        let mut sim = running();
        sim.player.bug_bomb_level = 2;
        assert_eq!(HudView::from_sim(&sim, 0.0).bomb, Some(BombStatus::Ready(2)));
        sim.timers.bomb.trigger(100.0);
        sim.timers.bombs_in_cycle = 2;
        assert_eq!(HudView::from_sim(&sim, 200.0).bomb, Some(BombStatus::Reloading));
    }

    #[test]
    fn test_offers_only_in_intermission() {
        let mut sim = running();
        assert!(upgrade_offers(&sim).is_empty());
        sim.player.gold = 100;
        end_wave(&mut sim, 0.0, false);
        assert_eq!(sim.phase, GamePhase::Upgrade);
        let offers = upgrade_offers(&sim);
        assert_eq!(offers.len(), 3);
        for (i, offer) in offers.iter().enumerate() {
            assert_eq!(offer.slot, i);
            assert_eq!(offer.level, 0);
            assert_eq!(offer.affordable, offer.cost <= 100);
        }
        assert_eq!(reroll_button(&sim), (15, true));
    }
}
