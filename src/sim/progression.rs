//! Wave progression and the upgrade intermission
//!
//! A wave ends either when its spawn quota is met and the field is clear, or
//! outright when a boss dies. The player then shops: buy one upgrade, reroll
//! the offers, or skip. Buying or skipping starts the next wave.

use super::cooldown::Cooldown;
use super::error::ActionError;
use super::state::{GameEvent, GamePhase, Intermission, Simulation};
use super::upgrades::{UpgradeBook, UpgradeDefinition};
use crate::consts::OFFER_COUNT;

/// Close out the current wave: passive recovery, then open the shop
pub fn end_wave(sim: &mut Simulation, now_ms: f64, boss: bool) {
    let p = &mut sim.player;
    if p.recovery_rate > 0.0 && p.hp < p.max_hp {
        p.hp = (p.hp + (p.max_hp - p.hp) * p.recovery_rate).min(p.max_hp);
    }

    sim.phase = GamePhase::Upgrade;
    open_intermission(sim, now_ms);
    log::info!(
        "Wave {} cleared{} (gold {}, hp {:.0}/{:.0})",
        sim.wave,
        if boss { " by boss kill" } else { "" },
        sim.player.gold,
        sim.player.hp,
        sim.player.max_hp
    );
    sim.emit(GameEvent::WaveCleared {
        wave: sim.wave,
        boss,
    });
}

/// Show (or re-show) the menu: fresh offers and a fresh debounce window
fn open_intermission(sim: &mut Simulation, now_ms: f64) {
    let offers = sim.upgrades.draw_offers(&mut sim.rng, OFFER_COUNT);
    let mut debounce = Cooldown::new(sim.tuning.waves.menu_debounce_ms);
    debounce.trigger(now_ms);
    sim.intermission = Some(Intermission { debounce, offers });
}

/// Guard shared by every menu button
fn check_menu(sim: &Simulation, now_ms: f64) -> Result<&Intermission, ActionError> {
    let menu = match (&sim.intermission, sim.phase) {
        (Some(menu), GamePhase::Upgrade) => menu,
        _ => return Err(ActionError::WrongPhase(sim.phase)),
    };
    if !menu.debounce.ready(now_ms) {
        return Err(ActionError::Debounced);
    }
    Ok(menu)
}

/// Buy the upgrade in offer `slot` (0-based) and start the next wave
pub fn purchase(
    sim: &mut Simulation,
    slot: usize,
    now_ms: f64,
) -> Result<&'static UpgradeDefinition, ActionError> {
    let menu = check_menu(sim, now_ms)?;
    let index = *menu.offers.get(slot).ok_or(ActionError::NoSuchOffer(slot))?;
    let def = UpgradeBook::definition(index).ok_or(ActionError::NoSuchOffer(slot))?;
    let cost = sim
        .upgrades
        .slot(index)
        .map(|s| s.cost)
        .ok_or(ActionError::NoSuchOffer(slot))?;
    if sim.player.gold < cost {
        return Err(ActionError::InsufficientGold {
            cost,
            gold: sim.player.gold,
        });
    }

    sim.player.gold -= cost;
    sim.upgrades.apply(index, &mut sim.player);
    let level = sim.upgrades.slot(index).map(|s| s.level).unwrap_or(0);
    log::debug!("Bought {} (level {}) for {} gold", def.name, level, cost);
    sim.emit(GameEvent::UpgradePurchased {
        name: def.name.to_string(),
        level,
    });
    close_intermission(sim);
    Ok(def)
}

/// Pay the reroll cost for three new offers. Returns the next reroll cost.
pub fn reroll(sim: &mut Simulation, now_ms: f64) -> Result<u32, ActionError> {
    check_menu(sim, now_ms)?;
    let cost = sim.reroll_cost;
    if sim.player.gold < cost {
        return Err(ActionError::InsufficientGold {
            cost,
            gold: sim.player.gold,
        });
    }
    sim.player.gold -= cost;
    let grown = (cost as f64 * sim.tuning.waves.reroll_growth).floor() as u32;
    sim.reroll_cost = grown.max(cost + 1);
    open_intermission(sim, now_ms);
    sim.emit(GameEvent::Rerolled { cost });
    Ok(sim.reroll_cost)
}

/// Leave the shop without buying
pub fn skip(sim: &mut Simulation, now_ms: f64) -> Result<(), ActionError> {
    check_menu(sim, now_ms)?;
    close_intermission(sim);
    Ok(())
}

/// Advance to the next wave and resume play
fn close_intermission(sim: &mut Simulation) {
    sim.intermission = None;
    sim.wave += 1;
    sim.player.kills_in_wave = 0;
    sim.spawned_count = 0;
    sim.player.target_kills = sim.tuning.waves.target_kills(sim.wave);
    sim.reroll_cost += sim.tuning.waves.reroll_wave_bump;
    sim.phase = GamePhase::Playing;
    sim.emit(GameEvent::WaveStarted { wave: sim.wave });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn in_shop(gold: u32) -> Simulation {
        let mut sim = Simulation::with_seed(Tuning::default(), 21);
        sim.phase = GamePhase::Playing;
        sim.player.gold = gold;
        end_wave(&mut sim, 0.0, false);
        sim
    }

    #[test]
    fn test_end_wave_opens_shop_with_three_offers() {
        let sim = in_shop(50);
        assert_eq!(sim.phase, GamePhase::Upgrade);
        let menu = sim.intermission.as_ref().expect("menu open");
        assert_eq!(menu.offers.len(), 3);
    }

    #[test]
    fn test_recovery_heals_fraction_of_missing() {
        let mut sim = Simulation::with_seed(Tuning::default(), 21);
        sim.phase = GamePhase::Playing;
        sim.player.hp = 40.0;
        sim.player.recovery_rate = 0.5;
        end_wave(&mut sim, 0.0, false);
        assert_eq!(sim.player.hp, 70.0);
    }

    #[test]
    fn test_debounce_blocks_early_clicks() {
        let mut sim = in_shop(10_000);
        assert_eq!(purchase(&mut sim, 0, 999.0), Err(ActionError::Debounced));
        assert_eq!(skip(&mut sim, 500.0), Err(ActionError::Debounced));
        assert_eq!(reroll(&mut sim, 10.0), Err(ActionError::Debounced));
        assert_eq!(sim.player.gold, 10_000);
        assert!(purchase(&mut sim, 0, 1000.0).is_ok());
    }

    #[test]
    fn test_purchase_advances_wave() {
        let mut sim = in_shop(10_000);
        let offered = sim.intermission.as_ref().map(|m| m.offers[1]).unwrap_or(0);
        let cost = sim.upgrades.slot(offered).map(|s| s.cost).unwrap_or(0);
        let def = purchase(&mut sim, 1, 2000.0).expect("affordable");
        assert_eq!(def.name, crate::sim::upgrades::CATALOG[offered].name);
        assert_eq!(sim.player.gold, 10_000 - cost);
        assert_eq!(sim.wave, 2);
        assert_eq!(sim.player.target_kills, 18);
        assert_eq!(sim.player.kills_in_wave, 0);
        assert_eq!(sim.spawned_count, 0);
        assert_eq!(sim.reroll_cost, 20);
        assert_eq!(sim.phase, GamePhase::Playing);
        assert!(sim.intermission.is_none());
    }

    #[test]
    fn test_purchase_rejected_without_gold() {
        let mut sim = in_shop(0);
        assert!(matches!(
            purchase(&mut sim, 0, 2000.0),
            Err(ActionError::InsufficientGold { gold: 0, .. })
        ));
        assert_eq!(sim.phase, GamePhase::Upgrade);
        assert_eq!(sim.wave, 1);
    }

    #[test]
    fn test_bad_slot_rejected() {
        let mut sim = in_shop(10_000);
        assert_eq!(purchase(&mut sim, 3, 2000.0), Err(ActionError::NoSuchOffer(3)));
    }

    #[test]
    fn test_reroll_costs_and_redraws() {
        let mut sim = in_shop(100);
        assert_eq!(reroll(&mut sim, 1000.0), Ok(22));
        assert_eq!(sim.player.gold, 85);
        assert_eq!(sim.phase, GamePhase::Upgrade);
        // Redisplay restarts the debounce window
        assert_eq!(reroll(&mut sim, 1500.0), Err(ActionError::Debounced));
        assert_eq!(reroll(&mut sim, 2000.0), Ok(33));
        assert_eq!(sim.player.gold, 63);
    }

    #[test]
    fn test_reroll_rejected_when_broke() {
        let mut sim = in_shop(10);
        assert!(matches!(
            reroll(&mut sim, 1000.0),
            Err(ActionError::InsufficientGold { cost: 15, gold: 10 })
        ));
        assert_eq!(sim.reroll_cost, 15);
    }

    #[test]
    fn test_skip_advances_without_spending() {
        let mut sim = in_shop(75);
        skip(&mut sim, 1000.0).expect("skip");
        assert_eq!(sim.player.gold, 75);
        assert_eq!(sim.wave, 2);
        assert_eq!(sim.phase, GamePhase::Playing);
    }

    #[test]
    fn test_menu_actions_need_upgrade_phase() {
        let mut sim = Simulation::with_seed(Tuning::default(), 1);
        sim.phase = GamePhase::Playing;
        assert_eq!(
            skip(&mut sim, 0.0),
            Err(ActionError::WrongPhase(GamePhase::Playing))
        );
    }

    proptest! {
        #[test]
        fn prop_reroll_cost_strictly_increases(start in 1u32..500, rolls in 1usize..12) {
            let mut sim = in_shop(u32::MAX / 2);
            sim.reroll_cost = start;
            let mut now = 1000.0;
            let mut last = start;
            for _ in 0..rolls {
                let next = reroll(&mut sim, now).expect("rich enough");
                prop_assert!(next > last);
                last = next;
                now += 1000.0;
            }
        }
    }
}
