//! Reasons a player or UI action was rejected
//!
//! Rejections are never fatal and never change gameplay state. Callers may
//! surface them (disabled buttons, "recharging" notices) or ignore them.

use thiserror::Error;

use super::state::GamePhase;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionError {
    #[error("action not available during {0:?}")]
    WrongPhase(GamePhase),

    #[error("on cooldown for another {remaining_ms:.0}ms")]
    OnCooldown { remaining_ms: f64 },

    #[error("no movement direction held")]
    NoDirection,

    #[error("upgrade not owned")]
    NotOwned,

    #[error("need {cost} gold, have {gold}")]
    InsufficientGold { cost: u32, gold: u32 },

    #[error("menu just opened, input ignored")]
    Debounced,

    #[error("no upgrade offered in slot {0}")]
    NoSuchOffer(usize),
}
