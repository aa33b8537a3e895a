//! Deep Clean - a wave-based arena survival shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, spawning, abilities, collisions, waves)
//! - `tuning`: Data-driven game balance
//! - `platform`: Host glue (session loop, autopilot input)
//! - `persistence`: Score storage backends
//! - `ui`: Read-only views for HUD and upgrade overlay

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal display refresh period (60 Hz). Movement is frame-locked.
    pub const FRAME_MS: f64 = 1000.0 / 60.0;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Wall-clock period of the spawn timer
    pub const SPAWN_INTERVAL_MS: f64 = 1000.0;

    /// Number of upgrade cards shown per intermission
    pub const OFFER_COUNT: usize = 3;
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Clamp a circle's center so the whole circle stays inside a `width` x `height` box
#[inline]
pub fn clamp_inside(pos: Vec2, radius: f32, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(radius, (width - radius).max(radius)),
        pos.y.clamp(radius, (height - radius).max(radius)),
    )
}
