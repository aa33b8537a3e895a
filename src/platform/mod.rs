//! Platform layer
//!
//! Glue between the simulation and its host:
//! - `Session`: spawn clock, event dispatch to audio and score storage
//! - `Autopilot`: demo/idle input generator

pub mod autopilot;
pub mod session;

pub use autopilot::Autopilot;
pub use session::Session;

/// Wall-clock milliseconds since the Unix epoch (0 if the clock is before it)
pub fn unix_time_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}
