//! Lane Runner - gameplay core of a three-lane endless runner
//!
//! Core modules:
//! - `audio`: Audio/UI notifications derived from simulation events
//! - `sim`: Deterministic simulation (lanes, jump physics, collisions, timers, pursuit)
//! - `tuning`: Data-driven game balance
//! - `layout`: Static spawn layouts consumed at run start
//! - `platform`: Collaborator interfaces (render, audio/UI, input) and the frame driver

pub mod audio;
pub mod layout;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use layout::{LayoutError, SpawnLayout, SpawnSpec};
pub use tuning::{ConfigError, Thresholds, Tuning};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will feed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Per-frame tuning values are authored against a 60 Hz display
    pub const FRAME_RATE_NORMALIZER: f32 = 60.0;

    /// Avatar x must be within this distance of a lane offset to count as "in" it
    pub const LANE_EPSILON: f32 = 0.1;

    /// Score for a coin
    pub const COIN_SCORE: u64 = 10;
    /// Score for the bonus box
    pub const BONUS_BOX_SCORE: u64 = 50;
}

/// Convert a per-normalized-frame quantity into the amount for `dt` seconds
#[inline]
pub fn per_frame(value: f32, dt: f32) -> f32 {
    value * dt * consts::FRAME_RATE_NORMALIZER
}
