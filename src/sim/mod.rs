//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(dt)`
//! - Stable iteration order (layout order / entity id)
//! - No rendering, audio or platform dependencies

pub mod clock;
pub mod collision;
pub mod effects;
pub mod lanes;
pub mod physics;
pub mod pursuit;
pub mod state;
pub mod tick;

pub use clock::Clock;
pub use collision::{is_colliding, resolve_collisions, thresholds_for, within};
pub use effects::{EffectKind, EffectTimer, EffectTimers, update_timers};
pub use lanes::{LaneStep, LaneTable};
pub use state::{
    Avatar, Companion, DestructibleKind, Entity, EntityId, EntityKind, EntityRegistry, GameEvent,
    GameOverReason, GamePhase, GameState, Lifecycle, LethalKind, Pursuer, RunState,
};
pub use tick::{Intent, TickInput, start_run, tick};
