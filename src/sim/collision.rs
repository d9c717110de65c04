//! Proximity collision detection and response
//!
//! Collisions here are deliberately coarse: two points "touch" when their
//! per-axis distance is within a hand-tuned threshold on every axis. The
//! thresholds come from [`crate::tuning::HitBoxes`], one set per entity kind.
//!
//! Resolution order is fixed: coins, lethal hazards, destructible hazards,
//! power-ups, bonus box. A lethal hit stops the pass immediately.

use glam::Vec3;

use super::effects::EffectKind;
use super::physics;
use super::state::{
    DestructibleKind, EntityId, EntityKind, GameEvent, GamePhase, GameState, LethalKind,
};
use crate::consts::{BONUS_BOX_SCORE, COIN_SCORE};
use crate::tuning::{HitBoxes, Thresholds};

/// True iff `|a - b|` is within the threshold on all three axes (ties count)
#[inline]
pub fn is_colliding(a: Vec3, b: Vec3, dx: f32, dy: f32, dz: f32) -> bool {
    (a.x - b.x).abs() <= dx && (a.y - b.y).abs() <= dy && (a.z - b.z).abs() <= dz
}

/// [`is_colliding`] with a threshold set
#[inline]
pub fn within(a: Vec3, b: Vec3, t: &Thresholds) -> bool {
    is_colliding(a, b, t.x, t.y, t.z)
}

/// Thresholds used against the avatar for an entity kind
pub fn thresholds_for(kind: EntityKind, boxes: &HitBoxes) -> Thresholds {
    match kind {
        EntityKind::Coin => boxes.coin,
        EntityKind::FlightPowerUp => boxes.flight_pack,
        EntityKind::JumpBoots => boxes.jump_boots,
        EntityKind::BonusBox => boxes.bonus_box,
        EntityKind::LethalHazard(LethalKind::Train) => boxes.train,
        EntityKind::LethalHazard(LethalKind::Barrel) => boxes.barrel,
        EntityKind::DestructibleHazard(DestructibleKind::Barrier) => boxes.barrier,
        EntityKind::DestructibleHazard(DestructibleKind::Cone) => boxes.cone,
    }
}

/// Live entities of the selected kinds currently touching the avatar
fn touching(
    state: &GameState,
    pred: impl Fn(EntityKind) -> bool,
) -> Vec<(EntityId, EntityKind)> {
    let avatar = state.avatar.pos;
    let boxes = &state.tuning.hit_boxes;
    state
        .registry
        .live_matching(pred)
        .filter(|e| within(avatar, e.pos, &thresholds_for(e.kind, boxes)))
        .map(|e| (e.id, e.kind))
        .collect()
}

/// Run every collision check in order. Returns false if the run ended.
pub fn resolve_collisions(state: &mut GameState) -> bool {
    if !state.avatar.lifecycle.is_ready() {
        log::debug!("Avatar not loaded, skipping collisions");
        return true;
    }

    let score_before = state.run.score;

    collect_coins(state);
    if !check_lethal(state) {
        return false;
    }
    check_destructible(state);
    check_power_ups(state);
    check_bonus_box(state);

    if state.run.score != score_before {
        state.events.push(GameEvent::ScoreChanged {
            score: state.run.score,
        });
    }
    true
}

fn collect_coins(state: &mut GameState) {
    for (id, _) in touching(state, |k| k == EntityKind::Coin) {
        if state.registry.remove(id) {
            state.run.score += COIN_SCORE;
            state.events.push(GameEvent::CoinCollected { id });
            state.events.push(GameEvent::EntityRemoved { id });
        }
    }
}

/// Returns false on the first lethal hit. Trains are checked before barrels.
fn check_lethal(state: &mut GameState) -> bool {
    for lethal in [LethalKind::Train, LethalKind::Barrel] {
        let kind = EntityKind::LethalHazard(lethal);
        if !touching(state, |k| k == kind).is_empty() {
            state.end_run(lethal.into());
            return false;
        }
    }
    true
}

fn check_destructible(state: &mut GameState) {
    for (id, kind) in touching(state, |k| matches!(k, EntityKind::DestructibleHazard(_))) {
        let EntityKind::DestructibleHazard(hazard) = kind else {
            continue;
        };
        if !state.registry.remove(id) {
            continue;
        }

        // Repeated hits re-arm the window; speed never drops below half
        let now = state.run.elapsed;
        state.run.speed = state.run.baseline_speed / 2.0;
        state.run.last_collision = Some(now);
        state.run.phase = GamePhase::Recovering;
        let duration = state.tuning.recovery_duration;
        state.timers.start(EffectKind::CollisionRecovery, duration);

        log::debug!("Hit {:?} at t={:.2}, speed now {}", hazard, now, state.run.speed);
        state.events.push(GameEvent::HazardHit { id, kind: hazard });
        state.events.push(GameEvent::EntityRemoved { id });
    }
}

fn check_power_ups(state: &mut GameState) {
    for (id, _) in touching(state, |k| k == EntityKind::FlightPowerUp) {
        if !state.registry.remove(id) {
            continue;
        }
        let duration = state.tuning.flight_duration;
        state.timers.start(EffectKind::Flight, duration);
        physics::start_flight(&mut state.avatar, &state.tuning);
        log::debug!("Flight pack picked up");
        state.events.push(GameEvent::FlightStarted);
        state.events.push(GameEvent::EntityRemoved { id });
    }

    if !state.tuning.boots_enabled {
        return;
    }
    for (id, _) in touching(state, |k| k == EntityKind::JumpBoots) {
        if !state.registry.remove(id) {
            continue;
        }
        let duration = state.tuning.boots_duration;
        state.timers.start(EffectKind::SpeedBoost, duration);
        state.avatar.jump_impulse = state.tuning.boosted_jump_impulse;
        log::debug!("Jump boots picked up");
        state.events.push(GameEvent::BootsStarted);
        state.events.push(GameEvent::EntityRemoved { id });
    }
}

fn check_bonus_box(state: &mut GameState) {
    let hit = touching(state, |k| k == EntityKind::BonusBox).into_iter().next();
    if let Some((id, _)) = hit {
        if state.registry.remove(id) {
            state.run.score += BONUS_BOX_SCORE;
            log::debug!("Bonus box collected");
            state.events.push(GameEvent::BonusCollected { id });
            state.events.push(GameEvent::EntityRemoved { id });
        }
    }
}
