//! Effect timer bank
//!
//! Four independent countdowns. A timer is armed while its remaining time is
//! positive; the tick that takes it to zero or below fires its expiration
//! action once and leaves it disarmed. Re-arming resets to the full duration.

use super::physics;
use super::state::{GameEvent, GamePhase, GameState};

/// Named timed effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    Flight,
    SpeedBoost,
    VisualFilter,
    CollisionRecovery,
}

impl EffectKind {
    /// Expiration order within a tick
    pub const ALL: [EffectKind; 4] = [
        EffectKind::Flight,
        EffectKind::SpeedBoost,
        EffectKind::VisualFilter,
        EffectKind::CollisionRecovery,
    ];
}

/// A single countdown. `None` is the disarmed sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectTimer {
    remaining: Option<f32>,
}

impl EffectTimer {
    pub fn arm(&mut self, duration: f32) {
        self.remaining = Some(duration);
    }

    pub fn disarm(&mut self) {
        self.remaining = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining.is_some_and(|t| t > 0.0)
    }

    /// Seconds left, or `None` when disarmed
    pub fn remaining(&self) -> Option<f32> {
        self.remaining
    }

    /// Count down; returns true on the tick the timer expires
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.remaining else {
            return false;
        };
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(remaining);
            false
        }
    }
}

/// All effect timers of a run
#[derive(Debug, Clone, Default)]
pub struct EffectTimers {
    pub flight: EffectTimer,
    pub speed_boost: EffectTimer,
    pub visual_filter: EffectTimer,
    pub collision_recovery: EffectTimer,
}

impl EffectTimers {
    pub fn get(&self, kind: EffectKind) -> &EffectTimer {
        match kind {
            EffectKind::Flight => &self.flight,
            EffectKind::SpeedBoost => &self.speed_boost,
            EffectKind::VisualFilter => &self.visual_filter,
            EffectKind::CollisionRecovery => &self.collision_recovery,
        }
    }

    pub fn get_mut(&mut self, kind: EffectKind) -> &mut EffectTimer {
        match kind {
            EffectKind::Flight => &mut self.flight,
            EffectKind::SpeedBoost => &mut self.speed_boost,
            EffectKind::VisualFilter => &mut self.visual_filter,
            EffectKind::CollisionRecovery => &mut self.collision_recovery,
        }
    }

    /// (Re)arm `kind` at full duration
    pub fn start(&mut self, kind: EffectKind, duration: f32) {
        self.get_mut(kind).arm(duration);
    }

    pub fn is_armed(&self, kind: EffectKind) -> bool {
        self.get(kind).is_armed()
    }
}

/// Tick every timer and run the expiration actions of those that ran out
pub fn update_timers(state: &mut GameState, dt: f32) {
    for kind in EffectKind::ALL {
        if state.timers.get_mut(kind).tick(dt) {
            expire(state, kind);
        }
    }
}

fn expire(state: &mut GameState, kind: EffectKind) {
    match kind {
        EffectKind::Flight => {
            physics::end_flight(&mut state.avatar, &state.tuning);
            log::debug!("Flight ended");
            state.events.push(GameEvent::FlightEnded);
        }
        EffectKind::SpeedBoost => {
            state.avatar.jump_impulse = state.tuning.jump_impulse;
            log::debug!("Jump boots wore off");
            state.events.push(GameEvent::BootsEnded);
        }
        EffectKind::VisualFilter => {
            state.run.filter_active = false;
            state.events.push(GameEvent::FilterChanged { active: false });
        }
        EffectKind::CollisionRecovery => {
            state.run.speed = state.run.baseline_speed;
            if state.run.phase == GamePhase::Recovering {
                state.run.phase = GamePhase::Running;
            }

            // A newer hit re-arms this same timer, so an expiry always closes
            // the window of the most recent hit
            state.run.last_collision = None;
            if state.pursuer.lifecycle.is_ready() && state.avatar.lifecycle.is_ready() {
                state.pursuer.pos.z = state.avatar.pos.z + state.tuning.chase_distance;
            }
            log::debug!("Recovered, speed back to {}", state.run.speed);
            state.events.push(GameEvent::Recovered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SpawnLayout;
    use crate::tuning::Tuning;

    fn recovering_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), &SpawnLayout::default());
        state.mark_all_ready();
        state.run.phase = GamePhase::Recovering;
        state.run.speed = state.run.baseline_speed / 2.0;
        state.run.last_collision = Some(0.5);
        state.timers.start(EffectKind::CollisionRecovery, 5.0);
        state
    }

    #[test]
    fn timer_fires_exactly_once() {
        let mut timer = EffectTimer::default();
        timer.arm(1.0);
        assert!(timer.is_armed());
        assert!(!timer.tick(0.5));
        assert!(timer.tick(0.5));
        assert!(!timer.is_armed());
        assert_eq!(timer.remaining(), None);
        assert!(!timer.tick(0.5));
    }

    #[test]
    fn disarmed_timer_ignores_ticks() {
        let mut timer = EffectTimer::default();
        assert!(!timer.tick(10.0));
        assert_eq!(timer.remaining(), None);
    }

    #[test]
    fn rearm_resets_to_full_duration() {
        let mut timer = EffectTimer::default();
        timer.arm(5.0);
        timer.tick(4.0);
        timer.arm(5.0);
        assert_eq!(timer.remaining(), Some(5.0));
        assert!(!timer.tick(4.5));
        assert!(timer.tick(0.5));
    }

    #[test]
    fn overshoot_still_fires_once() {
        let mut timer = EffectTimer::default();
        timer.arm(0.25);
        assert!(timer.tick(3.0));
        assert!(!timer.tick(3.0));
    }

    #[test]
    fn recovery_expiry_restores_speed_and_resyncs_pursuer() {
        let mut state = recovering_state();
        state.pursuer.pos.z = 40.0;
        update_timers(&mut state, 4.5);
        assert_eq!(state.run.phase, GamePhase::Recovering);

        // A second hit re-arms the same timer; the first window never expires
        state.timers.start(EffectKind::CollisionRecovery, 5.0);
        update_timers(&mut state, 4.5);
        assert_eq!(state.run.phase, GamePhase::Recovering);

        update_timers(&mut state, 0.5);
        assert_eq!(state.run.phase, GamePhase::Running);
        assert_eq!(state.run.speed, state.run.baseline_speed);
        assert_eq!(state.run.last_collision, None);
        assert_eq!(state.pursuer.pos.z, 60.0);
        assert!(state.drain_events().contains(&GameEvent::Recovered));
    }

    #[test]
    fn boots_expiry_reverts_jump_impulse() {
        let mut state = recovering_state();
        state.avatar.jump_impulse = state.tuning.boosted_jump_impulse;
        state.timers.start(EffectKind::SpeedBoost, 20.0);
        update_timers(&mut state, 20.0);
        assert_eq!(state.avatar.jump_impulse, state.tuning.jump_impulse);
        assert!(state.drain_events().contains(&GameEvent::BootsEnded));
    }

    #[test]
    fn bank_lookup_by_kind() {
        let mut timers = EffectTimers::default();
        timers.start(EffectKind::VisualFilter, 5.0);
        assert!(timers.is_armed(EffectKind::VisualFilter));
        assert!(!timers.is_armed(EffectKind::Flight));
        timers.get_mut(EffectKind::VisualFilter).disarm();
        assert!(!timers.is_armed(EffectKind::VisualFilter));
    }
}
