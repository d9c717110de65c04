//! Pursuit tracker
//!
//! The pursuer only gains ground while the run is slowed below baseline.
//! Reaching the avatar's z ends the run.

use super::state::{GameOverReason, GameState};
use crate::per_frame;

/// Close distance toward the avatar if the run is slowed
pub fn advance_pursuer(state: &mut GameState, dt: f32) {
    if !(state.pursuer.lifecycle.is_ready() && state.avatar.lifecycle.is_ready()) {
        return;
    }
    if state.run.speed < state.run.baseline_speed {
        state.pursuer.pos.z -= per_frame(state.tuning.pursuer_creep, dt);
    }
}

/// End the run if the pursuer has reached the avatar. Returns true if caught.
pub fn check_catch(state: &mut GameState) -> bool {
    if !(state.pursuer.lifecycle.is_ready() && state.avatar.lifecycle.is_ready()) {
        return false;
    }
    if state.pursuer.pos.z <= state.avatar.pos.z {
        state.end_run(GameOverReason::Caught);
        return true;
    }
    false
}

/// Distance left before the pursuer catches up
pub fn gap(state: &GameState) -> f32 {
    state.pursuer.pos.z - state.avatar.pos.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SpawnLayout;
    use crate::sim::state::GamePhase;
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(Tuning::default(), &SpawnLayout::default());
        state.mark_all_ready();
        state.run.phase = GamePhase::Running;
        state.run.speed = state.run.baseline_speed;
        state
    }

    #[test]
    fn holds_at_baseline_speed() {
        let mut state = running_state();
        let before = state.pursuer.pos.z;
        advance_pursuer(&mut state, 1.0);
        assert_eq!(state.pursuer.pos.z, before);
    }

    #[test]
    fn creeps_when_slowed() {
        let mut state = running_state();
        state.run.speed = state.run.baseline_speed / 2.0;
        let before = state.pursuer.pos.z;
        advance_pursuer(&mut state, 0.5);
        assert!((state.pursuer.pos.z - (before - 6.0)).abs() < 1e-4);
    }

    #[test]
    fn catch_ends_run() {
        let mut state = running_state();
        state.pursuer.pos.z = state.avatar.pos.z;
        assert!(check_catch(&mut state));
        assert_eq!(state.run.game_over, Some(GameOverReason::Caught));
        assert_eq!(state.run.speed, 0.0);
    }

    #[test]
    fn pending_pursuer_never_catches() {
        let mut state = GameState::new(Tuning::default(), &SpawnLayout::default());
        state.pursuer.pos.z = 0.0;
        assert!(!check_catch(&mut state));
        assert!(gap(&state) < 0.0);
    }
}
