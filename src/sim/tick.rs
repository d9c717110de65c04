//! Per-frame simulation tick
//!
//! Order within a tick is part of the contract:
//! loads -> start -> clock -> intents -> movement -> pursuer advance ->
//! collisions -> effect timers -> companion -> catch check -> prune.

use super::collision::resolve_collisions;
use super::effects::{EffectKind, update_timers};
use super::lanes::LaneStep;
use super::physics;
use super::pursuit::{advance_pursuer, check_catch};
use super::state::{EntityId, GameEvent, GamePhase, GameState};

/// Abstract player intents (input devices are decoded elsewhere)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Start the run (Idle only)
    Start,
    MoveLeft,
    MoveRight,
    Jump,
    ToggleFilter,
}

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Intents in arrival order
    pub intents: Vec<Intent>,
    /// Entities whose presentation finished loading since the last tick
    pub loaded: Vec<EntityId>,
}

impl TickInput {
    pub fn with_intents(intents: impl IntoIterator<Item = Intent>) -> Self {
        Self {
            intents: intents.into_iter().collect(),
            loaded: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty() && self.loaded.is_empty()
    }
}

/// Idle -> Running. Returns false if the run was not Idle.
pub fn start_run(state: &mut GameState) -> bool {
    if state.run.phase != GamePhase::Idle {
        return false;
    }
    state.run.phase = GamePhase::Running;
    state.run.speed = state.run.baseline_speed;
    state.pursuer.pos.z = state.avatar.pos.z + state.tuning.chase_distance;
    log::info!("Run started at speed {}", state.run.speed);
    state.events.push(GameEvent::RunStarted);
    true
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Frozen until restart
    if state.run.is_game_over() {
        return;
    }

    for &id in &input.loaded {
        if state.mark_ready(id) {
            log::debug!("Entity {:?} ready", id);
        }
    }

    if input.intents.contains(&Intent::Start) {
        start_run(state);
    }
    if !state.run.phase.is_active() {
        return;
    }

    let dt = state.clock.advance(dt);
    state.run.elapsed = state.clock.elapsed();

    for &intent in &input.intents {
        apply_intent(state, intent);
    }

    // Movement
    let flying = state.timers.is_armed(EffectKind::Flight);
    if state.tuning.scroll_world {
        physics::scroll_world(&mut state.registry, state.run.speed, dt);
    }
    physics::advance_vertical(&mut state.avatar, &state.tuning, flying, dt);

    advance_pursuer(state, dt);

    if !resolve_collisions(state) {
        return;
    }

    update_timers(state, dt);

    let offset = state.tuning.companion_offset;
    physics::follow(&mut state.companion, &state.avatar, offset);

    if check_catch(state) {
        return;
    }

    state.registry.prune();
}

fn apply_intent(state: &mut GameState, intent: Intent) {
    match intent {
        Intent::Start => {}
        Intent::MoveLeft => {
            physics::shift_lane(&mut state.avatar, &state.lanes, LaneStep::Left);
        }
        Intent::MoveRight => {
            physics::shift_lane(&mut state.avatar, &state.lanes, LaneStep::Right);
        }
        Intent::Jump => {
            let flying = state.timers.is_armed(EffectKind::Flight);
            physics::jump(&mut state.avatar, &state.tuning, flying);
        }
        Intent::ToggleFilter => toggle_filter(state),
    }
}

/// Flip the visual filter; turning it on arms its timer
fn toggle_filter(state: &mut GameState) {
    state.run.filter_active = !state.run.filter_active;
    if state.run.filter_active {
        let duration = state.tuning.filter_duration;
        state.timers.start(EffectKind::VisualFilter, duration);
    } else {
        state.timers.visual_filter.disarm();
    }
    state.events.push(GameEvent::FilterChanged {
        active: state.run.filter_active,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{SpawnKind, SpawnLayout, SpawnSpec};
    use crate::sim::state::GameOverReason;
    use crate::tuning::Tuning;

    fn still_tuning() -> Tuning {
        Tuning {
            scroll_world: false,
            ..Default::default()
        }
    }

    fn ready_state(spawns: Vec<SpawnSpec>) -> GameState {
        let mut state = GameState::new(still_tuning(), &SpawnLayout::new(spawns));
        state.mark_all_ready();
        state
    }

    fn start() -> TickInput {
        TickInput::with_intents([Intent::Start])
    }

    #[test]
    fn idle_does_not_tick() {
        let mut state = ready_state(Vec::new());
        tick(&mut state, &TickInput::with_intents([Intent::MoveLeft]), 0.5);
        assert_eq!(state.run.phase, GamePhase::Idle);
        assert_eq!(state.clock.elapsed(), 0.0);
        assert_eq!(state.avatar.lane, 1);
    }

    #[test]
    fn start_sets_baseline_and_places_pursuer() {
        let mut state = ready_state(Vec::new());
        state.pursuer.pos.z = 125.0;
        tick(&mut state, &start(), 0.5);
        assert_eq!(state.run.phase, GamePhase::Running);
        assert_eq!(state.run.speed, 0.5);
        assert_eq!(state.pursuer.pos.z, 60.0);
        assert!(state.drain_events().contains(&GameEvent::RunStarted));
    }

    #[test]
    fn start_is_ignored_once_running() {
        let mut state = ready_state(Vec::new());
        tick(&mut state, &start(), 0.5);
        assert!(!start_run(&mut state));
    }

    #[test]
    fn intents_move_the_avatar() {
        let mut state = ready_state(Vec::new());
        tick(&mut state, &start(), 0.5);
        tick(
            &mut state,
            &TickInput::with_intents([Intent::MoveLeft, Intent::MoveLeft]),
            0.5,
        );
        assert_eq!(state.avatar.lane, 0);
        tick(&mut state, &TickInput::with_intents([Intent::Jump]), 1.0 / 60.0);
        assert!(state.avatar.pos.y > 1.0);
    }

    #[test]
    fn loads_arrive_through_tick_input() {
        let mut state = GameState::new(still_tuning(), &SpawnLayout::default());
        let input = TickInput {
            intents: vec![Intent::Start],
            loaded: vec![EntityId::AVATAR],
        };
        tick(&mut state, &input, 0.5);
        assert!(state.avatar.lifecycle.is_ready());
        assert!(!state.pursuer.lifecycle.is_ready());
    }

    #[test]
    fn game_over_freezes_state() {
        let mut state = ready_state(vec![SpawnSpec::new(SpawnKind::Train, 0.0, 2.0, 15.0)]);
        tick(&mut state, &start(), 0.5);
        assert_eq!(state.run.game_over, Some(GameOverReason::HitByTrain));
        assert_eq!(state.run.speed, 0.0);

        let elapsed = state.clock.elapsed();
        let lane = state.avatar.lane;
        for _ in 0..5 {
            tick(&mut state, &TickInput::with_intents([Intent::MoveLeft]), 0.5);
        }
        assert_eq!(state.clock.elapsed(), elapsed);
        assert_eq!(state.avatar.lane, lane);
        assert_eq!(state.run.phase, GamePhase::GameOver);
    }

    #[test]
    fn toggle_filter_arms_and_expires() {
        let mut state = ready_state(Vec::new());
        tick(&mut state, &start(), 0.5);
        tick(&mut state, &TickInput::with_intents([Intent::ToggleFilter]), 0.5);
        assert!(state.run.filter_active);
        // 0.5 already consumed by the toggle tick
        for _ in 0..8 {
            tick(&mut state, &TickInput::default(), 0.5);
        }
        assert!(state.run.filter_active);
        tick(&mut state, &TickInput::default(), 0.5);
        assert!(!state.run.filter_active);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::FilterChanged { active: false })
        );
    }

    #[test]
    fn toggle_filter_off_disarms_timer() {
        let mut state = ready_state(Vec::new());
        tick(&mut state, &start(), 0.5);
        let toggle = TickInput::with_intents([Intent::ToggleFilter]);
        tick(&mut state, &toggle, 0.5);
        tick(&mut state, &toggle, 0.5);
        assert!(!state.run.filter_active);
        assert!(!state.timers.is_armed(EffectKind::VisualFilter));
    }

    #[test]
    fn jump_ignored_while_flying() {
        let mut state = ready_state(vec![SpawnSpec::new(SpawnKind::FlightPack, 0.0, 1.0, 15.0)]);
        tick(&mut state, &start(), 0.5);
        assert_eq!(state.avatar.pos.y, 23.0);
        tick(&mut state, &TickInput::with_intents([Intent::Jump]), 0.5);
        assert_eq!(state.avatar.vertical_velocity, 0.0);
        assert_eq!(state.avatar.pos.y, 23.0);
    }

    #[test]
    fn removed_entities_are_pruned() {
        let mut state = ready_state(vec![SpawnSpec::new(SpawnKind::Coin, 0.0, 1.0, 15.0)]);
        tick(&mut state, &start(), 0.5);
        assert_eq!(state.run.score, 10);
        assert!(state.registry.is_empty());
    }
}
