//! Headless collaborators
//!
//! Used by the native binary and by tests: a renderer that only tracks
//! positions, scripted and seeded-random input, and an audio sink that
//! records what it was told.

use std::collections::{HashMap, VecDeque};

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::{InputSource, LoadNotifier, Presentation, Renderer};
use crate::audio::{AudioSink, Notification};
use crate::sim::{EntityId, EntityKind, GamePhase, GameState, Intent};

/// Renderer that keeps handles in memory and "loads" each one after a fixed
/// number of frames
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    /// Frames a handle takes to load (0 = ready at the end of the first frame)
    load_frames: u32,
    loading: Vec<(u32, LoadNotifier)>,
    handles: HashMap<EntityId, Vec3>,
    removed: Vec<EntityId>,
    filter_active: bool,
    frames: u64,
}

impl HeadlessRenderer {
    pub fn new(load_frames: u32) -> Self {
        Self {
            load_frames,
            ..Default::default()
        }
    }

    pub fn position(&self, id: EntityId) -> Option<Vec3> {
        self.handles.get(&id).copied()
    }

    pub fn handle_count(&self) -> usize {
        self.handles.len()
    }

    pub fn removed(&self) -> &[EntityId] {
        &self.removed
    }

    pub fn filter_active(&self) -> bool {
        self.filter_active
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for HeadlessRenderer {
    fn spawn(&mut self, id: EntityId, _what: Presentation, pos: Vec3, on_ready: LoadNotifier) {
        self.handles.insert(id, pos);
        self.loading.push((self.load_frames, on_ready));
    }

    fn set_position(&mut self, id: EntityId, pos: Vec3) {
        if let Some(slot) = self.handles.get_mut(&id) {
            *slot = pos;
        }
    }

    fn remove(&mut self, id: EntityId) {
        if self.handles.remove(&id).is_some() {
            self.removed.push(id);
        }
    }

    fn set_filter(&mut self, active: bool) {
        self.filter_active = active;
    }

    fn present(&mut self) {
        self.frames += 1;
        let mut still_loading = Vec::with_capacity(self.loading.len());
        for (frames_left, notifier) in self.loading.drain(..) {
            if frames_left == 0 {
                notifier.notify_ready();
            } else {
                still_loading.push((frames_left - 1, notifier));
            }
        }
        self.loading = still_loading;
    }
}

/// Audio sink that remembers every notification
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub notes: Vec<Notification>,
}

impl RecordingAudio {
    pub fn count(&self, pred: impl Fn(&Notification) -> bool) -> usize {
        self.notes.iter().filter(|n| pred(n)).count()
    }
}

impl AudioSink for RecordingAudio {
    fn notify(&mut self, note: Notification) {
        self.notes.push(note);
    }
}

/// Replays a fixed list of intents, one batch per frame
#[derive(Debug, Default)]
pub struct ScriptedInput {
    frames: VecDeque<Vec<Intent>>,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = Vec<Intent>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// Queue intents for the next frame that has not been polled yet
    pub fn push(&mut self, intents: Vec<Intent>) {
        self.frames.push_back(intents);
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _state: &GameState) -> Vec<Intent> {
        self.frames.pop_front().unwrap_or_default()
    }
}

/// Seeded demo player: starts the run, dodges hazards in its lane, chases
/// pickups, and occasionally jumps
pub struct Autopilot {
    rng: Pcg32,
    /// How far ahead (world units) the autopilot reacts to
    lookahead: f32,
    cooldown: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            lookahead: 25.0,
            cooldown: 0,
        }
    }

    fn lane_is_dangerous(state: &GameState, lane: usize, lookahead: f32) -> bool {
        let x = state.lanes.offset(lane);
        let avatar_z = state.avatar.pos.z;
        state.registry.iter().any(|e| {
            e.is_live()
                && matches!(
                    e.kind,
                    EntityKind::LethalHazard(_) | EntityKind::DestructibleHazard(_)
                )
                && (e.pos.x - x).abs() < 0.5
                && e.pos.z <= avatar_z
                && avatar_z - e.pos.z < lookahead
        })
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, state: &GameState) -> Vec<Intent> {
        match state.run.phase {
            GamePhase::Idle => return vec![Intent::Start],
            GamePhase::GameOver => return Vec::new(),
            GamePhase::Running | GamePhase::Recovering => {}
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return Vec::new();
        }

        let lane = state.avatar.lane;
        if Self::lane_is_dangerous(state, lane, self.lookahead) {
            let left = lane.checked_sub(1);
            let right = (lane + 1 < state.lanes.len()).then_some(lane + 1);
            let safe = [left, right]
                .into_iter()
                .flatten()
                .find(|&l| !Self::lane_is_dangerous(state, l, self.lookahead));
            self.cooldown = 10;
            return match safe {
                Some(l) if l < lane => vec![Intent::MoveLeft],
                Some(_) => vec![Intent::MoveRight],
                None => vec![Intent::Jump],
            };
        }

        // Idle wandering
        if self.rng.random_bool(0.02) {
            self.cooldown = 20;
            return match self.rng.random_range(0..3) {
                0 => vec![Intent::MoveLeft],
                1 => vec![Intent::MoveRight],
                _ => vec![Intent::Jump],
            };
        }
        Vec::new()
    }
}
