//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]. Collaborators only read it
//! between ticks.

use glam::Vec3;

use super::clock::Clock;
use super::effects::EffectTimers;
use super::lanes::LaneTable;
use crate::layout::{SpawnKind, SpawnLayout};
use crate::tuning::Tuning;

/// Stable identifier shared with the render collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    pub const AVATAR: EntityId = EntityId(0);
    pub const PURSUER: EntityId = EntityId(1);
    pub const COMPANION: EntityId = EntityId(2);
    /// First id handed to layout entities
    pub const FIRST_SPAWNED: u32 = 3;
}

/// Whether an entity's presentation resource exists yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// Presentation still loading; physics and collision skip the entity
    #[default]
    Pending,
    Ready,
    /// Collected or destroyed; gone for the rest of the run
    Removed,
}

impl Lifecycle {
    #[inline]
    pub fn is_ready(self) -> bool {
        self == Lifecycle::Ready
    }
}

/// Hazards that end the run on contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LethalKind {
    Train,
    Barrel,
}

/// Hazards that break on contact and slow the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructibleKind {
    Barrier,
    Cone,
}

/// What a registry entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Coin,
    FlightPowerUp,
    JumpBoots,
    BonusBox,
    LethalHazard(LethalKind),
    DestructibleHazard(DestructibleKind),
}

impl From<SpawnKind> for EntityKind {
    fn from(kind: SpawnKind) -> Self {
        match kind {
            SpawnKind::Coin => EntityKind::Coin,
            SpawnKind::FlightPack => EntityKind::FlightPowerUp,
            SpawnKind::JumpBoots => EntityKind::JumpBoots,
            SpawnKind::BonusBox => EntityKind::BonusBox,
            SpawnKind::Train => EntityKind::LethalHazard(LethalKind::Train),
            SpawnKind::Barrel => EntityKind::LethalHazard(LethalKind::Barrel),
            SpawnKind::Barrier => EntityKind::DestructibleHazard(DestructibleKind::Barrier),
            SpawnKind::Cone => EntityKind::DestructibleHazard(DestructibleKind::Cone),
        }
    }
}

/// An obstacle or collectible placed from the layout
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub lifecycle: Lifecycle,
}

impl Entity {
    /// Ready entities are the only ones collision considers
    #[inline]
    pub fn is_live(&self) -> bool {
        self.lifecycle.is_ready()
    }
}

/// The player-controlled runner
#[derive(Debug, Clone)]
pub struct Avatar {
    pub pos: Vec3,
    /// Index into the lane table; `pos.x` always equals that lane's offset
    pub lane: usize,
    /// Vertical velocity in units per normalized frame
    pub vertical_velocity: f32,
    pub gravity_enabled: bool,
    /// Current jump impulse (baseline or boosted)
    pub jump_impulse: f32,
    pub alive: bool,
    pub lifecycle: Lifecycle,
}

impl Avatar {
    pub fn new(lanes: &LaneTable, tuning: &Tuning) -> Self {
        let lane = lanes.clamp(tuning.clamped_start_lane());
        Self {
            pos: Vec3::new(lanes.offset(lane), tuning.ground_level, tuning.avatar_start_z),
            lane,
            vertical_velocity: 0.0,
            gravity_enabled: true,
            jump_impulse: tuning.jump_impulse,
            alive: true,
            lifecycle: Lifecycle::Pending,
        }
    }
}

/// The adversary chasing the avatar; only its z ever changes
#[derive(Debug, Clone)]
pub struct Pursuer {
    pub pos: Vec3,
    pub lifecycle: Lifecycle,
}

/// Follower slaved to the avatar's position
#[derive(Debug, Clone)]
pub struct Companion {
    pub pos: Vec3,
    pub lifecycle: Lifecycle,
}

/// Obstacles and collectibles of the current run, ordered by id
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
    next_id: u32,
}

impl EntityRegistry {
    /// Populate from a layout, preserving layout order
    pub fn from_layout(layout: &SpawnLayout) -> Self {
        let mut registry = Self {
            entities: Vec::with_capacity(layout.len()),
            next_id: EntityId::FIRST_SPAWNED,
        };
        for spec in &layout.spawns {
            registry.spawn(spec.kind.into(), Vec3::new(spec.x, spec.y, spec.z));
        }
        registry
    }

    pub fn spawn(&mut self, kind: EntityKind, pos: Vec3) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            lifecycle: Lifecycle::Pending,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Pending -> Ready. Removed entities stay removed.
    pub fn mark_ready(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.lifecycle == Lifecycle::Pending => {
                entity.lifecycle = Lifecycle::Ready;
                true
            }
            _ => false,
        }
    }

    /// Mark an entity removed; returns false if it was already gone
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.get_mut(id) {
            Some(entity) if entity.lifecycle != Lifecycle::Removed => {
                entity.lifecycle = Lifecycle::Removed;
                true
            }
            _ => false,
        }
    }

    /// Drop removed entities from storage
    pub fn prune(&mut self) {
        self.entities.retain(|e| e.lifecycle != Lifecycle::Removed);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Ready entities matching `pred`, in id order
    pub fn live_matching(
        &self,
        pred: impl Fn(EntityKind) -> bool,
    ) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.is_live() && pred(e.kind))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the start signal; nothing ticks
    Idle,
    /// Running at baseline speed
    Running,
    /// Running at half speed after a destructible hit
    Recovering,
    /// Run ended; ticks are no-ops until a restart
    GameOver,
}

impl GamePhase {
    /// Running or Recovering
    pub fn is_active(self) -> bool {
        matches!(self, GamePhase::Running | GamePhase::Recovering)
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    HitByTrain,
    HitByBarrel,
    Caught,
}

impl GameOverReason {
    /// Text shown to the player
    pub fn message(self) -> &'static str {
        match self {
            GameOverReason::HitByTrain => "GAME OVER! YOU WERE HIT BY A TRAIN!",
            GameOverReason::HitByBarrel => "GAME OVER! YOU WERE HIT BY A BARREL!",
            GameOverReason::Caught => "GAME OVER! YOU HAVE BEEN CAUGHT BY INSPECTOR!",
        }
    }
}

impl From<LethalKind> for GameOverReason {
    fn from(kind: LethalKind) -> Self {
        match kind {
            LethalKind::Train => GameOverReason::HitByTrain,
            LethalKind::Barrel => GameOverReason::HitByBarrel,
        }
    }
}

/// Score, speed and flags of the current run
#[derive(Debug, Clone)]
pub struct RunState {
    pub phase: GamePhase,
    pub score: u64,
    /// Current run speed (0 while Idle or after GameOver)
    pub speed: f32,
    pub baseline_speed: f32,
    /// Simulated seconds since the run started
    pub elapsed: f32,
    /// Run time of the most recent destructible hit
    pub last_collision: Option<f32>,
    pub game_over: Option<GameOverReason>,
    pub filter_active: bool,
}

impl RunState {
    pub fn new(baseline_speed: f32) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            speed: 0.0,
            baseline_speed,
            elapsed: 0.0,
            last_collision: None,
            game_over: None,
            filter_active: false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}

/// Notifications produced during a tick for audio/UI/render collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    RunStarted,
    CoinCollected { id: EntityId },
    BonusCollected { id: EntityId },
    ScoreChanged { score: u64 },
    EntityRemoved { id: EntityId },
    HazardHit { id: EntityId, kind: DestructibleKind },
    FlightStarted,
    FlightEnded,
    BootsStarted,
    BootsEnded,
    Recovered,
    FilterChanged { active: bool },
    GameOver { reason: GameOverReason },
}

/// Complete state of one run
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub lanes: LaneTable,
    pub clock: Clock,
    pub avatar: Avatar,
    pub pursuer: Pursuer,
    pub companion: Companion,
    pub registry: EntityRegistry,
    pub timers: EffectTimers,
    pub run: RunState,
    /// Events from ticks not yet drained by the frame driver
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Build a fresh Idle run from tuning and a layout
    pub fn new(tuning: Tuning, layout: &SpawnLayout) -> Self {
        let lanes = LaneTable::new(tuning.lanes.clone());
        let avatar = Avatar::new(&lanes, &tuning);
        let pursuer = Pursuer {
            pos: Vec3::new(
                0.0,
                tuning.pursuer_height,
                avatar.pos.z + tuning.chase_distance,
            ),
            lifecycle: Lifecycle::Pending,
        };
        let companion = Companion {
            pos: Vec3::new(
                avatar.pos.x + tuning.companion_offset.x,
                0.0,
                avatar.pos.z + tuning.companion_offset.z,
            ),
            lifecycle: Lifecycle::Pending,
        };
        let run = RunState::new(tuning.baseline_speed);

        Self {
            lanes,
            clock: Clock::new(),
            avatar,
            pursuer,
            companion,
            registry: EntityRegistry::from_layout(layout),
            timers: EffectTimers::default(),
            run,
            events: Vec::new(),
            tuning,
        }
    }

    /// Mark any entity (including avatar/pursuer/companion) as loaded
    pub fn mark_ready(&mut self, id: EntityId) -> bool {
        let slot = match id {
            EntityId::AVATAR => &mut self.avatar.lifecycle,
            EntityId::PURSUER => &mut self.pursuer.lifecycle,
            EntityId::COMPANION => &mut self.companion.lifecycle,
            _ => return self.registry.mark_ready(id),
        };
        if *slot == Lifecycle::Pending {
            *slot = Lifecycle::Ready;
            true
        } else {
            false
        }
    }

    /// Mark everything loaded at once (tests and headless drivers)
    pub fn mark_all_ready(&mut self) {
        self.avatar.lifecycle = Lifecycle::Ready;
        self.pursuer.lifecycle = Lifecycle::Ready;
        self.companion.lifecycle = Lifecycle::Ready;
        for entity in self.registry.iter_mut() {
            if entity.lifecycle == Lifecycle::Pending {
                entity.lifecycle = Lifecycle::Ready;
            }
        }
    }

    /// Terminal transition; idempotent
    pub fn end_run(&mut self, reason: GameOverReason) {
        if self.run.is_game_over() {
            return;
        }
        log::info!("{} (score {})", reason.message(), self.run.score);
        self.run.phase = GamePhase::GameOver;
        self.run.game_over = Some(reason);
        self.run.speed = 0.0;
        self.avatar.alive = false;
        self.events.push(GameEvent::GameOver { reason });
    }

    /// Hand pending events to the caller
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SpawnSpec;

    fn layout() -> SpawnLayout {
        SpawnLayout::new(vec![
            SpawnSpec::new(SpawnKind::Coin, 0.0, 1.0, 0.0),
            SpawnSpec::new(SpawnKind::Cone, 1.15, 1.5, -10.0),
        ])
    }

    #[test]
    fn new_run_starts_idle_and_pending() {
        let state = GameState::new(Tuning::default(), &layout());
        assert_eq!(state.run.phase, GamePhase::Idle);
        assert_eq!(state.run.speed, 0.0);
        assert_eq!(state.avatar.lifecycle, Lifecycle::Pending);
        assert_eq!(state.avatar.pos, Vec3::new(0.0, 1.0, 15.0));
        assert_eq!(state.pursuer.pos.z, 60.0);
        assert_eq!(state.registry.len(), 2);
        assert!(state.registry.iter().all(|e| e.lifecycle == Lifecycle::Pending));
    }

    #[test]
    fn registry_ids_follow_layout_order() {
        let state = GameState::new(Tuning::default(), &layout());
        let ids: Vec<_> = state.registry.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![3, 4]);
        assert_eq!(
            state.registry.get(EntityId(4)).map(|e| e.kind),
            Some(EntityKind::DestructibleHazard(DestructibleKind::Cone))
        );
    }

    #[test]
    fn mark_ready_routes_reserved_ids() {
        let mut state = GameState::new(Tuning::default(), &layout());
        assert!(state.mark_ready(EntityId::AVATAR));
        assert!(!state.mark_ready(EntityId::AVATAR));
        assert!(state.mark_ready(EntityId(3)));
        assert!(!state.mark_ready(EntityId(99)));
        assert!(state.avatar.lifecycle.is_ready());
    }

    #[test]
    fn removed_entities_never_come_back() {
        let mut registry = EntityRegistry::from_layout(&layout());
        let id = EntityId(3);
        assert!(registry.mark_ready(id));
        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(!registry.mark_ready(id));
        registry.prune();
        assert!(registry.get(id).is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn end_run_is_idempotent() {
        let mut state = GameState::new(Tuning::default(), &layout());
        state.end_run(GameOverReason::Caught);
        state.end_run(GameOverReason::HitByTrain);
        assert_eq!(state.run.game_over, Some(GameOverReason::Caught));
        assert_eq!(state.drain_events().len(), 1);
        assert!(!state.avatar.alive);
    }
}
