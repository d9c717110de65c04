//! Platform abstraction layer
//!
//! Collaborators the simulation talks to, injected into a [`Session`]:
//! - [`Renderer`]: presentation handles, removal, the visual filter
//! - [`AudioSink`](crate::audio::AudioSink): fire-and-forget audio/UI notices
//! - [`InputSource`]: abstract intents, already decoded from devices
//!
//! Collaborators only ever read [`GameState`]; all mutation goes through `tick`.

pub mod headless;

use std::sync::mpsc::{self, Receiver, Sender};

use glam::Vec3;

use crate::audio::{AudioSink, Notification};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::layout::SpawnLayout;
use crate::sim::{EntityId, EntityKind, GameEvent, GameState, Intent, TickInput, tick};
use crate::tuning::Tuning;

/// What a presentation handle should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Avatar,
    Pursuer,
    Companion,
    Entity(EntityKind),
}

/// One-shot completion signal for an entity's presentation load
#[derive(Debug)]
pub struct LoadNotifier {
    id: EntityId,
    tx: Sender<EntityId>,
}

impl LoadNotifier {
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Report the resource as loaded. Consumes the notifier.
    pub fn notify_ready(self) {
        // The session may already have been restarted; nothing to do then
        let _ = self.tx.send(self.id);
    }
}

/// Owner of presentation handles
pub trait Renderer {
    /// Create a handle; call `on_ready` once the resource has loaded
    fn spawn(&mut self, id: EntityId, what: Presentation, pos: Vec3, on_ready: LoadNotifier);
    fn set_position(&mut self, id: EntityId, pos: Vec3);
    fn remove(&mut self, id: EntityId);
    fn set_filter(&mut self, active: bool);
    /// Called once at the end of every frame
    fn present(&mut self) {}
}

/// Source of player intents
pub trait InputSource {
    /// Intents that arrived since the last poll
    fn poll(&mut self, state: &GameState) -> Vec<Intent>;
}

/// Fixed-timestep frame driver owning one run and its collaborators
pub struct Session<R, A, I> {
    state: GameState,
    tuning: Tuning,
    layout: SpawnLayout,
    renderer: R,
    audio: A,
    input: I,
    accumulator: f32,
    pending: TickInput,
    ready_tx: Sender<EntityId>,
    ready_rx: Receiver<EntityId>,
}

impl<R: Renderer, A: AudioSink, I: InputSource> Session<R, A, I> {
    pub fn new(tuning: Tuning, layout: SpawnLayout, renderer: R, audio: A, input: I) -> Self {
        let (ready_tx, ready_rx) = mpsc::channel();
        let mut session = Self {
            state: GameState::new(tuning.clone(), &layout),
            tuning,
            layout,
            renderer,
            audio,
            input,
            accumulator: 0.0,
            pending: TickInput::default(),
            ready_tx,
            ready_rx,
        };
        session.register_all();
        session
    }

    /// Throw the current run away and build a fresh one from the same layout
    pub fn restart(&mut self) {
        for id in [EntityId::AVATAR, EntityId::PURSUER, EntityId::COMPANION] {
            self.renderer.remove(id);
        }
        for entity in self.state.registry.iter() {
            self.renderer.remove(entity.id);
        }
        if self.state.run.filter_active {
            self.renderer.set_filter(false);
        }

        // Fresh channel so late notifications from the old run are dropped
        let (ready_tx, ready_rx) = mpsc::channel();
        self.ready_tx = ready_tx;
        self.ready_rx = ready_rx;

        self.state = GameState::new(self.tuning.clone(), &self.layout);
        self.accumulator = 0.0;
        self.pending = TickInput::default();
        self.register_all();
        log::info!("Run restarted");
    }

    fn notifier(&self, id: EntityId) -> LoadNotifier {
        LoadNotifier {
            id,
            tx: self.ready_tx.clone(),
        }
    }

    fn register_all(&mut self) {
        let fixed = [
            (EntityId::AVATAR, Presentation::Avatar, self.state.avatar.pos),
            (EntityId::PURSUER, Presentation::Pursuer, self.state.pursuer.pos),
            (
                EntityId::COMPANION,
                Presentation::Companion,
                self.state.companion.pos,
            ),
        ];
        for (id, what, pos) in fixed {
            let notifier = self.notifier(id);
            self.renderer.spawn(id, what, pos, notifier);
        }

        let entities: Vec<_> = self
            .state
            .registry
            .iter()
            .map(|e| (e.id, e.kind, e.pos))
            .collect();
        for (id, kind, pos) in entities {
            let notifier = self.notifier(id);
            self.renderer.spawn(id, Presentation::Entity(kind), pos, notifier);
        }
    }

    /// Run one display frame of `dt` seconds. Returns the number of substeps taken.
    pub fn frame(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        let intents = self.input.poll(&self.state);
        self.pending.intents.extend(intents);
        self.pending.loaded.extend(self.ready_rx.try_iter());

        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // One-shot inputs go to the first substep only
            let input = std::mem::take(&mut self.pending);
            tick(&mut self.state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        self.publish();
        self.renderer.present();
        substeps
    }

    /// Forward this frame's events and positions to the collaborators
    fn publish(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::EntityRemoved { id } => self.renderer.remove(id),
                GameEvent::FilterChanged { active } => self.renderer.set_filter(active),
                _ => {}
            }
            if let Some(note) = Notification::from_event(&event) {
                self.audio.notify(note);
            }
        }

        let state = &self.state;
        if state.avatar.lifecycle.is_ready() {
            self.renderer.set_position(EntityId::AVATAR, state.avatar.pos);
        }
        if state.pursuer.lifecycle.is_ready() {
            self.renderer.set_position(EntityId::PURSUER, state.pursuer.pos);
        }
        if state.companion.lifecycle.is_ready() {
            self.renderer.set_position(EntityId::COMPANION, state.companion.pos);
        }
        for entity in state.registry.iter().filter(|e| e.is_live()) {
            self.renderer.set_position(entity.id, entity.pos);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn is_over(&self) -> bool {
        self.state.run.is_game_over()
    }
}
