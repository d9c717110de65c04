//! Audio/UI notifications
//!
//! The simulation never plays sounds or touches the HUD. After each frame the
//! driver turns [`GameEvent`]s into fire-and-forget [`Notification`]s for an
//! [`AudioSink`].

use crate::sim::{GameEvent, GameOverReason};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Coin picked up
    CoinPickup,
    /// Bonus box opened
    BonusPickup,
    /// Flight pack or jump boots picked up
    PowerUp,
    /// Ran through a barrier or cone
    HazardHit,
    /// Run ended
    GameOver,
}

/// What the audio/UI collaborator hears about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Notification {
    CoinCollected,
    BonusCollected,
    PowerUp,
    HazardHit,
    ScoreChanged(u64),
    FilterChanged(bool),
    GameOver(GameOverReason),
}

impl Notification {
    /// Notification for an event, if the audio/UI side cares about it
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        match *event {
            GameEvent::CoinCollected { .. } => Some(Notification::CoinCollected),
            GameEvent::BonusCollected { .. } => Some(Notification::BonusCollected),
            GameEvent::FlightStarted | GameEvent::BootsStarted => Some(Notification::PowerUp),
            GameEvent::HazardHit { .. } => Some(Notification::HazardHit),
            GameEvent::ScoreChanged { score } => Some(Notification::ScoreChanged(score)),
            GameEvent::FilterChanged { active } => Some(Notification::FilterChanged(active)),
            GameEvent::GameOver { reason } => Some(Notification::GameOver(reason)),
            GameEvent::RunStarted
            | GameEvent::EntityRemoved { .. }
            | GameEvent::FlightEnded
            | GameEvent::BootsEnded
            | GameEvent::Recovered => None,
        }
    }

    /// One-shot cue to play, if any
    pub fn sound(&self) -> Option<SoundEffect> {
        match self {
            Notification::CoinCollected => Some(SoundEffect::CoinPickup),
            Notification::BonusCollected => Some(SoundEffect::BonusPickup),
            Notification::PowerUp => Some(SoundEffect::PowerUp),
            Notification::HazardHit => Some(SoundEffect::HazardHit),
            Notification::GameOver(_) => Some(SoundEffect::GameOver),
            Notification::ScoreChanged(_) | Notification::FilterChanged(_) => None,
        }
    }
}

/// Receiver of audio/UI notifications
pub trait AudioSink {
    fn notify(&mut self, note: Notification);
}

/// Headless audio manager: tracks the HUD text and logs cues instead of playing them
pub struct AudioManager {
    score_text: String,
    game_over_text: Option<&'static str>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            score_text: "Score: 0".to_string(),
            game_over_text: None,
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        log::debug!("cue {:?}", effect);
    }

    /// HUD score line
    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    /// Game-over banner, once the run has ended
    pub fn game_over_text(&self) -> Option<&'static str> {
        self.game_over_text
    }
}

impl AudioSink for AudioManager {
    fn notify(&mut self, note: Notification) {
        if let Some(effect) = note.sound() {
            self.play(effect);
        }
        match note {
            Notification::ScoreChanged(score) => {
                self.score_text = format!("Score: {}", score);
            }
            Notification::GameOver(reason) => {
                self.game_over_text = Some(reason.message());
                log::info!("{}", reason.message());
            }
            Notification::FilterChanged(active) => {
                log::debug!("visual filter {}", if active { "on" } else { "off" });
            }
            _ => {}
        }
    }
}
