//! Data-driven game balance
//!
//! Every number a designer might want to tweak lives here. Quantities marked
//! "per frame" are authored against a 60 Hz frame and scaled by
//! [`crate::per_frame`] at use.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while loading or validating a [`Tuning`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("lane table must not be empty")]
    NoLanes,
    #[error("lane {index} has a non-finite offset ({value})")]
    NonFiniteLane { index: usize, value: f32 },
    #[error("lane table must be strictly increasing (lane {index} is {value})")]
    LanesUnordered { index: usize, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

/// Per-axis proximity thresholds for one entity kind
///
/// These are half-extents compared against point distances, not true box sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Thresholds {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Proximity thresholds for every collidable kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HitBoxes {
    pub coin: Thresholds,
    pub train: Thresholds,
    pub barrel: Thresholds,
    pub barrier: Thresholds,
    pub cone: Thresholds,
    pub flight_pack: Thresholds,
    pub jump_boots: Thresholds,
    pub bonus_box: Thresholds,
}

impl Default for HitBoxes {
    fn default() -> Self {
        Self {
            coin: Thresholds::new(0.2, 0.2, 0.2),
            train: Thresholds::new(7.0, 7.2, 7.0),
            barrel: Thresholds::new(2.0, 6.3, 2.0),
            barrier: Thresholds::new(0.1, 1.6, 2.0),
            cone: Thresholds::new(0.5, 1.33, 2.0),
            flight_pack: Thresholds::new(0.1, 4.0, 0.1),
            jump_boots: Thresholds::new(0.1, 0.84, 0.1),
            bonus_box: Thresholds::new(0.1, 0.35, 0.1),
        }
    }
}

/// Game balance for a single run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Lanes ===
    /// Lateral lane offsets, left to right
    pub lanes: Vec<f32>,
    /// Lane the avatar starts in
    pub start_lane: usize,

    // === Avatar ===
    /// Resting altitude; the avatar never sinks below it
    pub ground_level: f32,
    /// Avatar's fixed longitudinal position
    pub avatar_start_z: f32,
    /// Vertical velocity lost per frame while gravity is on
    pub gravity: f32,
    /// Upward velocity set by a jump (per frame)
    pub jump_impulse: f32,
    /// Jump impulse while jump boots are active
    pub boosted_jump_impulse: f32,
    /// Altitude the avatar is pinned to while flying
    pub flight_altitude: f32,

    // === Run ===
    /// Speed of a healthy run (world units per frame)
    pub baseline_speed: f32,
    /// Move obstacles and collectibles toward the avatar every tick
    pub scroll_world: bool,
    /// Whether jump boots in a layout can be picked up
    pub boots_enabled: bool,

    // === Effect durations (seconds) ===
    pub flight_duration: f32,
    pub boots_duration: f32,
    pub filter_duration: f32,
    pub recovery_duration: f32,

    // === Pursuer / companion ===
    /// Pursuer z distance behind the avatar on start and after recovering
    pub chase_distance: f32,
    /// Distance the pursuer closes per frame while the run is slowed
    pub pursuer_creep: f32,
    /// Pursuer's fixed altitude
    pub pursuer_height: f32,
    /// Companion offset from the avatar (y ignored)
    pub companion_offset: Vec3,

    // === Collision ===
    pub hit_boxes: HitBoxes,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lanes: vec![-1.15, 0.0, 1.15],
            start_lane: 1,

            ground_level: 1.0,
            avatar_start_z: 15.0,
            gravity: 0.03,
            jump_impulse: 0.7,
            boosted_jump_impulse: 1.0,
            flight_altitude: 23.0,

            baseline_speed: 0.5,
            scroll_world: true,
            boots_enabled: false,

            flight_duration: 10.0,
            boots_duration: 20.0,
            filter_duration: 5.0,
            recovery_duration: 5.0,

            chase_distance: 45.0,
            pursuer_creep: 0.2,
            pursuer_height: 1.0,
            companion_offset: Vec3::new(0.0, 0.0, 7.0),

            hit_boxes: HitBoxes::default(),
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for tooling / round-tripping presets)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tunings the simulation cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lanes.is_empty() {
            return Err(ConfigError::NoLanes);
        }
        for (index, &value) in self.lanes.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteLane { index, value });
            }
        }
        for (index, pair) in self.lanes.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ConfigError::LanesUnordered {
                    index: index + 1,
                    value: pair[1],
                });
            }
        }

        let positives = [
            ("baseline_speed", self.baseline_speed),
            ("flight_duration", self.flight_duration),
            ("boots_duration", self.boots_duration),
            ("filter_duration", self.filter_duration),
            ("recovery_duration", self.recovery_duration),
            ("jump_impulse", self.jump_impulse),
            ("gravity", self.gravity),
            ("chase_distance", self.chase_distance),
            ("flight_altitude", self.flight_altitude),
        ];
        for (name, value) in positives {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        // Zero creep is allowed: the pursuer then never closes in
        let creep = self.pursuer_creep;
        if !(creep >= 0.0 && creep.is_finite()) {
            return Err(ConfigError::Negative {
                name: "pursuer_creep",
                value: creep,
            });
        }
        Ok(())
    }

    /// Start lane clamped into the lane table
    pub fn clamped_start_lane(&self) -> usize {
        self.start_lane.min(self.lanes.len().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "baseline_speed": 0.8 }"#).unwrap();
        assert_eq!(tuning.baseline_speed, 0.8);
        assert_eq!(tuning.lanes, vec![-1.15, 0.0, 1.15]);
        assert_eq!(tuning.hit_boxes.coin, Thresholds::new(0.2, 0.2, 0.2));
    }

    #[test]
    fn rejects_unordered_lanes() {
        let err = Tuning::from_json(r#"{ "lanes": [0.0, -1.0] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::LanesUnordered { index: 1, .. }));
    }

    #[test]
    fn rejects_empty_lanes() {
        let err = Tuning::from_json(r#"{ "lanes": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::NoLanes));
    }

    #[test]
    fn rejects_zero_duration() {
        let err = Tuning::from_json(r#"{ "recovery_duration": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NonPositive {
                name: "recovery_duration",
                ..
            }
        ));
    }

    #[test]
    fn rejects_negative_creep() {
        let err = Tuning::from_json(r#"{ "pursuer_creep": -0.2 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Negative {
                name: "pursuer_creep",
                ..
            }
        ));
        assert!(Tuning::from_json(r#"{ "pursuer_creep": 0.0 }"#).is_ok());
    }

    #[test]
    fn rejects_bad_physics_values() {
        for (json, field) in [
            (r#"{ "gravity": 0.0 }"#, "gravity"),
            (r#"{ "chase_distance": -45.0 }"#, "chase_distance"),
            (r#"{ "flight_altitude": 0.0 }"#, "flight_altitude"),
        ] {
            match Tuning::from_json(json) {
                Err(ConfigError::NonPositive { name, .. }) => assert_eq!(name, field),
                other => panic!("{json}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_non_finite_lane() {
        let tuning = Tuning {
            lanes: vec![-1.0, f32::INFINITY],
            ..Default::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NonFiniteLane { index: 1, .. })
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ nope"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_round_trip_preserves_values() {
        let mut tuning = Tuning::default();
        tuning.chase_distance = 30.0;
        let json = tuning.to_json().unwrap();
        let back = Tuning::from_json(&json).unwrap();
        assert_eq!(back.chase_distance, 30.0);
    }

    #[test]
    fn start_lane_is_clamped() {
        let tuning = Tuning {
            start_lane: 9,
            ..Default::default()
        };
        assert_eq!(tuning.clamped_start_lane(), 2);
    }
}
