//! Static spawn layouts
//!
//! A layout is an ordered list of `{kind, x, y, z}` descriptors consumed once
//! when a run starts. The simulation never generates or respawns entities.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while loading or validating a [`SpawnLayout`]
#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("layout JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("spawn #{index} ({kind:?}) has a non-finite coordinate")]
    NonFinite { index: usize, kind: SpawnKind },
    #[error("layout contains more than one bonus box (second at spawn #{index})")]
    DuplicateBonusBox { index: usize },
}

/// Kind tag of a layout entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnKind {
    Coin,
    FlightPack,
    JumpBoots,
    BonusBox,
    Train,
    Barrel,
    Barrier,
    Cone,
}

/// One entity to place at run start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSpec {
    pub kind: SpawnKind,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl SpawnSpec {
    pub fn new(kind: SpawnKind, x: f32, y: f32, z: f32) -> Self {
        Self { kind, x, y, z }
    }
}

/// Ordered spawn list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnLayout {
    pub spawns: Vec<SpawnSpec>,
}

impl SpawnLayout {
    pub fn new(spawns: Vec<SpawnSpec>) -> Self {
        Self { spawns }
    }

    /// Parse a JSON array of spawn descriptors and validate it
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: Self = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Coordinates must be finite and the bonus box is a singleton
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen_bonus = false;
        for (index, spec) in self.spawns.iter().enumerate() {
            if !(spec.x.is_finite() && spec.y.is_finite() && spec.z.is_finite()) {
                return Err(LayoutError::NonFinite {
                    index,
                    kind: spec.kind,
                });
            }
            if spec.kind == SpawnKind::BonusBox {
                if seen_bonus {
                    return Err(LayoutError::DuplicateBonusBox { index });
                }
                seen_bonus = true;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.spawns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawns.is_empty()
    }

    /// The stock course: coin runs, two flight packs, a bonus box, and a
    /// gauntlet of cones, barriers, trains and barrels further down the track.
    ///
    /// `lanes` is the lane table; entries that name a lane past its end are
    /// clamped to the last lane.
    pub fn default_course(lanes: &[f32]) -> Self {
        let lane = |index: usize| -> f32 {
            match lanes.len() {
                0 => 0.0,
                n => lanes[index.min(n - 1)],
            }
        };

        let mut spawns = Vec::new();
        let mut push = |kind, lane_index, y, z| {
            spawns.push(SpawnSpec::new(kind, lane(lane_index), y, z));
        };

        // Coins near the start line
        push(SpawnKind::Coin, 1, 1.0, 1.0);
        push(SpawnKind::Coin, 2, 1.0, 1.0);
        push(SpawnKind::Coin, 0, 1.0, 1.0);
        push(SpawnKind::Coin, 0, 1.0, 0.0);

        // Flight packs
        push(SpawnKind::FlightPack, 0, 0.5, -5.0);
        push(SpawnKind::FlightPack, 2, 0.5, -12.0);

        // Coin runs
        for z in (60..=100).step_by(5) {
            push(SpawnKind::Coin, 1, 1.0, -(z as f32));
        }
        for z in (200..=310).step_by(5) {
            push(SpawnKind::Coin, 0, 1.0, -(z as f32));
        }

        push(SpawnKind::BonusBox, 1, 1.0, -160.0);

        // Cones
        for (lane_index, z) in [
            (2, -100.0),
            (1, -130.0),
            (1, -135.0),
            (1, -140.0),
            (2, -146.0),
            (0, -315.0),
            (1, -410.0),
            (2, -420.0),
            (2, -425.0),
        ] {
            push(SpawnKind::Cone, lane_index, 1.5, z);
        }

        // Barriers
        for (lane_index, z) in [
            (1, -200.0),
            (1, -125.0),
            (0, -335.0),
            (0, -385.0),
            (1, -390.0),
            (2, -400.0),
        ] {
            push(SpawnKind::Barrier, lane_index, 1.0, z);
        }

        // Trains
        push(SpawnKind::Train, 0, 2.0, -450.0);
        push(SpawnKind::Train, 1, 2.0, -270.0);
        push(SpawnKind::Train, 1, 2.0, -500.0);

        // Barrels
        push(SpawnKind::Barrel, 0, 0.0, -800.0);
        push(SpawnKind::Barrel, 2, 0.0, -380.0);

        Self { spawns }
    }
}
