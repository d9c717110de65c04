//! Movement and vertical physics
//!
//! A deterministic parabolic jump, a flight override that pins altitude, and
//! discrete lane steps. Everything here is a no-op while the avatar's
//! presentation is still loading.

use glam::Vec3;

use super::lanes::{LaneStep, LaneTable};
use super::state::{Avatar, Companion, EntityRegistry};
use crate::per_frame;
use crate::tuning::Tuning;

/// Integrate gravity (or hold flight altitude) for one tick
pub fn advance_vertical(avatar: &mut Avatar, tuning: &Tuning, flying: bool, dt: f32) {
    if !avatar.lifecycle.is_ready() {
        log::debug!("Avatar not loaded, skipping vertical step");
        return;
    }

    if flying {
        avatar.pos.y = tuning.flight_altitude;
        avatar.vertical_velocity = 0.0;
        return;
    }

    if !avatar.gravity_enabled {
        return;
    }

    avatar.vertical_velocity -= per_frame(tuning.gravity, dt);
    avatar.pos.y += per_frame(avatar.vertical_velocity, dt);

    // Don't go below ground level
    if avatar.pos.y < tuning.ground_level {
        avatar.pos.y = tuning.ground_level;
        avatar.vertical_velocity = 0.0;
    }
}

/// Start a jump if the avatar is grounded and not flying. Returns whether it jumped.
pub fn jump(avatar: &mut Avatar, tuning: &Tuning, flying: bool) -> bool {
    if !avatar.lifecycle.is_ready() {
        log::debug!("Avatar not loaded, ignoring jump");
        return false;
    }
    if flying || avatar.pos.y > tuning.ground_level {
        return false;
    }
    avatar.vertical_velocity = avatar.jump_impulse;
    true
}

/// Step one lane left or right. Returns whether the lane changed.
pub fn shift_lane(avatar: &mut Avatar, lanes: &LaneTable, step: LaneStep) -> bool {
    if !avatar.lifecycle.is_ready() {
        log::debug!("Avatar not loaded, ignoring lane change");
        return false;
    }

    // Resolve the lane from position; fall back to the stored index
    let current = lanes.index_of(avatar.pos.x).unwrap_or(avatar.lane);
    let next = lanes.step(current, step);
    avatar.lane = next;
    avatar.pos.x = lanes.offset(next);
    next != current
}

/// Lift the avatar to flight altitude and switch gravity off
pub fn start_flight(avatar: &mut Avatar, tuning: &Tuning) {
    avatar.pos.y = tuning.flight_altitude;
    avatar.vertical_velocity = 0.0;
    avatar.gravity_enabled = false;
}

/// Snap back to the ground and switch gravity on
pub fn end_flight(avatar: &mut Avatar, tuning: &Tuning) {
    avatar.pos.y = tuning.ground_level;
    avatar.vertical_velocity = 0.0;
    avatar.gravity_enabled = true;
}

/// Move every obstacle and collectible toward the avatar by the run speed
pub fn scroll_world(registry: &mut EntityRegistry, speed: f32, dt: f32) {
    let distance = per_frame(speed, dt);
    if distance == 0.0 {
        return;
    }
    for entity in registry.iter_mut() {
        entity.pos.z += distance;
    }
}

/// Keep the companion at its fixed offset from the avatar
pub fn follow(companion: &mut Companion, avatar: &Avatar, offset: Vec3) {
    if !(companion.lifecycle.is_ready() && avatar.lifecycle.is_ready()) {
        return;
    }
    companion.pos.x = avatar.pos.x + offset.x;
    companion.pos.z = avatar.pos.z + offset.z;
}
