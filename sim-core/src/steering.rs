//! Steering-behaviour primitives shared by every force phase.

use glam::Vec2;

/// Velocity a node wants: `direction` rescaled to `max_speed`.
///
/// A zero (or non-finite) direction yields `Vec2::ZERO`.
#[inline]
pub fn desired_velocity(direction: Vec2, max_speed: f32) -> Vec2 {
    direction.normalize_or_zero() * max_speed
}

/// Force needed to turn `velocity` toward `direction` at `max_speed`,
/// limited to `max_force`.
///
/// Returns `Vec2::ZERO` when `direction` is zero: a node with nowhere to go
/// gets no force at all rather than a braking one.
#[inline]
pub fn steer(direction: Vec2, velocity: Vec2, max_speed: f32, max_force: f32) -> Vec2 {
    let desired = desired_velocity(direction, max_speed);
    if desired == Vec2::ZERO {
        return Vec2::ZERO;
    }
    (desired - velocity).clamp_length_max(max_force)
}
