#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic first-person movement: free look, walking, jumping and gravity.
//!
//! [`Movement::step`] advances a [`PlayerPose`] by one frame in a fixed order:
//! look, planar movement, jump, gravity, integration and the floor clamp.
//! Wall collision is a separate system and runs after this one.

use glam::{Vec2, Vec3};
use ray_arena_core::{PlayerPose, PITCH_LIMIT};
use serde::Deserialize;

/// Physical and input tuning for the player avatar.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerTuning {
    /// Radius of the collision circle in world units.
    pub radius: f32,
    /// Standing height in world units. Shots originate at half this height.
    pub height: f32,
    /// Walking speed in world units per second.
    pub base_speed: f32,
    /// Multiplier applied to the walking speed while running.
    pub run_multiplier: f32,
    /// Vertical velocity applied by a jump.
    pub jump_impulse: f32,
    /// Downward acceleration in world units per second squared.
    pub gravity: f32,
    /// Radians of rotation per pixel of mouse travel.
    pub mouse_sensitivity: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.8,
            base_speed: 3.0,
            run_multiplier: 2.0,
            jump_impulse: 5.0,
            gravity: 9.8,
            mouse_sensitivity: 0.005,
        }
    }
}

/// Player intent sampled for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementInput {
    /// Mouse travel since the previous frame, in pixels.
    pub look_delta: Vec2,
    /// Move along the view direction.
    pub forward: bool,
    /// Move against the view direction.
    pub backward: bool,
    /// Strafe left.
    pub left: bool,
    /// Strafe right.
    pub right: bool,
    /// Run modifier held.
    pub run: bool,
    /// Jump key went down this frame.
    pub jump_pressed: bool,
}

/// Pure movement system parameterised by [`PlayerTuning`].
#[derive(Clone, Debug, Default)]
pub struct Movement {
    tuning: PlayerTuning,
}

impl Movement {
    /// Creates a movement system with the provided tuning.
    #[must_use]
    pub const fn new(tuning: PlayerTuning) -> Self {
        Self { tuning }
    }

    /// Tuning the system was built with.
    #[must_use]
    pub const fn tuning(&self) -> &PlayerTuning {
        &self.tuning
    }

    /// Advances the pose by `dt` seconds, excluding wall collision.
    #[must_use]
    pub fn step(&self, pose: PlayerPose, input: &MovementInput, dt: f32) -> PlayerPose {
        let mut next = look(pose, input.look_delta, self.tuning.mouse_sensitivity);

        let planar = self.planar_velocity(&next, input);
        next.velocity.x = planar.x;
        next.velocity.z = planar.z;

        if input.jump_pressed && next.is_grounded() {
            next.velocity.y = self.tuning.jump_impulse;
        }
        next.velocity.y -= self.tuning.gravity * dt;

        next.position += next.velocity * dt;
        if next.position.y < 0.0 {
            next.position.y = 0.0;
            next.velocity.y = 0.0;
        }

        next
    }

    fn planar_velocity(&self, pose: &PlayerPose, input: &MovementInput) -> Vec3 {
        let forward = pose.forward();
        let right = pose.right();

        let mut direction = Vec3::ZERO;
        if input.forward {
            direction += forward;
        }
        if input.backward {
            direction -= forward;
        }
        if input.left {
            direction -= right;
        }
        if input.right {
            direction += right;
        }

        let speed = if input.run {
            self.tuning.base_speed * self.tuning.run_multiplier
        } else {
            self.tuning.base_speed
        };
        direction.normalize_or_zero() * speed
    }
}

/// Applies a mouse delta to the view angles and clamps the pitch.
#[must_use]
pub fn look(mut pose: PlayerPose, delta: Vec2, sensitivity: f32) -> PlayerPose {
    pose.yaw -= delta.x * sensitivity;
    pose.pitch = (pose.pitch - delta.y * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    pose
}
