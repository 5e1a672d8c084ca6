#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that pushes the player's collision circle out of wall cells.
//!
//! Walls are unit squares on the x/z plane whose origin sits at
//! `(column, row)`. Every overlapping wall contributes a push along the
//! vector from its closest point to the player; the contributions are summed
//! and applied once, so the result does not depend on wall order.

use glam::{Vec2, Vec3};
use ray_arena_core::{CellCoord, GridMap, GROUND_CONTACT_HEIGHT};

/// Divisor substituted when the player center sits exactly on a wall edge.
pub const DISTANCE_EPSILON: f32 = 0.001;

/// Push strength applied while the player is airborne.
pub const AIRBORNE_PUSH_FACTOR: f32 = 0.5;

/// Resolves circle-versus-wall overlaps for a fixed set of wall cells.
#[derive(Clone, Debug, Default)]
pub struct WallCollider {
    walls: Vec<CellCoord>,
}

impl WallCollider {
    /// Creates a collider over the provided wall cells.
    #[must_use]
    pub fn new(walls: Vec<CellCoord>) -> Self {
        Self { walls }
    }

    /// Creates a collider over every wall cell of the grid.
    #[must_use]
    pub fn from_grid(grid: &GridMap) -> Self {
        Self::new(grid.wall_cells())
    }

    /// Wall cells considered by the collider.
    #[must_use]
    pub fn walls(&self) -> &[CellCoord] {
        &self.walls
    }

    /// Returns the position corrected by one resolver application.
    ///
    /// Only x and z are adjusted. The push is halved while the player is above
    /// the floor contact height.
    #[must_use]
    pub fn resolve(&self, position: Vec3, radius: f32) -> Vec3 {
        let factor = if position.y > GROUND_CONTACT_HEIGHT {
            AIRBORNE_PUSH_FACTOR
        } else {
            1.0
        };
        let push = self.push(Vec2::new(position.x, position.z), radius) * factor;
        Vec3::new(position.x + push.x, position.y, position.z + push.y)
    }

    /// Sum of unscaled pushes for a circle centered at `center` in (x, z).
    #[must_use]
    pub fn push(&self, center: Vec2, radius: f32) -> Vec2 {
        self.walls
            .iter()
            .filter_map(|wall| wall_push(*wall, center, radius))
            .fold(Vec2::ZERO, |total, push| total + push)
    }
}

/// Push required to separate a circle from a single wall cell, if they overlap.
#[must_use]
pub fn wall_push(wall: CellCoord, center: Vec2, radius: f32) -> Option<Vec2> {
    let min = Vec2::new(wall.column() as f32, wall.row() as f32);
    let closest = center.clamp(min, min + Vec2::ONE);
    let delta = center - closest;
    let distance = delta.length();
    if distance >= radius {
        return None;
    }

    let penetration = radius - distance;
    let divisor = if distance > 0.0 {
        distance
    } else {
        DISTANCE_EPSILON
    };
    Some(delta / divisor * penetration)
}
