#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that resolves instantaneous shots against enemy hit spheres.

use glam::Vec3;
use ray_arena_core::{Command, EnemyId, EnemyView, PlayerPose, ENEMY_HIT_RADIUS};

/// Half-line used for shot resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Point the ray starts from.
    pub origin: Vec3,
    /// Unit direction of travel.
    pub direction: Vec3,
}

impl Ray {
    /// Builds the shot ray for a player: eye point at half the player height,
    /// pointing along the view direction.
    #[must_use]
    pub fn from_player(pose: &PlayerPose, player_height: f32) -> Self {
        Self {
            origin: pose.position + Vec3::new(0.0, player_height * 0.5, 0.0),
            direction: pose.forward(),
        }
    }

    /// Reports whether the ray passes within `radius` of `center` ahead of the
    /// origin.
    #[must_use]
    pub fn hits_sphere(&self, center: Vec3, radius: f32) -> bool {
        let to_center = center - self.origin;
        let along = to_center.dot(self.direction);
        if along < 0.0 {
            return false;
        }
        let squared_miss = to_center.length_squared() - along * along;
        squared_miss <= radius * radius
    }
}

/// Hitscan system that converts a fired ray into a batched hit command.
#[derive(Debug, Default)]
pub struct Hitscan {
    scratch: Vec<EnemyId>,
}

impl Hitscan {
    /// Creates a new hitscan system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits a single `Command::ResolveHits` listing every enemy whose hit
    /// sphere the ray crosses. Nothing is emitted when the ray misses.
    pub fn handle(&mut self, ray: &Ray, enemies: &EnemyView, out: &mut Vec<Command>) {
        self.scratch.clear();
        self.scratch.extend(
            enemies
                .iter()
                .filter(|enemy| ray.hits_sphere(enemy.position, ENEMY_HIT_RADIUS))
                .map(|enemy| enemy.id),
        );

        if self.scratch.is_empty() {
            return;
        }

        out.push(Command::ResolveHits {
            enemies: self.scratch.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ray_arena_core::{EnemySnapshot, EnemyState};

    fn ray_along_z() -> Ray {
        Ray {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }

    fn enemy(id: u32, position: Vec3) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            position,
            hit_count: 0,
            state: EnemyState::Idle,
            state_timer: 0.0,
        }
    }

    #[test]
    fn sphere_ahead_is_hit() {
        assert!(ray_along_z().hits_sphere(Vec3::new(0.3, 0.0, 5.0), 0.5));
    }

    #[test]
    fn sphere_behind_is_missed() {
        assert!(!ray_along_z().hits_sphere(Vec3::new(0.0, 0.0, -5.0), 0.5));
    }

    #[test]
    fn grazing_sphere_counts_as_hit() {
        assert!(ray_along_z().hits_sphere(Vec3::new(0.5, 0.0, 2.0), 0.5));
        assert!(!ray_along_z().hits_sphere(Vec3::new(0.51, 0.0, 2.0), 0.5));
    }

    #[test]
    fn player_ray_starts_at_half_height() {
        let pose = PlayerPose::at(Vec3::new(1.5, 0.0, 1.5));

        let ray = Ray::from_player(&pose, 1.8);

        assert_eq!(ray.origin, Vec3::new(1.5, 0.9, 1.5));
        assert!((ray.direction - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn every_enemy_on_the_line_is_hit_in_one_batch() {
        let mut system = Hitscan::new();
        let enemies = EnemyView::from_snapshots(vec![
            enemy(0, Vec3::new(0.0, 0.0, 2.0)),
            enemy(1, Vec3::new(0.0, 0.0, 6.0)),
            enemy(2, Vec3::new(4.0, 0.0, 4.0)),
        ]);
        let mut out = Vec::new();

        system.handle(&ray_along_z(), &enemies, &mut out);

        assert_eq!(
            out,
            vec![Command::ResolveHits {
                enemies: vec![EnemyId::new(0), EnemyId::new(1)],
            }]
        );
    }

    #[test]
    fn misses_emit_nothing() {
        let mut system = Hitscan::new();
        let enemies = EnemyView::from_snapshots(vec![enemy(0, Vec3::new(3.0, 0.0, 2.0))]);
        let mut out = Vec::new();

        system.handle(&ray_along_z(), &enemies, &mut out);

        assert!(out.is_empty());
    }
}
