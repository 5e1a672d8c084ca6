//! Authoritative enemy state management utilities.

use ray_arena_core::{
    EnemyId, EnemySnapshot, EnemyState, Event, GridCell, GridMap, LETHAL_HIT_COUNT,
    SHOT_STATE_DURATION,
};

use glam::Vec3;

/// Mutable record of a single enemy stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) position: Vec3,
    pub(crate) hit_count: u32,
    pub(crate) state: EnemyState,
    pub(crate) state_timer: f32,
}

impl Enemy {
    fn spawn(id: EnemyId, position: Vec3) -> Self {
        Self {
            id,
            position,
            hit_count: 0,
            state: EnemyState::Idle,
            state_timer: 0.0,
        }
    }

    /// Registers a hit. Returns `true` when the enemy must be removed.
    fn absorb_hit(&mut self) -> bool {
        self.hit_count = self.hit_count.saturating_add(1);
        self.state = EnemyState::Shot;
        self.state_timer = SHOT_STATE_DURATION;
        self.hit_count >= LETHAL_HIT_COUNT
    }

    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: self.position,
            hit_count: self.hit_count,
            state: self.state,
            state_timer: self.state_timer,
        }
    }
}

/// Exclusive owner of every enemy still standing in the arena.
#[derive(Debug, Default)]
pub(crate) struct EnemyRoster {
    enemies: Vec<Enemy>,
}

impl EnemyRoster {
    /// Spawns one enemy per `Enemy` cell in row-major order.
    pub(crate) fn spawn_from(grid: &GridMap) -> Self {
        let enemies = grid
            .cells_of(GridCell::Enemy)
            .zip(0_u32..)
            .map(|(cell, index)| Enemy::spawn(EnemyId::new(index), cell.floor_center()))
            .collect();
        Self { enemies }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.enemies.len()
    }

    /// Applies a batch of hits, then compacts away every enemy that crossed
    /// the lethal threshold. Returns the number of removed enemies.
    pub(crate) fn apply_hits(&mut self, hits: &[EnemyId], out_events: &mut Vec<Event>) -> usize {
        let mut removed = 0;
        for enemy in &mut self.enemies {
            if !hits.contains(&enemy.id) {
                continue;
            }

            if enemy.absorb_hit() {
                removed += 1;
                log::debug!(
                    "enemy {} removed after {} hits",
                    enemy.id.get(),
                    enemy.hit_count
                );
                out_events.push(Event::EnemyRemoved { enemy: enemy.id });
            } else {
                out_events.push(Event::EnemyShot {
                    enemy: enemy.id,
                    hit_count: enemy.hit_count,
                });
            }
        }

        if removed > 0 {
            self.enemies.retain(|enemy| enemy.hit_count < LETHAL_HIT_COUNT);
        }
        removed
    }

    /// Decays shot reactions, returning expired enemies to idle.
    pub(crate) fn advance(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        for enemy in &mut self.enemies {
            if enemy.state != EnemyState::Shot {
                continue;
            }

            enemy.state_timer -= dt;
            if enemy.state_timer <= 0.0 {
                enemy.state = EnemyState::Idle;
                enemy.state_timer = 0.0;
                out_events.push(Event::EnemyRecovered { enemy: enemy.id });
            }
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<EnemySnapshot> {
        self.enemies.iter().map(Enemy::snapshot).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ray_arena_core::CellCoord;

    fn roster_with_enemies(cells: &[(u32, u32)]) -> EnemyRoster {
        let mut grid = GridMap::new(4, 4);
        for (column, row) in cells {
            assert!(grid.paint(CellCoord::new(*column, *row), GridCell::Enemy));
        }
        EnemyRoster::spawn_from(&grid)
    }

    #[test]
    fn enemies_spawn_at_cell_centers_in_row_major_order() {
        let roster = roster_with_enemies(&[(3, 2), (1, 0)]);
        let snapshots = roster.snapshots();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].id, EnemyId::new(0));
        assert_eq!(snapshots[0].position, Vec3::new(1.5, 0.0, 0.5));
        assert_eq!(snapshots[1].position, Vec3::new(3.5, 0.0, 2.5));
        assert!(snapshots
            .iter()
            .all(|enemy| enemy.state == EnemyState::Idle && enemy.hit_count == 0));
    }

    #[test]
    fn first_hit_switches_enemy_to_shot() {
        let mut roster = roster_with_enemies(&[(0, 0)]);
        let mut events = Vec::new();

        let removed = roster.apply_hits(&[EnemyId::new(0)], &mut events);

        assert_eq!(removed, 0);
        assert_eq!(
            events,
            vec![Event::EnemyShot {
                enemy: EnemyId::new(0),
                hit_count: 1
            }]
        );
        let enemy = roster.snapshots()[0];
        assert_eq!(enemy.state, EnemyState::Shot);
        assert_eq!(enemy.state_timer, SHOT_STATE_DURATION);
    }

    #[test]
    fn second_hit_removes_enemy_immediately() {
        let mut roster = roster_with_enemies(&[(0, 0), (2, 2)]);
        let mut events = Vec::new();
        let _ = roster.apply_hits(&[EnemyId::new(0)], &mut events);
        events.clear();

        let removed = roster.apply_hits(&[EnemyId::new(0)], &mut events);

        assert_eq!(removed, 1);
        assert_eq!(
            events,
            vec![Event::EnemyRemoved {
                enemy: EnemyId::new(0)
            }]
        );
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.snapshots()[0].id, EnemyId::new(1));
    }

    #[test]
    fn hits_on_unknown_enemies_are_ignored() {
        let mut roster = roster_with_enemies(&[(0, 0)]);
        let mut events = Vec::new();

        let removed = roster.apply_hits(&[EnemyId::new(42)], &mut events);

        assert_eq!(removed, 0);
        assert!(events.is_empty());
        assert_eq!(roster.snapshots()[0].hit_count, 0);
    }

    #[test]
    fn shot_reaction_expires_back_to_idle() {
        let mut roster = roster_with_enemies(&[(0, 0)]);
        let mut events = Vec::new();
        let _ = roster.apply_hits(&[EnemyId::new(0)], &mut events);
        events.clear();

        roster.advance(0.25, &mut events);
        assert_eq!(roster.snapshots()[0].state, EnemyState::Shot);
        assert!(events.is_empty());

        roster.advance(0.25, &mut events);
        let enemy = roster.snapshots()[0];
        assert_eq!(enemy.state, EnemyState::Idle);
        assert_eq!(enemy.state_timer, 0.0);
        assert_eq!(enemy.hit_count, 1);
        assert_eq!(
            events,
            vec![Event::EnemyRecovered {
                enemy: EnemyId::new(0)
            }]
        );
    }

    #[test]
    fn idle_enemies_ignore_time() {
        let mut roster = roster_with_enemies(&[(1, 1)]);
        let mut events = Vec::new();

        roster.advance(10.0, &mut events);

        assert!(events.is_empty());
        assert_eq!(roster.snapshots()[0].state_timer, 0.0);
    }
}
