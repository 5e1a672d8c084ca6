#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Ray Arena preview.

mod enemies;

use ray_arena_core::{
    Command, Event, GridMap, PlayerPose, SessionMode, SpawnPoint, SpawnSource, PITCH_LIMIT,
};

use enemies::EnemyRoster;

/// Represents the authoritative state of a single preview session.
#[derive(Debug)]
pub struct World {
    grid: GridMap,
    spawn: SpawnPoint,
    player: PlayerPose,
    enemies: EnemyRoster,
    mode: SessionMode,
    tick_index: u64,
}

impl World {
    /// Creates a world for the provided grid with the player at the spawn.
    ///
    /// Enemies are created for every `Enemy` cell and the session starts in
    /// [`SessionMode::Menu`].
    #[must_use]
    pub fn new(grid: GridMap) -> Self {
        let spawn = grid.spawn();
        if spawn.source == SpawnSource::GridCenter {
            log::warn!(
                "map has no spawn cell; starting at grid center ({}, {})",
                spawn.cell.column(),
                spawn.cell.row()
            );
        }

        let enemies = EnemyRoster::spawn_from(&grid);
        log::debug!("world created with {} enemies", enemies.len());

        Self {
            player: PlayerPose::at(spawn.cell.floor_center()),
            spawn,
            enemies,
            grid,
            mode: SessionMode::Menu,
            tick_index: 0,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetMode { mode } => {
            if world.mode != mode {
                log::info!("session mode {:?} -> {:?}", world.mode, mode);
                world.mode = mode;
                out_events.push(Event::ModeChanged { mode });
            }
        }
        Command::PlacePlayer { mut pose } => {
            pose.position.y = pose.position.y.max(0.0);
            pose.pitch = pose.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
            let from = world.player.position;
            world.player = pose;
            out_events.push(Event::PlayerMoved {
                from,
                to: pose.position,
            });
        }
        Command::ResolveHits { mut enemies } => {
            if enemies.is_empty() || world.enemies.is_empty() {
                return;
            }
            enemies.sort_unstable();
            enemies.dedup();

            let removed = world.enemies.apply_hits(&enemies, out_events);
            if removed > 0 && world.enemies.is_empty() {
                log::info!("arena cleared");
                out_events.push(Event::ArenaCleared);
            }
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.enemies.advance(dt, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use ray_arena_core::{EnemyView, GridMap, PlayerPose, SessionMode, SpawnPoint};

    /// Provides read-only access to the authored grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridMap {
        &world.grid
    }

    /// Resolved player start location.
    #[must_use]
    pub fn spawn(world: &World) -> SpawnPoint {
        world.spawn
    }

    /// Current player pose.
    #[must_use]
    pub fn player(world: &World) -> PlayerPose {
        world.player
    }

    /// Mode the session is currently in.
    #[must_use]
    pub fn mode(world: &World) -> SessionMode {
        world.mode
    }

    /// Captures a read-only view of the enemies still in the arena.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.snapshots())
    }

    /// Number of enemies still in the arena.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Reports whether every enemy has been removed.
    #[must_use]
    pub fn is_cleared(world: &World) -> bool {
        world.enemies.is_empty()
    }

    /// Number of ticks processed since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use ray_arena_core::{CellCoord, EnemyId, GridCell};

    fn grid_from(rows: &[&[u8]]) -> GridMap {
        let rows: Vec<Vec<u8>> = rows.iter().map(|row| row.to_vec()).collect();
        GridMap::from_codes(&rows).expect("valid grid")
    }

    #[test]
    fn new_world_starts_in_menu_at_spawn() {
        let world = World::new(grid_from(&[&[0, 0, 0], &[0, 0, 2]]));

        assert_eq!(query::mode(&world), SessionMode::Menu);
        assert_eq!(query::spawn(&world).cell, CellCoord::new(2, 1));
        let player = query::player(&world);
        assert_eq!(player.position, Vec3::new(2.5, 0.0, 1.5));
        assert_eq!(player.velocity, Vec3::ZERO);
        assert_eq!(player.yaw, 0.0);
        assert_eq!(player.pitch, 0.0);
    }

    #[test]
    fn missing_spawn_defaults_to_center() {
        let world = World::new(GridMap::new(20, 20));

        assert_eq!(query::spawn(&world).source, SpawnSource::GridCenter);
        assert_eq!(query::player(&world).position, Vec3::new(10.5, 0.0, 10.5));
    }

    #[test]
    fn set_mode_emits_event_only_on_change() {
        let mut world = World::new(GridMap::new(3, 3));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::SetMode {
                mode: SessionMode::Menu,
            },
            &mut events,
        );
        assert!(events.is_empty());

        apply(
            &mut world,
            Command::SetMode {
                mode: SessionMode::Playing,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::ModeChanged {
                mode: SessionMode::Playing
            }]
        );
        assert_eq!(query::mode(&world), SessionMode::Playing);
    }

    #[test]
    fn place_player_enforces_floor_and_pitch_bounds() {
        let mut world = World::new(GridMap::new(3, 3));
        let mut events = Vec::new();
        let mut pose = PlayerPose::at(Vec3::new(1.0, -0.5, 1.0));
        pose.pitch = 3.0;

        apply(&mut world, Command::PlacePlayer { pose }, &mut events);

        let player = query::player(&world);
        assert_eq!(player.position.y, 0.0);
        assert_eq!(player.pitch, PITCH_LIMIT);
        assert_eq!(
            events,
            vec![Event::PlayerMoved {
                from: Vec3::new(1.5, 0.0, 1.5),
                to: Vec3::new(1.0, 0.0, 1.0)
            }]
        );
    }

    #[test]
    fn duplicate_hits_in_one_batch_count_once() {
        let mut world = World::new(grid_from(&[&[3, 0], &[0, 2]]));
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ResolveHits {
                enemies: vec![EnemyId::new(0), EnemyId::new(0)],
            },
            &mut events,
        );

        let view = query::enemy_view(&world);
        assert_eq!(view.len(), 1);
        assert_eq!(view.get(EnemyId::new(0)).map(|enemy| enemy.hit_count), Some(1));
    }

    #[test]
    fn removing_last_enemy_clears_arena() {
        let mut world = World::new(grid_from(&[&[3, 2]]));
        let mut events = Vec::new();
        let hit = || Command::ResolveHits {
            enemies: vec![EnemyId::new(0)],
        };

        apply(&mut world, hit(), &mut events);
        assert!(!query::is_cleared(&world));
        events.clear();

        apply(&mut world, hit(), &mut events);
        assert!(query::is_cleared(&world));
        assert_eq!(
            events,
            vec![
                Event::EnemyRemoved {
                    enemy: EnemyId::new(0)
                },
                Event::ArenaCleared
            ]
        );
    }

    #[test]
    fn empty_arena_never_announces_clear() {
        let mut world = World::new(GridMap::new(2, 2));
        let mut events = Vec::new();

        assert!(query::is_cleared(&world));
        apply(
            &mut world,
            Command::ResolveHits {
                enemies: vec![EnemyId::new(0)],
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn tick_advances_clock() {
        let mut world = World::new(GridMap::new(2, 2));
        let mut events = Vec::new();

        apply(&mut world, Command::Tick { dt: 0.016 }, &mut events);

        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(events, vec![Event::TimeAdvanced { dt: 0.016 }]);
    }

    #[test]
    fn painted_enemy_cells_spawn_entities() {
        let mut grid = GridMap::new(5, 5);
        assert!(grid.paint(CellCoord::new(0, 4), GridCell::Enemy));
        assert!(grid.paint(CellCoord::new(4, 0), GridCell::Enemy));

        let world = World::new(grid);

        assert_eq!(query::enemy_count(&world), 2);
    }
}
