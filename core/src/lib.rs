#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ray Arena preview runtime.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The frame loop submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values. Systems read
//! immutable snapshots such as [`EnemyView`] and [`GridMap`] and respond with
//! new values or command batches.

use std::{error::Error, fmt};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of columns in a freshly created editor grid.
pub const DEFAULT_GRID_COLUMNS: u32 = 20;

/// Number of rows in a freshly created editor grid.
pub const DEFAULT_GRID_ROWS: u32 = 20;

/// Number of hits that removes an enemy from the arena.
pub const LETHAL_HIT_COUNT: u32 = 2;

/// Seconds an enemy stays in [`EnemyState::Shot`] after being hit.
pub const SHOT_STATE_DURATION: f32 = 0.5;

/// Absolute bound applied to the camera pitch, in radians.
pub const PITCH_LIMIT: f32 = 1.4;

/// Height at or below which the player counts as standing on the floor.
pub const GROUND_CONTACT_HEIGHT: f32 = 0.05;

/// Radius of the sphere used when resolving shots against an enemy.
pub const ENEMY_HIT_RADIUS: f32 = 0.5;

/// Describes which half of the preview session is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// Main menu with a free cursor and clickable buttons.
    #[default]
    Menu,
    /// First-person play with a captured cursor.
    Playing,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Requests that the session switch to the provided mode.
    SetMode {
        /// Mode the world should activate.
        mode: SessionMode,
    },
    /// Replaces the player pose with one computed by the movement pipeline.
    PlacePlayer {
        /// Pose after movement, gravity and collision were applied.
        pose: PlayerPose,
    },
    /// Applies one frame's worth of hitscan hits as a single batch.
    ResolveHits {
        /// Enemies whose hit sphere intersected the shot ray.
        enemies: Vec<EnemyId>,
    },
    /// Advances enemy state timers by the provided frame delta.
    Tick {
        /// Seconds elapsed since the previous frame.
        dt: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Seconds of simulated time that elapsed in the tick.
        dt: f32,
    },
    /// Announces that the session entered a new mode.
    ModeChanged {
        /// Mode that became active.
        mode: SessionMode,
    },
    /// Confirms that the player pose was replaced.
    PlayerMoved {
        /// Position held before the command.
        from: Vec3,
        /// Position held after the command.
        to: Vec3,
    },
    /// Reports that an enemy absorbed a hit and survived.
    EnemyShot {
        /// Identifier of the enemy that was hit.
        enemy: EnemyId,
        /// Number of hits absorbed so far.
        hit_count: u32,
    },
    /// Reports that an enemy's shot reaction expired.
    EnemyRecovered {
        /// Identifier of the enemy returning to idle.
        enemy: EnemyId,
    },
    /// Reports that an enemy reached the lethal hit count and was removed.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
    },
    /// Announces that the last enemy was removed.
    ArenaCleared,
}

/// Kind of content painted into a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GridCell {
    /// Walkable floor.
    #[default]
    Ground,
    /// Solid unit cube that blocks the player.
    Wall,
    /// Player start location. Walkable.
    Spawn,
    /// Location of a stationary enemy. Walkable.
    Enemy,
}

impl GridCell {
    /// Integer code used by the map file format.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Ground => 0,
            Self::Wall => 1,
            Self::Spawn => 2,
            Self::Enemy => 3,
        }
    }

    /// Decodes a map file integer into a cell kind.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Ground),
            1 => Some(Self::Wall),
            2 => Some(Self::Spawn),
            3 => Some(Self::Enemy),
            _ => None,
        }
    }

    /// Reports whether the cell blocks player movement.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Wall)
    }
}

impl TryFrom<u8> for GridCell {
    type Error = GridError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(GridError::UnknownCellCode { code })
    }
}

impl From<GridCell> for u8 {
    fn from(cell: GridCell) -> Self {
        cell.code()
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell. Maps to the world x axis.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell. Maps to the world z axis.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space point at the center of the cell's floor.
    #[must_use]
    pub fn floor_center(self) -> Vec3 {
        Vec3::new(self.column as f32 + 0.5, 0.0, self.row as f32 + 0.5)
    }
}

/// Errors raised while building a [`GridMap`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GridError {
    /// The map contained no rows or no columns.
    Empty,
    /// A row length differed from the first row.
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Column count established by the first row.
        expected: usize,
        /// Column count found in the offending row.
        found: usize,
    },
    /// A cell used an integer code outside `0..=3`.
    UnknownCellCode {
        /// Code that failed to decode.
        code: u8,
    },
    /// The grid dimensions do not fit the coordinate type.
    TooLarge,
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "grid must contain at least one cell"),
            Self::RaggedRow {
                row,
                expected,
                found,
            } => write!(
                f,
                "grid row {row} has {found} cells but the first row has {expected}"
            ),
            Self::UnknownCellCode { code } => write!(f, "unknown grid cell code {code}"),
            Self::TooLarge => write!(f, "grid dimensions exceed the supported range"),
        }
    }
}

impl Error for GridError {}

/// Where the player start location came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnSource {
    /// A `Spawn` cell painted in the editor.
    Authored,
    /// No `Spawn` cell existed, so the grid center was used.
    GridCenter,
}

/// Resolved player start location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnPoint {
    /// Cell the player starts in.
    pub cell: CellCoord,
    /// Whether the cell was authored or defaulted.
    pub source: SpawnSource,
}

/// Static, editor-authored board of cell kinds stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    cells: Vec<GridCell>,
}

impl Default for GridMap {
    fn default() -> Self {
        Self::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS)
    }
}

impl GridMap {
    /// Creates a grid of the provided dimensions filled with ground.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![GridCell::Ground; capacity],
        }
    }

    /// Builds a grid from rows of cells, rejecting empty or ragged input.
    pub fn from_rows(rows: Vec<Vec<GridCell>>) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if rows.is_empty() || expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(rows.len() * expected);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(GridError::RaggedRow {
                    row: index,
                    expected,
                    found: row.len(),
                });
            }
            cells.extend_from_slice(row);
        }

        let columns = u32::try_from(expected).map_err(|_| GridError::TooLarge)?;
        let row_count = u32::try_from(rows.len()).map_err(|_| GridError::TooLarge)?;
        Ok(Self {
            columns,
            rows: row_count,
            cells,
        })
    }

    /// Builds a grid from rows of map file integer codes.
    pub fn from_codes(rows: &[Vec<u8>]) -> Result<Self, GridError> {
        let decoded = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|code| GridCell::try_from(*code))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_rows(decoded)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the cell kind at the provided coordinate, if it lies on the grid.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<GridCell> {
        self.index(coord)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Paints a cell the way the editor does.
    ///
    /// Painting a spawn clears every other spawn so that at most one exists.
    /// Returns `false` when the coordinate lies outside the grid.
    pub fn paint(&mut self, coord: CellCoord, kind: GridCell) -> bool {
        let Some(index) = self.index(coord) else {
            return false;
        };

        if kind == GridCell::Spawn {
            for cell in &mut self.cells {
                if *cell == GridCell::Spawn {
                    *cell = GridCell::Ground;
                }
            }
        }

        self.cells[index] = kind;
        true
    }

    /// Iterates over every cell in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, GridCell)> + '_ {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = index as u32;
            (CellCoord::new(index % columns, index / columns), *cell)
        })
    }

    /// Iterates over the coordinates of every cell of the provided kind.
    pub fn cells_of(&self, kind: GridCell) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter()
            .filter(move |(_, cell)| *cell == kind)
            .map(|(coord, _)| coord)
    }

    /// Collects the coordinates of every wall cell.
    #[must_use]
    pub fn wall_cells(&self) -> Vec<CellCoord> {
        self.cells_of(GridCell::Wall).collect()
    }

    /// Cell at the geometric center of the grid.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(self.columns / 2, self.rows / 2)
    }

    /// Resolves the player start location.
    ///
    /// The first `Spawn` cell in row-major order wins; without one the grid
    /// center is used.
    #[must_use]
    pub fn spawn(&self) -> SpawnPoint {
        match self.cells_of(GridCell::Spawn).next() {
            Some(cell) => SpawnPoint {
                cell,
                source: SpawnSource::Authored,
            },
            None => SpawnPoint {
                cell: self.center(),
                source: SpawnSource::GridCenter,
            },
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Position, velocity and view angles of the player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerPose {
    /// Feet position in world units. One grid cell spans one unit.
    pub position: Vec3,
    /// Velocity in world units per second.
    pub velocity: Vec3,
    /// Heading around the vertical axis, in radians.
    pub yaw: f32,
    /// Elevation of the view, in radians, within `±PITCH_LIMIT`.
    pub pitch: f32,
}

impl PlayerPose {
    /// Creates a resting pose looking along +Z from the provided position.
    #[must_use]
    pub const fn at(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Reports whether the player stands at or below the floor contact height.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.position.y <= GROUND_CONTACT_HEIGHT
    }

    /// Unit view direction derived from yaw and pitch.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        Vec3::new(sin_yaw * cos_pitch, sin_pitch, cos_yaw * cos_pitch).normalize_or_zero()
    }

    /// Unit strafe direction, `forward × +Y`.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Reaction state of an enemy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EnemyState {
    /// Standing still, waiting to be shot.
    #[default]
    Idle,
    /// Recently hit; reverts to idle when the state timer expires.
    Shot,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Center of the enemy's hit sphere in world units.
    pub position: Vec3,
    /// Number of hits absorbed so far.
    pub hit_count: u32,
    /// Current reaction state.
    pub state: EnemyState,
    /// Seconds remaining before a shot reaction expires.
    pub state_timer: f32,
}

/// Read-only snapshot describing all enemies still in the arena.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up a single enemy by identifier.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether no enemies remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
