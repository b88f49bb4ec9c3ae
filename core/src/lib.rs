#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Prowl engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to. Systems consume event streams, query immutable snapshots, and
//! respond exclusively with new command batches.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Title shown by adapters that open a window.
pub const WINDOW_TITLE: &str = "Prowl";

/// Side length of a square tile in pixels used when nothing else is configured.
pub const DEFAULT_TILE_SIZE: u32 = 32;

/// Identifies one of the agents living in the world.
///
/// The set of agents is fixed for the lifetime of the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentId {
    /// Agent steered by the person at the keyboard.
    Player,
    /// Autonomous wolf that idles, patrols and chases the player.
    Wolf,
}

impl AgentId {
    /// Every agent in deterministic update order.
    pub const ALL: [AgentId; 2] = [AgentId::Player, AgentId::Wolf];
}

/// Cardinal directions available to agents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Movement toward decreasing y.
    Up,
    /// Movement toward increasing y.
    Down,
    /// Movement toward decreasing x.
    Left,
    /// Movement toward increasing x.
    Right,
}

impl Direction {
    /// The four cardinal directions, used for uniform random picks.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Builds the delta that travels `distance` pixels along this direction.
    #[must_use]
    pub fn delta(self, distance: f32) -> MotionDelta {
        match self {
            Self::Up => MotionDelta::new(0.0, -distance),
            Self::Down => MotionDelta::new(0.0, distance),
            Self::Left => MotionDelta::new(-distance, 0.0),
            Self::Right => MotionDelta::new(distance, 0.0),
        }
    }

    /// Horizontal direction pointing toward the sign of `dx`.
    ///
    /// Zero maps to [`Direction::Left`].
    #[must_use]
    pub fn horizontal_toward(dx: f32) -> Self {
        if dx > 0.0 {
            Self::Right
        } else {
            Self::Left
        }
    }

    /// Vertical direction pointing toward the sign of `dy`.
    ///
    /// Zero maps to [`Direction::Up`].
    #[must_use]
    pub fn vertical_toward(dy: f32) -> Self {
        if dy > 0.0 {
            Self::Down
        } else {
            Self::Up
        }
    }
}

/// Held state of the four directional keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirectionKeys {
    /// Left arrow is held.
    pub left: bool,
    /// Right arrow is held.
    pub right: bool,
    /// Up arrow is held.
    pub up: bool,
    /// Down arrow is held.
    pub down: bool,
}

impl DirectionKeys {
    /// Collapses the held keys into at most one direction.
    ///
    /// Simultaneous keys resolve by the fixed priority left, right, up, down.
    #[must_use]
    pub const fn intent(self) -> Option<Direction> {
        if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else {
            None
        }
    }
}

/// Continuous location of an agent measured in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    x: f32,
    y: f32,
}

impl Position {
    /// Creates a new position from pixel coordinates.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal pixel coordinate.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical pixel coordinate.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Returns the position displaced by `delta`.
    #[must_use]
    pub fn offset(self, delta: MotionDelta) -> Self {
        Self::new(self.x + delta.dx(), self.y + delta.dy())
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance_to(self, other: Position) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Tile containing this position, found by floor division.
    #[must_use]
    pub fn tile(self, tile_size: u32) -> TilePoint {
        let size = tile_size.max(1) as f32;
        TilePoint::new(
            (self.x / size).floor() as i32,
            (self.y / size).floor() as i32,
        )
    }
}

/// Positional change requested by an agent for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MotionDelta {
    dx: f32,
    dy: f32,
}

impl MotionDelta {
    /// Creates a new delta.
    #[must_use]
    pub const fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    /// Horizontal component in pixels.
    #[must_use]
    pub const fn dx(&self) -> f32 {
        self.dx
    }

    /// Vertical component in pixels.
    #[must_use]
    pub const fn dy(&self) -> f32 {
        self.dy
    }
}

/// Integer identifying the terrain or decoration of a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileCode(u32);

impl TileCode {
    /// Creates a tile code from its numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Tile coordinate pair.
///
/// Signed so that pixels left of or above the map land out of bounds instead of
/// wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePoint {
    column: i32,
    row: i32,
}

impl TilePoint {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Neighbouring tile one step along `direction`.
    #[must_use]
    pub const fn step(self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Self::new(self.column, self.row - 1),
            Direction::Down => Self::new(self.column, self.row + 1),
            Direction::Left => Self::new(self.column - 1, self.row),
            Direction::Right => Self::new(self.column + 1, self.row),
        }
    }
}

/// Predicate deciding which tile codes deny movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Walkability {
    /// The listed codes block; every other code is walkable.
    Blocking(BTreeSet<TileCode>),
    /// Only the listed codes are walkable; every other code blocks.
    Walkable(BTreeSet<TileCode>),
}

impl Walkability {
    /// Reports whether `code` forbids occupancy.
    #[must_use]
    pub fn is_blocking(&self, code: TileCode) -> bool {
        match self {
            Self::Blocking(codes) => codes.contains(&code),
            Self::Walkable(codes) => !codes.contains(&code),
        }
    }
}

/// Reasons a tile grid could not be constructed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    /// The grid has no rows or no columns.
    #[error("tile grid must contain at least one row and one column")]
    Empty,
    /// A row differs in length from the first row.
    #[error("row {row} has {found} columns but the first row has {expected}")]
    Jagged {
        /// Zero-based index of the offending row.
        row: usize,
        /// Width established by the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// Flat cell storage does not match the declared dimensions.
    #[error("expected {expected} cells for the declared dimensions but found {found}")]
    CellCount {
        /// Number of cells implied by the dimensions.
        expected: usize,
        /// Number of cells supplied.
        found: usize,
    },
    /// Tiles must have a positive side length.
    #[error("tile size must be positive")]
    ZeroTileSize,
}

/// Immutable rectangular grid of tile codes plus its walkability predicate.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_size: u32,
    cells: Vec<TileCode>,
    walkability: Walkability,
}

impl TileGrid {
    /// Builds a grid from row-major nested rows, rejecting jagged input.
    pub fn from_rows(
        rows: Vec<Vec<TileCode>>,
        tile_size: u32,
        walkability: Walkability,
    ) -> Result<Self, GridError> {
        let expected = rows.first().map_or(0, Vec::len);
        if expected == 0 {
            return Err(GridError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != expected)
        {
            return Err(GridError::Jagged {
                row,
                expected,
                found,
            });
        }

        let row_count = rows.len();
        let cells = rows.into_iter().flatten().collect();
        Self::from_cells(
            u32::try_from(expected).map_err(|_| GridError::Empty)?,
            u32::try_from(row_count).map_err(|_| GridError::Empty)?,
            cells,
            tile_size,
            walkability,
        )
    }

    /// Builds a grid from flat row-major storage.
    pub fn from_cells(
        columns: u32,
        rows: u32,
        cells: Vec<TileCode>,
        tile_size: u32,
        walkability: Walkability,
    ) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::Empty);
        }
        if tile_size == 0 {
            return Err(GridError::ZeroTileSize);
        }
        let expected = columns as usize * rows as usize;
        if cells.len() != expected {
            return Err(GridError::CellCount {
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_size,
            cells,
            walkability,
        })
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Walkability predicate applied to tile codes.
    #[must_use]
    pub const fn walkability(&self) -> &Walkability {
        &self.walkability
    }

    /// Row-major cell storage.
    #[must_use]
    pub fn cells(&self) -> &[TileCode] {
        &self.cells
    }

    /// Reports whether `code` forbids occupancy.
    #[must_use]
    pub fn is_blocking(&self, code: TileCode) -> bool {
        self.walkability.is_blocking(code)
    }

    /// Returns the code stored at the tile, or `None` when out of bounds.
    #[must_use]
    pub fn tile_at(&self, point: TilePoint) -> Option<TileCode> {
        let column = u32::try_from(point.column()).ok()?;
        let row = u32::try_from(point.row()).ok()?;
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.cells.get(index).copied()
    }

    /// Reports whether an agent may occupy the tile; out of bounds never is.
    #[must_use]
    pub fn is_walkable_tile(&self, point: TilePoint) -> bool {
        self.tile_at(point)
            .is_some_and(|code| !self.walkability.is_blocking(code))
    }

    /// Pixel position of the tile's upper-left corner.
    #[must_use]
    pub fn tile_origin(&self, point: TilePoint) -> Position {
        let size = self.tile_size as f32;
        Position::new(point.column() as f32 * size, point.row() as f32 * size)
    }
}

/// Immutable view of an agent used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentSnapshot {
    /// Which agent the snapshot describes.
    pub id: AgentId,
    /// Upper-left corner of the agent's one-tile bounding box.
    pub position: Position,
    /// Last direction the agent faced.
    pub facing: Direction,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one tick.
    Tick,
    /// Requests that an agent travel along a direction.
    ///
    /// The agent turns toward `direction` whether or not the move succeeds.
    MoveAgent {
        /// Agent attempting to move.
        agent: AgentId,
        /// Direction of travel.
        direction: Direction,
        /// Pixels to travel.
        distance: f32,
    },
    /// Turns an agent without moving it.
    FaceAgent {
        /// Agent to turn.
        agent: AgentId,
        /// New facing.
        direction: Direction,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Index of the tick that just started.
        tick: u64,
    },
    /// Confirms that an agent moved.
    AgentMoved {
        /// Agent that moved.
        agent: AgentId,
        /// Direction travelled.
        direction: Direction,
        /// Position before the move.
        from: Position,
        /// Position after the move.
        to: Position,
    },
    /// Reports that a requested move collided with the grid.
    AgentBlocked {
        /// Agent whose move was rejected.
        agent: AgentId,
        /// Direction that was requested.
        direction: Direction,
    },
    /// Reports that an agent's facing changed.
    AgentTurned {
        /// Agent that turned.
        agent: AgentId,
        /// New facing.
        direction: Direction,
    },
}

/// Size of the visible window area in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport descriptor.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(640.0, 480.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(values: &[u32]) -> Vec<TileCode> {
        values.iter().copied().map(TileCode::new).collect()
    }

    fn blocking_zero() -> Walkability {
        Walkability::Blocking(BTreeSet::from([TileCode::new(0)]))
    }

    #[test]
    fn simultaneous_keys_resolve_by_priority() {
        let all = DirectionKeys {
            left: true,
            right: true,
            up: true,
            down: true,
        };
        assert_eq!(all.intent(), Some(Direction::Left));

        let vertical_and_right = DirectionKeys {
            right: true,
            up: true,
            down: true,
            ..DirectionKeys::default()
        };
        assert_eq!(vertical_and_right.intent(), Some(Direction::Right));

        let vertical = DirectionKeys {
            up: true,
            down: true,
            ..DirectionKeys::default()
        };
        assert_eq!(vertical.intent(), Some(Direction::Up));
        assert_eq!(DirectionKeys::default().intent(), None);
    }

    #[test]
    fn position_tile_uses_floor_division() {
        assert_eq!(Position::new(63.9, 32.0).tile(32), TilePoint::new(1, 1));
        assert_eq!(Position::new(-0.5, 5.0).tile(32), TilePoint::new(-1, 0));
    }

    #[test]
    fn distance_is_euclidean() {
        let origin = Position::new(0.0, 0.0);
        assert!((origin.distance_to(Position::new(3.0, 4.0)) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn jagged_rows_are_rejected() {
        let error = TileGrid::from_rows(
            vec![codes(&[1, 1, 1]), codes(&[1, 1])],
            32,
            blocking_zero(),
        )
        .expect_err("jagged rows must fail");

        assert_eq!(
            error,
            GridError::Jagged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
    }

    #[test]
    fn empty_and_zero_sized_grids_are_rejected() {
        assert_eq!(
            TileGrid::from_rows(Vec::new(), 32, blocking_zero()),
            Err(GridError::Empty)
        );
        assert_eq!(
            TileGrid::from_rows(vec![codes(&[1])], 0, blocking_zero()),
            Err(GridError::ZeroTileSize)
        );
    }

    #[test]
    fn tile_at_reports_out_of_bounds_as_none() {
        let grid = TileGrid::from_rows(vec![codes(&[1, 0]), codes(&[2, 3])], 32, blocking_zero())
            .expect("valid grid");

        assert_eq!(grid.tile_at(TilePoint::new(1, 1)), Some(TileCode::new(3)));
        assert_eq!(grid.tile_at(TilePoint::new(2, 0)), None);
        assert_eq!(grid.tile_at(TilePoint::new(0, -1)), None);
        assert!(!grid.is_walkable_tile(TilePoint::new(-1, 0)));
        assert!(!grid.is_walkable_tile(TilePoint::new(1, 0)));
        assert!(grid.is_walkable_tile(TilePoint::new(0, 1)));
    }

    #[test]
    fn walkable_set_blocks_unlisted_codes() {
        let walkability = Walkability::Walkable(BTreeSet::from([
            TileCode::new(0),
            TileCode::new(28),
        ]));

        assert!(!walkability.is_blocking(TileCode::new(0)));
        assert!(!walkability.is_blocking(TileCode::new(28)));
        assert!(walkability.is_blocking(TileCode::new(3)));
    }
}
