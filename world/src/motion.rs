//! Bounding-box collision against the tile grid.

use prowl_core::{MotionDelta, Position, TileGrid, TilePoint};

/// Result of resolving a requested delta against the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveOutcome {
    /// Position after resolution; unchanged when the move was rejected.
    pub position: Position,
    /// Whether the agent actually moved.
    pub moved: bool,
}

/// Resolves `delta` from `position` as a single rectangular probe.
///
/// The agent's bounding box is one tile wide and tall. The box is placed at the
/// destination and its four corners are sampled, far edges inset by one pixel
/// so a box flush against a tile boundary does not touch the next tile. The
/// move is rejected outright when any corner lands on a blocking tile or
/// outside the grid; there is no sliding or partial penetration.
#[must_use]
pub fn try_move(grid: &TileGrid, position: Position, delta: MotionDelta) -> MoveOutcome {
    let destination = position.offset(delta);
    if destination_is_clear(grid, destination) {
        MoveOutcome {
            position: destination,
            moved: true,
        }
    } else {
        MoveOutcome {
            position,
            moved: false,
        }
    }
}

/// Reports whether a one-tile box with its upper-left corner at `origin` fits.
#[must_use]
pub fn destination_is_clear(grid: &TileGrid, origin: Position) -> bool {
    box_corners(origin, grid.tile_size())
        .into_iter()
        .all(|corner| grid.is_walkable_tile(corner))
}

/// Tiles under the four corners of the one-tile box anchored at `origin`.
#[must_use]
pub fn box_corners(origin: Position, tile_size: u32) -> [TilePoint; 4] {
    let far = tile_size.max(1) as f32 - 1.0;
    let left = origin.x();
    let top = origin.y();
    [
        Position::new(left, top).tile(tile_size),
        Position::new(left + far, top).tile(tile_size),
        Position::new(left, top + far).tile(tile_size),
        Position::new(left + far, top + far).tile(tile_size),
    ]
}
