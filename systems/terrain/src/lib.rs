#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Map sources that produce validated tile grids.
//!
//! Two sources are supported: a seeded procedural generator that scatters
//! decorations over open ground, and a loader for comma-separated tables of
//! tile codes exported from a map editor. Both hand back an immutable
//! [`TileGrid`]; malformed input surfaces as a [`MapError`].

mod table;

use std::{collections::BTreeSet, io, path::PathBuf};

use prowl_core::{GridError, TileCode, TileGrid, TilePoint, Walkability};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

pub use self::table::{load_csv, parse_csv};

/// Open ground every agent may cross.
pub const GROUND: TileCode = TileCode::new(1);

/// Tree that blocks movement in generated maps.
pub const TREE: TileCode = TileCode::new(0);

/// Cumulative probability bands used by the generator, checked in order.
///
/// A roll below the first bound yields a tree; the remaining bands scatter
/// walkable decorations. Rolls past the last bound produce [`GROUND`].
const DECORATION_BANDS: [(f64, TileCode); 4] = [
    (0.10, TREE),
    (0.15, TileCode::new(2)),
    (0.20, TileCode::new(3)),
    (0.25, TileCode::new(4)),
];

/// Codes that are walkable in maps exported from the editor tileset.
pub const EDITOR_WALKABLE_CODES: [u32; 7] = [0, 1, 2, 8, 14, 22, 28];

/// Walkability used by generated maps: only trees block.
#[must_use]
pub fn generated_walkability() -> Walkability {
    Walkability::Blocking(BTreeSet::from([TREE]))
}

/// Walkability used by editor maps: only the listed ground codes are walkable.
#[must_use]
pub fn editor_walkability() -> Walkability {
    Walkability::Walkable(EDITOR_WALKABLE_CODES.into_iter().map(TileCode::new).collect())
}

/// Parameters controlling procedural generation.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: u32,
    /// Seed driving the decoration rolls.
    pub seed: u64,
    /// Tiles whose 3x3 neighbourhood is forced to open ground, typically spawns.
    pub clearings: Vec<TilePoint>,
}

/// Errors raised while producing a map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map file could not be read.
    #[error("failed to read map file {path}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A field was not a non-negative integer.
    #[error("line {line}, field {field}: `{value}` is not a tile code")]
    InvalidCode {
        /// One-based line number.
        line: usize,
        /// One-based field index within the line.
        field: usize,
        /// Offending text.
        value: String,
    },
    /// The parsed cells do not form a valid grid.
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Generates a map by rolling each cell against [`DECORATION_BANDS`].
pub fn generate(config: &GeneratorConfig) -> Result<TileGrid, MapError> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let mut rows: Vec<Vec<TileCode>> = (0..config.rows)
        .map(|_| {
            (0..config.columns)
                .map(|_| roll_tile(rng.gen::<f64>()))
                .collect()
        })
        .collect();

    for clearing in &config.clearings {
        clear_around(&mut rows, *clearing);
    }

    let grid = TileGrid::from_rows(rows, config.tile_size, generated_walkability())?;
    tracing::info!(
        columns = grid.columns(),
        rows = grid.rows(),
        seed = config.seed,
        "generated terrain"
    );
    Ok(grid)
}

fn roll_tile(roll: f64) -> TileCode {
    DECORATION_BANDS
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map_or(GROUND, |(_, code)| *code)
}

fn clear_around(rows: &mut [Vec<TileCode>], centre: TilePoint) {
    for dy in -1..=1 {
        for dx in -1..=1 {
            let (Ok(row), Ok(column)) = (
                usize::try_from(centre.row() + dy),
                usize::try_from(centre.column() + dx),
            ) else {
                continue;
            };
            if let Some(cell) = rows.get_mut(row).and_then(|cells| cells.get_mut(column)) {
                *cell = GROUND;
            }
        }
    }
}
