//! Comma-separated tile tables.

use std::{fs, path::Path};

use prowl_core::{TileCode, TileGrid, Walkability};

use crate::MapError;

/// Reads and parses a comma-separated map file.
pub fn load_csv(
    path: impl AsRef<Path>,
    tile_size: u32,
    walkability: Walkability,
) -> Result<TileGrid, MapError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let grid = parse_csv(&contents, tile_size, walkability)?;
    tracing::info!(
        path = %path.display(),
        columns = grid.columns(),
        rows = grid.rows(),
        "loaded terrain"
    );
    Ok(grid)
}

/// Parses rows of comma-separated non-negative integers into a grid.
///
/// Blank lines are skipped; every other line becomes one row.
pub fn parse_csv(
    contents: &str,
    tile_size: u32,
    walkability: Walkability,
) -> Result<TileGrid, MapError> {
    let mut rows = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let row = line
            .split(',')
            .enumerate()
            .map(|(field, value)| {
                value
                    .trim()
                    .parse::<u32>()
                    .map(TileCode::new)
                    .map_err(|_| MapError::InvalidCode {
                        line: index + 1,
                        field: field + 1,
                        value: value.trim().to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(row);
    }

    Ok(TileGrid::from_rows(rows, tile_size, walkability)?)
}
