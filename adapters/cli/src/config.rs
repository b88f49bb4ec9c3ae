//! Game configuration read from an optional TOML file.

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use prowl_core::{Position, TilePoint, Viewport, DEFAULT_TILE_SIZE, WINDOW_TITLE};
use prowl_system_animation::AnimationTuning;
use prowl_system_player::{PlayerMotion, DEFAULT_PLAYER_SPEED};
use prowl_system_terrain::EDITOR_WALKABLE_CODES;
use prowl_system_wolf::WolfTuning;
use serde::{Deserialize, Serialize};

/// Complete game configuration; every section falls back to its defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct GameConfig {
    pub(crate) window: WindowSection,
    pub(crate) map: MapSection,
    pub(crate) player: PlayerSection,
    pub(crate) wolf: WolfSection,
    pub(crate) animation: AnimationTuning,
}

impl GameConfig {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub(crate) fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse game config toml contents")
    }

    pub(crate) fn viewport(&self) -> Viewport {
        Viewport::new(self.window.width, self.window.height)
    }

    /// Converts a spawn tile into the pixel position of its upper-left corner.
    pub(crate) fn spawn_position(&self, tile: TilePoint) -> Position {
        let tile_size = self.map.tile_size as f32;
        Position::new(
            tile.column() as f32 * tile_size,
            tile.row() as f32 * tile_size,
        )
    }

    pub(crate) fn player_motion(&self) -> PlayerMotion {
        match self.player.motion {
            MotionMode::Free => PlayerMotion::Free {
                speed: self.player.speed,
            },
            MotionMode::TileStep => PlayerMotion::TileStep {
                pixels_per_tick: (self.map.tile_size / 4).max(1) as f32,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WindowSection {
    pub(crate) width: f32,
    pub(crate) height: f32,
    pub(crate) title: String,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Default for WindowSection {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width,
            height: viewport.height,
            title: WINDOW_TITLE.to_owned(),
            vsync: true,
            show_fps: false,
        }
    }
}

/// Map source selection. A `csv` path wins over procedural generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct MapSection {
    pub(crate) columns: u32,
    pub(crate) rows: u32,
    pub(crate) tile_size: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) csv: Option<PathBuf>,
    pub(crate) walkable_codes: Vec<u32>,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            tile_size: DEFAULT_TILE_SIZE,
            seed: None,
            csv: None,
            walkable_codes: EDITOR_WALKABLE_CODES.to_vec(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum MotionMode {
    #[default]
    Free,
    TileStep,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct PlayerSection {
    pub(crate) speed: f32,
    pub(crate) spawn: [i32; 2],
    pub(crate) motion: MotionMode,
}

impl PlayerSection {
    pub(crate) fn spawn_tile(&self) -> TilePoint {
        TilePoint::new(self.spawn[0], self.spawn[1])
    }
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            speed: DEFAULT_PLAYER_SPEED,
            spawn: [8, 6],
            motion: MotionMode::Free,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct WolfSection {
    #[serde(flatten)]
    pub(crate) tuning: WolfTuning,
    pub(crate) spawn: [i32; 2],
}

impl WolfSection {
    pub(crate) fn spawn_tile(&self) -> TilePoint {
        TilePoint::new(self.spawn[0], self.spawn[1])
    }
}

impl Default for WolfSection {
    fn default() -> Self {
        Self {
            tuning: WolfTuning::default(),
            spawn: [10, 7],
        }
    }
}
