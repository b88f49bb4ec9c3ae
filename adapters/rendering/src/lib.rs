#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Prowl adapters.

use std::{collections::BTreeMap, ops::Range, time::Duration};

use anyhow::Result as AnyResult;
use glam::Vec2;
use prowl_core::{AgentId, Direction, DirectionKeys, TileCode, TileGrid, Viewport};
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);

        Self {
            red: lighten_channel(self.red, amount),
            green: lighten_channel(self.green, amount),
            blue: lighten_channel(self.blue, amount),
            alpha: self.alpha,
        }
    }
}

fn lighten_channel(channel: f32, amount: f32) -> f32 {
    channel + (1.0 - channel) * amount
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Directional keys held during this frame.
    pub keys: DirectionKeys,
}

/// Maps tile codes to flat colors in place of tileset sprites.
#[derive(Clone, Debug, PartialEq)]
pub struct TilePalette {
    entries: BTreeMap<TileCode, Color>,
    walkable: Color,
    blocking: Color,
}

impl TilePalette {
    /// Creates a palette with no per-code entries.
    #[must_use]
    pub fn new(walkable: Color, blocking: Color) -> Self {
        Self {
            entries: BTreeMap::new(),
            walkable,
            blocking,
        }
    }

    /// Returns the palette with `code` drawn in `color`.
    #[must_use]
    pub fn with_entry(mut self, code: TileCode, color: Color) -> Self {
        let _ = self.entries.insert(code, color);
        self
    }

    /// Color used for `code`, falling back to the walkable or blocking tint.
    #[must_use]
    pub fn color_for(&self, code: TileCode, blocking: bool) -> Color {
        match self.entries.get(&code) {
            Some(color) => *color,
            None if blocking => self.blocking,
            None => self.walkable,
        }
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        let grass = Color::from_rgb_u8(96, 160, 72);
        Self::new(grass, Color::from_rgb_u8(36, 72, 40))
            .with_entry(TileCode::new(1), grass)
            .with_entry(TileCode::new(2), grass.lighten(0.25))
            .with_entry(TileCode::new(3), Color::from_rgb_u8(196, 180, 92))
            .with_entry(TileCode::new(4), Color::from_rgb_u8(132, 124, 116))
    }
}

/// Colored tile layer drawn beneath the agents.
#[derive(Clone, Debug, PartialEq)]
pub struct TileLayer {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: f32,
    colors: Vec<Color>,
}

impl TileLayer {
    /// Colors every cell of `grid` using `palette`.
    #[must_use]
    pub fn from_grid(grid: &TileGrid, palette: &TilePalette) -> Self {
        let colors = grid
            .cells()
            .iter()
            .map(|code| palette.color_for(*code, grid.is_blocking(*code)))
            .collect();

        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            tile_size: grid.tile_size() as f32,
            colors,
        }
    }

    /// Color of the tile at the provided coordinate.
    #[must_use]
    pub fn color_at(&self, column: u32, row: u32) -> Option<Color> {
        if column >= self.columns || row >= self.rows {
            return None;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.colors.get(index).copied()
    }

    /// Column and row ranges overlapping the viewport at `camera_offset`.
    #[must_use]
    pub fn visible_range(
        &self,
        camera_offset: Vec2,
        viewport: Viewport,
    ) -> (Range<u32>, Range<u32>) {
        let span = |offset: f32, extent: f32, limit: u32| {
            let first = (offset / self.tile_size).floor().max(0.0);
            let last = ((offset + extent) / self.tile_size).ceil().max(0.0);
            let first = (first as u32).min(limit);
            let last = (last as u32).min(limit);
            first..last
        };

        (
            span(camera_offset.x, viewport.width, self.columns),
            span(camera_offset.y, viewport.height, self.rows),
        )
    }
}

/// Per-agent drawing instructions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentPresentation {
    /// Agent being drawn.
    pub id: AgentId,
    /// Upper-left corner of the agent in world pixels.
    pub position: Vec2,
    /// Facing used to select the sprite row.
    pub direction: Direction,
    /// Frame within the walk cycle.
    pub frame_index: u32,
    /// Whether the frame should be mirrored horizontally.
    pub facing_flip: bool,
    /// Flat color used in place of a sprite.
    pub color: Color,
}

impl AgentPresentation {
    /// Creates agent drawing instructions.
    ///
    /// The player's sheet has no right-facing row, so a right-facing player
    /// reuses the left-facing row mirrored.
    #[must_use]
    pub fn new(
        id: AgentId,
        position: Vec2,
        direction: Direction,
        frame_index: u32,
        color: Color,
    ) -> Self {
        Self {
            id,
            position,
            direction,
            frame_index,
            facing_flip: id == AgentId::Player && direction == Direction::Right,
            color,
        }
    }
}

/// Scene description combining the tile layer, camera and agents.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Background tiles.
    pub tiles: TileLayer,
    /// World position drawn at the upper-left corner of the viewport.
    pub camera_offset: Vec2,
    /// Agents drawn over the tiles in order.
    pub agents: Vec<AgentPresentation>,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(tiles: TileLayer, camera_offset: Vec2, agents: Vec<AgentPresentation>) -> Self {
        Self {
            tiles,
            camera_offset,
            agents,
        }
    }

    /// Converts a world position to viewport coordinates.
    #[must_use]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        world - self.camera_offset
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Size of the window in pixels.
    pub viewport: Viewport,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    pub fn new<T>(
        window_title: T,
        clear_color: Color,
        viewport: Viewport,
        scene: Scene,
    ) -> Result<Self, RenderingError>
    where
        T: Into<String>,
    {
        if !(viewport.width >= 1.0 && viewport.height >= 1.0) {
            return Err(RenderingError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Ok(Self {
            window_title: window_title.into(),
            clear_color,
            viewport,
            scene,
        })
    }
}

/// Time spent outside rendering during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameSimulationBreakdown {
    /// Time spent advancing the simulation.
    pub simulation: Duration,
    /// Time spent copying simulation state into the scene.
    pub scene_population: Duration,
}

/// Rendering backend capable of presenting Prowl scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the adapter, and may mutate the scene before it is
    /// rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, Error, PartialEq)]
pub enum RenderingError {
    /// The window must be at least one pixel in each dimension.
    #[error("viewport must be at least 1x1 pixels (received {width}x{height})")]
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },
}
