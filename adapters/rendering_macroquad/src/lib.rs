#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Prowl.
//!
//! Opens a fixed-size window matching the presentation viewport, polls the
//! arrow keys each frame and hands them to the simulation callback. Prowl has
//! no sound, so macroquad is built without its `audio` feature.
//!
//! Tiles and agents are drawn as flat rectangles. Each agent carries a small
//! marker on the edge it faces, nudged by the walk-cycle frame so movement
//! reads at a glance.

use std::time::{Duration, Instant};

use anyhow::Result;
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use prowl_core::{Direction, DirectionKeys};
use prowl_rendering::{
    AgentPresentation, FrameInput, FrameSimulationBreakdown, Presentation, RenderingBackend,
    Scene,
};

/// Fraction of the tile covered by the facing marker.
const MARKER_FRACTION: f32 = 0.25;

/// Snapshot of the keyboard observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardState {
    /// `Q` or `Escape` to quit the game loop.
    quit_requested: bool,
    /// Arrow keys currently held.
    keys: DirectionKeys,
}

impl KeyboardState {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            keys: DirectionKeys {
                left: is_key_down(KeyCode::Left),
                right: is_key_down(KeyCode::Right),
                up: is_key_down(KeyCode::Up),
                down: is_key_down(KeyCode::Down),
            },
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Interval between frame timing reports.
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Wall-clock cost of one rendered frame.
#[derive(Clone, Copy, Debug, Default)]
struct FrameCost {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

/// Summary of the frames rendered over one report interval.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FrameReport {
    fps: f32,
    slowest_frame: Duration,
    avg_simulation: Duration,
    avg_render: Duration,
}

/// Folds frame costs into a report once per interval.
#[derive(Debug, Default)]
struct FrameTimings {
    frames: u32,
    elapsed: Duration,
    slowest_frame: Duration,
    simulation: Duration,
    render: Duration,
}

impl FrameTimings {
    fn record(&mut self, cost: FrameCost) -> Option<FrameReport> {
        self.frames = self.frames.saturating_add(1);
        self.elapsed += cost.frame;
        self.slowest_frame = self.slowest_frame.max(cost.frame);
        self.simulation += cost.simulation;
        self.render += cost.render;

        if self.elapsed < REPORT_INTERVAL {
            return None;
        }

        let report = FrameReport {
            fps: self.frames as f32 / self.elapsed.as_secs_f32(),
            slowest_frame: self.slowest_frame,
            avg_simulation: self.simulation / self.frames,
            avg_render: self.render / self.frames,
        };
        *self = Self::default();
        Some(report)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameSimulationBreakdown + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            viewport,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: viewport.width.round() as i32,
            window_height: viewport.height.round() as i32,
            window_resizable: false,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut timings = FrameTimings::default();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested {
                    tracing::info!("quit requested");
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let simulation_breakdown = update_scene(
                    frame_dt,
                    FrameInput {
                        keys: keyboard.keys,
                    },
                    &mut scene,
                );

                let render_start = Instant::now();
                draw_tiles(&scene, viewport_extent());
                for agent in &scene.agents {
                    draw_agent(&scene, agent);
                }
                let render_duration = render_start.elapsed();

                let report = timings.record(FrameCost {
                    frame: frame_dt,
                    simulation: simulation_breakdown.simulation
                        + simulation_breakdown.scene_population,
                    render: render_duration,
                });
                if let (true, Some(report)) = (show_fps, report) {
                    tracing::info!(
                        fps = report.fps,
                        slowest_ms = report.slowest_frame.as_secs_f64() * 1_000.0,
                        sim_ms = report.avg_simulation.as_secs_f64() * 1_000.0,
                        render_ms = report.avg_render.as_secs_f64() * 1_000.0,
                        "frame timing"
                    );
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn viewport_extent() -> prowl_core::Viewport {
    prowl_core::Viewport::new(
        macroquad::window::screen_width(),
        macroquad::window::screen_height(),
    )
}

fn draw_tiles(scene: &Scene, viewport: prowl_core::Viewport) {
    let tiles = &scene.tiles;
    let (columns, rows) = tiles.visible_range(scene.camera_offset, viewport);

    for row in rows {
        for column in columns.clone() {
            let Some(color) = tiles.color_at(column, row) else {
                continue;
            };
            let origin = scene.to_screen(Vec2::new(
                column as f32 * tiles.tile_size,
                row as f32 * tiles.tile_size,
            ));
            macroquad::shapes::draw_rectangle(
                origin.x,
                origin.y,
                tiles.tile_size,
                tiles.tile_size,
                to_macroquad_color(color),
            );
        }
    }
}

fn draw_agent(scene: &Scene, agent: &AgentPresentation) {
    let size = scene.tiles.tile_size;
    let origin = scene.to_screen(agent.position);
    let body = to_macroquad_color(agent.color);
    macroquad::shapes::draw_rectangle(origin.x, origin.y, size, size, body);

    let marker = facing_marker(agent, size);
    let marker_size = size * MARKER_FRACTION;
    macroquad::shapes::draw_rectangle(
        origin.x + marker.x,
        origin.y + marker.y,
        marker_size,
        marker_size,
        to_macroquad_color(agent.color.lighten(0.6)),
    );
}

/// Offset of the facing marker from the agent's upper-left corner.
///
/// Flipped agents resolve the marker from the mirrored facing and then mirror
/// it back, the same way a mirrored sprite row would be drawn.
fn facing_marker(agent: &AgentPresentation, size: f32) -> Vec2 {
    let marker = size * MARKER_FRACTION;
    let centre = (size - marker) / 2.0;
    let far = size - marker;
    let bob = agent.frame_index as f32 - 1.0;

    let direction = if agent.facing_flip {
        mirror(agent.direction)
    } else {
        agent.direction
    };
    let offset = match direction {
        Direction::Up => Vec2::new(centre + bob, 0.0),
        Direction::Down => Vec2::new(centre + bob, far),
        Direction::Left => Vec2::new(0.0, centre + bob),
        Direction::Right => Vec2::new(far, centre + bob),
    };

    if agent.facing_flip {
        Vec2::new(far - offset.x, offset.y)
    } else {
        offset
    }
}

fn mirror(direction: Direction) -> Direction {
    match direction {
        Direction::Left => Direction::Right,
        Direction::Right => Direction::Left,
        vertical => vertical,
    }
}

fn to_macroquad_color(color: prowl_rendering::Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
