#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Prowl.

mod config;
mod scene;

use std::{collections::BTreeSet, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use clap::Parser;
use prowl_core::{TileCode, TileGrid, Walkability};
use prowl_rendering::{FrameSimulationBreakdown, Presentation, RenderingBackend, TilePalette};
use prowl_rendering_macroquad::MacroquadBackend;
use prowl_simulation::{FixedTimestep, Frame, Simulation, SimulationConfig};
use prowl_system_terrain::{generate, load_csv, GeneratorConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use self::config::GameConfig;

/// Default log directive applied when neither `RUST_LOG` nor `--log-filter` is set.
const DEFAULT_LOG_DIRECTIVE: &str = "prowl=info";

#[derive(Debug, Parser)]
#[command(name = "prowl")]
#[command(about = "Tile-based top-down game with a prowling wolf")]
struct Args {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// CSV map to load instead of generating one.
    #[arg(long, value_name = "CSV")]
    map: Option<PathBuf>,
    /// Seed for map generation and wolf decisions.
    #[arg(long)]
    seed: Option<u64>,
    /// Run without a window for a fixed number of ticks.
    #[arg(long)]
    headless: bool,
    /// Ticks simulated in headless mode.
    #[arg(long, default_value_t = 600)]
    ticks: u64,
    /// Tracing filter directives, overriding `RUST_LOG`.
    #[arg(long, value_name = "DIRECTIVES")]
    log_filter: Option<String>,
    /// Render as fast as possible instead of waiting for the display.
    #[arg(long)]
    no_vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
}

impl Args {
    /// Folds command-line overrides into the file configuration.
    fn apply_to(&self, config: &mut GameConfig) {
        if let Some(map) = &self.map {
            config.map.csv = Some(map.clone());
        }
        if let Some(seed) = self.seed {
            config.map.seed = Some(seed);
        }
        if self.no_vsync {
            config.window.vsync = false;
        }
        if self.show_fps {
            config.window.show_fps = true;
        }
    }
}

/// Entry point for the Prowl command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.log_filter.as_deref())?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    args.apply_to(&mut config);

    let seed = config.map.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, "starting Prowl");

    let grid = build_grid(&config, seed)?;
    let simulation_config = SimulationConfig {
        player_spawn: config.spawn_position(config.player.spawn_tile()),
        wolf_spawn: config.spawn_position(config.wolf.spawn_tile()),
        player_motion: config.player_motion(),
        wolf: config.wolf.tuning,
        animation: config.animation,
        viewport: config.viewport(),
        seed,
    };
    let simulation = Simulation::new(grid, &simulation_config);

    if args.headless {
        let frame = run_headless(simulation, args.ticks);
        tracing::info!(
            tick = frame.tick,
            player_x = frame.player.snapshot.position.x(),
            player_y = frame.player.snapshot.position.y(),
            wolf_x = frame.wolf.snapshot.position.x(),
            wolf_y = frame.wolf.snapshot.position.y(),
            wolf_mode = ?frame.wolf_mode,
            "headless run finished"
        );
        return Ok(());
    }
    run_windowed(simulation, &config)
}

fn init_tracing(directives: Option<&str>) -> Result<()> {
    let filter = match directives {
        Some(directives) => EnvFilter::try_new(directives)
            .with_context(|| format!("invalid log filter `{directives}`"))?,
        None => EnvFilter::from_default_env().add_directive(DEFAULT_LOG_DIRECTIVE.parse()?),
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
    Ok(())
}

fn build_grid(config: &GameConfig, seed: u64) -> Result<TileGrid> {
    let map = &config.map;
    let grid = match &map.csv {
        Some(path) => {
            let walkable: BTreeSet<TileCode> =
                map.walkable_codes.iter().copied().map(TileCode::new).collect();
            load_csv(path, map.tile_size, Walkability::Walkable(walkable))
                .with_context(|| format!("failed to load map {}", path.display()))?
        }
        None => generate(&GeneratorConfig {
            columns: map.columns,
            rows: map.rows,
            tile_size: map.tile_size,
            seed,
            clearings: vec![config.player.spawn_tile(), config.wolf.spawn_tile()],
        })
        .context("failed to generate map")?,
    };

    tracing::info!(
        columns = grid.columns(),
        rows = grid.rows(),
        tile_size = grid.tile_size(),
        "map ready"
    );
    Ok(grid)
}

fn run_headless(mut simulation: Simulation, ticks: u64) -> Frame {
    for _ in 0..ticks {
        simulation.step(None);
    }

    simulation.frame()
}

fn run_windowed(mut simulation: Simulation, config: &GameConfig) -> Result<()> {
    let palette = TilePalette::default();
    let initial_scene = scene::build_scene(&simulation.frame(), simulation.tile_grid(), &palette);
    let presentation = Presentation::new(
        config.window.title.clone(),
        scene::CLEAR_COLOR,
        config.viewport(),
        initial_scene,
    )
    .context("invalid window configuration")?;

    let mut timestep = FixedTimestep::default();
    MacroquadBackend::new()
        .with_vsync(config.window.vsync)
        .with_show_fps(config.window.show_fps)
        .run(presentation, move |frame_dt, input, current_scene| {
            let simulation_start = Instant::now();
            let intent = input.keys.intent();
            for _ in 0..timestep.advance(frame_dt) {
                simulation.step(intent);
            }
            let simulation_time = simulation_start.elapsed();

            let population_start = Instant::now();
            scene::populate_scene(&simulation.frame(), current_scene);

            FrameSimulationBreakdown {
                simulation: simulation_time,
                scene_population: population_start.elapsed(),
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let args = Args::parse_from([
            "prowl",
            "--map",
            "meadow.csv",
            "--seed",
            "77",
            "--no-vsync",
            "--show-fps",
        ]);
        let mut config = GameConfig::default();

        args.apply_to(&mut config);

        assert_eq!(config.map.csv, Some(PathBuf::from("meadow.csv")));
        assert_eq!(config.map.seed, Some(77));
        assert!(!config.window.vsync);
        assert!(config.window.show_fps);
        assert_eq!(args.ticks, 600);
    }

    #[test]
    fn generated_map_clears_both_spawns() {
        let config = GameConfig::default();

        for seed in 0..8 {
            let grid = build_grid(&config, seed).expect("generated map");
            for spawn in [config.player.spawn_tile(), config.wolf.spawn_tile()] {
                assert!(grid.is_walkable_tile(spawn), "seed {seed} spawn {spawn:?}");
            }
        }
    }

    #[test]
    fn headless_run_advances_the_clock() {
        let config = GameConfig::default();
        let grid = build_grid(&config, 5).expect("generated map");
        let simulation = Simulation::new(
            grid,
            &SimulationConfig {
                player_spawn: config.spawn_position(config.player.spawn_tile()),
                wolf_spawn: config.spawn_position(config.wolf.spawn_tile()),
                player_motion: config.player_motion(),
                wolf: config.wolf.tuning,
                animation: config.animation,
                viewport: config.viewport(),
                seed: 5,
            },
        );

        let frame = run_headless(simulation, 3);

        assert_eq!(frame.tick, 3);
        assert_eq!(
            frame.player.snapshot.position,
            config.spawn_position(config.player.spawn_tile())
        );
    }
}
