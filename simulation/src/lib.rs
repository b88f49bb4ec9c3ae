#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tick driver that wires the world to its systems.
//!
//! One call to [`Simulation::step`] runs a complete tick: the clock advances,
//! the player acts, the wolf reacts to the player's fresh position, animation
//! observes every movement of the tick and the camera follows the player.

mod timestep;

use glam::Vec2;
use prowl_core::{AgentId, AgentSnapshot, Command, Direction, Event, Position, TileGrid, Viewport};
use prowl_system_animation::{Animation, AnimationState, AnimationTuning};
use prowl_system_camera::Camera;
use prowl_system_player::{PlayerControl, PlayerMotion};
use prowl_system_wolf::{DirectionSource, RandomDirections, Wolf, WolfMode, WolfTuning};
use prowl_world::{self as world, query, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub use self::timestep::{FixedTimestep, MAX_TICKS_PER_FRAME, TICKS_PER_SECOND};

/// Everything needed to start a simulation over an existing grid.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    /// Upper-left corner of the player at start.
    pub player_spawn: Position,
    /// Upper-left corner of the wolf at start.
    pub wolf_spawn: Position,
    /// How player intent becomes movement.
    pub player_motion: PlayerMotion,
    /// Wolf behaviour parameters.
    pub wolf: WolfTuning,
    /// Walk cycle parameters shared by both agents.
    pub animation: AnimationTuning,
    /// Visible area the camera frames.
    pub viewport: Viewport,
    /// Seed for the wolf's random choices.
    pub seed: u64,
}

/// State of one agent as of the end of the last tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentFrame {
    /// Authoritative position and facing.
    pub snapshot: AgentSnapshot,
    /// Derived walk-cycle state.
    pub animation: AnimationState,
}

/// Read-only view of the simulation handed to presentation layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    /// Ticks completed so far.
    pub tick: u64,
    /// Player state.
    pub player: AgentFrame,
    /// Wolf state.
    pub wolf: AgentFrame,
    /// Behaviour state of the wolf.
    pub wolf_mode: WolfMode,
    /// World position shown at the upper-left corner of the viewport.
    pub camera_offset: Vec2,
}

/// Owns the world together with every system and runs them in tick order.
#[derive(Debug)]
pub struct Simulation<D = RandomDirections<ChaCha8Rng>> {
    world: World,
    player: PlayerControl,
    wolf: Wolf,
    animation: Animation,
    camera: Camera,
    directions: D,
    camera_offset: Vec2,
    tick_events: Vec<Event>,
}

impl Simulation {
    /// Creates a simulation whose random choices come from a generator seeded with `config.seed`.
    #[must_use]
    pub fn new(tile_grid: TileGrid, config: &SimulationConfig) -> Self {
        tracing::info!(seed = config.seed, "seeding wolf direction source");
        let directions = RandomDirections::new(ChaCha8Rng::seed_from_u64(config.seed));
        Self::with_directions(tile_grid, config, directions)
    }
}

impl<D: DirectionSource> Simulation<D> {
    /// Creates a simulation that draws random choices from `directions`.
    #[must_use]
    pub fn with_directions(tile_grid: TileGrid, config: &SimulationConfig, directions: D) -> Self {
        let world = World::new(tile_grid, config.player_spawn, config.wolf_spawn);
        let camera = Camera::new(config.viewport);
        let camera_offset = camera.offset(config.player_spawn);

        Self {
            world,
            player: PlayerControl::new(config.player_motion),
            wolf: Wolf::new(config.wolf),
            animation: Animation::new(config.animation),
            camera,
            directions,
            camera_offset,
            tick_events: Vec::new(),
        }
    }

    /// Grid the agents move on.
    #[must_use]
    pub fn tile_grid(&self) -> &TileGrid {
        query::tile_grid(&self.world)
    }

    /// Runs one tick with the provided player intent.
    pub fn step(&mut self, intent: Option<Direction>) {
        self.tick_events.clear();
        world::apply(&mut self.world, Command::Tick, &mut self.tick_events);
        let clock_events = self.tick_events.clone();

        let mut commands = Vec::new();
        self.player.handle(
            &clock_events,
            intent,
            query::agent(&self.world, AgentId::Player),
            query::tile_grid(&self.world),
            &mut commands,
        );
        self.execute(&mut commands);

        self.wolf.handle(
            &clock_events,
            query::agent(&self.world, AgentId::Wolf),
            query::agent(&self.world, AgentId::Player),
            query::tile_grid(&self.world),
            &mut self.directions,
            &mut commands,
        );
        self.execute(&mut commands);

        let snapshots = AgentId::ALL.map(|agent| query::agent(&self.world, agent));
        self.animation.handle(&self.tick_events, &snapshots);

        self.camera_offset = self
            .camera
            .offset(query::agent(&self.world, AgentId::Player).position);

        tracing::trace!(
            tick = query::tick_index(&self.world),
            events = self.tick_events.len(),
            "tick complete"
        );
    }

    /// Captures the state presentation layers need.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            tick: query::tick_index(&self.world),
            player: self.agent_frame(AgentId::Player),
            wolf: self.agent_frame(AgentId::Wolf),
            wolf_mode: self.wolf.mode(),
            camera_offset: self.camera_offset,
        }
    }

    fn agent_frame(&self, agent: AgentId) -> AgentFrame {
        AgentFrame {
            snapshot: query::agent(&self.world, agent),
            animation: self.animation.state(agent),
        }
    }

    fn execute(&mut self, commands: &mut Vec<Command>) {
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.tick_events);
        }
    }
}
