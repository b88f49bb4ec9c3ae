#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wolf behaviour: idle, patrol and chase the player across the tile grid.
//!
//! The wolf never mutates the world. Each `TimeAdvanced` event runs one pass of
//! the state machine, which emits at most one `MoveAgent` command. Chase moves
//! are probed against the grid first so that only a step that will succeed is
//! requested; patrol steps are requested blindly and may be blocked.

use prowl_core::{AgentId, AgentSnapshot, Command, Direction, Event, TileGrid};
use prowl_world::motion::try_move;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

/// Tunable parameters for the wolf, expressed in ticks, pixels and tiles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WolfTuning {
    /// Pixels travelled per successful step.
    pub speed: f32,
    /// Distance in tiles below which the wolf starts chasing.
    pub detection_radius_tiles: f32,
    /// Ticks spent idle before patrolling.
    pub idle_duration: u32,
    /// Ticks between patrol heading changes.
    pub move_interval: u32,
    /// Ticks between evasive steps while circling close to the player.
    pub rodeo_wait: u32,
}

impl Default for WolfTuning {
    fn default() -> Self {
        Self {
            speed: 2.0,
            detection_radius_tiles: 5.0,
            idle_duration: 90,
            move_interval: 60,
            rodeo_wait: 30,
        }
    }
}

/// Behaviour state of the wolf together with the timer owned by that state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WolfMode {
    /// Standing still, counting up to the patrol start.
    Idle {
        /// Ticks spent idle so far.
        idle_ticks: u32,
    },
    /// Wandering along a heading that is repicked periodically.
    Patrolling {
        /// Direction of every patrol step.
        heading: Direction,
        /// Ticks since the heading was picked.
        patrol_ticks: u32,
    },
    /// Pursuing the player, or circling when already close.
    Chasing {
        /// Ticks since the last evasive step attempt.
        rodeo_ticks: u32,
    },
}

impl WolfMode {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle { .. } => "idle",
            Self::Patrolling { .. } => "patrolling",
            Self::Chasing { .. } => "chasing",
        }
    }
}

impl Default for WolfMode {
    fn default() -> Self {
        Self::Idle { idle_ticks: 0 }
    }
}

/// Source of the random choices the wolf makes.
pub trait DirectionSource {
    /// Picks one of the four cardinal directions uniformly.
    fn pick(&mut self) -> Direction;

    /// Reorders `candidates` in place.
    fn shuffle(&mut self, candidates: &mut [Direction]);
}

/// Direction source backed by a random number generator.
#[derive(Debug)]
pub struct RandomDirections<R> {
    rng: R,
}

impl<R: Rng> RandomDirections<R> {
    /// Wraps the provided generator.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> DirectionSource for RandomDirections<R> {
    fn pick(&mut self) -> Direction {
        Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())]
    }

    fn shuffle(&mut self, candidates: &mut [Direction]) {
        candidates.shuffle(&mut self.rng);
    }
}

/// Pure system driving the wolf agent.
#[derive(Debug, Default)]
pub struct Wolf {
    tuning: WolfTuning,
    mode: WolfMode,
}

impl Wolf {
    /// Creates an idle wolf with the provided tuning.
    #[must_use]
    pub fn new(tuning: WolfTuning) -> Self {
        Self {
            tuning,
            mode: WolfMode::default(),
        }
    }

    /// Current behaviour state.
    #[must_use]
    pub const fn mode(&self) -> WolfMode {
        self.mode
    }

    /// Consumes world events and agent snapshots to emit wolf commands.
    pub fn handle<D>(
        &mut self,
        events: &[Event],
        wolf: AgentSnapshot,
        player: AgentSnapshot,
        grid: &TileGrid,
        directions: &mut D,
        out: &mut Vec<Command>,
    ) where
        D: DirectionSource + ?Sized,
    {
        for event in events {
            if matches!(event, Event::TimeAdvanced { .. }) {
                self.advance(wolf, player, grid, directions, out);
            }
        }
    }

    fn advance<D>(
        &mut self,
        wolf: AgentSnapshot,
        player: AgentSnapshot,
        grid: &TileGrid,
        directions: &mut D,
        out: &mut Vec<Command>,
    ) where
        D: DirectionSource + ?Sized,
    {
        let tile_size = grid.tile_size() as f32;
        let detection_radius = self.tuning.detection_radius_tiles * tile_size;
        let distance = wolf.position.distance_to(player.position);

        if distance < detection_radius {
            if !matches!(self.mode, WolfMode::Chasing { .. }) {
                self.enter(WolfMode::Chasing { rodeo_ticks: 0 });
            }
        } else if matches!(self.mode, WolfMode::Chasing { .. }) {
            self.enter(WolfMode::Idle { idle_ticks: 0 });
        }

        match self.mode {
            WolfMode::Idle { idle_ticks } => {
                let idle_ticks = idle_ticks.saturating_add(1);
                if idle_ticks >= self.tuning.idle_duration {
                    self.enter(WolfMode::Patrolling {
                        heading: directions.pick(),
                        patrol_ticks: 0,
                    });
                } else {
                    self.mode = WolfMode::Idle { idle_ticks };
                }
            }
            WolfMode::Patrolling {
                mut heading,
                patrol_ticks,
            } => {
                let mut patrol_ticks = patrol_ticks.saturating_add(1);
                if patrol_ticks >= self.tuning.move_interval {
                    heading = directions.pick();
                    patrol_ticks = 0;
                    tracing::debug!(?heading, "wolf changed patrol heading");
                }
                self.mode = WolfMode::Patrolling {
                    heading,
                    patrol_ticks,
                };
                out.push(Command::MoveAgent {
                    agent: AgentId::Wolf,
                    direction: heading,
                    distance: self.tuning.speed,
                });
            }
            WolfMode::Chasing { rodeo_ticks } => {
                let dx = player.position.x() - wolf.position.x();
                let dy = player.position.y() - wolf.position.y();

                if distance < 2.0 * tile_size {
                    let rodeo_ticks = rodeo_ticks.saturating_add(1);
                    if rodeo_ticks < self.tuning.rodeo_wait {
                        self.mode = WolfMode::Chasing { rodeo_ticks };
                        return;
                    }
                    self.mode = WolfMode::Chasing { rodeo_ticks: 0 };

                    let mut candidates = evasive_candidates(dx, dy);
                    directions.shuffle(&mut candidates);
                    let _ = self.step_first_open(&candidates, wolf, grid, out);
                } else {
                    let candidates = if dx.abs() > dy.abs() {
                        [
                            Direction::horizontal_toward(dx),
                            Direction::vertical_toward(dy),
                        ]
                    } else {
                        [
                            Direction::vertical_toward(dy),
                            Direction::horizontal_toward(dx),
                        ]
                    };
                    if self.step_first_open(&candidates, wolf, grid, out) {
                        self.mode = WolfMode::Chasing { rodeo_ticks: 0 };
                    }
                }
            }
        }
    }

    /// Requests the first candidate step that clears the grid.
    fn step_first_open(
        &self,
        candidates: &[Direction],
        wolf: AgentSnapshot,
        grid: &TileGrid,
        out: &mut Vec<Command>,
    ) -> bool {
        let open = candidates.iter().copied().find(|direction| {
            try_move(grid, wolf.position, direction.delta(self.tuning.speed)).moved
        });

        match open {
            Some(direction) => {
                out.push(Command::MoveAgent {
                    agent: AgentId::Wolf,
                    direction,
                    distance: self.tuning.speed,
                });
                true
            }
            None => {
                tracing::trace!(?candidates, "wolf has no open chase step");
                false
            }
        }
    }

    fn enter(&mut self, next: WolfMode) {
        tracing::debug!(from = self.mode.name(), to = next.name(), "wolf mode changed");
        self.mode = next;
    }
}

/// Directions that move toward the player along each axis with a non-zero gap.
fn evasive_candidates(dx: f32, dy: f32) -> Vec<Direction> {
    let mut candidates = Vec::with_capacity(2);
    if dx > 0.0 {
        candidates.push(Direction::Right);
    } else if dx < 0.0 {
        candidates.push(Direction::Left);
    }
    if dy > 0.0 {
        candidates.push(Direction::Down);
    } else if dy < 0.0 {
        candidates.push(Direction::Up);
    }
    candidates
}
