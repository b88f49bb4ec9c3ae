#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player control system that turns directional intent into move commands.

use prowl_core::{AgentId, AgentSnapshot, Command, Direction, Event, Position, TileGrid};
use prowl_world::motion::try_move;

/// Default speed of free movement in pixels per tick.
pub const DEFAULT_PLAYER_SPEED: f32 = 4.0;

/// How directional intent is converted into motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PlayerMotion {
    /// Pixel-granular movement: one step of `speed` pixels per tick while a
    /// direction is held.
    Free {
        /// Pixels travelled per tick.
        speed: f32,
    },
    /// Grid-locked movement: a held direction commits the player to travel a
    /// whole tile, `pixels_per_tick` at a time, ignoring input until arrival.
    TileStep {
        /// Pixels travelled per tick while crossing a tile.
        pixels_per_tick: f32,
    },
}

impl Default for PlayerMotion {
    fn default() -> Self {
        Self::Free {
            speed: DEFAULT_PLAYER_SPEED,
        }
    }
}

/// Pure system that reacts to clock events and emits player commands.
#[derive(Debug, Default)]
pub struct PlayerControl {
    motion: PlayerMotion,
    step: Option<TileStep>,
}

impl PlayerControl {
    /// Creates a controller using the provided motion mode.
    #[must_use]
    pub fn new(motion: PlayerMotion) -> Self {
        Self { motion, step: None }
    }

    /// Reports whether a tile step is underway.
    #[must_use]
    pub const fn is_stepping(&self) -> bool {
        self.step.is_some()
    }

    /// Consumes world events and the current intent to emit player commands.
    ///
    /// One batch of commands is produced per `TimeAdvanced` event.
    pub fn handle(
        &mut self,
        events: &[Event],
        intent: Option<Direction>,
        player: AgentSnapshot,
        grid: &TileGrid,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if !matches!(event, Event::TimeAdvanced { .. }) {
                continue;
            }

            match self.motion {
                PlayerMotion::Free { speed } => {
                    if let Some(direction) = intent {
                        out.push(Command::MoveAgent {
                            agent: AgentId::Player,
                            direction,
                            distance: speed,
                        });
                    }
                }
                PlayerMotion::TileStep { pixels_per_tick } => {
                    self.advance_tile_step(intent, player, grid, pixels_per_tick, out);
                }
            }
        }
    }

    fn advance_tile_step(
        &mut self,
        intent: Option<Direction>,
        player: AgentSnapshot,
        grid: &TileGrid,
        pixels_per_tick: f32,
        out: &mut Vec<Command>,
    ) {
        if self
            .step
            .is_some_and(|step| step.remaining_from(player.position) <= 0.0)
        {
            self.step = None;
        }

        if self.step.is_none() {
            let Some(direction) = intent else {
                return;
            };
            let neighbour = player.position.tile(grid.tile_size()).step(direction);
            if !grid.is_walkable_tile(neighbour) {
                out.push(Command::FaceAgent {
                    agent: AgentId::Player,
                    direction,
                });
                return;
            }
            self.step = Some(TileStep {
                direction,
                target: grid.tile_origin(neighbour),
            });
        }

        let Some(step) = self.step else {
            return;
        };
        let distance = pixels_per_tick.min(step.remaining_from(player.position));
        if distance <= 0.0 {
            return;
        }

        // The collision box can overlap the current tile as well as the target.
        if try_move(grid, player.position, step.direction.delta(distance)).moved {
            out.push(Command::MoveAgent {
                agent: AgentId::Player,
                direction: step.direction,
                distance,
            });
        } else {
            self.step = None;
            out.push(Command::FaceAgent {
                agent: AgentId::Player,
                direction: step.direction,
            });
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct TileStep {
    direction: Direction,
    target: Position,
}

impl TileStep {
    fn remaining_from(&self, position: Position) -> f32 {
        match self.direction {
            Direction::Right => self.target.x() - position.x(),
            Direction::Left => position.x() - self.target.x(),
            Direction::Down => self.target.y() - position.y(),
            Direction::Up => position.y() - self.target.y(),
        }
    }
}
