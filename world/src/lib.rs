#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Prowl.

pub mod motion;

use prowl_core::{AgentId, AgentSnapshot, Command, Direction, Event, Position, TileGrid};

use self::motion::{destination_is_clear, try_move};

/// Represents the authoritative Prowl world state.
#[derive(Debug)]
pub struct World {
    tile_grid: TileGrid,
    player: Body,
    wolf: Body,
    tick_index: u64,
}

impl World {
    /// Creates a world over `tile_grid` with both agents at their spawn points.
    ///
    /// Spawns are accepted as given; a spawn overlapping blocking tiles is
    /// logged because the agent will be unable to move until the overlap ends.
    #[must_use]
    pub fn new(tile_grid: TileGrid, player_spawn: Position, wolf_spawn: Position) -> Self {
        for (agent, spawn) in [(AgentId::Player, player_spawn), (AgentId::Wolf, wolf_spawn)] {
            if !destination_is_clear(&tile_grid, spawn) {
                tracing::warn!(
                    ?agent,
                    x = spawn.x(),
                    y = spawn.y(),
                    "spawn overlaps blocking tiles"
                );
            }
        }

        Self {
            tile_grid,
            player: Body::spawn(player_spawn),
            wolf: Body::spawn(wolf_spawn),
            tick_index: 0,
        }
    }

    fn body(&self, agent: AgentId) -> &Body {
        match agent {
            AgentId::Player => &self.player,
            AgentId::Wolf => &self.wolf,
        }
    }

    fn body_mut(&mut self, agent: AgentId) -> &mut Body {
        match agent {
            AgentId::Player => &mut self.player,
            AgentId::Wolf => &mut self.wolf,
        }
    }

    fn turn(&mut self, agent: AgentId, direction: Direction, out_events: &mut Vec<Event>) {
        let body = self.body_mut(agent);
        if body.facing != direction {
            body.facing = direction;
            out_events.push(Event::AgentTurned { agent, direction });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });
        }
        Command::MoveAgent {
            agent,
            direction,
            distance,
        } => {
            world.turn(agent, direction, out_events);

            let from = world.body(agent).position;
            let outcome = try_move(&world.tile_grid, from, direction.delta(distance));
            if outcome.moved {
                world.body_mut(agent).position = outcome.position;
                out_events.push(Event::AgentMoved {
                    agent,
                    direction,
                    from,
                    to: outcome.position,
                });
            } else {
                tracing::trace!(?agent, ?direction, "move blocked");
                out_events.push(Event::AgentBlocked { agent, direction });
            }
        }
        Command::FaceAgent { agent, direction } => {
            world.turn(agent, direction, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use prowl_core::{AgentId, AgentSnapshot, TileGrid};

    use super::World;

    /// Provides read-only access to the world's tile grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.tile_grid
    }

    /// Captures a snapshot of the requested agent.
    #[must_use]
    pub fn agent(world: &World, id: AgentId) -> AgentSnapshot {
        world.body(id).snapshot(id)
    }

    /// Index of the most recently started tick; zero before the first tick.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Copy, Debug)]
struct Body {
    position: Position,
    facing: Direction,
}

impl Body {
    fn spawn(position: Position) -> Self {
        Self {
            position,
            facing: Direction::Down,
        }
    }

    fn snapshot(&self, id: AgentId) -> AgentSnapshot {
        AgentSnapshot {
            id,
            position: self.position,
            facing: self.facing,
        }
    }
}
