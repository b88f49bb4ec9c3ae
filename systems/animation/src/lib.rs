#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Derives walk-cycle frames from the movement the world reports.
//!
//! Animation is observational: it reads events and snapshots and never feeds
//! back into behaviour. An agent animates only on ticks where the world moved
//! it. A request that the grid rejected counts as standing still, for the
//! player and the wolf alike.

use prowl_core::{AgentId, AgentSnapshot, Direction, Event};
use serde::{Deserialize, Serialize};

/// Cadence and layout of the walk cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationTuning {
    /// Moving ticks spent on each frame.
    pub ticks_per_frame: u32,
    /// Frames in one walk cycle.
    pub frame_count: u32,
    /// Frame shown while standing still.
    pub idle_frame: u32,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            ticks_per_frame: 8,
            frame_count: 3,
            idle_frame: 1,
        }
    }
}

/// What the renderer needs to pick an agent's sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationState {
    /// Facing reported by the world.
    pub direction: Direction,
    /// Frame within the walk cycle.
    pub frame_index: u32,
    /// Whether the agent moved during the last tick.
    pub is_moving: bool,
}

/// Pure system that tracks the walk cycle of every agent.
#[derive(Debug)]
pub struct Animation {
    tuning: AnimationTuning,
    player: Track,
    wolf: Track,
}

impl Animation {
    /// Creates animation tracks showing the idle frame, facing down.
    #[must_use]
    pub fn new(tuning: AnimationTuning) -> Self {
        let track = Track {
            state: AnimationState {
                direction: Direction::Down,
                frame_index: tuning.idle_frame,
                is_moving: false,
            },
            moving_ticks: 0,
        };
        Self {
            tuning,
            player: track,
            wolf: track,
        }
    }

    /// Latest animation state of `agent`.
    #[must_use]
    pub fn state(&self, agent: AgentId) -> AnimationState {
        self.track(agent).state
    }

    /// Consumes every event of one tick together with post-tick snapshots.
    pub fn handle(&mut self, events: &[Event], agents: &[AgentSnapshot]) {
        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for snapshot in agents {
            let moved = events.iter().any(|event| {
                matches!(event, Event::AgentMoved { agent, .. } if *agent == snapshot.id)
            });
            let tuning = self.tuning;
            self.track_mut(snapshot.id)
                .advance(&tuning, snapshot.facing, moved);
        }
    }

    fn track(&self, agent: AgentId) -> &Track {
        match agent {
            AgentId::Player => &self.player,
            AgentId::Wolf => &self.wolf,
        }
    }

    fn track_mut(&mut self, agent: AgentId) -> &mut Track {
        match agent {
            AgentId::Player => &mut self.player,
            AgentId::Wolf => &mut self.wolf,
        }
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(AnimationTuning::default())
    }
}

#[derive(Clone, Copy, Debug)]
struct Track {
    state: AnimationState,
    moving_ticks: u32,
}

impl Track {
    fn advance(&mut self, tuning: &AnimationTuning, facing: Direction, moved: bool) {
        self.state.direction = facing;
        self.state.is_moving = moved;

        if !moved {
            self.state.frame_index = tuning.idle_frame;
            self.moving_ticks = 0;
            return;
        }

        self.moving_ticks += 1;
        if self.moving_ticks >= tuning.ticks_per_frame.max(1) {
            self.moving_ticks = 0;
            self.state.frame_index = (self.state.frame_index + 1) % tuning.frame_count.max(1);
        }
    }
}
