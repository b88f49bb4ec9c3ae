//! Conversion of variable frame time into whole simulation ticks.

use std::time::Duration;

/// Simulation rate in ticks per second.
pub const TICKS_PER_SECOND: u32 = 60;

/// Upper bound on ticks run for a single rendered frame.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Accumulates frame time and releases it in fixed-size ticks.
///
/// When a frame would need more than the configured maximum number of ticks,
/// the excess time is discarded so a slow frame cannot snowball into ever
/// longer catch-up work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedTimestep {
    tick: Duration,
    max_ticks_per_frame: u32,
    accumulated: Duration,
}

impl FixedTimestep {
    /// Creates a timestep releasing `tick`-long ticks, at most `max_ticks_per_frame` per frame.
    #[must_use]
    pub fn new(tick: Duration, max_ticks_per_frame: u32) -> Self {
        Self {
            tick: tick.max(Duration::from_micros(1)),
            max_ticks_per_frame: max_ticks_per_frame.max(1),
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `frame` to the accumulator and returns the number of ticks to run.
    pub fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulated += frame;

        let mut ticks = 0;
        while self.accumulated >= self.tick {
            if ticks == self.max_ticks_per_frame {
                self.accumulated = Duration::from_nanos(
                    (self.accumulated.as_nanos() % self.tick.as_nanos()) as u64,
                );
                break;
            }
            self.accumulated -= self.tick;
            ticks += 1;
        }
        ticks
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(1) / TICKS_PER_SECOND,
            MAX_TICKS_PER_FRAME,
        )
    }
}
