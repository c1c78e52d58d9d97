//! Fixed-timestep accumulator.
//!
//! Wall-clock time is fed in once per loop iteration; [`FixedTimestep::advance`] reports how
//! many fixed-size logic updates that time pays for. Whatever is left over stays in the
//! accumulator for the next iteration. The number of catch-up updates per iteration is capped:
//! after a long stall the surplus lag is dropped instead of replayed.

use log::warn;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct FixedTimestep {
    period: Duration,
    accumulator: Duration,
    max_updates: u32,
    last_tick: Option<Instant>,
}

impl FixedTimestep {
    pub fn new(period: Duration, max_updates: u32) -> Self {
        Self {
            period,
            accumulator: Duration::ZERO,
            max_updates: max_updates.max(1),
            last_tick: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time carried over to the next iteration.
    pub fn remainder(&self) -> Duration {
        self.accumulator
    }

    /// Measures the time since the previous call and advances by it.
    ///
    /// The first call only starts the clock.
    pub fn tick(&mut self, now: Instant) -> u32 {
        let elapsed = match self.last_tick {
            Some(last) => now.saturating_duration_since(last),
            None => Duration::ZERO,
        };
        self.last_tick = Some(now);
        self.advance(elapsed)
    }

    /// Adds `elapsed` to the accumulator and returns the number of logic updates due.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulator += elapsed;

        let mut updates = 0;
        while self.accumulator > self.period {
            if updates == self.max_updates {
                warn!(
                    "Dropping {:?} of lag after {} catch-up updates",
                    self.accumulator, updates
                );
                self.accumulator = Duration::ZERO;
                break;
            }
            self.accumulator -= self.period;
            updates += 1;
        }
        updates
    }
}
