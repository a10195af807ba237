//! Sub-GHz frequency hop controller.
//!
//! Owns the frequency table and the rotation cursor; the loop asks it once
//! per tick whether a hop is due and programs the returned frequency on
//! every resolved source. A hop is deferred, not skipped, while a decode is
//! in flight: interrupting a decode mid-burst loses the detection entirely,
//! so non-interruption wins over strict timer adherence.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// One due hop: the frequency to program and whether the cursor wrapped
/// (a wrap means a full table sweep finished and the modulation preset
/// should advance to cover the next encoding family).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HopStep {
    pub frequency_hz: u32,
    pub cycle_preset: bool,
}

/// Cyclic rotation over an owned frequency table.
#[derive(Debug)]
pub struct HopController {
    table: Vec<u32>,
    cursor: usize,
    interval: Duration,
    last_hop: Instant,
    hops: u64,
}

impl HopController {
    /// Create a controller starting at the table's first entry.
    ///
    /// The table must be non-empty (enforced by config validation).
    pub fn new(table: Vec<u32>, interval: Duration, now: Instant) -> Self {
        Self {
            table,
            cursor: 0,
            interval,
            last_hop: now,
            hops: 0,
        }
    }

    /// The table entry the cursor points at.
    pub fn current_frequency(&self) -> u32 {
        self.table[self.cursor]
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Hops performed so far.
    pub fn hop_count(&self) -> u64 {
        self.hops
    }

    /// Advance if a hop is due and the decoder is quiet.
    ///
    /// Returns `None` both when the interval has not elapsed and when the
    /// hop is deferred by an active decode; a deferred hop fires on the
    /// first quiet tick after the interval.
    pub fn tick(&mut self, now: Instant, decode_active: bool) -> Option<HopStep> {
        if now.duration_since(self.last_hop) < self.interval {
            return None;
        }
        if decode_active {
            debug!("hop deferred: decode in progress");
            return None;
        }

        self.cursor = (self.cursor + 1) % self.table.len();
        self.last_hop = now;
        self.hops += 1;

        let step = HopStep {
            frequency_hz: self.table[self.cursor],
            cycle_preset: self.cursor == 0,
        };
        debug!(
            frequency_hz = step.frequency_hz,
            cursor = self.cursor,
            "hop"
        );
        Some(step)
    }
}
