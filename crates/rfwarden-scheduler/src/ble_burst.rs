//! BLE burst coordinator state.
//!
//! Tracks the burst interval and the pause token held over the Bluetooth
//! serial link while an internal burst is in flight. The loop drives the
//! transitions; this struct guarantees at most one internal burst at a time
//! and that the token is surrendered exactly once per burst.

use rfwarden_hardware::PauseToken;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct BleBurstCoordinator {
    interval: Duration,
    last_cycle: Instant,
    token: Option<PauseToken>,
    internal_in_flight: bool,
    bursts: u64,
}

impl BleBurstCoordinator {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_cycle: now,
            token: None,
            internal_in_flight: false,
            bursts: 0,
        }
    }

    /// Whether a new burst cycle is due.
    pub fn due(&self, now: Instant) -> bool {
        !self.internal_in_flight && now.duration_since(self.last_cycle) >= self.interval
    }

    /// Record that this cycle happened (burst started or skipped); the next
    /// one is due a full interval from now.
    pub fn note_cycle(&mut self, now: Instant) {
        self.last_cycle = now;
    }

    /// Mark an internal burst as started, holding the serial-link pause
    /// token (if one was needed) until completion.
    pub fn begin_internal(&mut self, token: Option<PauseToken>) {
        debug_assert!(!self.internal_in_flight);
        self.internal_in_flight = true;
        self.token = token;
    }

    /// Whether an internal burst is currently in flight.
    pub fn internal_in_flight(&self) -> bool {
        self.internal_in_flight
    }

    /// Complete the internal burst, yielding the token to resume with.
    pub fn complete_internal(&mut self) -> Option<PauseToken> {
        self.internal_in_flight = false;
        self.bursts += 1;
        self.token.take()
    }

    /// Failure path: surrender the token without counting a burst.
    pub fn abort_internal(&mut self) -> Option<PauseToken> {
        self.internal_in_flight = false;
        self.token.take()
    }

    /// Completed internal bursts.
    pub fn burst_count(&self) -> u64 {
        self.bursts
    }
}
