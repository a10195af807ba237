//! IR burst coordinator state.
//!
//! IR runs in one of two modes depending on USB activity: continuous when
//! the USB transport is quiet, or interval-gated bursts that pause USB for
//! the burst's duration when it is active. The mode is re-derived every
//! tick, so a USB transition takes effect on the next tick without a
//! restart.

use rfwarden_hardware::PauseToken;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
struct Burst {
    started: Instant,
    token: Option<PauseToken>,
}

#[derive(Debug)]
pub struct IrBurstCoordinator {
    duration: Duration,
    interval: Duration,
    last_cycle: Instant,
    burst: Option<Burst>,
    bursts: u64,
}

impl IrBurstCoordinator {
    pub fn new(duration: Duration, interval: Duration, now: Instant) -> Self {
        Self {
            duration,
            interval,
            last_cycle: now,
            burst: None,
            bursts: 0,
        }
    }

    /// Whether a new burst cycle is due (burst mode only).
    pub fn due(&self, now: Instant) -> bool {
        self.burst.is_none() && now.duration_since(self.last_cycle) >= self.interval
    }

    /// Record that this cycle happened (burst started or skipped).
    pub fn note_cycle(&mut self, now: Instant) {
        self.last_cycle = now;
    }

    /// Mark a burst as started, holding the USB pause token.
    pub fn begin(&mut self, now: Instant, token: Option<PauseToken>) {
        debug_assert!(self.burst.is_none());
        self.burst = Some(Burst {
            started: now,
            token,
        });
    }

    /// Whether a burst is currently in flight.
    pub fn in_flight(&self) -> bool {
        self.burst.is_some()
    }

    /// Whether the in-flight burst has used up its duration.
    pub fn expired(&self, now: Instant) -> bool {
        self.burst
            .as_ref()
            .is_some_and(|b| now.duration_since(b.started) >= self.duration)
    }

    /// Complete the burst, yielding the token to resume USB with.
    pub fn finish(&mut self) -> Option<PauseToken> {
        let token = self.burst.take().and_then(|b| b.token);
        self.bursts += 1;
        token
    }

    /// Failure path: surrender the token without counting a burst.
    pub fn abort(&mut self) -> Option<PauseToken> {
        self.burst.take().and_then(|b| b.token)
    }

    /// Completed bursts.
    pub fn burst_count(&self) -> u64 {
        self.bursts
    }
}
