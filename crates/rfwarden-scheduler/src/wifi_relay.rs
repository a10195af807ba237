//! WiFi scan-cycle bookkeeping.
//!
//! The external module's firmware drives the actual scan cadence; this side
//! only tracks elapsed intervals for the cycle counter. Inbound frame
//! classification lives in the loop, which routes frames by type to the
//! configured hooks.

use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug)]
pub struct WifiRelay {
    interval: Duration,
    last_cycle: Instant,
    cycles: u64,
}

impl WifiRelay {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            last_cycle: now,
            cycles: 0,
        }
    }

    /// Count a cycle if the interval elapsed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if now.duration_since(self.last_cycle) < self.interval {
            return false;
        }
        self.last_cycle = now;
        self.cycles += 1;
        true
    }

    /// Elapsed scan cycles.
    pub fn cycle_count(&self) -> u64 {
        self.cycles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn counts_elapsed_intervals() {
        let mut wifi = WifiRelay::new(Duration::from_millis(10_000), Instant::now());

        tokio::time::advance(Duration::from_millis(9999)).await;
        assert!(!wifi.tick(Instant::now()));

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(wifi.tick(Instant::now()));
        assert!(!wifi.tick(Instant::now()));
        assert_eq!(wifi.cycle_count(), 1);
    }
}
