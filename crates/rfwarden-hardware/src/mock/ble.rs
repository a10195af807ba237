//! Mock BLE scanner implementation for testing and development.

use crate::{HardwareError, Result, traits::BleRadio};
use rfwarden_core::BleDetection;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::{Duration, Instant};

#[derive(Debug)]
struct Inner {
    running_until: Option<Instant>,
    detections: VecDeque<BleDetection>,
    fail_start: bool,
    starts: u32,
}

/// Mock BLE scanner.
///
/// Models the self-stopping burst behavior of the real scanner: after
/// `start`, `is_running` reports true until the requested burst duration
/// elapses on the tokio clock, then false without any explicit stop. Under
/// `tokio::test(start_paused = true)` the burst expires deterministically as
/// the test advances time.
#[derive(Debug)]
pub struct MockBleRadio {
    inner: Arc<Mutex<Inner>>,
}

impl MockBleRadio {
    /// Create a new mock BLE scanner.
    pub fn new() -> (Self, MockBleRadioHandle) {
        let inner = Arc::new(Mutex::new(Inner {
            running_until: None,
            detections: VecDeque::new(),
            fail_start: false,
            starts: 0,
        }));

        let handle = MockBleRadioHandle {
            inner: Arc::clone(&inner),
        };

        (Self { inner }, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl BleRadio for MockBleRadio {
    async fn start(&mut self, duration: Duration) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_start {
            return Err(HardwareError::start_failed("BLE scanner"));
        }
        inner.running_until = Some(Instant::now() + duration);
        inner.starts += 1;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.lock().running_until = None;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.lock()
            .running_until
            .is_some_and(|until| Instant::now() < until)
    }

    fn poll_detection(&mut self) -> Option<BleDetection> {
        self.lock().detections.pop_front()
    }
}

/// Handle for controlling a mock BLE scanner.
#[derive(Debug, Clone)]
pub struct MockBleRadioHandle {
    inner: Arc<Mutex<Inner>>,
}

impl MockBleRadioHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulate an observed advertisement.
    pub fn inject_detection(&self, detection: BleDetection) {
        self.lock().detections.push_back(detection);
    }

    /// Make subsequent `start` calls fail.
    pub fn fail_start(&self, fail: bool) {
        self.lock().fail_start = fail;
    }

    /// Number of bursts started so far.
    pub fn start_count(&self) -> u32 {
        self.lock().starts
    }

    /// Whether a burst is currently in flight.
    pub fn is_running(&self) -> bool {
        self.lock()
            .running_until
            .is_some_and(|until| Instant::now() < until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test(start_paused = true)]
    async fn burst_self_stops_after_requested_duration() {
        let (mut radio, handle) = MockBleRadio::new();

        radio.start(Duration::from_millis(2000)).await.unwrap();
        assert!(radio.is_running());

        tokio::time::advance(Duration::from_millis(1999)).await;
        assert!(radio.is_running());

        tokio::time::advance(Duration::from_millis(2)).await;
        assert!(!radio.is_running());
        assert_eq!(handle.start_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_stop_ends_burst_early() {
        let (mut radio, _handle) = MockBleRadio::new();

        radio.start(Duration::from_millis(2000)).await.unwrap();
        radio.stop().await.unwrap();
        assert!(!radio.is_running());
    }

    #[tokio::test]
    async fn fail_start_surfaces_error() {
        let (mut radio, handle) = MockBleRadio::new();
        handle.fail_start(true);

        assert!(radio.start(Duration::from_millis(2000)).await.is_err());
        assert!(!radio.is_running());
        assert_eq!(handle.start_count(), 0);
    }

    #[tokio::test]
    async fn injected_detections_drain() {
        let (mut radio, handle) = MockBleRadio::new();

        handle.inject_detection(BleDetection {
            mac: [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x01],
            name: Some("Tracker".to_string()),
            rssi_dbm: -48,
            connectable: true,
            manufacturer_id: Some(0x004C),
            timestamp: Utc::now(),
        });

        let detection = radio.poll_detection().unwrap();
        assert_eq!(detection.name.as_deref(), Some("Tracker"));
        assert!(radio.poll_detection().is_none());
    }
}
