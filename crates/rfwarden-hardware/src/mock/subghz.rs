//! Mock Sub-GHz receiver implementation for testing and development.

use crate::{HardwareError, Result, traits::SubGhzRadio};
use rfwarden_core::{SubGhzDetection, SubGhzPreset};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Inner {
    running: bool,
    frequency_hz: u32,
    preset: SubGhzPreset,
    decode_active: bool,
    detections: VecDeque<SubGhzDetection>,
    fail_start: bool,
    soft_resets: u32,
    frequency_history: Vec<u32>,
}

/// Mock Sub-GHz receiver.
///
/// Records every frequency it is tuned to and exposes a controllable
/// decode-active flag, so tests can verify hop sequencing and hop deferral.
///
/// # Examples
///
/// ```
/// use rfwarden_hardware::mock::MockSubGhzRadio;
/// use rfwarden_hardware::traits::SubGhzRadio;
///
/// #[tokio::main]
/// async fn main() -> rfwarden_hardware::Result<()> {
///     let (mut radio, handle) = MockSubGhzRadio::new();
///
///     radio.start(433_920_000).await?;
///     assert!(radio.is_running());
///     assert_eq!(handle.frequency_history(), vec![433_920_000]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockSubGhzRadio {
    inner: Arc<Mutex<Inner>>,
}

impl MockSubGhzRadio {
    /// Create a new mock Sub-GHz receiver.
    pub fn new() -> (Self, MockSubGhzRadioHandle) {
        let inner = Arc::new(Mutex::new(Inner {
            running: false,
            frequency_hz: 0,
            preset: SubGhzPreset::default(),
            decode_active: false,
            detections: VecDeque::new(),
            fail_start: false,
            soft_resets: 0,
            frequency_history: Vec::new(),
        }));

        let handle = MockSubGhzRadioHandle {
            inner: Arc::clone(&inner),
        };

        (Self { inner }, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SubGhzRadio for MockSubGhzRadio {
    async fn start(&mut self, frequency_hz: u32) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_start {
            return Err(HardwareError::start_failed("Sub-GHz receiver"));
        }
        inner.running = true;
        inner.frequency_hz = frequency_hz;
        inner.frequency_history.push(frequency_hz);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let mut inner = self.lock();
        inner.running = false;
        inner.decode_active = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.lock().running
    }

    async fn set_frequency(&mut self, frequency_hz: u32) -> Result<()> {
        let mut inner = self.lock();
        inner.frequency_hz = frequency_hz;
        inner.frequency_history.push(frequency_hz);
        Ok(())
    }

    fn frequency(&self) -> u32 {
        self.lock().frequency_hz
    }

    async fn cycle_preset(&mut self) -> Result<SubGhzPreset> {
        let mut inner = self.lock();
        inner.preset = inner.preset.next();
        Ok(inner.preset)
    }

    fn is_decode_active(&self) -> bool {
        self.lock().decode_active
    }

    async fn soft_reset(&mut self) -> Result<()> {
        let mut inner = self.lock();
        inner.soft_resets += 1;
        inner.decode_active = false;
        Ok(())
    }

    fn poll_detection(&mut self) -> Option<SubGhzDetection> {
        self.lock().detections.pop_front()
    }
}

/// Handle for controlling a mock Sub-GHz receiver.
#[derive(Debug, Clone)]
pub struct MockSubGhzRadioHandle {
    inner: Arc<Mutex<Inner>>,
}

impl MockSubGhzRadioHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulate a decoded transmission being ready to collect.
    pub fn inject_detection(&self, detection: SubGhzDetection) {
        self.lock().detections.push_back(detection);
    }

    /// Mark the decoder as mid-transmission (hops and resets must defer).
    pub fn set_decode_active(&self, active: bool) {
        self.lock().decode_active = active;
    }

    /// Make subsequent `start` calls fail.
    pub fn fail_start(&self, fail: bool) {
        self.lock().fail_start = fail;
    }

    /// Whether the receiver is currently running.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Every frequency the receiver has been tuned to, in order.
    pub fn frequency_history(&self) -> Vec<u32> {
        self.lock().frequency_history.clone()
    }

    /// Currently tuned frequency.
    pub fn frequency(&self) -> u32 {
        self.lock().frequency_hz
    }

    /// Currently selected modulation preset.
    pub fn preset(&self) -> SubGhzPreset {
        self.lock().preset
    }

    /// Number of decoder soft resets performed.
    pub fn soft_reset_count(&self) -> u32 {
        self.lock().soft_resets
    }
}
