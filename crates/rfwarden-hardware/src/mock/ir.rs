//! Mock infrared receiver implementation for testing and development.

use crate::{HardwareError, Result, traits::IrReceiver};
use rfwarden_core::IrDetection;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Inner {
    running: bool,
    detections: VecDeque<IrDetection>,
    fail_start: bool,
    starts: u32,
    stops: u32,
}

/// Mock infrared receiver.
#[derive(Debug)]
pub struct MockIrReceiver {
    inner: Arc<Mutex<Inner>>,
}

impl MockIrReceiver {
    /// Create a new mock IR receiver.
    pub fn new() -> (Self, MockIrReceiverHandle) {
        let inner = Arc::new(Mutex::new(Inner {
            running: false,
            detections: VecDeque::new(),
            fail_start: false,
            starts: 0,
            stops: 0,
        }));

        let handle = MockIrReceiverHandle {
            inner: Arc::clone(&inner),
        };

        (Self { inner }, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl IrReceiver for MockIrReceiver {
    async fn start(&mut self) -> Result<()> {
        let mut inner = self.lock();
        if inner.fail_start {
            return Err(HardwareError::start_failed("IR receiver"));
        }
        inner.running = true;
        inner.starts += 1;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let mut inner = self.lock();
        inner.running = false;
        inner.stops += 1;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.lock().running
    }

    fn poll_detection(&mut self) -> Option<IrDetection> {
        self.lock().detections.pop_front()
    }
}

/// Handle for controlling a mock IR receiver.
#[derive(Debug, Clone)]
pub struct MockIrReceiverHandle {
    inner: Arc<Mutex<Inner>>,
}

impl MockIrReceiverHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulate a decoded IR signal.
    pub fn inject_detection(&self, detection: IrDetection) {
        self.lock().detections.push_back(detection);
    }

    /// Make subsequent `start` calls fail.
    pub fn fail_start(&self, fail: bool) {
        self.lock().fail_start = fail;
    }

    /// Simulate the receiver dying out from under the scheduler.
    pub fn kill(&self) {
        self.lock().running = false;
    }

    /// Whether the receiver is currently sampling.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Number of times the receiver was started.
    pub fn start_count(&self) -> u32 {
        self.lock().starts
    }

    /// Number of times the receiver was stopped.
    pub fn stop_count(&self) -> u32 {
        self.lock().stops
    }
}
