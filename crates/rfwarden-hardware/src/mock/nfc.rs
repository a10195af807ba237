//! Mock NFC reader implementation for testing and development.

use crate::{Result, traits::NfcReader};
use rfwarden_core::NfcDetection;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Inner {
    running: bool,
    detections: VecDeque<NfcDetection>,
    starts: u32,
    stops: u32,
}

/// Mock NFC passive reader.
///
/// Counts start/stop cycles so tests can verify the maintenance pass
/// actually restarts the field.
#[derive(Debug)]
pub struct MockNfcReader {
    inner: Arc<Mutex<Inner>>,
}

impl MockNfcReader {
    /// Create a new mock NFC reader.
    pub fn new() -> (Self, MockNfcReaderHandle) {
        let inner = Arc::new(Mutex::new(Inner {
            running: false,
            detections: VecDeque::new(),
            starts: 0,
            stops: 0,
        }));

        let handle = MockNfcReaderHandle {
            inner: Arc::clone(&inner),
        };

        (Self { inner }, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NfcReader for MockNfcReader {
    async fn start(&mut self) -> Result<()> {
        let mut inner = self.lock();
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

    fn poll_detection(&mut self) -> Option<NfcDetection> {
        self.lock().detections.pop_front()
    }
}

/// Handle for controlling a mock NFC reader.
#[derive(Debug, Clone)]
pub struct MockNfcReaderHandle {
    inner: Arc<Mutex<Inner>>,
}

impl MockNfcReaderHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Simulate a tag entering the field.
    pub fn inject_detection(&self, detection: NfcDetection) {
        self.lock().detections.push_back(detection);
    }

    /// Whether the reader is currently polling.
    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Number of times the reader was started.
    pub fn start_count(&self) -> u32 {
        self.lock().starts
    }

    /// Number of times the reader was stopped.
    pub fn stop_count(&self) -> u32 {
        self.lock().stops
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn restart_counts_both_transitions() {
        let (mut reader, handle) = MockNfcReader::new();

        reader.start().await.unwrap();
        reader.stop().await.unwrap();
        reader.start().await.unwrap();

        assert!(reader.is_running());
        assert_eq!(handle.start_count(), 2);
        assert_eq!(handle.stop_count(), 1);
    }

    #[tokio::test]
    async fn injected_detections_drain() {
        let (mut reader, handle) = MockNfcReader::new();

        handle.inject_detection(NfcDetection {
            uid: vec![0x04, 0xAB, 0xCD, 0xEF],
            tag_type: "MIFARE Classic".to_string(),
            timestamp: Utc::now(),
        });

        assert_eq!(reader.poll_detection().unwrap().uid_hex(), "04ABCDEF");
        assert!(reader.poll_detection().is_none());
    }
}
