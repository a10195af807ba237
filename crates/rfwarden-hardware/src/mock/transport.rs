//! Mock pausable transport implementation for testing and development.

use crate::traits::PausableTransport;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

#[derive(Debug, Default)]
struct Shared {
    running: AtomicBool,
    paused: AtomicBool,
    refuse_pause: AtomicBool,
    fail_resume: AtomicBool,
    pauses: AtomicU32,
    resumes: AtomicU32,
}

/// Mock host-link transport (BT serial, USB CDC).
///
/// State lives behind atomics so the handle can flip connection and failure
/// modes from the test while the transport itself is owned by a resource
/// handle inside the scheduler.
#[derive(Debug)]
pub struct MockTransport {
    shared: Arc<Shared>,
}

impl MockTransport {
    /// Create a new mock transport, initially not running.
    pub fn new() -> (Self, MockTransportHandle) {
        let shared = Arc::new(Shared::default());
        let handle = MockTransportHandle {
            shared: Arc::clone(&shared),
        };
        (Self { shared }, handle)
    }
}

impl PausableTransport for MockTransport {
    fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    async fn pause(&mut self) -> bool {
        if self.shared.refuse_pause.load(Ordering::SeqCst) {
            return false;
        }
        self.shared.paused.store(true, Ordering::SeqCst);
        self.shared.pauses.fetch_add(1, Ordering::SeqCst);
        true
    }

    async fn resume(&mut self) -> bool {
        if self.shared.fail_resume.load(Ordering::SeqCst) {
            return false;
        }
        self.shared.paused.store(false, Ordering::SeqCst);
        self.shared.resumes.fetch_add(1, Ordering::SeqCst);
        true
    }
}

/// Handle for controlling and observing a mock transport.
#[derive(Debug, Clone)]
pub struct MockTransportHandle {
    shared: Arc<Shared>,
}

impl MockTransportHandle {
    /// Set whether the transport reports itself active.
    pub fn set_running(&self, running: bool) {
        self.shared.running.store(running, Ordering::SeqCst);
    }

    /// Make subsequent pause requests be refused.
    pub fn refuse_pause(&self, refuse: bool) {
        self.shared.refuse_pause.store(refuse, Ordering::SeqCst);
    }

    /// Make subsequent resume attempts fail.
    pub fn fail_resume(&self, fail: bool) {
        self.shared.fail_resume.store(fail, Ordering::SeqCst);
    }

    /// Whether the transport is currently paused.
    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    /// Number of granted pauses.
    pub fn pause_count(&self) -> u32 {
        self.shared.pauses.load(Ordering::SeqCst)
    }

    /// Number of successful resumes.
    pub fn resume_count(&self) -> u32 {
        self.shared.resumes.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pause_resume_counts() {
        let (mut transport, handle) = MockTransport::new();
        handle.set_running(true);

        assert!(transport.pause().await);
        assert!(transport.is_paused());
        assert!(transport.resume().await);
        assert!(!transport.is_paused());

        assert_eq!(handle.pause_count(), 1);
        assert_eq!(handle.resume_count(), 1);
    }

    #[tokio::test]
    async fn refused_pause_leaves_state_untouched() {
        let (mut transport, handle) = MockTransport::new();
        handle.set_running(true);
        handle.refuse_pause(true);

        assert!(!transport.pause().await);
        assert!(!transport.is_paused());
        assert_eq!(handle.pause_count(), 0);
    }

    #[tokio::test]
    async fn failed_resume_stays_paused() {
        let (mut transport, handle) = MockTransport::new();
        handle.set_running(true);

        assert!(transport.pause().await);
        handle.fail_resume(true);
        assert!(!transport.resume().await);
        assert!(transport.is_paused());

        handle.fail_resume(false);
        assert!(transport.resume().await);
        assert!(!transport.is_paused());
    }
}
