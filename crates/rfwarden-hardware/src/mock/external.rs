//! Mock external radio module implementation for testing and development.

use crate::{
    HardwareError, Result,
    command::{ExternalFrame, Opcode},
    traits::ExternalRadio,
};
use rfwarden_core::Capabilities;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug)]
struct Inner {
    connected: bool,
    capabilities: Capabilities,
    commands: Vec<(Opcode, Vec<u8>)>,
    frames: VecDeque<ExternalFrame>,
    fail_commands: bool,
}

/// Mock external radio module.
///
/// Records every command the scheduler sends, so tests can assert on the
/// exact control traffic (which opcodes, which payloads, in what order),
/// and lets the test inject decoded frames and yank the connection.
#[derive(Debug)]
pub struct MockExternalRadio {
    inner: Arc<Mutex<Inner>>,
}

impl MockExternalRadio {
    /// Create a connected mock module advertising the given capabilities.
    pub fn new(capabilities: Capabilities) -> (Self, MockExternalRadioHandle) {
        let inner = Arc::new(Mutex::new(Inner {
            connected: true,
            capabilities,
            commands: Vec::new(),
            frames: VecDeque::new(),
            fail_commands: false,
        }));

        let handle = MockExternalRadioHandle {
            inner: Arc::clone(&inner),
        };

        (Self { inner }, handle)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ExternalRadio for MockExternalRadio {
    fn is_connected(&self) -> bool {
        self.lock().connected
    }

    fn capabilities(&self) -> Capabilities {
        self.lock().capabilities
    }

    async fn send_command(&mut self, opcode: Opcode, payload: &[u8]) -> Result<()> {
        let mut inner = self.lock();
        if !inner.connected {
            return Err(HardwareError::disconnected("external radio module"));
        }
        if inner.fail_commands {
            return Err(HardwareError::communication(format!(
                "command {opcode:?} rejected"
            )));
        }
        inner.commands.push((opcode, payload.to_vec()));
        Ok(())
    }

    fn poll_frame(&mut self) -> Option<ExternalFrame> {
        let mut inner = self.lock();
        if !inner.connected {
            return None;
        }
        inner.frames.pop_front()
    }
}

/// Handle for controlling and observing a mock external radio module.
#[derive(Debug, Clone)]
pub struct MockExternalRadioHandle {
    inner: Arc<Mutex<Inner>>,
}

impl MockExternalRadioHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Attach or detach the module.
    pub fn set_connected(&self, connected: bool) {
        self.lock().connected = connected;
    }

    /// Change the advertised capability bitmask.
    pub fn set_capabilities(&self, capabilities: Capabilities) {
        self.lock().capabilities = capabilities;
    }

    /// Make subsequent commands fail without disconnecting.
    pub fn fail_commands(&self, fail: bool) {
        self.lock().fail_commands = fail;
    }

    /// Queue a decoded frame for the scheduler to drain.
    pub fn inject_frame(&self, frame: ExternalFrame) {
        self.lock().frames.push_back(frame);
    }

    /// Every command sent so far, in order.
    pub fn commands(&self) -> Vec<(Opcode, Vec<u8>)> {
        self.lock().commands.clone()
    }

    /// Number of commands sent with the given opcode.
    pub fn command_count(&self, opcode: Opcode) -> usize {
        self.lock()
            .commands
            .iter()
            .filter(|(op, _)| *op == opcode)
            .count()
    }

    /// Forget all recorded commands.
    pub fn clear_commands(&self) {
        self.lock().commands.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::encode_frequency;
    use chrono::Utc;
    use rfwarden_core::WifiNetworkDetection;

    #[tokio::test]
    async fn records_commands_in_order() {
        let (mut radio, handle) =
            MockExternalRadio::new(Capabilities::SUBGHZ_RX | Capabilities::WIFI_SCAN);

        radio
            .send_command(Opcode::SubGhzSetFrequency, &encode_frequency(433_920_000))
            .await
            .unwrap();
        radio.send_command(Opcode::SubGhzRxStart, &[]).await.unwrap();

        let commands = handle.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].0, Opcode::SubGhzSetFrequency);
        assert_eq!(commands[0].1, encode_frequency(433_920_000).to_vec());
        assert_eq!(handle.command_count(Opcode::SubGhzRxStart), 1);
    }

    #[tokio::test]
    async fn disconnected_module_rejects_commands() {
        let (mut radio, handle) = MockExternalRadio::new(Capabilities::BLE_SCAN);
        handle.set_connected(false);

        assert!(!radio.is_connected());
        assert!(radio.send_command(Opcode::BleScanStart, &[]).await.is_err());
        assert!(handle.commands().is_empty());
    }

    #[tokio::test]
    async fn injected_frames_drain_in_order() {
        let (mut radio, handle) = MockExternalRadio::new(Capabilities::WIFI_SCAN);

        handle.inject_frame(ExternalFrame::WifiNetwork(WifiNetworkDetection {
            ssid: "CoffeeShop".to_string(),
            bssid: [0x00, 0x11, 0x22, 0x33, 0x44, 0x55],
            channel: 6,
            rssi_dbm: -55,
            hidden: false,
            timestamp: Utc::now(),
        }));

        assert!(matches!(
            radio.poll_frame(),
            Some(ExternalFrame::WifiNetwork(_))
        ));
        assert!(radio.poll_frame().is_none());
    }

    #[tokio::test]
    async fn disconnect_suppresses_pending_frames() {
        let (mut radio, handle) = MockExternalRadio::new(Capabilities::WIFI_SCAN);

        handle.inject_frame(ExternalFrame::WifiNetwork(WifiNetworkDetection {
            ssid: String::new(),
            bssid: [0xAA; 6],
            channel: 1,
            rssi_dbm: -80,
            hidden: true,
            timestamp: Utc::now(),
        }));
        handle.set_connected(false);

        assert!(radio.poll_frame().is_none());
    }
}
