//! Enum wrappers for radio and transport dispatch.
//!
//! Native `async fn` in traits (RPITIT, Edition 2024) is not object-safe, so
//! `Box<dyn SubGhzRadio>` is not an option. These enums provide concrete
//! type dispatch instead: the scheduler stores `AnySubGhzRadio` and friends,
//! each match arm monomorphizes to the underlying driver, and new hardware
//! backends become new variants behind their feature flags.
//!
//! # Examples
//!
//! ```
//! use rfwarden_hardware::devices::AnySubGhzRadio;
//! use rfwarden_hardware::mock::MockSubGhzRadio;
//!
//! let (radio, _handle) = MockSubGhzRadio::new();
//! let any_radio = AnySubGhzRadio::Mock(radio);
//!
//! // Can now be driven polymorphically through the SubGhzRadio trait
//! ```

use crate::command::{ExternalFrame, Opcode};
use crate::mock::{
    MockBleRadio, MockExternalRadio, MockIrReceiver, MockNfcReader, MockSubGhzRadio,
    MockTransport,
};
use crate::traits::{
    BleRadio, ExternalRadio, IrReceiver, NfcReader, PausableTransport, SubGhzRadio,
};
use crate::Result;
use rfwarden_core::{
    BleDetection, Capabilities, IrDetection, NfcDetection, SubGhzDetection, SubGhzPreset,
};
use std::time::Duration;

/// Enum wrapper for Sub-GHz receiver dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnySubGhzRadio {
    /// Mock receiver for development and testing.
    Mock(MockSubGhzRadio),
    // Planned variants behind feature flags:
    // - Cc1101(Cc1101Radio) - hardware-cc1101
}

impl SubGhzRadio for AnySubGhzRadio {
    async fn start(&mut self, frequency_hz: u32) -> Result<()> {
        match self {
            Self::Mock(radio) => radio.start(frequency_hz).await,
        }
    }

    async fn stop(&mut self) -> Result<()> {
        match self {
            Self::Mock(radio) => radio.stop().await,
        }
    }

    fn is_running(&self) -> bool {
        match self {
            Self::Mock(radio) => radio.is_running(),
        }
    }

    async fn set_frequency(&mut self, frequency_hz: u32) -> Result<()> {
        match self {
            Self::Mock(radio) => radio.set_frequency(frequency_hz).await,
        }
    }

    fn frequency(&self) -> u32 {
        match self {
            Self::Mock(radio) => radio.frequency(),
        }
    }

    async fn cycle_preset(&mut self) -> Result<SubGhzPreset> {
        match self {
            Self::Mock(radio) => radio.cycle_preset().await,
        }
    }

    fn is_decode_active(&self) -> bool {
        match self {
            Self::Mock(radio) => radio.is_decode_active(),
        }
    }

    async fn soft_reset(&mut self) -> Result<()> {
        match self {
            Self::Mock(radio) => radio.soft_reset().await,
        }
    }

    fn poll_detection(&mut self) -> Option<SubGhzDetection> {
        match self {
            Self::Mock(radio) => radio.poll_detection(),
        }
    }
}

/// Enum wrapper for BLE scanner dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyBleRadio {
    /// Mock scanner for development and testing.
    Mock(MockBleRadio),
}

impl BleRadio for AnyBleRadio {
    async fn start(&mut self, duration: Duration) -> Result<()> {
        match self {
            Self::Mock(radio) => radio.start(duration).await,
        }
    }

    async fn stop(&mut self) -> Result<()> {
        match self {
            Self::Mock(radio) => radio.stop().await,
        }
    }

    fn is_running(&self) -> bool {
        match self {
            Self::Mock(radio) => radio.is_running(),
        }
    }

    fn poll_detection(&mut self) -> Option<BleDetection> {
        match self {
            Self::Mock(radio) => radio.poll_detection(),
        }
    }
}

/// Enum wrapper for infrared receiver dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyIrReceiver {
    /// Mock receiver for development and testing.
    Mock(MockIrReceiver),
}

impl IrReceiver for AnyIrReceiver {
    async fn start(&mut self) -> Result<()> {
        match self {
            Self::Mock(rx) => rx.start().await,
        }
    }

    async fn stop(&mut self) -> Result<()> {
        match self {
            Self::Mock(rx) => rx.stop().await,
        }
    }

    fn is_running(&self) -> bool {
        match self {
            Self::Mock(rx) => rx.is_running(),
        }
    }

    fn poll_detection(&mut self) -> Option<IrDetection> {
        match self {
            Self::Mock(rx) => rx.poll_detection(),
        }
    }
}

/// Enum wrapper for NFC reader dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyNfcReader {
    /// Mock reader for development and testing.
    Mock(MockNfcReader),
}

impl NfcReader for AnyNfcReader {
    async fn start(&mut self) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.start().await,
        }
    }

    async fn stop(&mut self) -> Result<()> {
        match self {
            Self::Mock(reader) => reader.stop().await,
        }
    }

    fn is_running(&self) -> bool {
        match self {
            Self::Mock(reader) => reader.is_running(),
        }
    }

    fn poll_detection(&mut self) -> Option<NfcDetection> {
        match self {
            Self::Mock(reader) => reader.poll_detection(),
        }
    }
}

/// Enum wrapper for pausable transport dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyTransport {
    /// Mock transport for development and testing.
    Mock(MockTransport),
    // Planned variants behind feature flags:
    // - Serial(SerialTransport) - hardware-serial
}

impl PausableTransport for AnyTransport {
    fn is_running(&self) -> bool {
        match self {
            Self::Mock(transport) => transport.is_running(),
        }
    }

    fn is_paused(&self) -> bool {
        match self {
            Self::Mock(transport) => transport.is_paused(),
        }
    }

    async fn pause(&mut self) -> bool {
        match self {
            Self::Mock(transport) => transport.pause().await,
        }
    }

    async fn resume(&mut self) -> bool {
        match self {
            Self::Mock(transport) => transport.resume().await,
        }
    }
}

/// Enum wrapper for external radio module dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyExternalRadio {
    /// Mock module for development and testing.
    Mock(MockExternalRadio),
    // Planned variants behind feature flags:
    // - Esp32(Esp32Module) - hardware-esp32
}

impl ExternalRadio for AnyExternalRadio {
    fn is_connected(&self) -> bool {
        match self {
            Self::Mock(radio) => radio.is_connected(),
        }
    }

    fn capabilities(&self) -> Capabilities {
        match self {
            Self::Mock(radio) => radio.capabilities(),
        }
    }

    async fn send_command(&mut self, opcode: Opcode, payload: &[u8]) -> Result<()> {
        match self {
            Self::Mock(radio) => radio.send_command(opcode, payload).await,
        }
    }

    fn poll_frame(&mut self) -> Option<ExternalFrame> {
        match self {
            Self::Mock(radio) => radio.poll_frame(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subghz_dispatch_reaches_mock() {
        let (radio, handle) = MockSubGhzRadio::new();
        let mut any_radio = AnySubGhzRadio::Mock(radio);

        any_radio.start(433_920_000).await.unwrap();
        assert!(any_radio.is_running());
        assert_eq!(any_radio.frequency(), 433_920_000);
        assert!(handle.is_running());
    }

    #[tokio::test]
    async fn external_dispatch_reaches_mock() {
        let (radio, handle) = MockExternalRadio::new(Capabilities::WIFI_SCAN);
        let mut any_radio = AnyExternalRadio::Mock(radio);

        assert!(any_radio.is_connected());
        any_radio
            .send_command(Opcode::WifiScanStart, &[])
            .await
            .unwrap();
        assert_eq!(handle.command_count(Opcode::WifiScanStart), 1);
    }
}
