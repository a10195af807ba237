//! External radio module command opcodes and inbound frames.
//!
//! The byte encoding of the command protocol lives in the module firmware
//! and the transport layer; this side only names the opcodes it issues and
//! the decoded frames it receives.

use rfwarden_core::{
    BleDetection, SubGhzDetection, WifiDeauthDetection, WifiNetworkDetection, WifiProbeDetection,
};

/// Command opcodes understood by the external radio module.
///
/// Discriminants are the module protocol's command bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Liveness check.
    Ping = 0x01,

    /// Begin WiFi scanning.
    WifiScanStart = 0x10,

    /// Stop WiFi scanning.
    WifiScanStop = 0x11,

    /// Lock WiFi to a channel (payload: channel byte; 0 = hop).
    WifiSetChannel = 0x12,

    /// Tune the module's Sub-GHz receiver (payload: u32 Hz, big-endian).
    SubGhzSetFrequency = 0x20,

    /// Begin Sub-GHz reception.
    SubGhzRxStart = 0x22,

    /// Stop Sub-GHz reception.
    SubGhzRxStop = 0x23,

    /// Begin a BLE scan burst.
    BleScanStart = 0x30,

    /// Stop BLE scanning.
    BleScanStop = 0x31,
}

impl Opcode {
    /// The wire command byte.
    pub fn as_byte(&self) -> u8 {
        *self as u8
    }
}

/// Encode a frequency for a [`Opcode::SubGhzSetFrequency`] payload.
pub fn encode_frequency(frequency_hz: u32) -> [u8; 4] {
    frequency_hz.to_be_bytes()
}

/// A decoded inbound frame from the external radio module.
///
/// The transport layer has already parsed the module's wire format; the
/// scheduler only routes these to the matching detection pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ExternalFrame {
    /// WiFi network sighting (beacon or probe response).
    WifiNetwork(WifiNetworkDetection),

    /// WiFi probe request observation.
    WifiProbe(WifiProbeDetection),

    /// WiFi deauthentication frame observation.
    WifiDeauth(WifiDeauthDetection),

    /// Sub-GHz detection from the module's receiver.
    SubGhz(SubGhzDetection),

    /// BLE advertisement from the module's scanner.
    Ble(BleDetection),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opcode_bytes_match_protocol() {
        assert_eq!(Opcode::WifiScanStart.as_byte(), 0x10);
        assert_eq!(Opcode::SubGhzSetFrequency.as_byte(), 0x20);
        assert_eq!(Opcode::SubGhzRxStop.as_byte(), 0x23);
        assert_eq!(Opcode::BleScanStart.as_byte(), 0x30);
    }

    #[test]
    fn frequency_payload_is_big_endian() {
        assert_eq!(encode_frequency(433_920_000), [0x19, 0xDD, 0x18, 0x00]);
    }
}
