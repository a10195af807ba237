//! Protocol-neutral detection records.
//!
//! Each scan activity converts raw frames into one of these records before
//! invoking the caller's handler. Records carry signal metadata (frequency,
//! channel, RSSI as applicable), an identifier or payload, and a capture
//! timestamp. The scheduler never stores them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The broadcast MAC address, FF:FF:FF:FF:FF:FF.
pub const BROADCAST_MAC: [u8; 6] = [0xFF; 6];

/// Whether `mac` is the broadcast address.
pub fn is_broadcast_mac(mac: &[u8; 6]) -> bool {
    *mac == BROADCAST_MAC
}

/// Format a MAC address as `AA:BB:CC:DD:EE:FF`.
pub fn format_mac(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

/// A decoded Sub-GHz transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubGhzDetection {
    /// Center frequency the signal was received on (Hz).
    pub frequency_hz: u32,

    /// Received signal strength (dBm).
    pub rssi_dbm: i8,

    /// Decoded protocol name, or "Unknown" for raw captures.
    pub protocol: String,

    /// Decoded payload bytes (protocol-specific).
    pub payload: Vec<u8>,

    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

/// A BLE advertisement observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BleDetection {
    /// Advertiser MAC address.
    pub mac: [u8; 6],

    /// Advertised device name, if present in the advertisement.
    pub name: Option<String>,

    /// Received signal strength (dBm).
    pub rssi_dbm: i8,

    /// Whether the advertisement indicates a connectable device.
    pub connectable: bool,

    /// Manufacturer ID from manufacturer-specific data, if present.
    ///
    /// Used downstream for tracker identification (AirTag, Tile, etc.);
    /// the scheduler only relays it.
    pub manufacturer_id: Option<u16>,

    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

impl BleDetection {
    /// Known tracker vendor for this advertisement's manufacturer ID.
    ///
    /// Coarse manufacturer-level match only; full pattern identification
    /// (AirTag vs. FindMy payload layouts, Tile service UUIDs) needs the
    /// raw advertisement data and lives in the BLE driver.
    pub fn tracker_vendor(&self) -> Option<&'static str> {
        match self.manufacturer_id? {
            0x004C => Some("Apple FindMy"),
            0x0075 => Some("Samsung SmartTag"),
            _ => None,
        }
    }
}

/// A WiFi network sighting (beacon or probe response).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiNetworkDetection {
    /// Network SSID; empty for hidden networks.
    pub ssid: String,

    /// Access point BSSID.
    pub bssid: [u8; 6],

    /// Channel the frame was received on.
    pub channel: u8,

    /// Received signal strength (dBm).
    pub rssi_dbm: i8,

    /// Whether the network hides its SSID.
    pub hidden: bool,

    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

/// A WiFi probe request observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiProbeDetection {
    /// Station that sent the probe.
    pub source_mac: [u8; 6],

    /// SSID being probed for; empty for broadcast probes.
    pub target_ssid: String,

    /// Received signal strength (dBm).
    pub rssi_dbm: i8,

    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

/// A WiFi deauthentication frame observation.
///
/// The `broadcast` flag distinguishes targeted deauths from broadcast
/// floods. Broadcast floods are a stronger attack signal; the scheduler does
/// not judge severity itself but preserves the distinction for the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WifiDeauthDetection {
    /// Access point BSSID the frame claims to come from.
    pub bssid: [u8; 6],

    /// Target station, or the broadcast address.
    pub target_mac: [u8; 6],

    /// 802.11 reason code carried by the frame.
    pub reason_code: u8,

    /// Received signal strength (dBm).
    pub rssi_dbm: i8,

    /// Whether the frame targets the broadcast address.
    pub broadcast: bool,

    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

impl WifiDeauthDetection {
    /// Build a record, deriving the `broadcast` flag from `target_mac`.
    pub fn new(bssid: [u8; 6], target_mac: [u8; 6], reason_code: u8, rssi_dbm: i8) -> Self {
        Self {
            bssid,
            target_mac,
            reason_code,
            rssi_dbm,
            broadcast: is_broadcast_mac(&target_mac),
            timestamp: Utc::now(),
        }
    }
}

/// A decoded infrared signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrDetection {
    /// Decoded protocol name (NEC, RC5, ...), or "Raw".
    pub protocol: String,

    /// Device address field.
    pub address: u32,

    /// Command code field.
    pub command: u32,

    /// Whether this was a repeat frame.
    pub repeat: bool,

    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

/// An NFC tag or card sighting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NfcDetection {
    /// Tag UID (4, 7 or 10 bytes).
    pub uid: Vec<u8>,

    /// Human-readable tag technology name.
    pub tag_type: String,

    /// Capture time.
    pub timestamp: DateTime<Utc>,
}

impl NfcDetection {
    /// UID as an uppercase hex string.
    pub fn uid_hex(&self) -> String {
        self.uid.iter().map(|b| format!("{:02X}", b)).collect()
    }
}
