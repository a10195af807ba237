//! Core vocabulary for the rfwarden RF detection scheduler.
//!
//! This crate defines the types shared by every other rfwarden crate: the
//! scan activities the scheduler multiplexes, the caller's radio source
//! policy, the capability bitmask advertised by external radio modules, the
//! protocol-neutral detection records emitted to the application, and the
//! frequency/timing constants the scheduler runs on.
//!
//! Nothing in this crate touches hardware or spawns tasks; it is pure data.
//!
//! # Detection records
//!
//! Each scan activity produces its own record type ([`SubGhzDetection`],
//! [`BleDetection`], [`WifiNetworkDetection`], [`WifiProbeDetection`],
//! [`WifiDeauthDetection`], [`IrDetection`], [`NfcDetection`]). Records are
//! created the moment a frame is fully parsed, handed to the caller's
//! handler synchronously, and then discarded by the scheduler. The handler,
//! not the scheduler, owns persistence.

pub mod constants;
pub mod detections;
pub mod types;

pub use detections::{
    BleDetection, IrDetection, NfcDetection, SubGhzDetection, WifiDeauthDetection,
    WifiNetworkDetection, WifiProbeDetection, format_mac, is_broadcast_mac,
};
pub use types::{Capabilities, RadioSourcePreference, RadioSourceSettings, ScanKind, SubGhzPreset};
