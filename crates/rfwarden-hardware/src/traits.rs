//! Radio and transport trait definitions.
//!
//! These traits establish the contract between the detection scheduler and
//! the underlying radios, enabling substitution between mock and real
//! hardware implementations. Control operations (start, stop, tune) are
//! native `async fn` methods (Edition 2024 RPITIT); state queries and frame
//! polling are synchronous and non-blocking because the scheduler calls them
//! on every tick of its cooperative loop and must never stall there.
//!
//! # Object safety and dynamic dispatch
//!
//! Traits with native `async fn` methods are not object-safe. For dynamic
//! dispatch, use the enum wrappers from the [`devices`](crate::devices)
//! module (`AnySubGhzRadio`, `AnyBleRadio`, ...), which provide concrete
//! type dispatch with zero-cost abstraction.

#![allow(async_fn_in_trait)]

use crate::command::{ExternalFrame, Opcode};
use crate::error::Result;
use rfwarden_core::{
    BleDetection, Capabilities, IrDetection, NfcDetection, SubGhzDetection, SubGhzPreset,
};
use std::time::Duration;

/// Internal Sub-GHz receiver.
///
/// The decoder runs inside the driver; the scheduler only observes it
/// through [`is_decode_active`](SubGhzRadio::is_decode_active) and defers
/// frequency hops and maintenance while a decode is in flight.
pub trait SubGhzRadio: Send {
    /// Start reception at the given center frequency (Hz).
    async fn start(&mut self, frequency_hz: u32) -> Result<()>;

    /// Stop reception.
    async fn stop(&mut self) -> Result<()>;

    /// Whether the receiver is currently running. Non-blocking.
    fn is_running(&self) -> bool;

    /// Retune to a new center frequency (Hz) without stopping.
    async fn set_frequency(&mut self, frequency_hz: u32) -> Result<()>;

    /// Currently tuned center frequency (Hz).
    fn frequency(&self) -> u32;

    /// Advance to the next modulation preset; returns the preset now active.
    async fn cycle_preset(&mut self) -> Result<SubGhzPreset>;

    /// Whether the decoder is mid-way through reconstructing a transmission.
    ///
    /// While true, the receiver must not be retuned or reset. Non-blocking.
    fn is_decode_active(&self) -> bool;

    /// Soft-reset the decoder state without recreating the receiver.
    ///
    /// Cheaper and less disruptive than a full stop/start; used by periodic
    /// maintenance to bound decoder memory growth.
    async fn soft_reset(&mut self) -> Result<()>;

    /// Take the next fully decoded detection, if one is pending. Non-blocking.
    fn poll_detection(&mut self) -> Option<SubGhzDetection>;
}

/// Internal BLE scanner.
///
/// Runs bounded-duration bursts: after [`start`](BleRadio::start) the
/// scanner stops itself once the requested duration elapses, and
/// [`is_running`](BleRadio::is_running) reports false again.
pub trait BleRadio: Send {
    /// Begin a burst scan of the given length.
    async fn start(&mut self, duration: Duration) -> Result<()>;

    /// Abort the current burst, if any.
    async fn stop(&mut self) -> Result<()>;

    /// Whether a burst is currently in flight. Non-blocking.
    fn is_running(&self) -> bool;

    /// Take the next observed advertisement, if one is pending. Non-blocking.
    fn poll_detection(&mut self) -> Option<BleDetection>;
}

/// Infrared receiver.
pub trait IrReceiver: Send {
    /// Start reception.
    async fn start(&mut self) -> Result<()>;

    /// Stop reception.
    async fn stop(&mut self) -> Result<()>;

    /// Whether the receiver is currently sampling. Non-blocking.
    fn is_running(&self) -> bool;

    /// Take the next decoded signal, if one is pending. Non-blocking.
    fn poll_detection(&mut self) -> Option<IrDetection>;
}

/// NFC passive reader.
pub trait NfcReader: Send {
    /// Start passive polling.
    async fn start(&mut self) -> Result<()>;

    /// Stop polling.
    async fn stop(&mut self) -> Result<()>;

    /// Whether the reader is currently polling. Non-blocking.
    fn is_running(&self) -> bool;

    /// Take the next tag sighting, if one is pending. Non-blocking.
    fn poll_detection(&mut self) -> Option<NfcDetection>;
}

/// A host-link transport that can be paused to free contended hardware.
///
/// Models the Bluetooth serial link (contends with the BLE radio) and the
/// USB CDC transport (contends with the IR receiver's DMA/timer). `pause`
/// and `resume` return success booleans rather than errors: a refused pause
/// is an expected arbitration outcome, not a fault.
pub trait PausableTransport: Send {
    /// Whether the transport is currently active. Non-blocking.
    fn is_running(&self) -> bool;

    /// Whether the transport is currently paused. Non-blocking.
    fn is_paused(&self) -> bool;

    /// Request a pause. Returns false if the transport refuses (for example
    /// mid-transmission); the caller must not proceed with the conflicting
    /// activity.
    async fn pause(&mut self) -> bool;

    /// Attempt to restore the transport to its active state.
    async fn resume(&mut self) -> bool;
}

/// An externally attached radio module (ESP32 or similar).
///
/// Addressed through an opcode/payload command protocol; decoded frames
/// arrive asynchronously and are drained by the scheduler each tick.
pub trait ExternalRadio: Send {
    /// Whether the module is currently attached and responsive. Non-blocking.
    fn is_connected(&self) -> bool;

    /// Capability bitmask the module advertised at attach time. Non-blocking.
    fn capabilities(&self) -> Capabilities;

    /// Send a command to the module.
    async fn send_command(&mut self, opcode: Opcode, payload: &[u8]) -> Result<()>;

    /// Take the next decoded inbound frame, if one is pending. Non-blocking.
    fn poll_frame(&mut self) -> Option<ExternalFrame>;
}
