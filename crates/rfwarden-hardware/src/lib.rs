//! Hardware abstraction layer for the RF Warden detection scheduler.
//!
//! This crate defines trait-based abstractions for every piece of radio
//! hardware the scheduler drives: the internal Sub-GHz receiver, BLE
//! scanner, IR receiver and NFC reader, the pausable host-link transports
//! they contend with, and the externally attached radio module. Mock
//! implementations of all of them are included for development and testing
//! without physical hardware.
//!
//! # Design Philosophy
//!
//! - **Async control, sync observation**: operations that touch hardware
//!   (start, stop, tune, pause) are native `async fn` in traits (Rust 1.90 +
//!   Edition 2024 RPITIT); state queries and detection polling are
//!   synchronous and non-blocking because the scheduler calls them on every
//!   tick and must never stall there.
//! - **Enum dispatch**: RPITIT traits are not object-safe, so polymorphism
//!   goes through the `Any*` wrappers in [`devices`] instead of
//!   `Box<dyn ...>`.
//! - **Arbitration is explicit**: shared transports are wrapped in
//!   [`SharedResourceHandle`], whose pause tokens make "paused but never
//!   resumed" impossible to express by accident.
//!
//! # Driving a radio
//!
//! ```no_run
//! use rfwarden_hardware::traits::SubGhzRadio;
//! use rfwarden_hardware::error::Result;
//!
//! async fn hop<R: SubGhzRadio>(radio: &mut R, frequency_hz: u32) -> Result<()> {
//!     if radio.is_decode_active() {
//!         // A transmission is being reconstructed; leave the tuner alone.
//!         return Ok(());
//!     }
//!     radio.set_frequency(frequency_hz).await
//! }
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T>`][error::Result] with
//! [`HardwareError`]. Pause and resume on transports deliberately return
//! booleans instead: a refused pause is an expected arbitration outcome the
//! scheduler handles by skipping a burst, not a fault.

pub mod command;
pub mod devices;
pub mod error;
pub mod mock;
pub mod resource;
pub mod traits;

// Re-export commonly used types for convenience
pub use command::{ExternalFrame, Opcode, encode_frequency};
pub use devices::{
    AnyBleRadio, AnyExternalRadio, AnyIrReceiver, AnyNfcReader, AnySubGhzRadio, AnyTransport,
};
pub use error::{HardwareError, Result};
pub use resource::{PauseToken, ResourceState, SharedResourceHandle};
pub use traits::{
    BleRadio, ExternalRadio, IrReceiver, NfcReader, PausableTransport, SubGhzRadio,
};
