//! Mock device implementations for testing and development.
//!
//! Every mock is created as a `(device, handle)` pair: the device side
//! implements the hardware trait and is handed to the scheduler, while the
//! handle stays with the test and drives the simulation (inject detections,
//! flip connection state, make operations fail). Handles are cheap clones
//! over shared state, so they remain usable after the device has been moved
//! into the scheduler.

pub mod ble;
pub mod external;
pub mod ir;
pub mod nfc;
pub mod subghz;
pub mod transport;

// Re-export commonly used types
pub use ble::{MockBleRadio, MockBleRadioHandle};
pub use external::{MockExternalRadio, MockExternalRadioHandle};
pub use ir::{MockIrReceiver, MockIrReceiverHandle};
pub use nfc::{MockNfcReader, MockNfcReaderHandle};
pub use subghz::{MockSubGhzRadio, MockSubGhzRadioHandle};
pub use transport::{MockTransport, MockTransportHandle};
