//! Cooperative RF detection scheduler.
//!
//! Time-multiplexes a constrained set of radios over five scan activities
//! (Sub-GHz, BLE, WiFi, IR, NFC), arbitrating mutually exclusive hardware
//! (BLE scanning vs. the Bluetooth serial link, IR sampling vs. USB CDC)
//! and making forward-progress guarantees: no scan kind starves another,
//! and no shared resource is ever left paused after `stop`.
//!
//! # Architecture
//!
//! One spawned tokio task drives all coordinators in a fixed per-tick order
//! (frequency hop, BLE burst, WiFi relay, IR burst, NFC, maintenance).
//! Everything the loop touches is single-owner; the only shared state is a
//! mutex-guarded statistics snapshot and a handful of atomics, plus a
//! bounded command channel for runtime mutations, each applied at a tick
//! boundary rather than mid-activity.
//!
//! # Usage
//!
//! ```no_run
//! use rfwarden_scheduler::{DetectionHooks, DetectionScheduler, SchedulerConfig};
//! use rfwarden_hardware::devices::{AnyBleRadio, AnySubGhzRadio};
//! use rfwarden_hardware::mock::{MockBleRadio, MockSubGhzRadio};
//!
//! #[tokio::main]
//! async fn main() -> rfwarden_scheduler::Result<()> {
//!     let mut scheduler = DetectionScheduler::new();
//!
//!     let (subghz, _subghz_ctl) = MockSubGhzRadio::new();
//!     let (ble, _ble_ctl) = MockBleRadio::new();
//!     scheduler.register_subghz(AnySubGhzRadio::Mock(subghz));
//!     scheduler.register_ble(AnyBleRadio::Mock(ble));
//!
//!     scheduler.set_detection_hooks(DetectionHooks::new().on_subghz(|detection| {
//!         println!("{} Hz: {}", detection.frequency_hz, detection.protocol);
//!     }));
//!
//!     scheduler.configure(SchedulerConfig::default())?;
//!     scheduler.start()?;
//!     // ... scheduler hops, bursts, and relays until:
//!     scheduler.stop().await;
//!     Ok(())
//! }
//! ```

pub mod ble_burst;
pub mod config;
pub mod error;
pub mod hop;
pub mod ir_burst;
pub mod scheduler;
pub mod sources;
pub mod stats;
pub mod wifi_relay;

mod runtime;

// Re-export commonly used types for convenience
pub use config::{DetectionHook, DetectionHooks, EnabledKinds, SchedulerConfig};
pub use error::{Result, SchedulerError};
pub use runtime::{Devices, Resources};
pub use scheduler::DetectionScheduler;
pub use sources::{ActivePlan, SourcePlan, resolve};
pub use stats::SchedulerStats;
