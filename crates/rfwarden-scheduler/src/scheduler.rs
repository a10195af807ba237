//! Public control surface of the detection scheduler.

use crate::config::{DetectionHooks, SchedulerConfig};
use crate::error::{Result, SchedulerError};
use crate::runtime::{Command, Devices, Resources, Runtime, Shared};
use crate::stats::SchedulerStats;
use rfwarden_core::{Capabilities, RadioSourceSettings, ScanKind, constants::is_valid_frequency};
use rfwarden_hardware::{
    AnyBleRadio, AnyExternalRadio, AnyIrReceiver, AnyNfcReader, AnySubGhzRadio, AnyTransport,
    ExternalRadio, SharedResourceHandle,
};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

const COMMAND_QUEUE_DEPTH: usize = 16;

/// The RF detection scheduler.
///
/// Time-multiplexes Sub-GHz, BLE, WiFi, IR and NFC scanning over the
/// registered radios. Wiring order: register devices and transports,
/// `configure`, then `start`; the loop runs as a tokio task until `stop`,
/// which performs the unconditional teardown and hands the hardware back so
/// the scheduler can be started again.
///
/// # Examples
///
/// ```
/// use rfwarden_scheduler::{DetectionScheduler, SchedulerConfig};
/// use rfwarden_hardware::devices::AnySubGhzRadio;
/// use rfwarden_hardware::mock::MockSubGhzRadio;
///
/// #[tokio::main]
/// async fn main() -> rfwarden_scheduler::Result<()> {
///     let mut scheduler = DetectionScheduler::new();
///     let (radio, _handle) = MockSubGhzRadio::new();
///     scheduler.register_subghz(AnySubGhzRadio::Mock(radio));
///     scheduler.configure(SchedulerConfig::default())?;
///
///     scheduler.start()?;
///     assert!(scheduler.is_running());
///     scheduler.stop().await;
///
///     Ok(())
/// }
/// ```
pub struct DetectionScheduler {
    config: Option<SchedulerConfig>,
    hooks: DetectionHooks,
    devices: Option<Devices>,
    resources: Option<Resources>,
    shared: Arc<Shared>,
    commands: Option<mpsc::Sender<Command>>,
    task: Option<JoinHandle<(Devices, Resources)>>,
}

impl DetectionScheduler {
    /// Create a scheduler with no devices registered.
    pub fn new() -> Self {
        Self {
            config: None,
            hooks: DetectionHooks::default(),
            devices: Some(Devices::default()),
            resources: Some(Resources::default()),
            shared: Arc::new(Shared::new(RadioSourceSettings::default())),
            commands: None,
            task: None,
        }
    }

    // --- wiring (before start) ---------------------------------------------

    /// Register the internal Sub-GHz receiver.
    pub fn register_subghz(&mut self, radio: AnySubGhzRadio) {
        if let Some(devices) = self.devices.as_mut() {
            devices.subghz = Some(radio);
        }
    }

    /// Register the internal BLE scanner.
    pub fn register_ble(&mut self, radio: AnyBleRadio) {
        if let Some(devices) = self.devices.as_mut() {
            devices.ble = Some(radio);
        }
    }

    /// Register the infrared receiver.
    pub fn register_ir(&mut self, receiver: AnyIrReceiver) {
        if let Some(devices) = self.devices.as_mut() {
            devices.ir = Some(receiver);
        }
    }

    /// Register the NFC reader.
    pub fn register_nfc(&mut self, reader: AnyNfcReader) {
        if let Some(devices) = self.devices.as_mut() {
            devices.nfc = Some(reader);
        }
    }

    /// Attach an external radio module. Must be wired before `start` for
    /// external sources to participate in resolution.
    pub fn set_external_radio(&mut self, radio: AnyExternalRadio) {
        if let Some(devices) = self.devices.as_mut() {
            devices.external = Some(radio);
        }
    }

    /// Whether an external radio module is attached and connected.
    pub fn has_external_radio(&self) -> bool {
        self.devices
            .as_ref()
            .and_then(|d| d.external.as_ref())
            .is_some_and(|e| e.is_connected())
    }

    /// Capability bitmask of the attached module, if any.
    pub fn get_external_capabilities(&self) -> Option<Capabilities> {
        self.devices
            .as_ref()
            .and_then(|d| d.external.as_ref())
            .filter(|e| e.is_connected())
            .map(|e| e.capabilities())
    }

    /// Wire the Bluetooth serial link that contends with BLE scanning.
    pub fn set_bt_serial(&mut self, transport: AnyTransport) {
        if let Some(resources) = self.resources.as_mut() {
            resources.bt_serial = Some(SharedResourceHandle::new("BT serial", transport));
        }
    }

    /// Wire the USB CDC transport that contends with IR reception.
    pub fn set_usb_cdc(&mut self, transport: AnyTransport) {
        if let Some(resources) = self.resources.as_mut() {
            resources.usb_cdc = Some(SharedResourceHandle::new("USB CDC", transport));
        }
    }

    /// Install the detection delivery hooks.
    pub fn set_detection_hooks(&mut self, hooks: DetectionHooks) {
        self.hooks = hooks;
    }

    // --- configuration ------------------------------------------------------

    /// Validate and store the configuration. Must precede `start`; rejected
    /// while the loop is running.
    pub fn configure(&mut self, config: SchedulerConfig) -> Result<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        config.validate()?;
        *self.shared.sources() = config.sources;
        self.config = Some(config);
        Ok(())
    }

    // --- lifecycle ----------------------------------------------------------

    /// Spawn the scheduler loop.
    pub fn start(&mut self) -> Result<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }
        let config = self.config.clone().ok_or(SchedulerError::NotConfigured)?;
        let devices = self.devices.take().ok_or(SchedulerError::NotConfigured)?;
        let resources = self
            .resources
            .take()
            .ok_or(SchedulerError::NotConfigured)?;

        self.shared.stop.store(false, Ordering::SeqCst);
        *self.shared.stats() = SchedulerStats::default();
        *self.shared.sources() = config.sources;

        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_DEPTH);
        let runtime = Runtime::new(
            config,
            self.hooks.clone(),
            devices,
            resources,
            Arc::clone(&self.shared),
            rx,
        );
        self.commands = Some(tx);
        self.task = Some(tokio::spawn(runtime.run()));
        Ok(())
    }

    /// Stop the loop and wait for its unconditional teardown to finish.
    ///
    /// After this returns, every resource the scheduler paused has been
    /// resumed and the devices are available for a new `start`.
    pub async fn stop(&mut self) {
        self.shared.stop.store(true, Ordering::SeqCst);
        self.commands = None;
        if let Some(task) = self.task.take() {
            match task.await {
                Ok((devices, resources)) => {
                    self.devices = Some(devices);
                    self.resources = Some(resources);
                }
                Err(e) => {
                    // The loop panicked; the hardware handles are lost.
                    error!(error = %e, "scheduler task failed");
                }
            }
        }
    }

    /// Whether the loop task is running.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    // --- diagnostics --------------------------------------------------------

    /// Thread-safe snapshot of the session counters.
    pub fn get_stats(&self) -> SchedulerStats {
        self.shared.stats().clone()
    }

    /// The scan kind that most recently performed activity.
    pub fn get_current_slot(&self) -> ScanKind {
        self.shared.current_slot()
    }

    /// The currently tuned Sub-GHz frequency (Hz); 0 before the first tune.
    pub fn get_current_frequency(&self) -> u32 {
        self.shared.current_frequency.load(Ordering::SeqCst)
    }

    /// Whether the BLE scanner could acquire its contended resource right
    /// now (serial link free and not degraded).
    pub fn can_ble_scan(&self) -> bool {
        if self.is_running() {
            self.shared.ble_available.load(Ordering::SeqCst)
        } else {
            self.resources
                .as_ref()
                .and_then(|r| r.bt_serial.as_ref())
                .is_none_or(|bt| !bt.is_paused() && !bt.is_degraded())
        }
    }

    /// Whether the IR receiver could acquire its contended resource right
    /// now (USB free and not degraded).
    pub fn can_ir_scan(&self) -> bool {
        if self.is_running() {
            self.shared.ir_available.load(Ordering::SeqCst)
        } else {
            self.resources
                .as_ref()
                .and_then(|r| r.usb_cdc.as_ref())
                .is_none_or(|usb| !usb.is_paused() && !usb.is_degraded())
        }
    }

    // --- runtime mutations --------------------------------------------------

    /// Force an out-of-rotation Sub-GHz tune. Validated against the legal
    /// bands; applied at the next tick without moving the hop cursor.
    pub async fn set_frequency(&self, frequency_hz: u32) -> Result<()> {
        if !is_valid_frequency(frequency_hz) {
            return Err(SchedulerError::invalid_frequency(frequency_hz));
        }
        self.send(Command::SetFrequency(frequency_hz)).await
    }

    /// Suspend or resume Sub-GHz scanning (caller-driven, independent of
    /// resource contention).
    pub async fn pause_subghz(&self, paused: bool) -> Result<()> {
        self.send(Command::PauseSubGhz(paused)).await
    }

    /// Suspend or resume BLE scanning.
    pub async fn pause_ble(&self, paused: bool) -> Result<()> {
        self.send(Command::PauseBle(paused)).await
    }

    /// Suspend or resume WiFi scanning.
    pub async fn pause_wifi(&self, paused: bool) -> Result<()> {
        self.send(Command::PauseWifi(paused)).await
    }

    /// Replace the radio source preferences. While running, the update is
    /// consumed at the next tick boundary, never mid-burst; while stopped,
    /// it takes effect at the next `start`.
    pub async fn set_radio_sources(&mut self, settings: RadioSourceSettings) -> Result<()> {
        if self.is_running() {
            self.send(Command::SetRadioSources(settings)).await
        } else {
            *self.shared.sources() = settings;
            if let Some(config) = self.config.as_mut() {
                config.sources = settings;
            }
            Ok(())
        }
    }

    /// The radio source preferences currently in effect.
    pub fn get_radio_sources(&self) -> RadioSourceSettings {
        *self.shared.sources()
    }

    async fn send(&self, command: Command) -> Result<()> {
        let tx = self.commands.as_ref().ok_or(SchedulerError::NotRunning)?;
        tx.send(command)
            .await
            .map_err(|_| SchedulerError::NotRunning)
    }
}

impl Default for DetectionScheduler {
    fn default() -> Self {
        Self::new()
    }
}
