//! The scheduler's cooperative loop.
//!
//! One spawned task owns every device and coordinator for the lifetime of a
//! session. Each tick runs the sections in fixed order (hop, BLE, WiFi
//! relay, IR, NFC, maintenance), so no scan kind can starve another of the
//! tick budget. Control calls from other tasks arrive through a bounded
//! command channel drained once per tick; the only state shared outward is
//! the snapshot in [`Shared`].
//!
//! The loop returns its devices and resources when it exits, so the
//! scheduler can be restarted with the same hardware.

use crate::ble_burst::BleBurstCoordinator;
use crate::config::{DetectionHooks, SchedulerConfig};
use crate::hop::HopController;
use crate::ir_burst::IrBurstCoordinator;
use crate::sources::ActivePlan;
use crate::stats::SchedulerStats;
use crate::wifi_relay::WifiRelay;
use rfwarden_core::{RadioSourceSettings, ScanKind, constants::NFC_RESTART_DELAY_MS};
use rfwarden_hardware::{
    AnyBleRadio, AnyExternalRadio, AnyIrReceiver, AnyNfcReader, AnySubGhzRadio, AnyTransport,
    BleRadio, ExternalFrame, ExternalRadio, IrReceiver, NfcReader, Opcode, SharedResourceHandle,
    SubGhzRadio, encode_frequency,
};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

/// Internal radio drivers the loop owns while running.
#[derive(Debug, Default)]
pub struct Devices {
    pub subghz: Option<AnySubGhzRadio>,
    pub ble: Option<AnyBleRadio>,
    pub ir: Option<AnyIrReceiver>,
    pub nfc: Option<AnyNfcReader>,
    pub external: Option<AnyExternalRadio>,
}

/// Shared transports the loop arbitrates while running.
#[derive(Debug, Default)]
pub struct Resources {
    pub bt_serial: Option<SharedResourceHandle<AnyTransport>>,
    pub usb_cdc: Option<SharedResourceHandle<AnyTransport>>,
}

/// Runtime mutations delivered to the loop, applied at tick boundaries.
#[derive(Debug, Clone)]
pub(crate) enum Command {
    SetFrequency(u32),
    PauseSubGhz(bool),
    PauseBle(bool),
    PauseWifi(bool),
    SetRadioSources(RadioSourceSettings),
}

/// State shared between the loop and the control surface.
#[derive(Debug)]
pub(crate) struct Shared {
    pub stats: Mutex<SchedulerStats>,
    pub sources: Mutex<RadioSourceSettings>,
    pub current_slot: Mutex<ScanKind>,
    pub current_frequency: AtomicU32,
    pub stop: AtomicBool,
    pub ble_available: AtomicBool,
    pub ir_available: AtomicBool,
}

impl Shared {
    pub fn new(sources: RadioSourceSettings) -> Self {
        Self {
            stats: Mutex::new(SchedulerStats::default()),
            sources: Mutex::new(sources),
            current_slot: Mutex::new(ScanKind::SubGhz),
            current_frequency: AtomicU32::new(0),
            stop: AtomicBool::new(false),
            ble_available: AtomicBool::new(true),
            ir_available: AtomicBool::new(true),
        }
    }

    pub fn stats(&self) -> MutexGuard<'_, SchedulerStats> {
        self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn sources(&self) -> MutexGuard<'_, RadioSourceSettings> {
        self.sources.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn current_slot(&self) -> ScanKind {
        *self
            .current_slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }

    fn set_slot(&self, kind: ScanKind) {
        *self
            .current_slot
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = kind;
    }
}

/// Caller-driven suspension flags, independent of resource contention.
#[derive(Debug, Default, Clone, Copy)]
struct PausedKinds {
    subghz: bool,
    ble: bool,
    wifi: bool,
}

pub(crate) struct Runtime {
    config: SchedulerConfig,
    hooks: DetectionHooks,
    devices: Devices,
    resources: Resources,
    shared: Arc<Shared>,
    commands: mpsc::Receiver<Command>,
    plan: ActivePlan,
    hop: HopController,
    ble: BleBurstCoordinator,
    ir: IrBurstCoordinator,
    wifi: WifiRelay,
    paused: PausedKinds,
    last_maintenance: Instant,
    started_at: Instant,
}

impl Runtime {
    pub fn new(
        config: SchedulerConfig,
        hooks: DetectionHooks,
        devices: Devices,
        resources: Resources,
        shared: Arc<Shared>,
        commands: mpsc::Receiver<Command>,
    ) -> Self {
        let now = Instant::now();
        let capabilities = devices
            .external
            .as_ref()
            .filter(|e| e.is_connected())
            .map(|e| e.capabilities());
        let plan = ActivePlan::resolve(&config.sources, capabilities);

        let hop = HopController::new(
            config.frequency_table.clone(),
            config.subghz_hop_interval,
            now,
        );
        let ble = BleBurstCoordinator::new(config.ble_scan_interval, now);
        let ir = IrBurstCoordinator::new(config.ir_scan_duration, config.ir_scan_interval, now);
        let wifi = WifiRelay::new(config.wifi_scan_interval, now);

        Self {
            config,
            hooks,
            devices,
            resources,
            shared,
            commands,
            plan,
            hop,
            ble,
            ir,
            wifi,
            paused: PausedKinds::default(),
            last_maintenance: now,
            started_at: now,
        }
    }

    /// Drive the loop until the stop flag is observed, then tear down and
    /// hand the hardware back.
    pub async fn run(mut self) -> (Devices, Resources) {
        self.startup().await;
        loop {
            if self.shared.stop.load(Ordering::SeqCst) {
                break;
            }
            self.drain_commands().await;
            self.tick().await;
            self.publish();
            sleep(self.config.tick_period).await;
        }
        self.teardown().await;
        (self.devices, self.resources)
    }

    // --- startup / teardown -------------------------------------------------

    async fn startup(&mut self) {
        info!(plan = ?self.plan, "scheduler starting");

        if self.config.enabled.subghz {
            let frequency_hz = self.hop.current_frequency();
            if self.plan.subghz.internal {
                if let Some(radio) = self.devices.subghz.as_mut() {
                    if let Err(e) = radio.start(frequency_hz).await {
                        warn!(error = %e, "internal Sub-GHz start failed");
                    }
                }
            }
            if self.plan.subghz.external {
                self.send_external(Opcode::SubGhzSetFrequency, &encode_frequency(frequency_hz))
                    .await;
                self.send_external(Opcode::SubGhzRxStart, &[]).await;
            }
            self.shared
                .current_frequency
                .store(frequency_hz, Ordering::SeqCst);
        }

        if self.config.enabled.wifi && self.plan.wifi.external {
            self.send_external(Opcode::WifiSetChannel, &[self.config.wifi_channel])
                .await;
            self.send_external(Opcode::WifiScanStart, &[]).await;
        }

        if self.config.enabled.ir && !self.usb_active() {
            if let Some(rx) = self.devices.ir.as_mut() {
                if let Err(e) = rx.start().await {
                    warn!(error = %e, "IR start failed");
                }
            }
        }

        if self.config.enabled.nfc {
            if let Some(reader) = self.devices.nfc.as_mut() {
                if let Err(e) = reader.start().await {
                    warn!(error = %e, "NFC start failed");
                }
            }
        }
    }

    /// Unconditional teardown: no code path may leave a shared resource
    /// paused after this returns.
    async fn teardown(&mut self) {
        if let Some(radio) = self.devices.subghz.as_mut() {
            if radio.is_running() {
                if let Err(e) = radio.stop().await {
                    warn!(error = %e, "Sub-GHz stop failed");
                }
            }
        }
        if let Some(radio) = self.devices.ble.as_mut() {
            if radio.is_running() {
                if let Err(e) = radio.stop().await {
                    warn!(error = %e, "BLE stop failed");
                }
            }
        }
        if let Some(rx) = self.devices.ir.as_mut() {
            if rx.is_running() {
                if let Err(e) = rx.stop().await {
                    warn!(error = %e, "IR stop failed");
                }
            }
        }
        if let Some(reader) = self.devices.nfc.as_mut() {
            if reader.is_running() {
                if let Err(e) = reader.stop().await {
                    warn!(error = %e, "NFC stop failed");
                }
            }
        }

        // Outstanding burst tokens, then a blanket resume on both links.
        self.ble.abort_internal();
        self.ir.abort();
        if let Some(bt) = self.resources.bt_serial.as_mut() {
            bt.force_resume().await;
        }
        if let Some(usb) = self.resources.usb_cdc.as_mut() {
            usb.force_resume().await;
        }

        if self.plan.subghz.external {
            self.send_external(Opcode::SubGhzRxStop, &[]).await;
        }
        if self.plan.ble.external {
            self.send_external(Opcode::BleScanStop, &[]).await;
        }
        if self.plan.wifi.external {
            self.send_external(Opcode::WifiScanStop, &[]).await;
        }

        info!("scheduler stopped");
    }

    // --- command handling ---------------------------------------------------

    async fn drain_commands(&mut self) {
        while let Ok(command) = self.commands.try_recv() {
            match command {
                Command::SetFrequency(frequency_hz) => {
                    self.force_frequency(frequency_hz).await;
                }
                Command::PauseSubGhz(paused) => self.set_subghz_paused(paused).await,
                Command::PauseBle(paused) => self.set_ble_paused(paused).await,
                Command::PauseWifi(paused) => self.set_wifi_paused(paused).await,
                Command::SetRadioSources(settings) => self.apply_sources(settings).await,
            }
        }
    }

    /// Out-of-rotation tune; the hop cursor is untouched and the next due
    /// hop returns to the table.
    async fn force_frequency(&mut self, frequency_hz: u32) {
        info!(frequency_hz, "forced frequency");
        if self.plan.subghz.internal {
            if let Some(radio) = self.devices.subghz.as_mut() {
                if let Err(e) = radio.set_frequency(frequency_hz).await {
                    warn!(error = %e, "forced tune failed");
                }
            }
        }
        if self.plan.subghz.external {
            self.send_external(Opcode::SubGhzSetFrequency, &encode_frequency(frequency_hz))
                .await;
        }
        self.shared
            .current_frequency
            .store(frequency_hz, Ordering::SeqCst);
    }

    async fn set_subghz_paused(&mut self, paused: bool) {
        if self.paused.subghz == paused {
            return;
        }
        self.paused.subghz = paused;
        info!(paused, "Sub-GHz pause state changed");
        if paused {
            if let Some(radio) = self.devices.subghz.as_mut() {
                if radio.is_running() {
                    if let Err(e) = radio.stop().await {
                        warn!(error = %e, "Sub-GHz stop failed");
                    }
                }
            }
            if self.plan.subghz.external {
                self.send_external(Opcode::SubGhzRxStop, &[]).await;
            }
        } else {
            let frequency_hz = self.hop.current_frequency();
            if self.plan.subghz.internal {
                if let Some(radio) = self.devices.subghz.as_mut() {
                    if let Err(e) = radio.start(frequency_hz).await {
                        warn!(error = %e, "Sub-GHz restart failed");
                    }
                }
            }
            if self.plan.subghz.external {
                self.send_external(Opcode::SubGhzSetFrequency, &encode_frequency(frequency_hz))
                    .await;
                self.send_external(Opcode::SubGhzRxStart, &[]).await;
            }
            self.shared
                .current_frequency
                .store(frequency_hz, Ordering::SeqCst);
        }
    }

    async fn set_ble_paused(&mut self, paused: bool) {
        if self.paused.ble == paused {
            return;
        }
        self.paused.ble = paused;
        info!(paused, "BLE pause state changed");
        if paused {
            if self.ble.internal_in_flight() {
                if let Some(radio) = self.devices.ble.as_mut() {
                    if let Err(e) = radio.stop().await {
                        warn!(error = %e, "BLE stop failed");
                    }
                }
                let token = self.ble.abort_internal();
                if let (Some(token), Some(bt)) = (token, self.resources.bt_serial.as_mut()) {
                    bt.resume(token).await;
                }
            }
            if self.plan.ble.external {
                self.send_external(Opcode::BleScanStop, &[]).await;
            }
        }
        // Unpausing needs no immediate action; bursts resume on interval.
    }

    async fn set_wifi_paused(&mut self, paused: bool) {
        if self.paused.wifi == paused {
            return;
        }
        self.paused.wifi = paused;
        info!(paused, "WiFi pause state changed");
        if self.plan.wifi.external {
            if paused {
                self.send_external(Opcode::WifiScanStop, &[]).await;
            } else {
                self.send_external(Opcode::WifiSetChannel, &[self.config.wifi_channel])
                    .await;
                self.send_external(Opcode::WifiScanStart, &[]).await;
            }
        }
    }

    /// Consume a radio-source update at the tick boundary: re-resolve the
    /// plan and reconcile running hardware with it.
    async fn apply_sources(&mut self, settings: RadioSourceSettings) {
        let old = self.plan;
        *self.shared.sources.lock().unwrap_or_else(|e| e.into_inner()) = settings;

        let capabilities = self
            .devices
            .external
            .as_ref()
            .filter(|e| e.is_connected())
            .map(|e| e.capabilities());
        self.plan = ActivePlan::resolve(&settings, capabilities);
        info!(plan = ?self.plan, "radio sources updated");

        if self.config.enabled.subghz && !self.paused.subghz {
            let frequency_hz = self.hop.current_frequency();
            if old.subghz.internal && !self.plan.subghz.internal {
                if let Some(radio) = self.devices.subghz.as_mut() {
                    if radio.is_running() {
                        if let Err(e) = radio.stop().await {
                            warn!(error = %e, "Sub-GHz stop failed");
                        }
                    }
                }
            }
            if !old.subghz.internal && self.plan.subghz.internal {
                if let Some(radio) = self.devices.subghz.as_mut() {
                    if let Err(e) = radio.start(frequency_hz).await {
                        warn!(error = %e, "Sub-GHz start failed");
                    }
                }
            }
            if old.subghz.external && !self.plan.subghz.external {
                self.send_external(Opcode::SubGhzRxStop, &[]).await;
            }
            if !old.subghz.external && self.plan.subghz.external {
                self.send_external(Opcode::SubGhzSetFrequency, &encode_frequency(frequency_hz))
                    .await;
                self.send_external(Opcode::SubGhzRxStart, &[]).await;
            }
        }

        if self.config.enabled.ble && !self.paused.ble {
            if old.ble.internal && !self.plan.ble.internal && self.ble.internal_in_flight() {
                if let Some(radio) = self.devices.ble.as_mut() {
                    if let Err(e) = radio.stop().await {
                        warn!(error = %e, "BLE stop failed");
                    }
                }
                let token = self.ble.abort_internal();
                if let (Some(token), Some(bt)) = (token, self.resources.bt_serial.as_mut()) {
                    bt.resume(token).await;
                }
            }
            if old.ble.external && !self.plan.ble.external {
                self.send_external(Opcode::BleScanStop, &[]).await;
            }
        }

        if self.config.enabled.wifi && !self.paused.wifi {
            if old.wifi.external && !self.plan.wifi.external {
                self.send_external(Opcode::WifiScanStop, &[]).await;
            }
            if !old.wifi.external && self.plan.wifi.external {
                self.send_external(Opcode::WifiSetChannel, &[self.config.wifi_channel])
                    .await;
                self.send_external(Opcode::WifiScanStart, &[]).await;
            }
        }
    }

    // --- tick sections ------------------------------------------------------

    async fn tick(&mut self) {
        let now = Instant::now();
        self.tick_subghz(now).await;
        self.tick_ble(now).await;
        self.tick_wifi(now).await;
        self.tick_ir(now).await;
        self.tick_nfc();
        self.maintenance(now).await;
    }

    fn decode_active(&self) -> bool {
        self.plan.subghz.internal
            && self
                .devices
                .subghz
                .as_ref()
                .is_some_and(|r| r.is_decode_active())
    }

    async fn tick_subghz(&mut self, now: Instant) {
        if !self.config.enabled.subghz || self.paused.subghz || !self.plan.subghz.any() {
            return;
        }

        let decode_active = self.decode_active();
        if let Some(step) = self.hop.tick(now, decode_active) {
            if self.plan.subghz.internal {
                if let Some(radio) = self.devices.subghz.as_mut() {
                    if step.cycle_preset {
                        match radio.cycle_preset().await {
                            Ok(preset) => debug!(?preset, "preset cycled"),
                            Err(e) => warn!(error = %e, "preset cycle failed"),
                        }
                    }
                    if let Err(e) = radio.set_frequency(step.frequency_hz).await {
                        warn!(error = %e, "hop tune failed");
                    }
                }
            }
            if self.plan.subghz.external {
                self.send_external(
                    Opcode::SubGhzSetFrequency,
                    &encode_frequency(step.frequency_hz),
                )
                .await;
            }
            self.shared
                .current_frequency
                .store(step.frequency_hz, Ordering::SeqCst);
            self.shared.set_slot(ScanKind::SubGhz);
        }

        if let Some(radio) = self.devices.subghz.as_mut() {
            while let Some(detection) = radio.poll_detection() {
                self.shared.stats().subghz_detections += 1;
                if let Some(hook) = &self.hooks.on_subghz {
                    hook(&detection);
                }
            }
        }
    }

    async fn tick_ble(&mut self, now: Instant) {
        if !self.config.enabled.ble || self.paused.ble || !self.plan.ble.any() {
            return;
        }

        // A burst completes when the internal scanner reports not-running;
        // resume the serial link the moment it does.
        if self.ble.internal_in_flight() {
            let running = self
                .devices
                .ble
                .as_ref()
                .is_some_and(|radio| radio.is_running());
            if !running {
                let token = self.ble.complete_internal();
                if let (Some(token), Some(bt)) = (token, self.resources.bt_serial.as_mut()) {
                    bt.resume(token).await;
                }
                debug!(bursts = self.ble.burst_count(), "BLE burst complete");
            }
        }

        if self.ble.due(now) {
            self.ble.note_cycle(now);

            if self.plan.ble.internal && self.devices.ble.is_some() {
                self.begin_internal_ble_burst().await;
            }
            if self.plan.ble.external {
                // External modules do not share the serial link.
                self.send_external(Opcode::BleScanStart, &[]).await;
                self.shared.set_slot(ScanKind::Ble);
            }
        }

        if let Some(radio) = self.devices.ble.as_mut() {
            while let Some(detection) = radio.poll_detection() {
                if self.config.tracker_focus {
                    if let Some(vendor) = detection.tracker_vendor() {
                        info!(
                            vendor,
                            mac = %rfwarden_core::format_mac(&detection.mac),
                            rssi_dbm = detection.rssi_dbm,
                            "tracker-pattern advertisement"
                        );
                    }
                }
                self.shared.stats().ble_detections += 1;
                if let Some(hook) = &self.hooks.on_ble {
                    hook(&detection);
                }
            }
        }
    }

    async fn begin_internal_ble_burst(&mut self) {
        // Pause the serial link first if it is active; a refused pause
        // skips this cycle (the link might be mid-transmission).
        let mut token = None;
        if let Some(bt) = self.resources.bt_serial.as_mut() {
            if bt.is_active() {
                match bt.try_pause(ScanKind::Ble).await {
                    Some(t) => token = Some(t),
                    None => {
                        debug!("BLE burst skipped: serial link busy");
                        return;
                    }
                }
            }
        }

        let started = match self.devices.ble.as_mut() {
            Some(radio) => match radio.start(self.config.ble_scan_duration).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "BLE burst start failed");
                    false
                }
            },
            None => false,
        };

        if started {
            self.ble.begin_internal(token);
            self.shared.set_slot(ScanKind::Ble);
        } else if let (Some(token), Some(bt)) = (token, self.resources.bt_serial.as_mut()) {
            // Start failed after a successful pause: give the link back now.
            bt.resume(token).await;
        }
    }

    async fn tick_wifi(&mut self, now: Instant) {
        if self.config.enabled.wifi
            && !self.paused.wifi
            && self.plan.wifi.external
            && self.external_connected()
            && self.wifi.tick(now)
        {
            self.shared.set_slot(ScanKind::Wifi);
        }

        self.pump_external_frames();
    }

    fn pump_external_frames(&mut self) {
        let mut frames = Vec::new();
        if let Some(radio) = self.devices.external.as_mut() {
            while let Some(frame) = radio.poll_frame() {
                frames.push(frame);
            }
        }
        for frame in frames {
            self.route_frame(frame);
        }
    }

    fn route_frame(&mut self, frame: ExternalFrame) {
        match frame {
            ExternalFrame::WifiNetwork(detection) => {
                if self.config.enabled.wifi && !self.paused.wifi {
                    self.shared.stats().wifi_networks += 1;
                    if let Some(hook) = &self.hooks.on_wifi_network {
                        hook(&detection);
                    }
                }
            }
            ExternalFrame::WifiProbe(detection) => {
                if self.config.enabled.wifi && !self.paused.wifi && self.config.monitor_probes {
                    self.shared.stats().wifi_probes += 1;
                    if let Some(hook) = &self.hooks.on_wifi_probe {
                        hook(&detection);
                    }
                }
            }
            ExternalFrame::WifiDeauth(detection) => {
                if self.config.enabled.wifi && !self.paused.wifi && self.config.detect_deauths {
                    self.shared.stats().wifi_deauths += 1;
                    if let Some(hook) = &self.hooks.on_wifi_deauth {
                        hook(&detection);
                    }
                }
            }
            ExternalFrame::SubGhz(detection) => {
                if self.config.enabled.subghz && !self.paused.subghz {
                    self.shared.stats().subghz_detections += 1;
                    if let Some(hook) = &self.hooks.on_subghz {
                        hook(&detection);
                    }
                }
            }
            ExternalFrame::Ble(detection) => {
                if self.config.enabled.ble && !self.paused.ble {
                    self.shared.stats().ble_detections += 1;
                    if let Some(hook) = &self.hooks.on_ble {
                        hook(&detection);
                    }
                }
            }
        }
    }

    fn usb_active(&self) -> bool {
        self.resources
            .usb_cdc
            .as_ref()
            .is_some_and(|usb| usb.is_active())
    }

    async fn tick_ir(&mut self, now: Instant) {
        if !self.config.enabled.ir || self.devices.ir.is_none() {
            return;
        }

        if let Some(rx) = self.devices.ir.as_mut() {
            while let Some(detection) = rx.poll_detection() {
                self.shared.stats().ir_detections += 1;
                if let Some(hook) = &self.hooks.on_ir {
                    hook(&detection);
                }
            }
        }

        if self.ir.in_flight() {
            if self.ir.expired(now) {
                if let Some(rx) = self.devices.ir.as_mut() {
                    if let Err(e) = rx.stop().await {
                        warn!(error = %e, "IR stop failed");
                    }
                }
                let token = self.ir.finish();
                if let (Some(token), Some(usb)) = (token, self.resources.usb_cdc.as_mut()) {
                    usb.resume(token).await;
                }
                debug!(bursts = self.ir.burst_count(), "IR burst complete");
            }
            return;
        }

        // Recovery: USB left paused with no burst in flight.
        if let Some(usb) = self.resources.usb_cdc.as_mut() {
            if usb.is_paused() {
                usb.force_resume().await;
                return;
            }
        }

        if self.usb_active() {
            // Burst mode. If IR was running continuously, stop it before
            // USB and IR can contend.
            if self
                .devices
                .ir
                .as_ref()
                .is_some_and(|rx| rx.is_running())
            {
                if let Some(rx) = self.devices.ir.as_mut() {
                    if let Err(e) = rx.stop().await {
                        warn!(error = %e, "IR stop failed");
                    }
                }
                return;
            }

            if self.ir.due(now) {
                self.ir.note_cycle(now);
                self.begin_ir_burst(now).await;
            }
        } else {
            // Continuous mode; restart on unexpected stop.
            if let Some(rx) = self.devices.ir.as_mut() {
                if !rx.is_running() {
                    match rx.start().await {
                        Ok(()) => debug!("IR continuous reception started"),
                        Err(e) => warn!(error = %e, "IR start failed"),
                    }
                }
            }
        }
    }

    async fn begin_ir_burst(&mut self, now: Instant) {
        let token = match self.resources.usb_cdc.as_mut() {
            Some(usb) => match usb.try_pause(ScanKind::Ir).await {
                Some(token) => Some(token),
                None => {
                    debug!("IR burst skipped: USB busy");
                    return;
                }
            },
            None => None,
        };

        let started = match self.devices.ir.as_mut() {
            Some(rx) => match rx.start().await {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "IR burst start failed");
                    false
                }
            },
            None => false,
        };

        if started {
            self.ir.begin(now, token);
            self.shared.set_slot(ScanKind::Ir);
        } else if let (Some(token), Some(usb)) = (token, self.resources.usb_cdc.as_mut()) {
            usb.resume(token).await;
        }
    }

    fn tick_nfc(&mut self) {
        if !self.config.enabled.nfc {
            return;
        }
        if let Some(reader) = self.devices.nfc.as_mut() {
            while let Some(detection) = reader.poll_detection() {
                self.shared.stats().nfc_detections += 1;
                self.shared.set_slot(ScanKind::Nfc);
                if let Some(hook) = &self.hooks.on_nfc {
                    hook(&detection);
                }
            }
        }
    }

    /// Periodic memory hygiene: Sub-GHz decoder soft reset and an NFC
    /// stop/short-delay/restart. Deferred entirely while a decode is in
    /// flight, same rule as hopping.
    async fn maintenance(&mut self, now: Instant) {
        if now.duration_since(self.last_maintenance) < self.config.maintenance_interval {
            return;
        }
        if self.decode_active() {
            debug!("maintenance deferred: decode in progress");
            return;
        }

        if self.config.enabled.subghz && !self.paused.subghz && self.plan.subghz.internal {
            if let Some(radio) = self.devices.subghz.as_mut() {
                if let Err(e) = radio.soft_reset().await {
                    warn!(error = %e, "decoder soft reset failed");
                }
            }
        }

        if self.config.enabled.nfc {
            if let Some(reader) = self.devices.nfc.as_mut() {
                if reader.is_running() {
                    if let Err(e) = reader.stop().await {
                        warn!(error = %e, "NFC stop failed");
                    }
                    sleep(Duration::from_millis(NFC_RESTART_DELAY_MS)).await;
                    if let Err(e) = reader.start().await {
                        warn!(error = %e, "NFC restart failed");
                    }
                }
            }
        }

        self.last_maintenance = now;
        self.shared.stats().maintenance_passes += 1;
        debug!("maintenance pass complete");
    }

    /// Refresh the outward-facing snapshot at the end of the tick.
    fn publish(&self) {
        let external_up = self.external_connected();
        {
            let mut stats = self.shared.stats();
            stats.frequencies_scanned = self.hop.hop_count();
            stats.ble_bursts = self.ble.burst_count();
            stats.ir_bursts = self.ir.burst_count();
            stats.wifi_scan_cycles = self.wifi.cycle_count();
            stats.uptime_seconds = self.started_at.elapsed().as_secs();

            stats.using_internal_subghz = self.config.enabled.subghz
                && !self.paused.subghz
                && self.plan.subghz.internal
                && self.devices.subghz.is_some();
            stats.using_external_subghz = self.config.enabled.subghz
                && !self.paused.subghz
                && self.plan.subghz.external
                && external_up;
            stats.using_internal_ble = self.config.enabled.ble
                && !self.paused.ble
                && self.plan.ble.internal
                && self.devices.ble.is_some();
            stats.using_external_ble = self.config.enabled.ble
                && !self.paused.ble
                && self.plan.ble.external
                && external_up;
            stats.using_external_wifi = self.config.enabled.wifi
                && !self.paused.wifi
                && self.plan.wifi.external
                && external_up;
        }

        // "Available" means the link is neither held nor degraded, so a
        // mid-burst pause reports unavailable until the resume lands.
        let ble_available = !self.paused.ble
            && self
                .resources
                .bt_serial
                .as_ref()
                .is_none_or(|bt| !bt.is_paused() && !bt.is_degraded());
        self.shared
            .ble_available
            .store(ble_available, Ordering::SeqCst);

        let ir_available = self
            .resources
            .usb_cdc
            .as_ref()
            .is_none_or(|usb| !usb.is_paused() && !usb.is_degraded());
        self.shared.ir_available.store(ir_available, Ordering::SeqCst);
    }

    // --- external module helpers -------------------------------------------

    fn external_connected(&self) -> bool {
        self.devices
            .external
            .as_ref()
            .is_some_and(|e| e.is_connected())
    }

    /// No-ops silently when no module is attached or it has disconnected;
    /// absence is an expected condition, not an error.
    async fn send_external(&mut self, opcode: Opcode, payload: &[u8]) {
        if let Some(radio) = self.devices.external.as_mut() {
            if radio.is_connected() {
                if let Err(e) = radio.send_command(opcode, payload).await {
                    warn!(error = %e, ?opcode, "external command failed");
                }
            }
        }
    }
}
