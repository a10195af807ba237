//! Scheduler configuration, validation, and detection delivery hooks.

use crate::error::{Result, SchedulerError};
use rfwarden_core::{
    BleDetection, IrDetection, NfcDetection, RadioSourceSettings, SubGhzDetection,
    WifiDeauthDetection, WifiNetworkDetection, WifiProbeDetection,
    constants::{
        BLE_SCAN_DURATION_MS, BLE_SCAN_INTERVAL_MS, IR_SCAN_DURATION_MS, IR_SCAN_INTERVAL_MS,
        MAINTENANCE_INTERVAL_MS, SCHEDULER_TICK_MS, SUBGHZ_FREQUENCIES, SUBGHZ_HOP_INTERVAL_MS,
        WIFI_MAX_CHANNEL, WIFI_SCAN_INTERVAL_MS, is_valid_frequency,
    },
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Which scan activities the scheduler multiplexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnabledKinds {
    pub subghz: bool,
    pub ble: bool,
    pub wifi: bool,
    pub ir: bool,
    pub nfc: bool,
}

impl Default for EnabledKinds {
    fn default() -> Self {
        Self {
            subghz: true,
            ble: true,
            wifi: true,
            ir: true,
            nfc: true,
        }
    }
}

/// Scheduler configuration.
///
/// Held in memory only; the scheduler never persists it. Timing fields use
/// wall-clock durations and are validated by [`SchedulerConfig::validate`]
/// before the loop will accept them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Per-kind enable flags.
    pub enabled: EnabledKinds,

    /// Internal/external source preference per multi-sourced kind.
    pub sources: RadioSourceSettings,

    /// Sub-GHz hop table (Hz), rotated cyclically. Every entry must fall in
    /// the receiver's legal bands.
    pub frequency_table: Vec<u32>,

    /// Main loop tick period.
    pub tick_period: Duration,

    /// Dwell time per Sub-GHz frequency.
    pub subghz_hop_interval: Duration,

    /// Length of one BLE burst.
    pub ble_scan_duration: Duration,

    /// Time between BLE bursts.
    pub ble_scan_interval: Duration,

    /// Length of one IR burst (when time-multiplexed with USB).
    pub ir_scan_duration: Duration,

    /// Time between IR bursts (when time-multiplexed with USB).
    pub ir_scan_interval: Duration,

    /// WiFi scan-cycle bookkeeping interval.
    pub wifi_scan_interval: Duration,

    /// WiFi channel to lock the external module to; 0 = channel hop.
    pub wifi_channel: u8,

    /// Interval between maintenance passes.
    pub maintenance_interval: Duration,

    /// Prioritize known tracker advertisement patterns in BLE scanning.
    pub tracker_focus: bool,

    /// Emit deauthentication records from external WiFi frames.
    pub detect_deauths: bool,

    /// Emit probe-request records from external WiFi frames.
    pub monitor_probes: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: EnabledKinds::default(),
            sources: RadioSourceSettings::default(),
            frequency_table: SUBGHZ_FREQUENCIES.to_vec(),
            tick_period: Duration::from_millis(SCHEDULER_TICK_MS),
            subghz_hop_interval: Duration::from_millis(SUBGHZ_HOP_INTERVAL_MS),
            ble_scan_duration: Duration::from_millis(BLE_SCAN_DURATION_MS),
            ble_scan_interval: Duration::from_millis(BLE_SCAN_INTERVAL_MS),
            ir_scan_duration: Duration::from_millis(IR_SCAN_DURATION_MS),
            ir_scan_interval: Duration::from_millis(IR_SCAN_INTERVAL_MS),
            wifi_scan_interval: Duration::from_millis(WIFI_SCAN_INTERVAL_MS),
            wifi_channel: 0,
            maintenance_interval: Duration::from_millis(MAINTENANCE_INTERVAL_MS),
            tracker_focus: false,
            detect_deauths: true,
            monitor_probes: true,
        }
    }
}

impl SchedulerConfig {
    /// Reject out-of-range intervals and unrecognized frequencies before
    /// they reach hardware programming.
    pub fn validate(&self) -> Result<()> {
        if self.tick_period.is_zero() {
            return Err(SchedulerError::invalid_config("tick period must be nonzero"));
        }
        if self.enabled.subghz {
            if self.frequency_table.is_empty() {
                return Err(SchedulerError::invalid_config("frequency table is empty"));
            }
            for &frequency_hz in &self.frequency_table {
                if !is_valid_frequency(frequency_hz) {
                    return Err(SchedulerError::invalid_frequency(frequency_hz));
                }
            }
            if self.subghz_hop_interval < self.tick_period {
                return Err(SchedulerError::invalid_config(
                    "hop interval shorter than tick period",
                ));
            }
        }
        if self.enabled.ble {
            if self.ble_scan_duration.is_zero() {
                return Err(SchedulerError::invalid_config("BLE burst duration is zero"));
            }
            if self.ble_scan_duration >= self.ble_scan_interval {
                return Err(SchedulerError::invalid_config(
                    "BLE burst duration must be shorter than its interval",
                ));
            }
        }
        if self.enabled.ir {
            if self.ir_scan_duration.is_zero() {
                return Err(SchedulerError::invalid_config("IR burst duration is zero"));
            }
            if self.ir_scan_duration >= self.ir_scan_interval {
                return Err(SchedulerError::invalid_config(
                    "IR burst duration must be shorter than its interval",
                ));
            }
        }
        if self.enabled.wifi {
            if self.wifi_scan_interval.is_zero() {
                return Err(SchedulerError::invalid_config("WiFi interval is zero"));
            }
            if self.wifi_channel > WIFI_MAX_CHANNEL {
                return Err(SchedulerError::invalid_config(format!(
                    "WiFi channel {} out of range (max {WIFI_MAX_CHANNEL})",
                    self.wifi_channel
                )));
            }
        }
        if self.maintenance_interval.is_zero() {
            return Err(SchedulerError::invalid_config(
                "maintenance interval is zero",
            ));
        }
        Ok(())
    }
}

/// A synchronous, non-blocking handler for one detection kind.
///
/// The scheduler calls the hook on its own loop task and discards the
/// record afterwards; the hook owns nothing after it returns and must not
/// block.
pub type DetectionHook<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// One optional hook per detection kind.
///
/// Built with the `on_*` builder methods; kinds without a hook drop their
/// detections after counting them.
#[derive(Clone, Default)]
pub struct DetectionHooks {
    pub on_subghz: Option<DetectionHook<SubGhzDetection>>,
    pub on_ble: Option<DetectionHook<BleDetection>>,
    pub on_wifi_network: Option<DetectionHook<WifiNetworkDetection>>,
    pub on_wifi_probe: Option<DetectionHook<WifiProbeDetection>>,
    pub on_wifi_deauth: Option<DetectionHook<WifiDeauthDetection>>,
    pub on_ir: Option<DetectionHook<IrDetection>>,
    pub on_nfc: Option<DetectionHook<NfcDetection>>,
}

impl DetectionHooks {
    /// Empty hook set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_subghz(mut self, hook: impl Fn(&SubGhzDetection) + Send + Sync + 'static) -> Self {
        self.on_subghz = Some(Arc::new(hook));
        self
    }

    pub fn on_ble(mut self, hook: impl Fn(&BleDetection) + Send + Sync + 'static) -> Self {
        self.on_ble = Some(Arc::new(hook));
        self
    }

    pub fn on_wifi_network(
        mut self,
        hook: impl Fn(&WifiNetworkDetection) + Send + Sync + 'static,
    ) -> Self {
        self.on_wifi_network = Some(Arc::new(hook));
        self
    }

    pub fn on_wifi_probe(
        mut self,
        hook: impl Fn(&WifiProbeDetection) + Send + Sync + 'static,
    ) -> Self {
        self.on_wifi_probe = Some(Arc::new(hook));
        self
    }

    pub fn on_wifi_deauth(
        mut self,
        hook: impl Fn(&WifiDeauthDetection) + Send + Sync + 'static,
    ) -> Self {
        self.on_wifi_deauth = Some(Arc::new(hook));
        self
    }

    pub fn on_ir(mut self, hook: impl Fn(&IrDetection) + Send + Sync + 'static) -> Self {
        self.on_ir = Some(Arc::new(hook));
        self
    }

    pub fn on_nfc(mut self, hook: impl Fn(&NfcDetection) + Send + Sync + 'static) -> Self {
        self.on_nfc = Some(Arc::new(hook));
        self
    }
}

impl fmt::Debug for DetectionHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionHooks")
            .field("on_subghz", &self.on_subghz.is_some())
            .field("on_ble", &self.on_ble.is_some())
            .field("on_wifi_network", &self.on_wifi_network.is_some())
            .field("on_wifi_probe", &self.on_wifi_probe.is_some())
            .field("on_wifi_deauth", &self.on_wifi_deauth.is_some())
            .field("on_ir", &self.on_ir.is_some())
            .field("on_nfc", &self.on_nfc.is_some())
            .finish()
    }
}
