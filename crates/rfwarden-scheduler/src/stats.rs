//! Scheduler statistics.

use serde::{Deserialize, Serialize};

/// Counters and source flags for one scheduler session.
///
/// Counters are monotonically non-decreasing between `start` and `stop`;
/// the `using_*` flags are point-in-time and follow radio-source updates.
/// Snapshots are taken under the stats lock, so a caller polling from
/// another task always sees a consistent view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerStats {
    /// Decoded Sub-GHz transmissions delivered.
    pub subghz_detections: u64,
    /// BLE advertisements delivered.
    pub ble_detections: u64,
    /// WiFi networks delivered.
    pub wifi_networks: u64,
    /// WiFi probe requests delivered.
    pub wifi_probes: u64,
    /// WiFi deauthentication frames delivered.
    pub wifi_deauths: u64,
    /// IR signals delivered.
    pub ir_detections: u64,
    /// NFC tag sightings delivered.
    pub nfc_detections: u64,

    /// Sub-GHz frequencies scanned (hops performed).
    pub frequencies_scanned: u64,
    /// Completed BLE bursts.
    pub ble_bursts: u64,
    /// Completed IR bursts.
    pub ir_bursts: u64,
    /// WiFi scan-cycle intervals elapsed.
    pub wifi_scan_cycles: u64,
    /// Maintenance passes performed.
    pub maintenance_passes: u64,

    /// Whether the internal Sub-GHz receiver is serving scans.
    pub using_internal_subghz: bool,
    /// Whether the external module is serving Sub-GHz scans.
    pub using_external_subghz: bool,
    /// Whether the internal BLE scanner is serving scans.
    pub using_internal_ble: bool,
    /// Whether the external module is serving BLE scans.
    pub using_external_ble: bool,
    /// Whether the external module is serving WiFi scans (there is no
    /// internal WiFi radio).
    pub using_external_wifi: bool,

    /// Seconds since the current session started.
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_all_zero() {
        let stats = SchedulerStats::default();
        assert_eq!(stats.frequencies_scanned, 0);
        assert!(!stats.using_external_wifi);
    }

    #[test]
    fn serde_roundtrip() {
        let stats = SchedulerStats {
            frequencies_scanned: 42,
            using_internal_subghz: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&stats).unwrap();
        let back: SchedulerStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, back);
    }
}
