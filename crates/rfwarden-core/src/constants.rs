//! Frequency table and timing constants for the detection scheduler.
//!
//! The timing defaults were tuned on hardware: the hop interval must be long
//! enough for a complete remote-control transmission (most Sub-GHz protocols
//! repeat within 2–3 s), and maintenance is deliberately infrequent because
//! restarting receivers interrupts reception.

/// Default Sub-GHz hop table (Hz), in rotation order.
///
/// Covers the common ISM/SRD remote-control allocations: US garage doors and
/// car remotes (315 MHz), EU remotes and sensors (433.92 MHz), EU SRD
/// (868.35 MHz), US ISM (915 MHz), plus band edges and TPMS (426 MHz).
pub const SUBGHZ_FREQUENCIES: [u32; 10] = [
    315_000_000,
    433_920_000,
    868_350_000,
    915_000_000,
    300_000_000,
    390_000_000,
    418_000_000,
    426_000_000,
    445_000_000,
    925_000_000,
];

/// Legal Sub-GHz receiver bands (Hz, inclusive).
///
/// Matches the transceiver's supported ranges; frequencies outside these
/// bands are rejected rather than programmed.
pub const SUBGHZ_BANDS: [(u32, u32); 3] = [
    (300_000_000, 348_000_000),
    (387_000_000, 464_000_000),
    (779_000_000, 928_000_000),
];

/// Whether `frequency_hz` falls inside a supported receiver band.
pub fn is_valid_frequency(frequency_hz: u32) -> bool {
    SUBGHZ_BANDS
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&frequency_hz))
}

/// Scheduler main loop tick period.
pub const SCHEDULER_TICK_MS: u64 = 100;

/// Default time per Sub-GHz frequency.
///
/// 2500 ms rather than a faster sweep: interrupting a decode mid-burst loses
/// the detection entirely, so the dwell time must cover a full transmission.
pub const SUBGHZ_HOP_INTERVAL_MS: u64 = 2500;

/// Default BLE burst scan duration.
pub const BLE_SCAN_DURATION_MS: u64 = 2000;

/// Default time between BLE burst scans.
pub const BLE_SCAN_INTERVAL_MS: u64 = 5000;

/// Default IR burst duration (when time-multiplexed with USB).
pub const IR_SCAN_DURATION_MS: u64 = 3000;

/// Default time between IR bursts (when time-multiplexed with USB).
pub const IR_SCAN_INTERVAL_MS: u64 = 10_000;

/// Default WiFi scan-cycle bookkeeping interval.
pub const WIFI_SCAN_INTERVAL_MS: u64 = 10_000;

/// Interval between maintenance passes (decoder soft reset, NFC restart).
///
/// 60 s; anything more aggressive measurably hurts detection rates.
pub const MAINTENANCE_INTERVAL_MS: u64 = 60_000;

/// Gap between NFC stop and restart during maintenance.
pub const NFC_RESTART_DELAY_MS: u64 = 50;

/// Highest 2.4 GHz WiFi channel accepted in configuration (0 = hop).
pub const WIFI_MAX_CHANNEL: u8 = 14;
