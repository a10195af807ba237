//! Scan activity, radio source policy, and capability types.

use serde::{Deserialize, Serialize};

/// A scan activity the scheduler time-multiplexes.
///
/// The set is fixed: the scheduler is not a general-purpose task scheduler,
/// it arbitrates exactly these five activities over the available radios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanKind {
    /// Sub-GHz receiver hopping across the fixed frequency table.
    SubGhz,

    /// Bluetooth Low Energy advertisement scanning (burst mode).
    Ble,

    /// WiFi scanning via an external radio module.
    Wifi,

    /// Infrared reception (continuous or burst, depending on USB state).
    Ir,

    /// NFC passive polling (continuous).
    Nfc,
}

impl ScanKind {
    /// Human-readable name for logs and diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SubGhz => "Sub-GHz",
            Self::Ble => "BLE",
            Self::Wifi => "WiFi",
            Self::Ir => "IR",
            Self::Nfc => "NFC",
        }
    }

    /// Whether this kind can be served by more than one radio source.
    ///
    /// Only Sub-GHz, BLE and WiFi participate in internal/external source
    /// selection; IR and NFC are always the on-board peripherals.
    pub fn is_multi_sourced(&self) -> bool {
        matches!(self, Self::SubGhz | Self::Ble | Self::Wifi)
    }
}

impl std::fmt::Display for ScanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller policy for which radio serves a multi-sourced [`ScanKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RadioSourcePreference {
    /// Prefer the external module when present, fall back to internal.
    #[default]
    Auto,

    /// Use the internal radio only, even if an external module is attached.
    InternalOnly,

    /// Use the external module only; if absent the kind runs on nothing.
    ExternalOnly,

    /// Use both radios simultaneously when the external module is present.
    Both,
}

impl RadioSourcePreference {
    /// Human-readable name for logs and settings UIs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::InternalOnly => "Internal",
            Self::ExternalOnly => "External",
            Self::Both => "Both",
        }
    }
}

impl std::fmt::Display for RadioSourcePreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-kind radio source preferences, replaceable at runtime.
///
/// This is an immutable snapshot: the scheduler applies a replacement at the
/// next tick boundary, never mid-burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadioSourceSettings {
    /// Source preference for Sub-GHz reception.
    pub subghz: RadioSourcePreference,

    /// Source preference for BLE scanning.
    pub ble: RadioSourcePreference,

    /// Source preference for WiFi scanning.
    ///
    /// There is no internal WiFi radio, so `InternalOnly` disables WiFi
    /// scanning entirely and `Auto`/`Both` behave like `ExternalOnly`.
    pub wifi: RadioSourcePreference,
}

impl Default for RadioSourceSettings {
    fn default() -> Self {
        Self {
            subghz: RadioSourcePreference::Auto,
            ble: RadioSourcePreference::Auto,
            wifi: RadioSourcePreference::ExternalOnly,
        }
    }
}

/// Capability bitmask advertised by an external radio module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities(pub u32);

impl Capabilities {
    /// No capabilities.
    pub const NONE: Capabilities = Capabilities(0);

    /// WiFi network scanning.
    pub const WIFI_SCAN: Capabilities = Capabilities(1 << 0);

    /// WiFi monitor mode (probe/deauth frame capture).
    pub const WIFI_MONITOR: Capabilities = Capabilities(1 << 1);

    /// Sub-GHz reception.
    pub const SUBGHZ_RX: Capabilities = Capabilities(1 << 4);

    /// BLE advertisement scanning.
    pub const BLE_SCAN: Capabilities = Capabilities(1 << 6);

    /// Check whether every capability in `other` is present.
    pub fn contains(&self, other: Capabilities) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combine two capability sets.
    pub fn union(&self, other: Capabilities) -> Capabilities {
        Capabilities(self.0 | other.0)
    }

    /// Whether the module can serve the given scan kind at all.
    ///
    /// IR and NFC are never served externally.
    pub fn supports(&self, kind: ScanKind) -> bool {
        match kind {
            ScanKind::SubGhz => self.contains(Self::SUBGHZ_RX),
            ScanKind::Ble => self.contains(Self::BLE_SCAN),
            ScanKind::Wifi => self.contains(Self::WIFI_SCAN),
            ScanKind::Ir | ScanKind::Nfc => false,
        }
    }

    /// Raw bitmask value.
    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl std::ops::BitOr for Capabilities {
    type Output = Capabilities;

    fn bitor(self, rhs: Capabilities) -> Capabilities {
        self.union(rhs)
    }
}

/// Sub-GHz modulation preset.
///
/// The hop controller cycles presets once per full frequency table rotation
/// so that both OOK and FSK-style encodings get coverage over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SubGhzPreset {
    /// OOK, 650 kHz bandwidth. Default; covers most remotes.
    #[default]
    Ook650,

    /// OOK, 270 kHz bandwidth.
    Ook270,

    /// 2-FSK, 2.38 kHz deviation.
    Fsk238,

    /// 2-FSK, 47.6 kHz deviation.
    Fsk476,
}

impl SubGhzPreset {
    /// The preset that follows this one in the rotation.
    pub fn next(&self) -> SubGhzPreset {
        match self {
            Self::Ook650 => Self::Ook270,
            Self::Ook270 => Self::Fsk238,
            Self::Fsk238 => Self::Fsk476,
            Self::Fsk476 => Self::Ook650,
        }
    }

    /// Human-readable name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ook650 => "OOK 650kHz",
            Self::Ook270 => "OOK 270kHz",
            Self::Fsk238 => "FSK 2.38kHz",
            Self::Fsk476 => "FSK 47.6kHz",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_kind_multi_sourced() {
        assert!(ScanKind::SubGhz.is_multi_sourced());
        assert!(ScanKind::Ble.is_multi_sourced());
        assert!(ScanKind::Wifi.is_multi_sourced());
        assert!(!ScanKind::Ir.is_multi_sourced());
        assert!(!ScanKind::Nfc.is_multi_sourced());
    }

    #[test]
    fn capabilities_contains() {
        let caps = Capabilities::WIFI_SCAN | Capabilities::SUBGHZ_RX;
        assert!(caps.contains(Capabilities::WIFI_SCAN));
        assert!(caps.contains(Capabilities::SUBGHZ_RX));
        assert!(!caps.contains(Capabilities::BLE_SCAN));
        assert!(caps.contains(Capabilities::NONE));
    }

    #[test]
    fn capabilities_supports_kind() {
        let caps = Capabilities::BLE_SCAN;
        assert!(caps.supports(ScanKind::Ble));
        assert!(!caps.supports(ScanKind::SubGhz));
        assert!(!caps.supports(ScanKind::Ir));
        assert!(!caps.supports(ScanKind::Nfc));
    }

    #[test]
    fn preset_rotation_covers_all() {
        let mut preset = SubGhzPreset::Ook650;
        let mut seen = vec![preset];
        for _ in 0..3 {
            preset = preset.next();
            seen.push(preset);
        }
        assert_eq!(preset.next(), SubGhzPreset::Ook650);
        seen.dedup();
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn default_sources() {
        let settings = RadioSourceSettings::default();
        assert_eq!(settings.subghz, RadioSourcePreference::Auto);
        assert_eq!(settings.ble, RadioSourcePreference::Auto);
        assert_eq!(settings.wifi, RadioSourcePreference::ExternalOnly);
    }

    #[test]
    fn settings_serde_roundtrip() {
        let settings = RadioSourceSettings {
            subghz: RadioSourcePreference::Both,
            ble: RadioSourcePreference::InternalOnly,
            wifi: RadioSourcePreference::ExternalOnly,
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: RadioSourceSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, back);
    }
}
