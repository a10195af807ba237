//! Radio source resolution.
//!
//! Decides, per multi-sourced scan kind, whether the internal radio, the
//! external module, or both serve it, from the caller's preference and the
//! module's advertised capabilities. Resolution happens at start and again
//! whenever a radio-source update is consumed at a tick boundary.

use rfwarden_core::{Capabilities, RadioSourcePreference, RadioSourceSettings, ScanKind};

/// Which sources serve one scan kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePlan {
    pub internal: bool,
    pub external: bool,
}

impl SourcePlan {
    /// Neither source.
    pub const NONE: Self = Self {
        internal: false,
        external: false,
    };

    /// Whether any source serves the kind.
    pub fn any(&self) -> bool {
        self.internal || self.external
    }
}

/// Apply the preference rule table for one kind.
///
/// `external_available` means an external module is attached and advertises
/// the capability for this kind.
pub fn resolve(pref: RadioSourcePreference, external_available: bool) -> SourcePlan {
    match pref {
        RadioSourcePreference::Auto => SourcePlan {
            internal: !external_available,
            external: external_available,
        },
        RadioSourcePreference::InternalOnly => SourcePlan {
            internal: true,
            external: false,
        },
        RadioSourcePreference::ExternalOnly => SourcePlan {
            internal: false,
            external: external_available,
        },
        RadioSourcePreference::Both => SourcePlan {
            internal: true,
            external: external_available,
        },
    }
}

/// Resolved plan for every multi-sourced kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActivePlan {
    pub subghz: SourcePlan,
    pub ble: SourcePlan,
    pub wifi: SourcePlan,
}

impl ActivePlan {
    /// Resolve all three kinds against the attached module's capabilities
    /// (`None` when no module is attached).
    ///
    /// WiFi has no internal radio: its internal flag is always false, so
    /// `InternalOnly` disables WiFi entirely.
    pub fn resolve(settings: &RadioSourceSettings, capabilities: Option<Capabilities>) -> Self {
        let caps = capabilities.unwrap_or(Capabilities::NONE);
        let available = |kind: ScanKind| capabilities.is_some() && caps.supports(kind);

        let mut wifi = resolve(settings.wifi, available(ScanKind::Wifi));
        wifi.internal = false;

        Self {
            subghz: resolve(settings.subghz, available(ScanKind::SubGhz)),
            ble: resolve(settings.ble, available(ScanKind::Ble)),
            wifi,
        }
    }
}
