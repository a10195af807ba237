//! Shared resource arbitration.
//!
//! Two scan activities contend with host-link transports for exclusive
//! hardware: the BLE radio cannot scan while the Bluetooth serial link is
//! transmitting, and the IR receiver cannot sample while USB CDC holds the
//! conflicting DMA/timer mode. [`SharedResourceHandle`] wraps a
//! [`PausableTransport`] in an explicit ownership state machine so that
//! "paused but never resumed" is a testable invariant instead of a
//! convention spread across boolean flags.
//!
//! The rules:
//!
//! - `try_pause` succeeds only when no other activity holds the resource;
//!   on success the caller receives a [`PauseToken`].
//! - Only the token holder can resume, and the token is consumed by
//!   `resume` — it cannot be reused or forgotten silently.
//! - A failed resume marks the handle degraded; it keeps reporting
//!   unavailable until a later resume attempt succeeds.

use crate::traits::PausableTransport;
use rfwarden_core::ScanKind;
use tracing::{debug, error, warn};

/// Observable state of a shared resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceState {
    /// The underlying transport is not active.
    Idle,

    /// The transport is active and unowned by any scan activity.
    Active,

    /// The transport is paused on behalf of a scan activity.
    Paused {
        /// The activity holding the pause.
        owner: ScanKind,
        /// False once a resume attempt has failed (degraded).
        resumable: bool,
    },
}

/// Proof that a pause was granted; required to resume.
///
/// The token is not `Clone` and is consumed by
/// [`SharedResourceHandle::resume`], so each granted pause is resumed at
/// most once and only by the activity that requested it.
#[derive(Debug)]
#[must_use = "a granted pause must be resumed, even on the error path"]
pub struct PauseToken {
    requester: ScanKind,
    /// Whether the underlying transport was actually paused. A pause granted
    /// while the transport was idle has nothing to undo on resume.
    transport_paused: bool,
}

impl PauseToken {
    /// The activity this pause was granted to.
    pub fn requester(&self) -> ScanKind {
        self.requester
    }
}

/// A pausable transport plus the ownership state machine around it.
#[derive(Debug)]
pub struct SharedResourceHandle<T> {
    transport: T,
    label: &'static str,
    owner: Option<ScanKind>,
    degraded: bool,
}

impl<T: PausableTransport> SharedResourceHandle<T> {
    /// Wrap a transport. `label` names the resource in logs ("BT serial",
    /// "USB CDC").
    pub fn new(label: &'static str, transport: T) -> Self {
        Self {
            transport,
            label,
            owner: None,
            degraded: false,
        }
    }

    /// Name of this resource.
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Current observable state.
    pub fn state(&self) -> ResourceState {
        match self.owner {
            Some(owner) => ResourceState::Paused {
                owner,
                resumable: !self.degraded,
            },
            None if self.transport.is_running() => ResourceState::Active,
            None => ResourceState::Idle,
        }
    }

    /// Whether the transport is active and unowned (would need a pause
    /// before a conflicting activity may run).
    pub fn is_active(&self) -> bool {
        self.state() == ResourceState::Active
    }

    /// Whether a pause is currently held.
    pub fn is_paused(&self) -> bool {
        self.owner.is_some()
    }

    /// Whether a resume has failed and not yet been recovered.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether `requester` could be granted a pause right now.
    pub fn available_for(&self, requester: ScanKind) -> bool {
        !self.degraded && self.owner.is_none_or(|o| o == requester)
    }

    /// Request exclusive use of the resource for `requester`.
    ///
    /// Succeeds when the resource is idle (nothing to pause) or active and
    /// the transport accepts the pause. Returns `None` when another activity
    /// holds the resource, the handle is degraded, or the transport refuses
    /// — in all of which cases the caller must skip its burst and retry on a
    /// later interval.
    pub async fn try_pause(&mut self, requester: ScanKind) -> Option<PauseToken> {
        if self.degraded {
            debug!(resource = self.label, %requester, "pause denied: resource degraded");
            return None;
        }
        if let Some(owner) = self.owner {
            debug!(resource = self.label, %requester, %owner, "pause denied: already owned");
            return None;
        }

        if !self.transport.is_running() {
            // Idle transport: grant without touching the hardware.
            self.owner = Some(requester);
            return Some(PauseToken {
                requester,
                transport_paused: false,
            });
        }

        if self.transport.pause().await {
            debug!(resource = self.label, %requester, "paused");
            self.owner = Some(requester);
            Some(PauseToken {
                requester,
                transport_paused: true,
            })
        } else {
            warn!(resource = self.label, %requester, "transport refused pause");
            None
        }
    }

    /// Release a granted pause, restoring the transport if it was paused.
    ///
    /// Returns false and marks the handle degraded when the transport fails
    /// to come back; the ownership is cleared regardless so a later
    /// [`force_resume`](Self::force_resume) can retry.
    pub async fn resume(&mut self, token: PauseToken) -> bool {
        if self.owner != Some(token.requester) {
            // Stale token; ownership already force-released.
            warn!(resource = self.label, requester = %token.requester, "resume with stale token");
            return false;
        }
        self.owner = None;

        if !token.transport_paused {
            return true;
        }

        if self.transport.resume().await {
            debug!(resource = self.label, requester = %token.requester, "resumed");
            self.degraded = false;
            true
        } else {
            error!(resource = self.label, requester = %token.requester,
                "resume failed, marking resource degraded");
            self.degraded = true;
            false
        }
    }

    /// Teardown path: resume the transport if it is paused, regardless of
    /// who paused it or whether a token is still outstanding.
    ///
    /// Clears degradation on success. Returns true when the transport is no
    /// longer paused afterwards.
    pub async fn force_resume(&mut self) -> bool {
        self.owner = None;

        if !self.transport.is_paused() {
            return true;
        }

        if self.transport.resume().await {
            debug!(resource = self.label, "force-resumed");
            self.degraded = false;
            true
        } else {
            error!(resource = self.label, "force resume failed, resource degraded");
            self.degraded = true;
            false
        }
    }

}
