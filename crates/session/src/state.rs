//! Controller-owned state and the read-only snapshot exposed to consumers.

use schoolyard_core::{Identity, Profile, Role, Session};

/// The single mutable state structure owned by the controller.
///
/// All mutations happen behind the controller's mutex; asynchronous
/// continuations must re-check identity freshness before writing here.
#[derive(Debug)]
pub(crate) struct ControllerState {
    /// Current provider session, if any.
    pub session: Option<Session>,
    /// Identity bound to the current session.
    pub identity: Option<Identity>,
    /// Resolved role record. Non-absent only while a session is held.
    pub profile: Option<Profile>,
    /// True from construction until the first terminal resolution.
    pub loading: bool,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            session: None,
            identity: None,
            profile: None,
            loading: true,
        }
    }
}

/// Read-only view of the controller state.
///
/// Cheap to clone and safe to hand to UI consumers; tokens inside the
/// session stay redacted in `Debug` output.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Current provider session, if any.
    pub session: Option<Session>,
    /// Identity bound to the current session.
    pub identity: Option<Identity>,
    /// Resolved role record, if any.
    pub profile: Option<Profile>,
    /// Whether the controller has reached a terminal state yet.
    pub loading: bool,
}

impl SessionSnapshot {
    /// Whether a session is currently held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The resolved role, if a profile has been loaded.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.profile.as_ref().map(|profile| profile.role)
    }
}
