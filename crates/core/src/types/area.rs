//! Top-level navigation areas.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Symbolic identifier for a top-level navigation destination.
///
/// The navigator replaces the whole view stack with the area's root screen,
/// so exactly one of these is active at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaToken {
    /// Student dashboard area.
    StudentDashboard,
    /// Teacher dashboard area.
    TeacherDashboard,
    /// Parent dashboard area.
    ParentDashboard,
    /// Management dashboard area.
    ManagementDashboard,
    /// Management onboarding flow for accounts without an organization yet.
    ManagementSetup,
    /// Login / unauthenticated area.
    Login,
}

impl AreaToken {
    /// The route token the navigator understands.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StudentDashboard => "/(student)/dashboard",
            Self::TeacherDashboard => "/(teacher)/dashboard",
            Self::ParentDashboard => "/(parent)/dashboard",
            Self::ManagementDashboard => "/(management)/dashboard",
            Self::ManagementSetup => "/(management)/setup",
            Self::Login => "/(auth)/login",
        }
    }

    /// Resolve the destination area for a role.
    ///
    /// Management accounts without an organization land in the setup flow.
    /// An unrecognized role routes to login rather than leaving the user on
    /// a stale screen.
    #[must_use]
    pub const fn for_role(role: Role, has_organization: bool) -> Self {
        match role {
            Role::Student => Self::StudentDashboard,
            Role::Teacher => Self::TeacherDashboard,
            Role::Parent => Self::ParentDashboard,
            Role::Management => {
                if has_organization {
                    Self::ManagementDashboard
                } else {
                    Self::ManagementSetup
                }
            }
            Role::Unknown => Self::Login,
        }
    }
}

impl fmt::Display for AreaToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
