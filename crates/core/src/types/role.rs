//! User roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Application role attached to a profile.
///
/// Roles are stored as lowercase strings in the profile store. A value this
/// enum does not know about deserializes to [`Role::Unknown`] rather than
/// failing the whole profile lookup; routing treats it as unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A student with access to their own dashboard.
    Student,
    /// A teacher managing classes and grades.
    Teacher,
    /// A parent following their children's progress.
    Parent,
    /// School management staff.
    Management,
    /// Any role string this build does not recognize.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// The lowercase wire representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Parent => "parent",
            Self::Management => "management",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
