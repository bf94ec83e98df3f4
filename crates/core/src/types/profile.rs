//! Application-level profile record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::area::AreaToken;
use super::id::{OrganizationId, UserId};
use super::role::Role;

/// The role record associated with an identity.
///
/// Fetched from the profile store whenever a session becomes active; never
/// cached across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Identity this profile belongs to.
    pub id: UserId,
    /// Display name.
    pub full_name: String,
    /// Application role.
    pub role: Role,
    /// Organization the profile belongs to.
    ///
    /// Absent for a management account that has not completed setup.
    pub organization_id: Option<OrganizationId>,
    /// When the profile row was created.
    pub created_at: DateTime<Utc>,
    /// When the profile row was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// The top-level area this profile should land in after sign-in.
    #[must_use]
    pub const fn target_area(&self) -> AreaToken {
        AreaToken::for_role(self.role, self.organization_id.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(role: Role, organization_id: Option<OrganizationId>) -> Profile {
        Profile {
            id: UserId::random(),
            full_name: "Avery Example".to_owned(),
            role,
            organization_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_target_area_per_role() {
        assert_eq!(
            profile(Role::Teacher, None).target_area(),
            AreaToken::TeacherDashboard
        );
        assert_eq!(
            profile(Role::Management, Some(OrganizationId::random())).target_area(),
            AreaToken::ManagementDashboard
        );
        assert_eq!(
            profile(Role::Management, None).target_area(),
            AreaToken::ManagementSetup
        );
    }
}
