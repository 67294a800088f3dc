// crates/caresync-core/src/role.rs
// ============================================================================
// Module: Portal Roles
// Description: Closed role set for portal and sync users.
// Purpose: Replace open role strings with a parsed sum type at the boundary.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Roles arrive as open strings on sync-admin profile documents. They are
//! parsed into a closed [`Role`] at the authentication boundary; anything the
//! parser does not recognize stays unparsed and is denied by the permission
//! tables' default arms rather than falling through silently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Role Type
// ============================================================================

/// Portal user role, ordered roughly by scope breadth.
///
/// # Invariants
/// - Wire strings are stable; [`Role::as_str`] round-trips [`Role::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Platform operator with access across every account.
    PlatformAdmin,
    /// Platform content curator scoped to the content namespace.
    PlatformContentAdmin,
    /// Administrator of exactly one account.
    AccountAdmin,
    /// Administrator of a set of facilities within one account.
    FacilityAdmin,
    /// Facility-level user with no document access.
    FacilityUser,
}

/// Wire string for the platform administrator role.
pub const ROLE_PLATFORM_ADMIN: &str = "in2l-admin";
/// Wire string for the platform content administrator role.
pub const ROLE_PLATFORM_CONTENT_ADMIN: &str = "in2l";
/// Wire string for the account administrator role.
pub const ROLE_ACCOUNT_ADMIN: &str = "account-admin";
/// Wire string for the facility administrator role.
pub const ROLE_FACILITY_ADMIN: &str = "facility-admin";
/// Wire string for the facility user role.
pub const ROLE_FACILITY_USER: &str = "facility-user";

impl Role {
    /// All roles that may be provisioned as portal users.
    pub const PORTAL_ROLES: [Self; 4] =
        [Self::PlatformAdmin, Self::PlatformContentAdmin, Self::AccountAdmin, Self::FacilityAdmin];

    /// Parses a wire role string, returning `None` for unknown values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            ROLE_PLATFORM_ADMIN => Some(Self::PlatformAdmin),
            ROLE_PLATFORM_CONTENT_ADMIN => Some(Self::PlatformContentAdmin),
            ROLE_ACCOUNT_ADMIN => Some(Self::AccountAdmin),
            ROLE_FACILITY_ADMIN => Some(Self::FacilityAdmin),
            ROLE_FACILITY_USER => Some(Self::FacilityUser),
            _ => None,
        }
    }

    /// Returns the stable wire string for the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PlatformAdmin => ROLE_PLATFORM_ADMIN,
            Self::PlatformContentAdmin => ROLE_PLATFORM_CONTENT_ADMIN,
            Self::AccountAdmin => ROLE_ACCOUNT_ADMIN,
            Self::FacilityAdmin => ROLE_FACILITY_ADMIN,
            Self::FacilityUser => ROLE_FACILITY_USER,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("unknown role: {value}"))
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

#[cfg(test)]
mod tests;
