// crates/caresync-auth/src/headers.rs
// ============================================================================
// Module: Auth Headers
// Description: Portal token headers and the mobile source-OS gate.
// Purpose: Carry caller-presented credentials as explicit types.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Portal callers present a five-header token set that is passed through to
//! the introspection endpoint verbatim. Mobile callers declare their platform
//! through a source-OS header that must name a supported platform exactly.

// ============================================================================
// SECTION: Portal Headers
// ============================================================================

/// Token headers presented by portal callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortalAuthHeaders {
    /// Opaque access token.
    pub access_token: String,
    /// Client identifier paired with the token.
    pub client: String,
    /// Token expiry as issued.
    pub expiry: String,
    /// Caller identity the token was issued to.
    pub uid: String,
    /// Token scheme, `bearer` or `basic` (case-insensitive).
    pub token_type: String,
}

// ============================================================================
// SECTION: Source OS
// ============================================================================

/// Supported mobile platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOs {
    /// Apple devices.
    Ios,
    /// Android devices.
    Android,
}

impl SourceOs {
    /// Parses the source-OS header; exact lowercase values only.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ios" => Some(Self::Ios),
            "android" => Some(Self::Android),
            _ => None,
        }
    }

    /// Wire label for the platform.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}
