// crates/caresync-core/src/outcome.rs
// ============================================================================
// Module: Authentication Outcomes
// Description: Authentication results and canned responses.
// Purpose: Carry allow/deny results that route handlers can render directly.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Authentication results are returned, never thrown: a denied request is a
//! normal value carrying the message and status code the route layer renders.
//! The canned responses mirror the platform's stable wire messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// Result of an authentication attempt.
///
/// # Invariants
/// - `error_message`/`error_code` are populated only when not authorized.
/// - Scope fields are populated only by the portal bearer flow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOutcome {
    /// Whether the caller is authenticated.
    #[serde(rename = "isAuthorized")]
    pub is_authorized: bool,
    /// Scoping account id from the sync-admin profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Authenticated email from the sync-admin profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Scoping facility ids from the sync-admin profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_ids: Option<Vec<String>>,
    /// Raw role string from the sync-admin profile (`userType` on the wire).
    #[serde(rename = "userType", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Denial message for direct rendering.
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Denial status code for direct rendering.
    #[serde(rename = "errorCode", skip_serializing_if = "Option::is_none")]
    pub error_code: Option<u16>,
}

impl AuthOutcome {
    /// Plain authorized outcome with no scope attributes.
    #[must_use]
    pub fn authorized() -> Self {
        Self {
            is_authorized: true,
            ..Self::default()
        }
    }

    /// Canned `Unauthorized`/401 outcome.
    #[must_use]
    pub fn unauthorized() -> Self {
        Self::denied("Unauthorized", 401)
    }

    /// Canned `Invalid email`/400 outcome.
    #[must_use]
    pub fn invalid_email() -> Self {
        Self::denied("Invalid email", 400)
    }

    /// Canned `Invalid Source OS header`/400 outcome.
    #[must_use]
    pub fn invalid_source_os() -> Self {
        Self::denied("Invalid Source OS header", 400)
    }

    /// Canned unauthorized outcome with the scope fields explicitly emptied,
    /// as the portal bearer flow reports after an introspection failure.
    #[must_use]
    pub fn unauthorized_with_empty_scope() -> Self {
        Self {
            account_id: Some(String::new()),
            email: Some(String::new()),
            facility_ids: Some(Vec::new()),
            role: Some(String::new()),
            ..Self::unauthorized()
        }
    }

    /// Builds a denial with the given message and status code.
    #[must_use]
    pub fn denied(message: &str, code: u16) -> Self {
        Self {
            is_authorized: false,
            error_message: Some(message.to_string()),
            error_code: Some(code),
            ..Self::default()
        }
    }
}
