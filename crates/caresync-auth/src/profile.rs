// crates/caresync-auth/src/profile.rs
// ============================================================================
// Module: Sync-Admin Profiles
// Description: Sync-admin profile document addressing and field access.
// Purpose: Derive profile doc ids and read scope fields out of profile docs.
// Dependencies: caresync-core, caresync-gateway, serde_json
// ============================================================================

//! ## Overview
//! Each portal user has a sync-admin profile document in the account bucket.
//! Its id derives deterministically from the user's uid: percent-encode,
//! lowercase, then map `%` to `_` so the id stays within the store's
//! identifier alphabet. The profile's scope fields (`email`,
//! `facility_ids`, `type`) live outside the core document envelope and are
//! read here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use caresync_core::SyncDocument;
use caresync_gateway::encode_component;
use serde_json::Value;

// ============================================================================
// SECTION: Addressing
// ============================================================================

/// Prefix of every portal sync-admin profile doc id.
pub const SYNC_ADMIN_DOC_PREFIX: &str = "portal_sync_admin_";

/// Derives the store sync username for a portal uid.
#[must_use]
pub fn sync_username(uid: &str) -> String {
    encode_component(uid).to_lowercase().replace('%', "_")
}

/// Derives the sync-admin profile doc id for a portal uid.
#[must_use]
pub fn portal_sync_admin_doc_id(uid: &str) -> String {
    format!("{SYNC_ADMIN_DOC_PREFIX}{}", sync_username(uid))
}

// ============================================================================
// SECTION: Field Access
// ============================================================================

/// Email recorded on a profile document.
#[must_use]
pub fn profile_email(doc: &SyncDocument) -> Option<&str> {
    doc.extra.get("email").and_then(Value::as_str)
}

/// Facility ids recorded on a profile document.
#[must_use]
pub fn profile_facility_ids(doc: &SyncDocument) -> Vec<String> {
    doc.extra
        .get("facility_ids")
        .and_then(Value::as_array)
        .map(|values| {
            values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

/// Raw role string recorded on a profile document.
#[must_use]
pub fn profile_role(doc: &SyncDocument) -> &str {
    doc.extra.get("type").and_then(Value::as_str).unwrap_or_default()
}
