// crates/caresync-gateway/src/buckets.rs
// ============================================================================
// Module: Bucket Names
// Description: Canonical store bucket names.
// Purpose: Keep bucket identifiers in one place for auth and provisioning.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The platform stores documents across a fixed bucket set. `ACCOUNT_DATA`
//! holds account-namespace documents and the sync-admin profiles; the rest
//! exist for per-role sync users and device provisioning.

/// Account-namespace documents and sync-admin profiles.
pub const ACCOUNT_DATA: &str = "account_data";
/// Content catalog metadata.
pub const CONTENT_META_DATA: &str = "content_meta_data";
/// Device download progress tracking.
pub const DOWNLOAD_STATUS_DATA: &str = "download_status_data";
/// Resident favorites.
pub const FAVORITES_DATA: &str = "favorites_data";
/// Messaging documents.
pub const MESSAGE_DATA: &str = "message_data";
/// Resident profile documents.
pub const RESIDENT_DATA: &str = "resident_data";
/// End-user profile documents.
pub const USER_PROFILE_DATA: &str = "user_profile_data";

/// Every bucket, in provisioning order.
pub const ALL_BUCKETS: &[&str] = &[
    ACCOUNT_DATA,
    CONTENT_META_DATA,
    DOWNLOAD_STATUS_DATA,
    FAVORITES_DATA,
    MESSAGE_DATA,
    RESIDENT_DATA,
    USER_PROFILE_DATA,
];
