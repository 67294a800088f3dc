// crates/caresync-server/src/sync_admin.rs
// ============================================================================
// Module: Sync-Admin Provisioning
// Description: Store user and sync-admin document provisioning.
// Purpose: Keep portal users and devices able to replicate their buckets.
// Dependencies: caresync-auth, caresync-core, caresync-gateway, serde
// ============================================================================

//! ## Overview
//! Portal users and devices replicate through per-bucket store users plus
//! sync-admin documents that the replication filter keys on. Each portal
//! role maps to a fixed bucket set; a subset of those buckets also carries a
//! profile document, with the account bucket holding the role-specific sync
//! doc type and every other bucket the generic one. Device provisioning
//! writes deterministic `device_sync_admin_{serial}` documents whose fields
//! vary by bucket.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use caresync_auth::portal_sync_admin_doc_id;
use caresync_auth::profile::profile_email;
use caresync_auth::profile::profile_role;
use caresync_auth::sync_username;
use caresync_core::Role;
use caresync_core::SyncDocument;
use caresync_gateway::DEFAULT_SYNC_USER_PASSWORD;
use caresync_gateway::DocumentStore;
use caresync_gateway::GatewayError;
use caresync_gateway::UpdateResult;
use caresync_gateway::buckets;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix of every device sync-admin doc id.
pub const DEVICE_SYNC_ADMIN_DOC_PREFIX: &str = "device_sync_admin_";

/// Generic sync-admin doc type used outside the account bucket.
const SYNC_PORTAL_ADMIN: &str = "sync_in2l";

/// Account-bucket sync doc type for platform administrators.
const SYNC_PLATFORM_ADMIN: &str = "sync_in2l-admin";

/// Account-bucket sync doc type for account administrators.
const SYNC_ACCOUNT_ADMIN: &str = "sync_account-admin";

/// Account-bucket sync doc type for facility administrators.
const SYNC_FACILITY_ADMIN: &str = "sync_facility-admin";

/// Sync doc type stamped on device sync-admin documents.
const SYNC_DEVICE_ADMIN: &str = "sync_device_sync_admin";

/// Buckets carrying a device sync-admin document.
const DEVICE_SYNC_BUCKETS: [&str; 3] =
    [buckets::DOWNLOAD_STATUS_DATA, buckets::FAVORITES_DATA, buckets::MESSAGE_DATA];

/// Buckets replicated by account-scoped administrator roles.
const ACCOUNT_ROLE_BUCKETS: [&str; 5] = [
    buckets::ACCOUNT_DATA,
    buckets::FAVORITES_DATA,
    buckets::MESSAGE_DATA,
    buckets::RESIDENT_DATA,
    buckets::USER_PROFILE_DATA,
];

/// Buckets replicated by platform content administrators.
const CONTENT_ROLE_BUCKETS: [&str; 2] = [buckets::CONTENT_META_DATA, buckets::USER_PROFILE_DATA];

// ============================================================================
// SECTION: Bucket Maps
// ============================================================================

/// Returns the bucket set a portal role replicates.
const fn role_buckets(role: Role) -> &'static [&'static str] {
    match role {
        Role::PlatformAdmin => buckets::ALL_BUCKETS,
        Role::PlatformContentAdmin => &CONTENT_ROLE_BUCKETS,
        Role::AccountAdmin | Role::FacilityAdmin => &ACCOUNT_ROLE_BUCKETS,
        Role::FacilityUser => &[],
    }
}

/// Whether a bucket carries a portal sync-admin profile document.
fn requires_profile_doc(bucket: &str) -> bool {
    matches!(
        bucket,
        buckets::ACCOUNT_DATA
            | buckets::CONTENT_META_DATA
            | buckets::DOWNLOAD_STATUS_DATA
            | buckets::RESIDENT_DATA
    )
}

/// Account-bucket sync doc type for a portal role.
const fn role_sync_doc_type(role: Role) -> &'static str {
    match role {
        Role::PlatformAdmin => SYNC_PLATFORM_ADMIN,
        Role::AccountAdmin => SYNC_ACCOUNT_ADMIN,
        Role::FacilityAdmin => SYNC_FACILITY_ADMIN,
        Role::PlatformContentAdmin | Role::FacilityUser => SYNC_PORTAL_ADMIN,
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Provisioning failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Portal user profile carried no email.
    #[error("invalid portal user email")]
    MissingEmail,
    /// Device serial number was empty.
    #[error("invalid device serial number")]
    MissingSerial,
    /// A document store call failed.
    #[error("document store call failed: {0}")]
    Store(#[from] GatewayError),
}

// ============================================================================
// SECTION: Device Input
// ============================================================================

/// Device provisioning input for sync-admin documents.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeviceSyncAdmin {
    /// Device serial number keying the sync-admin doc ids.
    #[serde(default)]
    pub serial_number: String,
    /// Device document id, recorded only in the download-status bucket.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Owning account id, recorded only in the message bucket.
    #[serde(default)]
    pub account_id: Option<String>,
    /// Owning facility id, recorded only in the message bucket.
    #[serde(default)]
    pub facility_id: Option<String>,
    /// Resident ids the device serves, omitted in the download-status bucket.
    #[serde(default)]
    pub resident_ids: Option<Vec<String>>,
}

// ============================================================================
// SECTION: Provisioner
// ============================================================================

/// Provisioner writing store users and sync-admin documents.
pub struct SyncAdminProvisioner {
    /// Document store receiving users and documents.
    store: Arc<dyn DocumentStore>,
}

impl SyncAdminProvisioner {
    /// Builds a provisioner over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
        }
    }

    /// Provisions a portal user across its role's bucket set.
    ///
    /// Unknown role strings provision nothing and yield an empty result.
    /// Each bucket gets a store user; buckets that carry a profile document
    /// also get the profile upserted, stamped with the role-specific sync
    /// doc type in the account bucket and the generic one elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::MissingEmail`] when the profile has no
    /// email and [`ProvisionError::Store`] when a store call fails.
    pub async fn update_portal_user_sync_admin(
        &self,
        profile: SyncDocument,
    ) -> Result<Vec<UpdateResult>, ProvisionError> {
        let Some(role) = Role::parse(profile_role(&profile)) else {
            return Ok(Vec::new());
        };
        if role == Role::FacilityUser {
            return Ok(Vec::new());
        }
        let email = profile_email(&profile)
            .filter(|email| !email.is_empty())
            .map(str::to_string)
            .ok_or(ProvisionError::MissingEmail)?;
        let username = sync_username(&email);
        let mut profile = profile;
        profile.id = Some(portal_sync_admin_doc_id(&email));
        profile.extra.insert("syncUsername".to_string(), Value::String(username.clone()));
        let doc_id = profile.id.clone();

        let mut results = Vec::new();
        for bucket in role_buckets(role) {
            let user_result =
                self.store.update_user(bucket, &username, DEFAULT_SYNC_USER_PASSWORD).await?;
            if requires_profile_doc(bucket) {
                let mut doc = profile.clone();
                let sync_type = if *bucket == buckets::ACCOUNT_DATA {
                    role_sync_doc_type(role)
                } else {
                    SYNC_PORTAL_ADMIN
                };
                doc.doc_type = Some(sync_type.to_string());
                let stored = self.store.upsert(bucket, doc).await?;
                let ok = user_result.ok && stored.id == doc_id && stored.rev.is_some();
                results.push(UpdateResult {
                    ok,
                    id: stored.id,
                    rev: stored.rev,
                    error: None,
                    reason: None,
                });
            } else {
                results.push(user_result);
            }
        }
        Ok(results)
    }

    /// Writes the device sync-admin documents for one device.
    ///
    /// Document fields vary by bucket: the device id only reaches the
    /// download-status bucket, account and facility ids only the message
    /// bucket, and resident ids every bucket except download-status.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::Store`] when a store call fails.
    pub async fn update_device_user_sync_admin(
        &self,
        device: &DeviceSyncAdmin,
    ) -> Result<Vec<UpdateResult>, ProvisionError> {
        let doc_id = format!("{DEVICE_SYNC_ADMIN_DOC_PREFIX}{}", device.serial_number);
        let mut results = Vec::new();
        for bucket in DEVICE_SYNC_BUCKETS {
            let is_download_status = bucket == buckets::DOWNLOAD_STATUS_DATA;
            let is_message = bucket == buckets::MESSAGE_DATA;
            let mut doc = SyncDocument {
                id: Some(doc_id.clone()),
                doc_type: Some(SYNC_DEVICE_ADMIN.to_string()),
                account_id: device.account_id.clone().filter(|_| is_message),
                facility_id: device.facility_id.clone().filter(|_| is_message),
                ..SyncDocument::default()
            };
            doc.extra.insert(
                "serial_number".to_string(),
                Value::String(device.serial_number.clone()),
            );
            if is_download_status && let Some(device_id) = &device.device_id {
                doc.extra.insert("device_id".to_string(), Value::String(device_id.clone()));
            }
            if !is_download_status && let Some(resident_ids) = &device.resident_ids {
                let ids = resident_ids.iter().cloned().map(Value::String).collect();
                doc.extra.insert("resident_ids".to_string(), Value::Array(ids));
            }
            let stored = self.store.upsert(bucket, doc).await?;
            results.push(UpdateResult {
                ok: stored.rev.is_some(),
                id: stored.id,
                rev: stored.rev,
                error: None,
                reason: None,
            });
        }
        Ok(results)
    }

    /// Deletes the device sync-admin documents for one serial number.
    ///
    /// Buckets without the document report success without a store write.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::MissingSerial`] for an empty serial and
    /// [`ProvisionError::Store`] when a store call fails.
    pub async fn delete_device_user_sync_admin(
        &self,
        serial_number: &str,
    ) -> Result<Vec<UpdateResult>, ProvisionError> {
        if serial_number.is_empty() {
            return Err(ProvisionError::MissingSerial);
        }
        let doc_id = format!("{DEVICE_SYNC_ADMIN_DOC_PREFIX}{serial_number}");
        let mut results = Vec::new();
        for bucket in DEVICE_SYNC_BUCKETS {
            match self.store.get(bucket, &doc_id).await? {
                Some(doc) if doc.rev.is_some() => {
                    results.push(self.store.delete(bucket, &doc).await?);
                }
                _ => results.push(UpdateResult {
                    ok: true,
                    id: Some(doc_id.clone()),
                    rev: None,
                    error: None,
                    reason: None,
                }),
            }
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests;
