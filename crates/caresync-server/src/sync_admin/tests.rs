// crates/caresync-server/src/sync_admin/tests.rs
// ============================================================================
// Module: Sync-Admin Provisioning Tests
// Description: Unit tests for portal and device provisioning against fakes.
// Purpose: Pin bucket sets, doc-type stamping, and per-bucket doc fields.
// Dependencies: async-trait, caresync-core, caresync-gateway, serde_json
// ============================================================================

//! Unit tests for the sync-admin provisioner.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use caresync_core::SyncDocument;
use caresync_gateway::BulkUpdateResult;
use caresync_gateway::DbInfo;
use caresync_gateway::DocumentStore;
use caresync_gateway::GatewayError;
use caresync_gateway::UpdateResult;
use serde_json::Value;
use serde_json::json;

use super::DeviceSyncAdmin;
use super::ProvisionError;
use super::SyncAdminProvisioner;

// ============================================================================
// SECTION: Fake Store
// ============================================================================

/// Store recording provisioning calls and echoing upserts with a revision.
struct ProvisionStore {
    /// Documents answered by `get`, keyed by bucket.
    docs: HashMap<String, SyncDocument>,
    /// `update_user` calls as (bucket, username, password).
    users: Mutex<Vec<(String, String, String)>>,
    /// `upsert` calls as (bucket, document).
    upserts: Mutex<Vec<(String, SyncDocument)>>,
    /// `delete` calls as (bucket, document id).
    deletes: Mutex<Vec<(String, Option<String>)>>,
}

impl ProvisionStore {
    fn empty() -> Arc<Self> {
        Arc::new(Self {
            docs: HashMap::new(),
            users: Mutex::new(Vec::new()),
            upserts: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        })
    }

    /// Store answering `get` in one bucket with the given document.
    fn with_doc(bucket: &str, doc: SyncDocument) -> Arc<Self> {
        let mut docs = HashMap::new();
        docs.insert(bucket.to_string(), doc);
        Arc::new(Self {
            docs,
            users: Mutex::new(Vec::new()),
            upserts: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        })
    }

    fn users(&self) -> Vec<(String, String, String)> {
        self.users.lock().unwrap().clone()
    }

    fn upserts(&self) -> Vec<(String, SyncDocument)> {
        self.upserts.lock().unwrap().clone()
    }

    fn deletes(&self) -> Vec<(String, Option<String>)> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentStore for ProvisionStore {
    async fn get(&self, bucket: &str, _id: &str) -> Result<Option<SyncDocument>, GatewayError> {
        Ok(self.docs.get(bucket).cloned())
    }

    async fn get_all_by_keys(
        &self,
        _bucket: &str,
        _keys: &[String],
    ) -> Result<Vec<SyncDocument>, GatewayError> {
        Err(GatewayError::InvalidRequest("unused".to_string()))
    }

    async fn update(
        &self,
        _bucket: &str,
        _doc: SyncDocument,
    ) -> Result<SyncDocument, GatewayError> {
        Err(GatewayError::InvalidRequest("unused".to_string()))
    }

    async fn upsert(&self, bucket: &str, doc: SyncDocument) -> Result<SyncDocument, GatewayError> {
        self.upserts.lock().unwrap().push((bucket.to_string(), doc.clone()));
        let mut doc = doc;
        doc.rev = Some("1-a".to_string());
        Ok(doc)
    }

    async fn bulk_update(
        &self,
        _bucket: &str,
        _docs: &[SyncDocument],
    ) -> Result<Vec<BulkUpdateResult>, GatewayError> {
        Err(GatewayError::InvalidRequest("unused".to_string()))
    }

    async fn delete(&self, bucket: &str, doc: &SyncDocument) -> Result<UpdateResult, GatewayError> {
        self.deletes.lock().unwrap().push((bucket.to_string(), doc.id.clone()));
        Ok(UpdateResult {
            ok: true,
            id: doc.id.clone(),
            rev: Some("2-b".to_string()),
            error: None,
            reason: None,
        })
    }

    async fn update_user(
        &self,
        bucket: &str,
        username: &str,
        password: &str,
    ) -> Result<UpdateResult, GatewayError> {
        self.users.lock().unwrap().push((
            bucket.to_string(),
            username.to_string(),
            password.to_string(),
        ));
        Ok(UpdateResult {
            ok: true,
            id: Some(username.to_string()),
            rev: Some(String::new()),
            error: None,
            reason: None,
        })
    }

    async fn db_info(&self, _bucket: &str) -> Result<DbInfo, GatewayError> {
        Err(GatewayError::InvalidRequest("unused".to_string()))
    }
}

// ============================================================================
// SECTION: Builders
// ============================================================================

fn portal_profile(role: &str, email: &str) -> SyncDocument {
    serde_json::from_value(json!({
        "type": role,
        "email": email,
        "first_name": "Pat"
    }))
    .unwrap()
}

fn extra_str<'a>(doc: &'a SyncDocument, field: &str) -> Option<&'a str> {
    doc.extra.get(field).and_then(Value::as_str)
}

// ============================================================================
// SECTION: Portal User Provisioning
// ============================================================================

#[tokio::test]
async fn unknown_role_provisions_nothing() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let results = provisioner
        .update_portal_user_sync_admin(portal_profile("superuser", "x@care.test"))
        .await
        .unwrap();
    assert!(results.is_empty());
    assert!(store.users().is_empty());
    assert!(store.upserts().is_empty());
}

#[tokio::test]
async fn facility_user_role_provisions_nothing() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let results = provisioner
        .update_portal_user_sync_admin(portal_profile("facility-user", "x@care.test"))
        .await
        .unwrap();
    assert!(results.is_empty());
    assert!(store.users().is_empty());
}

#[tokio::test]
async fn missing_email_is_rejected_before_any_write() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let result = provisioner
        .update_portal_user_sync_admin(portal_profile("facility-admin", ""))
        .await;
    assert!(matches!(result, Err(ProvisionError::MissingEmail)));
    assert!(store.users().is_empty());
}

#[tokio::test]
async fn facility_admin_gets_five_users_and_two_profile_docs() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let results = provisioner
        .update_portal_user_sync_admin(portal_profile("facility-admin", "Pat@Care.Test"))
        .await
        .unwrap();
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|result| result.ok));

    let users = store.users();
    let expected_username = "pat_40care.test";
    assert_eq!(
        users.iter().map(|(bucket, ..)| bucket.as_str()).collect::<Vec<_>>(),
        vec![
            "account_data",
            "favorites_data",
            "message_data",
            "resident_data",
            "user_profile_data"
        ]
    );
    assert!(users.iter().all(|(_, username, _)| username == expected_username));
    assert!(users.iter().all(|(.., password)| password == "in2luser"));

    let upserts = store.upserts();
    assert_eq!(upserts.len(), 2);
    let (account_bucket, account_doc) = &upserts[0];
    assert_eq!(account_bucket, "account_data");
    assert_eq!(account_doc.doc_type.as_deref(), Some("sync_facility-admin"));
    assert_eq!(account_doc.id.as_deref(), Some("portal_sync_admin_pat_40care.test"));
    assert_eq!(extra_str(account_doc, "syncUsername"), Some(expected_username));
    let (resident_bucket, resident_doc) = &upserts[1];
    assert_eq!(resident_bucket, "resident_data");
    assert_eq!(resident_doc.doc_type.as_deref(), Some("sync_in2l"));
}

#[tokio::test]
async fn content_admin_provisions_the_content_bucket_pair() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let results = provisioner
        .update_portal_user_sync_admin(portal_profile("in2l", "curator@care.test"))
        .await
        .unwrap();
    assert_eq!(results.len(), 2);

    let users = store.users();
    assert_eq!(
        users.iter().map(|(bucket, ..)| bucket.as_str()).collect::<Vec<_>>(),
        vec!["content_meta_data", "user_profile_data"]
    );

    let upserts = store.upserts();
    assert_eq!(upserts.len(), 1);
    assert_eq!(upserts[0].0, "content_meta_data");
    assert_eq!(upserts[0].1.doc_type.as_deref(), Some("sync_in2l"));
}

#[tokio::test]
async fn platform_admin_covers_every_bucket_with_role_type_in_account() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let results = provisioner
        .update_portal_user_sync_admin(portal_profile("in2l-admin", "root@care.test"))
        .await
        .unwrap();
    assert_eq!(results.len(), 7);

    let upserts = store.upserts();
    assert_eq!(
        upserts.iter().map(|(bucket, _)| bucket.as_str()).collect::<Vec<_>>(),
        vec!["account_data", "content_meta_data", "download_status_data", "resident_data"]
    );
    assert_eq!(upserts[0].1.doc_type.as_deref(), Some("sync_in2l-admin"));
    assert!(
        upserts[1 ..]
            .iter()
            .all(|(_, doc)| doc.doc_type.as_deref() == Some("sync_in2l"))
    );
}

// ============================================================================
// SECTION: Device Provisioning
// ============================================================================

fn device() -> DeviceSyncAdmin {
    DeviceSyncAdmin {
        serial_number: "SN-9".to_string(),
        device_id: Some("dev-9".to_string()),
        account_id: Some("acct-1".to_string()),
        facility_id: Some("fac-1".to_string()),
        resident_ids: Some(vec!["res-1".to_string(), "res-2".to_string()]),
    }
}

#[tokio::test]
async fn device_docs_vary_fields_by_bucket() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let results = provisioner.update_device_user_sync_admin(&device()).await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| result.ok));

    let upserts = store.upserts();
    assert_eq!(
        upserts.iter().map(|(bucket, _)| bucket.as_str()).collect::<Vec<_>>(),
        vec!["download_status_data", "favorites_data", "message_data"]
    );
    for (_, doc) in &upserts {
        assert_eq!(doc.id.as_deref(), Some("device_sync_admin_SN-9"));
        assert_eq!(extra_str(doc, "serial_number"), Some("SN-9"));
        assert_eq!(doc.doc_type.as_deref(), Some("sync_device_sync_admin"));
    }

    let download = &upserts[0].1;
    assert_eq!(extra_str(download, "device_id"), Some("dev-9"));
    assert!(download.extra.get("resident_ids").is_none());
    assert!(download.account_id.is_none());

    let favorites = &upserts[1].1;
    assert!(favorites.extra.get("device_id").is_none());
    assert!(favorites.extra.get("resident_ids").is_some());
    assert!(favorites.account_id.is_none());

    let message = &upserts[2].1;
    assert_eq!(message.account_id.as_deref(), Some("acct-1"));
    assert_eq!(message.facility_id.as_deref(), Some("fac-1"));
    assert!(message.extra.get("resident_ids").is_some());
}

#[tokio::test]
async fn device_delete_skips_buckets_without_the_doc() {
    let held: SyncDocument = serde_json::from_value(json!({
        "_id": "device_sync_admin_SN-9",
        "_rev": "4-d"
    }))
    .unwrap();
    let store = ProvisionStore::with_doc("favorites_data", held);
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let results = provisioner.delete_device_user_sync_admin("SN-9").await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|result| result.ok));
    assert_eq!(
        store.deletes(),
        vec![("favorites_data".to_string(), Some("device_sync_admin_SN-9".to_string()))]
    );
}

#[tokio::test]
async fn device_delete_rejects_an_empty_serial() {
    let store = ProvisionStore::empty();
    let provisioner = SyncAdminProvisioner::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
    let result = provisioner.delete_device_user_sync_admin("").await;
    assert!(matches!(result, Err(ProvisionError::MissingSerial)));
    assert!(store.deletes().is_empty());
}
