// crates/caresync-server/tests/routes_http.rs
// ============================================================================
// Module: Route Integration Tests
// Description: End-to-end tests of the router over a local listener.
// Purpose: Verify validation order, denials, and pass-through behavior.
// Dependencies: axum, caresync-auth, caresync-core, caresync-gateway,
//               caresync-server, reqwest, tokio
// ============================================================================

//! ## Overview
//! Boots the full router on a loopback listener with an in-memory store,
//! a scripted id resolver, and a stubbed portal introspector, then drives
//! it with a real HTTP client. Covers the validation-before-authentication
//! ordering, outcome-carried denials, permission messages, and the
//! provisioning summaries.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use caresync_analytics::AnalyticsError;
use caresync_analytics::IdResolver;
use caresync_analytics::QueryExecutor;
use caresync_auth::AuthError;
use caresync_auth::Authenticator;
use caresync_auth::OAuthVerifier;
use caresync_auth::PortalAuthHeaders;
use caresync_auth::SourceOs;
use caresync_auth::TokenIntrospector;
use caresync_auth::VerifiedClaims;
use caresync_config::OAuthConfig;
use caresync_core::SyncDocument;
use caresync_gateway::BulkUpdateResult;
use caresync_gateway::DbInfo;
use caresync_gateway::DocumentStore;
use caresync_gateway::GatewayError;
use caresync_gateway::UpdateResult;
use caresync_server::AppState;
use caresync_server::DocumentController;
use caresync_server::NoopMetrics;
use caresync_server::SyncAdminProvisioner;
use caresync_server::build_router;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Fakes
// ============================================================================

/// Verifier that must never be reached by portal-token tests.
struct UnusedVerifier;

#[async_trait]
impl OAuthVerifier for UnusedVerifier {
    async fn verify(&self, _token: &str, _os: SourceOs) -> Result<VerifiedClaims, AuthError> {
        Err(AuthError::Rejected("unused".to_string()))
    }
}

/// Introspector answering every session with a fixed confirmation.
struct StubIntrospector {
    /// Confirmation returned to every call.
    confirmed: bool,
}

#[async_trait]
impl TokenIntrospector for StubIntrospector {
    async fn validate(&self, _headers: &PortalAuthHeaders) -> Result<bool, AuthError> {
        Ok(self.confirmed)
    }
}

/// Executor answering every statement with a fixed id list.
struct ScriptedExecutor {
    /// Ids returned to every query.
    ids: Vec<String>,
}

#[async_trait]
impl QueryExecutor for ScriptedExecutor {
    async fn execute(
        &self,
        _statement: &str,
        _params: Vec<(String, String)>,
    ) -> Result<Vec<Value>, AnalyticsError> {
        Ok(self.ids.iter().map(|id| Value::String(id.clone())).collect())
    }
}

/// Mutable in-memory store shared by auth, the controller, and provisioning.
struct SharedStore {
    /// Documents keyed by (bucket, id).
    docs: Mutex<HashMap<(String, String), SyncDocument>>,
}

impl SharedStore {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            docs: Mutex::new(HashMap::new()),
        })
    }

    fn insert(&self, bucket: &str, doc: SyncDocument) {
        let id = doc.id.clone().unwrap_or_default();
        self.docs.lock().unwrap().insert((bucket.to_string(), id), doc);
    }

    fn fetch(&self, bucket: &str, id: &str) -> Option<SyncDocument> {
        self.docs.lock().unwrap().get(&(bucket.to_string(), id.to_string())).cloned()
    }
}

#[async_trait]
impl DocumentStore for SharedStore {
    async fn get(&self, bucket: &str, id: &str) -> Result<Option<SyncDocument>, GatewayError> {
        Ok(self.fetch(bucket, id))
    }

    async fn get_all_by_keys(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<Vec<SyncDocument>, GatewayError> {
        Ok(keys.iter().filter_map(|key| self.fetch(bucket, key)).collect())
    }

    async fn update(&self, bucket: &str, doc: SyncDocument) -> Result<SyncDocument, GatewayError> {
        let mut doc = doc;
        doc.rev = Some("1-a".to_string());
        self.insert(bucket, doc.clone());
        Ok(doc)
    }

    async fn upsert(&self, bucket: &str, doc: SyncDocument) -> Result<SyncDocument, GatewayError> {
        self.update(bucket, doc).await
    }

    async fn bulk_update(
        &self,
        _bucket: &str,
        _docs: &[SyncDocument],
    ) -> Result<Vec<BulkUpdateResult>, GatewayError> {
        Err(GatewayError::InvalidRequest("unused".to_string()))
    }

    async fn delete(&self, bucket: &str, doc: &SyncDocument) -> Result<UpdateResult, GatewayError> {
        let id = doc.id.clone().unwrap_or_default();
        self.docs.lock().unwrap().remove(&(bucket.to_string(), id.clone()));
        Ok(UpdateResult {
            ok: true,
            id: Some(id),
            rev: Some("2-b".to_string()),
            error: None,
            reason: None,
        })
    }

    async fn update_user(
        &self,
        _bucket: &str,
        username: &str,
        _password: &str,
    ) -> Result<UpdateResult, GatewayError> {
        Ok(UpdateResult {
            ok: true,
            id: Some(username.to_string()),
            rev: Some(String::new()),
            error: None,
            reason: None,
        })
    }

    async fn db_info(&self, _bucket: &str) -> Result<DbInfo, GatewayError> {
        Ok(DbInfo::default())
    }
}

// ============================================================================
// SECTION: Harness
// ============================================================================

/// Uid of the authenticated portal caller in these tests.
const CALLER_UID: &str = "admin@care.test";

fn oauth_config() -> OAuthConfig {
    OAuthConfig {
        android_client_id: "android-client".to_string(),
        ios_client_id: "ios-client".to_string(),
        verifier_url: "http://verifier.local".to_string(),
        allow_test_oauth: false,
        test_oauth_value: None,
    }
}

/// Seeds the caller's sync-admin profile into the account bucket with the
/// scope shape its role carries.
fn seed_caller_profile(store: &SharedStore, role: &str) {
    let account_scoped = matches!(role, "account-admin" | "facility-admin");
    let facility_ids = if role == "facility-admin" { json!(["fac-1"]) } else { json!([]) };
    let profile: SyncDocument = serde_json::from_value(json!({
        "_id": "portal_sync_admin_admin_40care.test",
        "account_id": if account_scoped { json!("acct-1") } else { json!("") },
        "email": CALLER_UID,
        "facility_ids": facility_ids,
        "type": role
    }))
    .unwrap();
    store.insert("account_data", profile);
}

/// Boots the router over the given fakes and returns its base URL.
async fn spawn_app(
    store: Arc<SharedStore>,
    resolver_ids: &[&str],
    introspection_confirmed: bool,
) -> String {
    let store_dyn: Arc<dyn DocumentStore> = Arc::clone(&store) as Arc<dyn DocumentStore>;
    let authenticator = Authenticator::new(
        oauth_config(),
        Arc::new(UnusedVerifier),
        Arc::new(StubIntrospector {
            confirmed: introspection_confirmed,
        }),
        Arc::clone(&store_dyn),
    );
    let executor = Arc::new(ScriptedExecutor {
        ids: resolver_ids.iter().map(ToString::to_string).collect(),
    });
    let state = Arc::new(AppState {
        authenticator,
        controller: DocumentController::new(IdResolver::new(executor), Arc::clone(&store_dyn)),
        provisioner: SyncAdminProvisioner::new(store_dyn),
        metrics: Arc::new(NoopMetrics),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Client request with the portal token header set attached.
fn with_auth(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request
        .header("access-token", "tok-1")
        .header("client", "web")
        .header("expiry", "9999999999")
        .header("uid", CALLER_UID)
        .header("token-type", "bearer")
}

// ============================================================================
// SECTION: Validation and Authentication Ordering
// ============================================================================

#[tokio::test]
async fn unknown_namespace_is_rejected_before_authentication() {
    let base = spawn_app(SharedStore::new(), &[], false).await;
    let response = reqwest::get(format!("{base}/sync-gateway/namespaces/bogus/docs"))
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid document namespace.");
}

#[tokio::test]
async fn unknown_type_is_rejected_before_authentication() {
    let base = spawn_app(SharedStore::new(), &[], false).await;
    let response =
        reqwest::get(format!("{base}/sync-gateway/namespaces/account/types/widget/docs"))
            .await
            .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid document type.");
}

#[tokio::test]
async fn failed_introspection_renders_the_outcome_denial() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "account-admin");
    let base = spawn_app(store, &[], false).await;
    let client = reqwest::Client::new();
    let response = with_auth(client.get(format!("{base}/sync-gateway/namespaces/account/docs")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);
    assert_eq!(response.text().await.unwrap(), "Unauthorized");
}

// ============================================================================
// SECTION: Listings
// ============================================================================

#[tokio::test]
async fn listing_returns_resolved_docs_for_an_authorized_caller() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "account-admin");
    let doc: SyncDocument = serde_json::from_value(json!({
        "_id": "dev-1",
        "doc_type": "account_device",
        "account_id": "acct-1"
    }))
    .unwrap();
    store.insert("account_data", doc);
    let base = spawn_app(store, &["dev-1"], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(client.get(format!("{base}/sync-gateway/namespaces/account/docs")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let docs: Vec<Value> = response.json().await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0]["_id"], json!("dev-1"));
}

#[tokio::test]
async fn account_admin_cannot_list_the_content_namespace() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "account-admin");
    let base = spawn_app(store, &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(client.get(format!("{base}/sync-gateway/namespaces/content/docs")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(
        response.text().await.unwrap(),
        "User does not have permission to access these documents."
    );
}

#[tokio::test]
async fn facility_admin_content_listing_is_denied_before_resolution() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "facility-admin");
    let doc: SyncDocument = serde_json::from_value(json!({
        "_id": "item-1",
        "doc_type": "content_content_item"
    }))
    .unwrap();
    store.insert("account_data", doc);
    let base = spawn_app(store, &["item-1"], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client.get(format!("{base}/sync-gateway/namespaces/content/types/content_item/docs")),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(
        response.text().await.unwrap(),
        "User does not have permission to access these documents."
    );
}

// ============================================================================
// SECTION: Single Documents
// ============================================================================

#[tokio::test]
async fn missing_document_answers_not_found_before_permission() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "account-admin");
    let base = spawn_app(store, &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client.get(format!("{base}/sync-gateway/namespaces/account/types/device/docs/nope")),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(response.text().await.unwrap(), "Not Found");
}

#[tokio::test]
async fn cross_account_read_is_denied() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "account-admin");
    let doc: SyncDocument = serde_json::from_value(json!({
        "_id": "dev-2",
        "doc_type": "account_device",
        "account_id": "acct-other"
    }))
    .unwrap();
    store.insert("account_data", doc);
    let base = spawn_app(store, &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client.get(format!("{base}/sync-gateway/namespaces/account/types/device/docs/dev-2")),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(
        response.text().await.unwrap(),
        "User does not have permission to access this document."
    );
}

#[tokio::test]
async fn post_assigns_a_fresh_id_and_stores_the_document() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "account-admin");
    let base = spawn_app(Arc::clone(&store), &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client
            .post(format!("{base}/sync-gateway/namespaces/account/types/device/docs"))
            .body(json!({ "doc_type": "account_device", "account_id": "acct-1" }).to_string()),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let written: Value = response.json().await.unwrap();
    let id = written["_id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 36);
    assert!(store.fetch("account_data", &id).is_some());
}

#[tokio::test]
async fn facility_admin_cannot_create_a_facility_document() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "facility-admin");
    let base = spawn_app(store, &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client
            .post(format!("{base}/sync-gateway/namespaces/account/types/facility/docs"))
            .body(json!({ "doc_type": "account_facility", "account_id": "acct-1" }).to_string()),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    assert_eq!(
        response.text().await.unwrap(),
        "User does not have permission to create this document."
    );
}

#[tokio::test]
async fn delete_removes_the_stored_document() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "account-admin");
    let doc: SyncDocument = serde_json::from_value(json!({
        "_id": "dev-3",
        "_rev": "3-c",
        "doc_type": "account_device",
        "account_id": "acct-1"
    }))
    .unwrap();
    store.insert("account_data", doc);
    let base = spawn_app(Arc::clone(&store), &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client.delete(format!("{base}/sync-gateway/namespaces/account/types/device/docs/dev-3")),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["ok"], json!(true));
    assert!(store.fetch("account_data", "dev-3").is_none());
}

// ============================================================================
// SECTION: Provisioning Routes
// ============================================================================

#[tokio::test]
async fn portal_user_provisioning_answers_a_summary() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "in2l-admin");
    let base = spawn_app(Arc::clone(&store), &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client
            .post(format!("{base}/syncadmin/portaluser"))
            .body(json!({ "type": "facility-admin", "email": "pat@care.test" }).to_string()),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary["ok"], json!(true));
    assert_eq!(summary["id"], json!("pat_40care.test"));
    assert!(store.fetch("account_data", "portal_sync_admin_pat_40care.test").is_some());
}

#[tokio::test]
async fn device_provisioning_requires_a_serial_number() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "in2l-admin");
    let base = spawn_app(store, &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(
        client
            .post(format!("{base}/syncadmin/deviceuser"))
            .body(json!({ "device_id": "dev-9" }).to_string()),
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status().as_u16(), 400);
    assert_eq!(response.text().await.unwrap(), "Invalid device serial number");
}

#[tokio::test]
async fn device_deprovisioning_answers_per_bucket_results() {
    let store = SharedStore::new();
    seed_caller_profile(&store, "in2l-admin");
    let held: SyncDocument = serde_json::from_value(json!({
        "_id": "device_sync_admin_SN-9",
        "_rev": "4-d"
    }))
    .unwrap();
    store.insert("favorites_data", held);
    let base = spawn_app(Arc::clone(&store), &[], true).await;
    let client = reqwest::Client::new();
    let response = with_auth(client.delete(format!("{base}/syncadmin/deviceuser/SN-9")))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let results: Vec<Value> = response.json().await.unwrap();
    assert_eq!(results.len(), 3);
    assert!(store.fetch("favorites_data", "device_sync_admin_SN-9").is_none());
}
