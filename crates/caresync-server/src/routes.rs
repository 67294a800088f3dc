// crates/caresync-server/src/routes.rs
// ============================================================================
// Module: HTTP Routes
// Description: axum handlers for document pass-through and provisioning.
// Purpose: Sequence validation, authentication, and permission checks.
// Dependencies: axum, caresync-auth, caresync-core, caresync-gateway, serde
// ============================================================================

//! ## Overview
//! Handlers are thin and strictly ordered: path validation first, then
//! authentication, then permission checks, then the controller call. Denials
//! render the message and status carried by the authentication outcome;
//! permission failures render the per-operation wire messages. Single
//! document reads and deletes fetch the document before checking permission
//! so missing documents answer 404 rather than leaking a denial.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::Router;
use axum::extract::Path;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::post;
use caresync_auth::Authenticator;
use caresync_auth::PortalAuthHeaders;
use caresync_core::Action;
use caresync_core::AuthOutcome;
use caresync_core::CallerContext;
use caresync_core::Namespace;
use caresync_core::Role;
use caresync_core::SyncDocument;
use caresync_core::has_namespace_permission;
use caresync_core::has_permission;
use caresync_core::is_valid_doc_type;
use caresync_gateway::UpdateResult;
use serde_json::Value;

use crate::controller::DocumentController;
use crate::sync_admin::DeviceSyncAdmin;
use crate::sync_admin::ProvisionError;
use crate::sync_admin::SyncAdminProvisioner;
use crate::telemetry::RequestMetrics;
use crate::telemetry::RouteMetricEvent;

// ============================================================================
// SECTION: Wire Messages
// ============================================================================

/// Rejection for an unknown document namespace.
const INVALID_NAMESPACE: &str = "Invalid document namespace.";
/// Rejection for an unknown document type.
const INVALID_TYPE: &str = "Invalid document type.";
/// Rejection for an empty document id.
const INVALID_ID: &str = "Invalid document ID.";
/// Rejection for an unparseable request body.
const INVALID_BODY: &str = "Invalid document body.";
/// Rejection for a missing device serial number.
const INVALID_SERIAL: &str = "Invalid device serial number";
/// Rejection for a portal user without an email.
const INVALID_EMAIL: &str = "Invalid portal user email.";
/// Body of the single-document 404 answer.
const NOT_FOUND: &str = "Not Found";
/// Listing denial message.
const NO_LIST_PERMISSION: &str = "User does not have permission to access these documents.";
/// Single-document read denial message.
const NO_GET_PERMISSION: &str = "User does not have permission to access this document.";
/// Create denial message.
const NO_CREATE_PERMISSION: &str = "User does not have permission to create this document.";
/// Update denial message.
const NO_UPDATE_PERMISSION: &str = "User does not have permission to update this document.";
/// Delete denial message.
const NO_DELETE_PERMISSION: &str = "User does not have permission to delete this document.";
/// Body of downstream-failure answers.
const INTERNAL_ERROR: &str = "Internal server error.";

// ============================================================================
// SECTION: State and Router
// ============================================================================

/// Shared state behind every route handler.
pub struct AppState {
    /// Authentication front door for portal callers.
    pub authenticator: Authenticator,
    /// Pass-through document controller.
    pub controller: DocumentController,
    /// Sync-admin provisioner.
    pub provisioner: SyncAdminProvisioner,
    /// Metrics sink for route observations.
    pub metrics: Arc<dyn RequestMetrics>,
}

/// Builds the application router over the shared state.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sync-gateway/namespaces/{namespace}/docs", get(list_namespace_docs))
        .route(
            "/sync-gateway/namespaces/{namespace}/types/{type}/docs",
            get(list_type_docs).post(create_doc).put(update_doc),
        )
        .route(
            "/sync-gateway/namespaces/{namespace}/types/{type}/docs/{id}",
            get(fetch_doc).delete(remove_doc),
        )
        .route("/syncadmin/portaluser", post(provision_portal_user))
        .route("/syncadmin/deviceuser", post(provision_device_user))
        .route("/syncadmin/deviceuser/{serial_number}", delete(deprovision_device_user))
        .with_state(state)
}

// ============================================================================
// SECTION: Shared Helpers
// ============================================================================

/// Reads one header value, defaulting to empty.
fn header_value(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Collects the portal token header set from a request.
fn portal_headers(headers: &HeaderMap) -> PortalAuthHeaders {
    PortalAuthHeaders {
        access_token: header_value(headers, "access-token"),
        client: header_value(headers, "client"),
        expiry: header_value(headers, "expiry"),
        uid: header_value(headers, "uid"),
        token_type: header_value(headers, "token-type"),
    }
}

/// Renders the denial carried by an authentication outcome.
fn denial_response(outcome: &AuthOutcome) -> Response {
    let status = outcome
        .error_code
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::UNAUTHORIZED);
    let message = outcome.error_message.clone().unwrap_or_else(|| "Unauthorized".to_string());
    (status, message).into_response()
}

/// Authenticates a portal caller or yields the denial response.
async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthOutcome, Response> {
    let outcome = state.authenticator.authenticate_portal_token(&portal_headers(headers)).await;
    if outcome.is_authorized {
        Ok(outcome)
    } else {
        Err(denial_response(&outcome))
    }
}

/// Builds a caller context from an authorized outcome, when its scope parses.
fn caller_from(outcome: &AuthOutcome) -> Option<CallerContext> {
    CallerContext::from_outcome(outcome).ok()
}

/// Downstream-failure answer.
fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR).into_response()
}

/// Records the route observation and passes the response through.
fn observe(state: &AppState, route: &'static str, started: Instant, response: Response) -> Response {
    let event = RouteMetricEvent {
        route,
        status: response.status().as_u16(),
    };
    state.metrics.record_request(event);
    state.metrics.record_latency(event, started.elapsed());
    response
}

/// Folds portal provisioning results into the summary answer.
pub(crate) fn fold_portal_results(results: &[UpdateResult]) -> Value {
    let mut id = String::new();
    let mut ok = true;
    for result in results {
        if let Some(result_id) = &result.id
            && !result_id.is_empty()
        {
            id.clone_from(result_id);
        }
        ok = ok && result.ok;
    }
    serde_json::json!({ "id": id, "rev": "", "ok": ok })
}

/// Folds device provisioning results into the summary answer.
pub(crate) fn fold_device_results(results: &[UpdateResult]) -> Value {
    let mut id = String::new();
    let mut ok = true;
    let mut reason = None;
    for result in results {
        let current_ok = result.ok || result.rev.as_deref().is_some_and(|rev| !rev.is_empty());
        if let Some(result_id) = &result.id
            && !result_id.is_empty()
        {
            id.clone_from(result_id);
        }
        ok = ok && current_ok;
        if !current_ok {
            reason = serde_json::to_string(result).ok();
        }
    }
    let mut summary = serde_json::json!({ "id": id, "rev": "", "ok": ok });
    if let (Some(reason), Some(map)) = (reason, summary.as_object_mut()) {
        map.insert("reason".to_string(), Value::String(reason));
    }
    summary
}

// ============================================================================
// SECTION: Document Listing Handlers
// ============================================================================

/// GET `/sync-gateway/namespaces/{namespace}/docs`.
async fn list_namespace_docs(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let response = list_namespace_docs_inner(&state, &namespace, &headers).await;
    observe(&state, "sync_gateway.namespace_docs", started, response)
}

/// Listing flow shared wrapper for the namespace route.
async fn list_namespace_docs_inner(
    state: &AppState,
    namespace: &str,
    headers: &HeaderMap,
) -> Response {
    let Some(namespace) = Namespace::parse(namespace) else {
        return (StatusCode::BAD_REQUEST, INVALID_NAMESPACE).into_response();
    };
    let outcome = match authenticate(state, headers).await {
        Ok(outcome) => outcome,
        Err(denied) => return denied,
    };
    if !namespace_allowed(namespace, &outcome) {
        return (StatusCode::FORBIDDEN, NO_LIST_PERMISSION).into_response();
    }
    let Some(caller) = caller_from(&outcome) else {
        return (StatusCode::FORBIDDEN, NO_LIST_PERMISSION).into_response();
    };
    match state.controller.get_docs_by_namespace(namespace, &caller).await {
        Ok(docs) => Json(docs).into_response(),
        Err(_) => internal_error(),
    }
}

/// GET `/sync-gateway/namespaces/{namespace}/types/{type}/docs`.
async fn list_type_docs(
    State(state): State<Arc<AppState>>,
    Path((namespace, type_name)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let response = list_type_docs_inner(&state, &namespace, &type_name, &headers).await;
    observe(&state, "sync_gateway.type_docs", started, response)
}

/// Listing flow for the typed route.
async fn list_type_docs_inner(
    state: &AppState,
    namespace: &str,
    type_name: &str,
    headers: &HeaderMap,
) -> Response {
    let Some(namespace) = Namespace::parse(namespace) else {
        return (StatusCode::BAD_REQUEST, INVALID_NAMESPACE).into_response();
    };
    if !is_valid_doc_type(namespace, type_name) {
        return (StatusCode::BAD_REQUEST, INVALID_TYPE).into_response();
    }
    let outcome = match authenticate(state, headers).await {
        Ok(outcome) => outcome,
        Err(denied) => return denied,
    };
    if !namespace_allowed(namespace, &outcome) {
        return (StatusCode::FORBIDDEN, NO_LIST_PERMISSION).into_response();
    }
    let Some(caller) = caller_from(&outcome) else {
        return (StatusCode::FORBIDDEN, NO_LIST_PERMISSION).into_response();
    };
    match state.controller.get_docs_by_namespace_type(namespace, type_name, &caller).await {
        Ok(docs) => Json(docs).into_response(),
        Err(_) => internal_error(),
    }
}

/// Whether the outcome's role may list the namespace.
fn namespace_allowed(namespace: Namespace, outcome: &AuthOutcome) -> bool {
    outcome
        .role
        .as_deref()
        .and_then(Role::parse)
        .is_some_and(|role| has_namespace_permission(namespace, role))
}

// ============================================================================
// SECTION: Single-Document Handlers
// ============================================================================

/// GET `/sync-gateway/namespaces/{namespace}/types/{type}/docs/{id}`.
async fn fetch_doc(
    State(state): State<Arc<AppState>>,
    Path((namespace, type_name, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let response = fetch_doc_inner(&state, &namespace, &type_name, &id, &headers).await;
    observe(&state, "sync_gateway.doc_get", started, response)
}

/// Single-document read flow.
async fn fetch_doc_inner(
    state: &AppState,
    namespace: &str,
    type_name: &str,
    id: &str,
    headers: &HeaderMap,
) -> Response {
    let Some(namespace) = Namespace::parse(namespace) else {
        return (StatusCode::BAD_REQUEST, INVALID_NAMESPACE).into_response();
    };
    if !is_valid_doc_type(namespace, type_name) {
        return (StatusCode::BAD_REQUEST, INVALID_TYPE).into_response();
    }
    if id.is_empty() {
        return (StatusCode::BAD_REQUEST, INVALID_ID).into_response();
    }
    let outcome = match authenticate(state, headers).await {
        Ok(outcome) => outcome,
        Err(denied) => return denied,
    };
    let doc = match state.controller.get_doc(namespace, type_name, id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return (StatusCode::NOT_FOUND, NOT_FOUND).into_response(),
        Err(_) => return internal_error(),
    };
    let allowed = caller_from(&outcome)
        .is_some_and(|caller| has_permission(Action::Get, &doc, &caller));
    if !allowed {
        return (StatusCode::FORBIDDEN, NO_GET_PERMISSION).into_response();
    }
    Json(doc).into_response()
}

/// POST `/sync-gateway/namespaces/{namespace}/types/{type}/docs`.
async fn create_doc(
    State(state): State<Arc<AppState>>,
    Path((namespace, type_name)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let started = Instant::now();
    let response = write_doc_inner(&state, &namespace, &type_name, &headers, &body, Action::Post)
        .await;
    observe(&state, "sync_gateway.doc_post", started, response)
}

/// PUT `/sync-gateway/namespaces/{namespace}/types/{type}/docs`.
async fn update_doc(
    State(state): State<Arc<AppState>>,
    Path((namespace, type_name)): Path<(String, String)>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let started = Instant::now();
    let response =
        write_doc_inner(&state, &namespace, &type_name, &headers, &body, Action::Put).await;
    observe(&state, "sync_gateway.doc_put", started, response)
}

/// Shared create/update flow; the action picks the store call and denial.
async fn write_doc_inner(
    state: &AppState,
    namespace: &str,
    type_name: &str,
    headers: &HeaderMap,
    body: &str,
    action: Action,
) -> Response {
    let Some(namespace) = Namespace::parse(namespace) else {
        return (StatusCode::BAD_REQUEST, INVALID_NAMESPACE).into_response();
    };
    if !is_valid_doc_type(namespace, type_name) {
        return (StatusCode::BAD_REQUEST, INVALID_TYPE).into_response();
    }
    let Ok(doc) = serde_json::from_str::<SyncDocument>(body) else {
        return (StatusCode::BAD_REQUEST, INVALID_BODY).into_response();
    };
    let outcome = match authenticate(state, headers).await {
        Ok(outcome) => outcome,
        Err(denied) => return denied,
    };
    let allowed =
        caller_from(&outcome).is_some_and(|caller| has_permission(action, &doc, &caller));
    if !allowed {
        let message = if action == Action::Post {
            NO_CREATE_PERMISSION
        } else {
            NO_UPDATE_PERMISSION
        };
        return (StatusCode::FORBIDDEN, message).into_response();
    }
    let written = if action == Action::Post {
        state.controller.post_doc(doc).await
    } else {
        state.controller.put_doc(doc).await
    };
    match written {
        Ok(doc) => Json(doc).into_response(),
        Err(_) => internal_error(),
    }
}

/// DELETE `/sync-gateway/namespaces/{namespace}/types/{type}/docs/{id}`.
async fn remove_doc(
    State(state): State<Arc<AppState>>,
    Path((namespace, type_name, id)): Path<(String, String, String)>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let response = remove_doc_inner(&state, &namespace, &type_name, &id, &headers).await;
    observe(&state, "sync_gateway.doc_delete", started, response)
}

/// Single-document delete flow; fetches before checking permission.
async fn remove_doc_inner(
    state: &AppState,
    namespace: &str,
    type_name: &str,
    id: &str,
    headers: &HeaderMap,
) -> Response {
    let Some(namespace) = Namespace::parse(namespace) else {
        return (StatusCode::BAD_REQUEST, INVALID_NAMESPACE).into_response();
    };
    if !is_valid_doc_type(namespace, type_name) {
        return (StatusCode::BAD_REQUEST, INVALID_TYPE).into_response();
    }
    if id.is_empty() {
        return (StatusCode::BAD_REQUEST, INVALID_ID).into_response();
    }
    let outcome = match authenticate(state, headers).await {
        Ok(outcome) => outcome,
        Err(denied) => return denied,
    };
    let doc = match state.controller.get_doc(namespace, type_name, id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return (StatusCode::NOT_FOUND, NOT_FOUND).into_response(),
        Err(_) => return internal_error(),
    };
    let allowed = caller_from(&outcome)
        .is_some_and(|caller| has_permission(Action::Delete, &doc, &caller));
    if !allowed {
        return (StatusCode::FORBIDDEN, NO_DELETE_PERMISSION).into_response();
    }
    match state.controller.delete_doc(&doc).await {
        Ok(result) => Json(result).into_response(),
        Err(_) => internal_error(),
    }
}

// ============================================================================
// SECTION: Provisioning Handlers
// ============================================================================

/// POST `/syncadmin/portaluser`.
async fn provision_portal_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let started = Instant::now();
    let response = provision_portal_user_inner(&state, &headers, &body).await;
    observe(&state, "sync_admin.portal_user", started, response)
}

/// Portal user provisioning flow.
async fn provision_portal_user_inner(
    state: &AppState,
    headers: &HeaderMap,
    body: &str,
) -> Response {
    let Ok(profile) = serde_json::from_str::<SyncDocument>(body) else {
        return (StatusCode::BAD_REQUEST, INVALID_BODY).into_response();
    };
    if let Err(denied) = authenticate(state, headers).await {
        return denied;
    }
    match state.provisioner.update_portal_user_sync_admin(profile).await {
        Ok(results) => Json(fold_portal_results(&results)).into_response(),
        Err(ProvisionError::MissingEmail) => {
            (StatusCode::BAD_REQUEST, INVALID_EMAIL).into_response()
        }
        Err(_) => internal_error(),
    }
}

/// POST `/syncadmin/deviceuser`.
async fn provision_device_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let started = Instant::now();
    let response = provision_device_user_inner(&state, &headers, &body).await;
    observe(&state, "sync_admin.device_user", started, response)
}

/// Device provisioning flow; the serial check precedes authentication.
async fn provision_device_user_inner(
    state: &AppState,
    headers: &HeaderMap,
    body: &str,
) -> Response {
    let Ok(device) = serde_json::from_str::<DeviceSyncAdmin>(body) else {
        return (StatusCode::BAD_REQUEST, INVALID_BODY).into_response();
    };
    if device.serial_number.is_empty() {
        return (StatusCode::BAD_REQUEST, INVALID_SERIAL).into_response();
    }
    if let Err(denied) = authenticate(state, headers).await {
        return denied;
    }
    match state.provisioner.update_device_user_sync_admin(&device).await {
        Ok(results) => Json(fold_device_results(&results)).into_response(),
        Err(_) => internal_error(),
    }
}

/// DELETE `/syncadmin/deviceuser/{serial_number}`.
async fn deprovision_device_user(
    State(state): State<Arc<AppState>>,
    Path(serial_number): Path<String>,
    headers: HeaderMap,
) -> Response {
    let started = Instant::now();
    let response = deprovision_device_user_inner(&state, &serial_number, &headers).await;
    observe(&state, "sync_admin.device_user_delete", started, response)
}

/// Device deprovisioning flow.
async fn deprovision_device_user_inner(
    state: &AppState,
    serial_number: &str,
    headers: &HeaderMap,
) -> Response {
    if serial_number.is_empty() {
        return (StatusCode::BAD_REQUEST, INVALID_SERIAL).into_response();
    }
    if let Err(denied) = authenticate(state, headers).await {
        return denied;
    }
    match state.provisioner.delete_device_user_sync_admin(serial_number).await {
        Ok(results) => Json(results).into_response(),
        Err(ProvisionError::MissingSerial) => {
            (StatusCode::BAD_REQUEST, INVALID_SERIAL).into_response()
        }
        Err(_) => internal_error(),
    }
}
