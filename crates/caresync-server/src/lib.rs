// crates/caresync-server/src/lib.rs
// ============================================================================
// Module: CareSync Server
// Description: HTTP surface for the document pass-through and provisioning.
// Purpose: Wire authentication, resolution, and the store behind axum routes.
// Dependencies: axum, caresync-analytics, caresync-auth, caresync-core,
//               caresync-gateway, serde, tokio, uuid
// ============================================================================

//! ## Overview
//! The server crate holds the thin outer layer of the CareSync API: the
//! pass-through document controller, the sync-admin provisioner, and the
//! axum route handlers that sequence validation, authentication, and
//! permission checks in front of them. All policy lives in the inner
//! crates; handlers only order the calls and map denials to status codes.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod controller;
pub mod error;
pub mod routes;
pub mod sync_admin;
pub mod telemetry;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use controller::ControllerError;
pub use controller::DocumentController;
pub use error::ServerError;
pub use routes::AppState;
pub use routes::build_router;
pub use sync_admin::DeviceSyncAdmin;
pub use sync_admin::ProvisionError;
pub use sync_admin::SyncAdminProvisioner;
pub use telemetry::NoopMetrics;
pub use telemetry::RequestMetrics;
pub use telemetry::RouteMetricEvent;
