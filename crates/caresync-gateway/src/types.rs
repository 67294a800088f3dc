// crates/caresync-gateway/src/types.rs
// ============================================================================
// Module: Gateway Wire Types
// Description: Response shapes returned by the document store.
// Purpose: Deserialize store responses into explicit, defaulted records.
// Dependencies: caresync-core, serde, serde_json
// ============================================================================

//! ## Overview
//! These records mirror the store's JSON responses. Every field is defaulted
//! so partial upstream bodies deserialize instead of failing; callers inspect
//! `ok`/`error` rather than relying on field presence.

// ============================================================================
// SECTION: Imports
// ============================================================================

use caresync_core::SyncDocument;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Write Results
// ============================================================================

/// Result of a single-document write or delete.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UpdateResult {
    /// True when the store accepted the write.
    #[serde(default)]
    pub ok: bool,
    /// Identifier of the affected document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Revision assigned by the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Short error label on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable rejection reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Per-document entry of a `_bulk_docs` response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BulkUpdateResult {
    /// Identifier of the affected document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Revision assigned by the store, absent on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Short error label on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable rejection reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// ============================================================================
// SECTION: Database Info
// ============================================================================

/// Bucket root info used for health probing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbInfo {
    /// Name of the bucket database.
    #[serde(default)]
    pub db_name: Option<String>,
    /// Reported bucket state, `"Online"` when serving.
    #[serde(default)]
    pub state: Option<String>,
    /// Error label when the bucket is unhealthy.
    #[serde(default)]
    pub error: Option<String>,
}

// ============================================================================
// SECTION: Batch Responses
// ============================================================================

/// One row of a view query response.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewRow {
    /// Source document identifier, absent for reduced rows.
    #[serde(default)]
    pub id: Option<String>,
    /// Emitted view key.
    #[serde(default)]
    pub key: Value,
    /// Emitted view value.
    #[serde(default)]
    pub value: Value,
    /// Full document when the view includes docs.
    #[serde(default)]
    pub doc: Option<SyncDocument>,
}

/// Internal `_all_docs` response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct AllDocsResponse {
    /// Result rows, one per requested key.
    #[serde(default)]
    pub rows: Vec<AllDocsRow>,
}

/// One `_all_docs` row; `doc` is absent for unknown keys.
#[derive(Debug, Deserialize)]
pub(crate) struct AllDocsRow {
    /// Full document when the key resolved.
    #[serde(default)]
    pub doc: Option<SyncDocument>,
}

/// Internal view response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ViewResponse {
    /// Emitted rows in view order.
    #[serde(default)]
    pub rows: Vec<ViewRow>,
}
