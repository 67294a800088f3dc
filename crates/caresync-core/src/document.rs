// crates/caresync-core/src/document.rs
// ============================================================================
// Module: Sync Documents
// Description: Generic document record and ownership predicates.
// Purpose: Carry the metadata the access-control engine evaluates.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Documents are generic JSON records. The access-control engine only reads
//! the identity (`_id`), the optimistic-concurrency revision (`_rev`), the
//! compound `doc_type`, and the ownership attributes (`account_id`,
//! `facility_id`); everything else is carried opaquely so pass-through writes
//! preserve the full body.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

// ============================================================================
// SECTION: Document
// ============================================================================

/// A document as stored in the gateway, with opaque extra fields.
///
/// # Invariants
/// - `rev` is the revision last observed by the caller; stale revisions are
///   rejected by the store on write.
/// - `extra` round-trips unrecognized fields untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncDocument {
    /// Document identifier, globally unique within its bucket.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Opaque revision token required for update and delete.
    #[serde(rename = "_rev", skip_serializing_if = "Option::is_none")]
    pub rev: Option<String>,
    /// Compound `{namespace}_{type}` document type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Owning account identifier, when the document is account-owned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    /// Owning facility identifier, when the document is facility-owned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    /// Remaining document body, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SyncDocument {
    /// Builds a document carrying only a `doc_type`.
    #[must_use]
    pub fn of_type(doc_type: impl Into<String>) -> Self {
        Self {
            doc_type: Some(doc_type.into()),
            ..Self::default()
        }
    }

    /// True when the document's own id equals `account_id`.
    #[must_use]
    pub fn is_account_doc_of(&self, account_id: &str) -> bool {
        self.id.as_deref() == Some(account_id)
    }

    /// True when the document's `account_id` attribute equals `account_id`.
    #[must_use]
    pub fn belongs_to_account(&self, account_id: &str) -> bool {
        self.account_id.as_deref() == Some(account_id)
    }

    /// True when the document's own id is a member of `facility_ids`.
    #[must_use]
    pub fn is_facility_doc_in(&self, facility_ids: &[String]) -> bool {
        self.id.as_ref().is_some_and(|id| facility_ids.contains(id))
    }

    /// True when the document's `facility_id` attribute is in `facility_ids`.
    #[must_use]
    pub fn belongs_to_facility_set(&self, facility_ids: &[String]) -> bool {
        self.facility_id.as_ref().is_some_and(|id| facility_ids.contains(id))
    }
}
