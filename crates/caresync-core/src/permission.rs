// crates/caresync-core/src/permission.rs
// ============================================================================
// Module: Permission Evaluators
// Description: Document-level and namespace-level access decisions.
// Purpose: Decide allow/deny for every document action, failing closed.
// Dependencies: caresync-core (role, doc_type, document, context)
// ============================================================================

//! ## Overview
//! Two evaluators gate document access. [`has_permission`] is the
//! document-level check evaluated against a fetched document; it is a pure
//! role × action table over a small set of ownership predicates.
//! [`has_namespace_permission`] is the coarse pre-check run before listing
//! queries; passing it does not guarantee every individual document passes
//! the document-level check.
//!
//! Invariants:
//! - Decisions are pure booleans with no side effects.
//! - Malformed or reserved doc types deny for every role and action.
//! - Unknown role/action combinations fall through to deny.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::context::CallerContext;
use crate::doc_type::ACCOUNT_ACCOUNT;
use crate::doc_type::ACCOUNT_DEVICE;
use crate::doc_type::ACCOUNT_DEVICE_STATUS;
use crate::doc_type::ACCOUNT_FACILITY;
use crate::doc_type::ACCOUNT_SYSTEM_INFO;
use crate::doc_type::DocType;
use crate::doc_type::Namespace;
use crate::document::SyncDocument;
use crate::role::Role;

// ============================================================================
// SECTION: Action
// ============================================================================

/// Document action under evaluation.
///
/// # Invariants
/// - Wire strings are the HTTP method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    /// Read a document.
    Get,
    /// Create a document.
    Post,
    /// Update a document.
    Put,
    /// Delete a document.
    Delete,
}

impl Action {
    /// Every action, in table order.
    pub const ALL: [Self; 4] = [Self::Get, Self::Post, Self::Put, Self::Delete];

    /// Returns the stable wire label for the action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Type Sets
// ============================================================================

/// Account-namespace types a platform administrator may touch, alongside the
/// whole content namespace.
const PLATFORM_ADMIN_ACCOUNT_TYPES: &[&str] =
    &[ACCOUNT_ACCOUNT, ACCOUNT_DEVICE, ACCOUNT_DEVICE_STATUS, ACCOUNT_FACILITY];

/// Types an account administrator may create or delete.
const ACCOUNT_ADMIN_WRITE_TYPES: &[&str] =
    &[ACCOUNT_DEVICE, ACCOUNT_DEVICE_STATUS, ACCOUNT_FACILITY];

/// Types a facility administrator may create or delete.
const FACILITY_ADMIN_WRITE_TYPES: &[&str] = &[ACCOUNT_DEVICE, ACCOUNT_DEVICE_STATUS];

// ============================================================================
// SECTION: Document Permission Evaluator
// ============================================================================

/// Decides whether `caller` may perform `action` on `doc`.
///
/// The decision is evaluated against the document's `doc_type` namespace and
/// the caller's ownership scope. The reserved system-info type and any
/// malformed `doc_type` deny unconditionally.
#[must_use]
pub fn has_permission(action: Action, doc: &SyncDocument, caller: &CallerContext) -> bool {
    let Some(doc_type) = doc.doc_type.as_deref() else {
        return false;
    };
    if doc_type == ACCOUNT_SYSTEM_INFO {
        return false;
    }
    let Some(parsed) = DocType::parse(doc_type) else {
        return false;
    };

    match caller.role() {
        Role::PlatformAdmin => {
            parsed.namespace == Namespace::Content
                || PLATFORM_ADMIN_ACCOUNT_TYPES.contains(&doc_type)
        }
        Role::PlatformContentAdmin => parsed.namespace == Namespace::Content,
        Role::AccountAdmin => account_admin_permission(action, doc, doc_type, caller),
        Role::FacilityAdmin => facility_admin_permission(action, doc, doc_type, caller),
        Role::FacilityUser => false,
    }
}

/// Account-administrator arm of the permission table.
fn account_admin_permission(
    action: Action,
    doc: &SyncDocument,
    doc_type: &str,
    caller: &CallerContext,
) -> bool {
    let Some(account_id) = caller.account_id() else {
        return false;
    };
    match action {
        Action::Get | Action::Put => {
            if doc_type == ACCOUNT_ACCOUNT {
                doc.is_account_doc_of(account_id)
            } else {
                doc.belongs_to_account(account_id)
            }
        }
        Action::Post | Action::Delete => ACCOUNT_ADMIN_WRITE_TYPES.contains(&doc_type),
    }
}

/// Facility-administrator arm of the permission table.
fn facility_admin_permission(
    action: Action,
    doc: &SyncDocument,
    doc_type: &str,
    caller: &CallerContext,
) -> bool {
    let facility_ids = caller.facility_ids();
    match action {
        Action::Get => {
            // The account document reads through; it is not writable below.
            caller.account_id().is_some_and(|id| doc.is_account_doc_of(id))
                || doc.is_facility_doc_in(facility_ids)
                || doc.belongs_to_facility_set(facility_ids)
        }
        Action::Put => {
            doc.is_facility_doc_in(facility_ids) || doc.belongs_to_facility_set(facility_ids)
        }
        Action::Post | Action::Delete => FACILITY_ADMIN_WRITE_TYPES.contains(&doc_type),
    }
}

// ============================================================================
// SECTION: Namespace Permission Evaluator
// ============================================================================

/// Coarse pre-check: may `role` touch `namespace` at all.
///
/// Necessary but not sufficient; it only gatekeeps whether a listing query
/// should be attempted.
#[must_use]
pub const fn has_namespace_permission(namespace: Namespace, role: Role) -> bool {
    match namespace {
        Namespace::Account => {
            !matches!(role, Role::FacilityUser | Role::PlatformContentAdmin)
        }
        Namespace::Content => {
            matches!(role, Role::PlatformAdmin | Role::PlatformContentAdmin)
        }
    }
}
