// crates/caresync-core/src/doc_type.rs
// ============================================================================
// Module: Document Namespaces and Types
// Description: Closed namespace/type vocabulary for tenant documents.
// Purpose: Validate compound doc_type strings against the known document set.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every document carries a compound `doc_type` of the form
//! `{namespace}_{type}`. The namespace is the segment before the first
//! underscore; the type is the remainder. This module defines the closed set
//! of recognized (namespace, type) pairs and the validation helpers used by
//! the route layer and the identifier resolver. A `doc_type` outside this
//! vocabulary is never accessible to anyone, and the `account_system_info`
//! type is reserved and deliberately inaccessible.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Namespace
// ============================================================================

/// Top-level document category.
///
/// # Invariants
/// - Wire strings are `account` and `content`; nothing else parses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Documents participating in the account/facility ownership hierarchy.
    Account,
    /// Globally owned content-library documents.
    Content,
}

impl Namespace {
    /// Parses a namespace wire string, returning `None` for unknown values.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "account" => Some(Self::Account),
            "content" => Some(Self::Content),
            _ => None,
        }
    }

    /// Returns the stable wire string for the namespace.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Content => "content",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Doc Type Constants
// ============================================================================

/// Account document (`account_account`).
pub const ACCOUNT_ACCOUNT: &str = "account_account";
/// Device document.
pub const ACCOUNT_DEVICE: &str = "account_device";
/// Device status document.
pub const ACCOUNT_DEVICE_STATUS: &str = "account_device_status";
/// Facility document.
pub const ACCOUNT_FACILITY: &str = "account_facility";
/// Resident document.
pub const ACCOUNT_RESIDENT: &str = "account_resident";
/// Reserved system info document; never accessible through the facade.
pub const ACCOUNT_SYSTEM_INFO: &str = "account_system_info";
/// Content library item document.
pub const CONTENT_CONTENT_ITEM: &str = "content_content_item";
/// Content library folder document.
pub const CONTENT_LIBRARY_FOLDER: &str = "content_library_folder";

/// Recognized types within the account namespace.
const ACCOUNT_TYPES: &[&str] =
    &["account", "device", "device_status", "facility", "resident", "system_info"];

/// Recognized types within the content namespace.
const CONTENT_TYPES: &[&str] = &["content_item", "library_folder"];

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Returns true when `type_name` is a recognized type within `namespace`.
#[must_use]
pub fn is_valid_doc_type(namespace: Namespace, type_name: &str) -> bool {
    let types = match namespace {
        Namespace::Account => ACCOUNT_TYPES,
        Namespace::Content => CONTENT_TYPES,
    };
    types.contains(&type_name)
}

// ============================================================================
// SECTION: Parsed Doc Type
// ============================================================================

/// A `doc_type` string split into its namespace and type segments.
///
/// # Invariants
/// - `namespace` parsed from the segment before the first underscore.
/// - `type_name` is the remainder and is non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocType<'a> {
    /// Namespace segment.
    pub namespace: Namespace,
    /// Type segment (may itself contain underscores).
    pub type_name: &'a str,
}

impl<'a> DocType<'a> {
    /// Splits a compound `doc_type` on its first underscore.
    ///
    /// Returns `None` when the delimiter is absent, the namespace prefix is
    /// unrecognized, or the type segment is empty.
    #[must_use]
    pub fn parse(doc_type: &'a str) -> Option<Self> {
        let (prefix, type_name) = doc_type.split_once('_')?;
        if type_name.is_empty() {
            return None;
        }
        let namespace = Namespace::parse(prefix)?;
        Some(Self {
            namespace,
            type_name,
        })
    }

    /// Returns true when this doc type is in the recognized vocabulary.
    #[must_use]
    pub fn is_valid(self) -> bool {
        is_valid_doc_type(self.namespace, self.type_name)
    }
}

/// Builds the compound wire string for a namespace and type.
#[must_use]
pub fn compound(namespace: Namespace, type_name: &str) -> String {
    format!("{}_{type_name}", namespace.as_str())
}
