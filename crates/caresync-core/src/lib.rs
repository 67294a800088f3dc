// crates/caresync-core/src/lib.rs
// ============================================================================
// Module: CareSync Core
// Description: Domain model and access-control engine for the CareSync API.
// Purpose: Provide pure, I/O-free permission decisions over tenant documents.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This crate holds the domain model shared by every CareSync service crate:
//! portal roles, caller contexts, document namespaces and types, and the two
//! permission evaluators that gate every document read and write. All logic
//! here is pure and synchronous; collaborating crates perform the I/O.
//! Invariants:
//! - Permission decisions are deterministic for identical inputs.
//! - Unknown roles, namespaces, and document types are denied, never errors.
//!
//! Security posture: the evaluators are a trust boundary and fail closed on
//! missing or malformed document metadata.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod context;
pub mod doc_type;
pub mod document;
pub mod outcome;
pub mod permission;
pub mod role;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::CallerContext;
pub use context::ContextError;
pub use doc_type::DocType;
pub use doc_type::Namespace;
pub use doc_type::is_valid_doc_type;
pub use document::SyncDocument;
pub use outcome::AuthOutcome;
pub use permission::Action;
pub use permission::has_namespace_permission;
pub use permission::has_permission;
pub use role::Role;
