// crates/caresync-gateway/src/lib.rs
// ============================================================================
// Module: CareSync Gateway
// Description: HTTP client for the platform document store.
// Purpose: Provide store operations with batch splitting behind a trait seam.
// Dependencies: caresync-config, caresync-core, reqwest, tokio
// ============================================================================

//! ## Overview
//! This crate wraps the document store's REST dialect: single and batch
//! reads, view queries, optimistic-concurrency writes, bulk writes, sync-user
//! provisioning, and bucket health info. Batch operations transparently split
//! in half when they would exceed the store's URL or payload ceilings, with
//! halves issued concurrently and merged in input order. The
//! [`DocumentStore`] trait is the seam consumers program against.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod buckets;
pub mod client;
pub mod encoding;
pub mod error;
pub mod store;
pub mod types;
pub mod view;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use client::DEFAULT_SYNC_USER_PASSWORD;
pub use client::GatewayClient;
pub use encoding::encode_component;
pub use encoding::encode_uri;
pub use error::GatewayError;
pub use store::DocumentStore;
pub use types::BulkUpdateResult;
pub use types::DbInfo;
pub use types::UpdateResult;
pub use types::ViewRow;
pub use view::ViewKey;
pub use view::ViewQuery;
