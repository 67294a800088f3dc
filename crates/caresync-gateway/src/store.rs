// crates/caresync-gateway/src/store.rs
// ============================================================================
// Module: Document Store Seam
// Description: Async trait over the store operations consumers use.
// Purpose: Let auth and the controller substitute an in-memory store in tests.
// Dependencies: async-trait, caresync-core
// ============================================================================

//! ## Overview
//! `DocumentStore` is the seam between policy code and the HTTP client.
//! Consumers hold `Arc<dyn DocumentStore>`; production wires in
//! [`GatewayClient`], tests wire in recording fakes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use caresync_core::SyncDocument;

use crate::client::GatewayClient;
use crate::error::GatewayError;
use crate::types::BulkUpdateResult;
use crate::types::DbInfo;
use crate::types::UpdateResult;

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Document store operations consumed by auth and the controller.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches one document; absent documents read as `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store call fails.
    async fn get(&self, bucket: &str, id: &str) -> Result<Option<SyncDocument>, GatewayError>;

    /// Fetches documents for the given keys, preserving key order.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store call fails.
    async fn get_all_by_keys(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<Vec<SyncDocument>, GatewayError>;

    /// Writes one document at its carried revision.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store rejects or the call fails.
    async fn update(&self, bucket: &str, doc: SyncDocument) -> Result<SyncDocument, GatewayError>;

    /// Writes one document, adopting the stored revision first.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store rejects or the call fails.
    async fn upsert(&self, bucket: &str, doc: SyncDocument) -> Result<SyncDocument, GatewayError>;

    /// Writes many documents in one logical batch.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store call fails.
    async fn bulk_update(
        &self,
        bucket: &str,
        docs: &[SyncDocument],
    ) -> Result<Vec<BulkUpdateResult>, GatewayError>;

    /// Deletes one document at its carried revision.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store rejects or the call fails.
    async fn delete(&self, bucket: &str, doc: &SyncDocument) -> Result<UpdateResult, GatewayError>;

    /// Creates or updates a store sync user.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store call fails.
    async fn update_user(
        &self,
        bucket: &str,
        username: &str,
        password: &str,
    ) -> Result<UpdateResult, GatewayError>;

    /// Fetches bucket root info for health probing.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError`] when the store call fails.
    async fn db_info(&self, bucket: &str) -> Result<DbInfo, GatewayError>;
}

// ============================================================================
// SECTION: Client Implementation
// ============================================================================

#[async_trait]
impl DocumentStore for GatewayClient {
    async fn get(&self, bucket: &str, id: &str) -> Result<Option<SyncDocument>, GatewayError> {
        Self::get(self, bucket, id).await
    }

    async fn get_all_by_keys(
        &self,
        bucket: &str,
        keys: &[String],
    ) -> Result<Vec<SyncDocument>, GatewayError> {
        Self::get_all_by_keys(self, bucket, keys).await
    }

    async fn update(&self, bucket: &str, doc: SyncDocument) -> Result<SyncDocument, GatewayError> {
        Self::update(self, bucket, doc).await
    }

    async fn upsert(&self, bucket: &str, doc: SyncDocument) -> Result<SyncDocument, GatewayError> {
        Self::upsert(self, bucket, doc).await
    }

    async fn bulk_update(
        &self,
        bucket: &str,
        docs: &[SyncDocument],
    ) -> Result<Vec<BulkUpdateResult>, GatewayError> {
        Self::bulk_update(self, bucket, docs).await
    }

    async fn delete(&self, bucket: &str, doc: &SyncDocument) -> Result<UpdateResult, GatewayError> {
        Self::delete(self, bucket, doc).await
    }

    async fn update_user(
        &self,
        bucket: &str,
        username: &str,
        password: &str,
    ) -> Result<UpdateResult, GatewayError> {
        Self::update_user(self, bucket, username, password).await
    }

    async fn db_info(&self, bucket: &str) -> Result<DbInfo, GatewayError> {
        Self::db_info(self, bucket).await
    }
}
