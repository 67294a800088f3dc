// crates/caresync-server/src/controller.rs
// ============================================================================
// Module: Pass-Through Document Controller
// Description: Resolver-scoped reads and pass-through writes for documents.
// Purpose: Bridge route handlers to the resolver and the document store.
// Dependencies: caresync-analytics, caresync-core, caresync-gateway, uuid
// ============================================================================

//! ## Overview
//! The controller owns no policy. Listings ask the identifier resolver for
//! the ids visible to the caller and batch-fetch them from the account
//! bucket; single-document operations pass straight through to the store.
//! Permission checks happen in the route layer before any write reaches
//! this controller.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use caresync_analytics::IdResolver;
use caresync_analytics::ResolveError;
use caresync_core::CallerContext;
use caresync_core::Namespace;
use caresync_core::SyncDocument;
use caresync_core::doc_type::compound;
use caresync_gateway::DocumentStore;
use caresync_gateway::GatewayError;
use caresync_gateway::UpdateResult;
use caresync_gateway::buckets;
use thiserror::Error;
use uuid::Uuid;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Controller failures from the resolver or the store.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// Identifier resolution failed.
    #[error("id resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    /// A document store call failed.
    #[error("document store call failed: {0}")]
    Store(#[from] GatewayError),
}

// ============================================================================
// SECTION: Controller
// ============================================================================

/// Pass-through controller over the resolver and the document store.
pub struct DocumentController {
    /// Visible-id resolver scoped by caller role.
    resolver: IdResolver,
    /// Document store holding the account bucket.
    store: Arc<dyn DocumentStore>,
}

impl DocumentController {
    /// Builds a controller over the given resolver and store.
    #[must_use]
    pub fn new(resolver: IdResolver, store: Arc<dyn DocumentStore>) -> Self {
        Self {
            resolver,
            store,
        }
    }

    /// Fetches every document in the namespace visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when resolution or the fetch fails.
    pub async fn get_docs_by_namespace(
        &self,
        namespace: Namespace,
        caller: &CallerContext,
    ) -> Result<Vec<SyncDocument>, ControllerError> {
        let ids = self.resolver.resolve_by_namespace(namespace, caller).await?;
        Ok(self.store.get_all_by_keys(buckets::ACCOUNT_DATA, &ids).await?)
    }

    /// Fetches documents of one type visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when resolution or the fetch fails.
    pub async fn get_docs_by_namespace_type(
        &self,
        namespace: Namespace,
        type_name: &str,
        caller: &CallerContext,
    ) -> Result<Vec<SyncDocument>, ControllerError> {
        let ids = self.resolver.resolve_by_namespace_type(namespace, type_name, caller).await?;
        Ok(self.store.get_all_by_keys(buckets::ACCOUNT_DATA, &ids).await?)
    }

    /// Fetches one document; a stored document of a different type reads as
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when the fetch fails.
    pub async fn get_doc(
        &self,
        namespace: Namespace,
        type_name: &str,
        id: &str,
    ) -> Result<Option<SyncDocument>, ControllerError> {
        let expected = compound(namespace, type_name);
        let doc = self.store.get(buckets::ACCOUNT_DATA, id).await?;
        Ok(doc.filter(|doc| doc.doc_type.as_deref() == Some(expected.as_str())))
    }

    /// Creates a document under a freshly assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when the store rejects or the call fails.
    pub async fn post_doc(
        &self,
        mut doc: SyncDocument,
    ) -> Result<SyncDocument, ControllerError> {
        doc.id = Some(Uuid::new_v4().to_string());
        Ok(self.store.update(buckets::ACCOUNT_DATA, doc).await?)
    }

    /// Updates a document at its carried revision.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when the store rejects or the call fails.
    pub async fn put_doc(&self, doc: SyncDocument) -> Result<SyncDocument, ControllerError> {
        Ok(self.store.update(buckets::ACCOUNT_DATA, doc).await?)
    }

    /// Deletes a document at its carried revision.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError`] when the store rejects or the call fails.
    pub async fn delete_doc(&self, doc: &SyncDocument) -> Result<UpdateResult, ControllerError> {
        Ok(self.store.delete(buckets::ACCOUNT_DATA, doc).await?)
    }
}
