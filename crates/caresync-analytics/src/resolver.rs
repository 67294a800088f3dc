// crates/caresync-analytics/src/resolver.rs
// ============================================================================
// Module: Identifier Resolver
// Description: Role-scoped resolution of document ids by namespace and type.
// Purpose: Select the statement matching the caller's visibility scope.
// Dependencies: caresync-core, serde_json
// ============================================================================

//! ## Overview
//! Resolution picks a statement by role: platform roles see every id of the
//! doc type, account admins see their account's ids, facility admins see
//! their facilities' ids. Roles with no listing scope resolve to an empty
//! set without touching the analytics service. `$DOC_TYPE` binds the
//! compound type, or a `%` wildcard when only a namespace is given. Ids come
//! back bare, in engine-returned order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use caresync_core::CallerContext;
use caresync_core::Namespace;
use caresync_core::Role;
use caresync_core::is_valid_doc_type;

use crate::client::QueryExecutor;
use crate::client::quote_param;
use crate::client::quote_param_list;
use crate::error::ResolveError;
use crate::queries;

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// Resolves visible document ids for a caller.
pub struct IdResolver {
    /// Statement executor, swapped for a recording fake in tests.
    executor: Arc<dyn QueryExecutor>,
}

impl IdResolver {
    /// Builds a resolver over the given executor.
    #[must_use]
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }

    /// Resolves every id in the namespace visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the query fails.
    pub async fn resolve_by_namespace(
        &self,
        namespace: Namespace,
        caller: &CallerContext,
    ) -> Result<Vec<String>, ResolveError> {
        self.resolve(namespace, None, caller).await
    }

    /// Resolves ids of one document type visible to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::InvalidDocType`] for an unknown type and
    /// [`ResolveError`] when the query fails.
    pub async fn resolve_by_namespace_type(
        &self,
        namespace: Namespace,
        type_name: &str,
        caller: &CallerContext,
    ) -> Result<Vec<String>, ResolveError> {
        self.resolve(namespace, Some(type_name), caller).await
    }

    /// Shared resolution path.
    async fn resolve(
        &self,
        namespace: Namespace,
        type_name: Option<&str>,
        caller: &CallerContext,
    ) -> Result<Vec<String>, ResolveError> {
        let doc_type = format!("{}_{}", namespace.as_str(), type_name.unwrap_or("%"));
        let mut params = vec![("$DOC_TYPE".to_string(), quote_param(&doc_type))];
        let statement = match caller.role() {
            Role::PlatformAdmin | Role::PlatformContentAdmin => queries::ID_BY_DOC_TYPE,
            Role::AccountAdmin => {
                params.push((
                    "$ACCOUNT_ID".to_string(),
                    quote_param(caller.account_id().unwrap_or_default()),
                ));
                queries::ID_BY_DOC_TYPE_ACCOUNT
            }
            Role::FacilityAdmin => {
                params.push((
                    "$ACCOUNT_ID".to_string(),
                    quote_param(caller.account_id().unwrap_or_default()),
                ));
                params.push((
                    "$FACILITY_IDS".to_string(),
                    quote_param_list(caller.facility_ids()),
                ));
                queries::ID_BY_DOC_TYPE_ACCOUNT_FACILITIES
            }
            Role::FacilityUser => return Ok(Vec::new()),
        };
        if let Some(type_name) = type_name
            && !is_valid_doc_type(namespace, type_name)
        {
            return Err(ResolveError::InvalidDocType);
        }
        let rows = self.executor.execute(statement, params).await?;
        Ok(rows
            .into_iter()
            .filter_map(|row| row.as_str().map(str::to_string))
            .collect())
    }
}
