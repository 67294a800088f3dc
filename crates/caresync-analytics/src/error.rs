// crates/caresync-analytics/src/error.rs
// ============================================================================
// Module: Analytics Errors
// Description: Failure taxonomy for analytics queries and id resolution.
// Purpose: Keep upstream engine errors diagnosable and doc-type misuse eager.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Query failures keep the engine's joined error messages so operators can
//! diagnose statement problems from the error alone. Doc-type validation
//! fails before any query is issued.

use thiserror::Error;

/// Analytics service failures.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Transport-level request failure.
    #[error("analytics request failed: {0}")]
    Http(String),
    /// The engine answered without success; carries joined engine errors.
    #[error("analytics query failed: {0}")]
    QueryFailed(String),
}

/// Identifier resolution failures.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The requested namespace/type pair is not a valid document type.
    #[error("invalid doc type namespace or type")]
    InvalidDocType,
    /// The underlying analytics query failed.
    #[error(transparent)]
    Query(#[from] AnalyticsError),
}
