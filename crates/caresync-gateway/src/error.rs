// crates/caresync-gateway/src/error.rs
// ============================================================================
// Module: Gateway Errors
// Description: Failure taxonomy for document store operations.
// Purpose: Surface upstream status and rejection details without retries.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Gateway failures are explicit and carry the upstream evidence: transport
//! errors keep the client message, unexpected statuses keep status and body,
//! rejected writes keep the store's error/reason pair. There is no retry or
//! backoff at this layer.

use thiserror::Error;

/// Document store operation failures.
///
/// # Invariants
/// - Variants are stable for route-layer classification.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level request failure.
    #[error("gateway request failed: {0}")]
    Http(String),
    /// Upstream answered with an unexpected status.
    #[error("gateway returned status {status}: {body}")]
    UnexpectedStatus {
        /// HTTP status code received.
        status: u16,
        /// Raw response body for diagnosis.
        body: String,
    },
    /// Upstream body did not parse as the expected shape.
    #[error("gateway response malformed: {0}")]
    MalformedBody(String),
    /// The store rejected a write, including a stale-revision conflict.
    #[error("unable to update document. error: {error}. reason: {reason}")]
    WriteRejected {
        /// Short error label from the store.
        error: String,
        /// Human-readable rejection reason.
        reason: String,
    },
    /// The request was invalid before any call was issued.
    #[error("invalid gateway request: {0}")]
    InvalidRequest(String),
}
